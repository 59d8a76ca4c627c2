use crate::error::{Error, Result};
use crate::models::question::{GenerationRequest, Question, QuestionType};
use serde_json::Value as JsonValue;

/// Recovers a JSON value from a model reply, tolerating prose around it.
pub fn parse_response(raw: &str) -> Result<JsonValue> {
    if let Ok(value) = serde_json::from_str::<JsonValue>(raw.trim()) {
        return Ok(value);
    }

    let start = raw.find('{');
    let end = raw.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => serde_json::from_str(&raw[start..=end])
            .map_err(|e| Error::ResponseUnparseable(e.to_string())),
        _ => Err(Error::ResponseUnparseable(
            "no JSON object found in response".to_string(),
        )),
    }
}

pub fn sanitize_questions(raw: &JsonValue, request: &GenerationRequest) -> Vec<Question> {
    let items: &[JsonValue] = if let Some(arr) = raw.get("questions").and_then(|a| a.as_array()) {
        arr.as_slice()
    } else if let Some(arr) = raw.as_array() {
        arr.as_slice()
    } else {
        &[]
    };

    let mut questions: Vec<Question> = items
        .iter()
        .filter_map(|v| coerce_question(v, request.question_type))
        .collect();

    if questions.len() > request.question_count {
        questions.truncate(request.question_count);
    }
    questions
}

fn coerce_question(v: &JsonValue, question_type: QuestionType) -> Option<Question> {
    let question = v
        .get("question")
        .and_then(|s| s.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let explanation = v
        .get("explanation")
        .and_then(|s| s.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    let raw_answer = v.get("correctAnswer").or_else(|| v.get("correct_answer"));

    match question_type {
        QuestionType::MultipleChoice => {
            let options: Vec<String> = v
                .get("options")
                .and_then(|o| o.as_array())
                .map(|a| {
                    a.iter()
                        .filter_map(|x| x.as_str())
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default();
            if options.len() < 2 {
                return None;
            }
            let correct_answer = raw_answer.and_then(|a| resolve_option(a, &options))?;
            Some(Question {
                question,
                options: Some(options),
                correct_answer: Some(correct_answer),
                explanation,
            })
        }
        QuestionType::Essay => Some(Question {
            question,
            options: None,
            correct_answer: None,
            explanation,
        }),
        QuestionType::FillBlank | QuestionType::TrueFalse => Some(Question {
            question,
            options: None,
            correct_answer: Some(raw_answer.and_then(answer_to_string)?),
            explanation,
        }),
    }
}

fn answer_to_string(answer: &JsonValue) -> Option<String> {
    match answer {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        JsonValue::Bool(true) => Some("True".to_string()),
        JsonValue::Bool(false) => Some("False".to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Maps an index (0-based) or letter (`A`..) answer onto the option text.
fn resolve_option(answer: &JsonValue, options: &[String]) -> Option<String> {
    if let Some(idx) = answer.as_u64() {
        return options.get(idx as usize).cloned();
    }

    let text = answer_to_string(answer)?;
    if options.iter().any(|o| o == &text) {
        return Some(text);
    }
    let mut chars = text.chars();
    if let (Some(letter), None) = (chars.next(), chars.next()) {
        let upper = letter.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            let idx = (upper as u8 - b'A') as usize;
            if let Some(option) = options.get(idx) {
                return Some(option.clone());
            }
        }
    }
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::Difficulty;
    use serde_json::json;

    fn request(question_type: QuestionType, count: usize) -> GenerationRequest {
        GenerationRequest {
            material: "m".repeat(60),
            question_type,
            question_count: count,
            difficulty: Difficulty::Medium,
        }
    }

    #[test]
    fn parses_plain_json() {
        let raw = r#"{"questions":[{"question":"Q1"}]}"#;
        assert_eq!(parse_response(raw).unwrap(), json!({"questions":[{"question":"Q1"}]}));
    }

    #[test]
    fn recovers_json_surrounded_by_prose() {
        let body = json!({"questions":[{"question":"Q1","options":["a","b"],"correctAnswer":"a"}]});
        let raw = format!("Sure! Here are your questions:\n```json\n{}\n```\nGood luck.", body);
        assert_eq!(parse_response(&raw).unwrap(), body);
    }

    #[test]
    fn fails_without_braces() {
        let err = parse_response("I cannot help with that.").unwrap_err();
        assert!(matches!(err, Error::ResponseUnparseable(_)));
    }

    #[test]
    fn fails_on_broken_json_span() {
        assert!(parse_response("prefix { not json } suffix").is_err());
    }

    #[test]
    fn maps_index_and_letter_answers_to_option_text() {
        let raw = json!({"questions": [
            {"question": "Q1", "options": ["a", "b", "c", "d"], "correctAnswer": 2},
            {"question": "Q2", "options": ["a", "b", "c", "d"], "correctAnswer": "B"},
            {"question": "Q3", "options": ["only one"], "correctAnswer": "only one"},
        ]});
        let qs = sanitize_questions(&raw, &request(QuestionType::MultipleChoice, 5));
        assert_eq!(qs.len(), 2);
        assert_eq!(qs[0].correct_answer.as_deref(), Some("c"));
        assert_eq!(qs[1].correct_answer.as_deref(), Some("b"));
    }

    #[test]
    fn drops_answerable_questions_without_an_answer() {
        let raw = json!({"questions": [
            {"question": "Q1", "options": ["a", "b", "c"]},
            {"question": "Q2", "options": ["a", "b", "c"], "correctAnswer": 7},
            {"question": "Q3", "options": ["a", "b", "c"], "correctAnswer": null},
            {"question": "Q4", "options": ["a", "b", "c"], "correctAnswer": "c"},
        ]});
        let qs = sanitize_questions(&raw, &request(QuestionType::MultipleChoice, 5));
        assert_eq!(qs.len(), 1);
        assert_eq!(qs[0].question, "Q4");

        let raw = json!([{"question": "The ___ is hot."}, {"question": "The ___ is cold.", "correctAnswer": "ice"}]);
        let qs = sanitize_questions(&raw, &request(QuestionType::FillBlank, 5));
        assert_eq!(qs.len(), 1);
        assert_eq!(qs[0].correct_answer.as_deref(), Some("ice"));
    }

    #[test]
    fn strips_answers_from_essays_and_truncates() {
        let raw = json!([
            {"question": "E1", "options": ["x"], "correctAnswer": "x", "explanation": "cover x"},
            {"question": "E2"},
            {"question": "E3"},
        ]);
        let qs = sanitize_questions(&raw, &request(QuestionType::Essay, 2));
        assert_eq!(qs.len(), 2);
        assert!(qs[0].options.is_none());
        assert!(qs[0].correct_answer.is_none());
        assert_eq!(qs[0].explanation.as_deref(), Some("cover x"));
    }

    #[test]
    fn stringifies_boolean_answers() {
        let raw = json!({"questions": [{"question": "Sky is blue.", "correctAnswer": true}]});
        let qs = sanitize_questions(&raw, &request(QuestionType::TrueFalse, 1));
        assert_eq!(qs[0].correct_answer.as_deref(), Some("True"));
    }

    #[test]
    fn wrong_shape_yields_no_questions() {
        let qs = sanitize_questions(&json!({"items": []}), &request(QuestionType::Essay, 3));
        assert!(qs.is_empty());
    }
}
