use crate::models::question::{Difficulty, GenerationRequest, Question, QuestionType};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

const MAX_KEYWORDS: usize = 8;
const MIN_KEYWORD_CHARS: usize = 4;
const DEFAULT_CONCEPT: &str = "the main concept";

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{L}+").expect("valid word regex"));

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "about", "above", "after", "again", "against", "also", "although", "among", "because",
        "been", "before", "being", "below", "between", "both", "but", "can", "could", "does",
        "doing", "down", "during", "each", "either", "else", "even", "every", "from", "further",
        "have", "having", "here", "hers", "herself", "himself", "however", "into", "itself",
        "just", "like", "many", "more", "most", "much", "must", "neither", "once", "only",
        "other", "ours", "ourselves", "over", "same", "shall", "should", "since", "some",
        "such", "than", "that", "their", "theirs", "them", "themselves", "then", "there",
        "these", "they", "this", "those", "through", "under", "until", "upon", "very", "was",
        "were", "what", "when", "where", "whether", "which", "while", "whom", "whose", "will",
        "with", "within", "without", "would", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

fn qualifying_words(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| w.chars().count() >= MIN_KEYWORD_CHARS && !STOP_WORDS.contains(w.as_str()))
}

/// Up to eight distinct keywords in first-seen order.
pub fn extract_keywords(material: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    qualifying_words(material)
        .filter(|w| seen.insert(w.clone()))
        .take(MAX_KEYWORDS)
        .collect()
}

pub fn main_concept(material: &str) -> String {
    material
        .split(['.', '!', '?'])
        .next()
        .and_then(|sentence| qualifying_words(sentence).next())
        .unwrap_or_else(|| DEFAULT_CONCEPT.to_string())
}

/// Template questions used when no AI provider produced a result.
pub fn generate_fallback(request: &GenerationRequest) -> Vec<Question> {
    let keywords = extract_keywords(&request.material);
    let concept = main_concept(&request.material);

    (0..request.question_count)
        .map(|i| {
            let keyword = keywords.get(i).map(String::as_str).unwrap_or(&concept);
            template_question(request.question_type, request.difficulty, keyword, &concept)
        })
        .collect()
}

fn template_question(
    question_type: QuestionType,
    difficulty: Difficulty,
    keyword: &str,
    concept: &str,
) -> Question {
    match question_type {
        QuestionType::MultipleChoice => Question {
            question: format!(
                "Based on the material, which statement about \"{}\" is correct?",
                keyword
            ),
            options: Some(vec![
                format!("\"{}\" is a key idea discussed in the material", keyword),
                format!("\"{}\" is never mentioned in the material", keyword),
                format!("\"{}\" is unrelated to {}", keyword, concept),
                format!("\"{}\" contradicts everything stated in the material", keyword),
            ]),
            correct_answer: Some(format!(
                "\"{}\" is a key idea discussed in the material",
                keyword
            )),
            explanation: Some(format!(
                "The material discusses \"{}\" as part of its explanation of {}.",
                keyword, concept
            )),
        },
        QuestionType::FillBlank => Question {
            question: format!(
                "Complete the statement: ______ is one of the terms the material uses when discussing {}.",
                concept
            ),
            options: None,
            correct_answer: Some(keyword.to_string()),
            explanation: Some(format!(
                "The term \"{}\" appears in the material in connection with {}.",
                keyword, concept
            )),
        },
        QuestionType::TrueFalse => Question {
            question: format!(
                "True or false: the material discusses \"{}\" in connection with {}.",
                keyword, concept
            ),
            options: None,
            correct_answer: Some("True".to_string()),
            explanation: Some(format!(
                "The statement is true because \"{}\" is taken directly from the material.",
                keyword
            )),
        },
        QuestionType::Essay => {
            let depth = match difficulty {
                Difficulty::Easy => "Describe",
                Difficulty::Medium => "Explain",
                Difficulty::Hard => "Critically analyse",
            };
            Question {
                question: format!(
                    "{} the role of \"{}\" in the context of {}, using details from the material.",
                    depth, keyword, concept
                ),
                options: None,
                correct_answer: None,
                explanation: Some(format!(
                    "A good answer defines \"{}\", relates it to {} and supports the argument with examples from the material.",
                    keyword, concept
                )),
            }
        }
    }
}
