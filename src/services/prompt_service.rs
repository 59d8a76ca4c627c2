use crate::models::question::{Difficulty, QuestionType};

const MULTIPLE_CHOICE_SCHEMA: &str = r#"{
  "questions": [
    {
      "question": "Question text here?",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "correctAnswer": "Option A",
      "explanation": "Why this answer is correct"
    }
  ]
}"#;

const FILL_BLANK_SCHEMA: &str = r#"{
  "questions": [
    {
      "question": "The ______ is responsible for ...",
      "correctAnswer": "missing word or phrase",
      "explanation": "Why this answer fills the blank"
    }
  ]
}"#;

const TRUE_FALSE_SCHEMA: &str = r#"{
  "questions": [
    {
      "question": "Statement to evaluate.",
      "correctAnswer": "True",
      "explanation": "Why the statement is true or false"
    }
  ]
}"#;

const ESSAY_SCHEMA: &str = r#"{
  "questions": [
    {
      "question": "Essay prompt here",
      "explanation": "Key points a good answer should cover"
    }
  ]
}"#;

fn schema_example(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::MultipleChoice => MULTIPLE_CHOICE_SCHEMA,
        QuestionType::FillBlank => FILL_BLANK_SCHEMA,
        QuestionType::TrueFalse => TRUE_FALSE_SCHEMA,
        QuestionType::Essay => ESSAY_SCHEMA,
    }
}

fn type_rules(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::MultipleChoice => {
            "Each question must have exactly 4 options and correctAnswer must repeat the text of the correct option."
        }
        QuestionType::FillBlank => {
            "Each question must contain a blank written as ______ and correctAnswer must be the missing word or phrase."
        }
        QuestionType::TrueFalse => {
            "Each question must be a statement and correctAnswer must be either \"True\" or \"False\"."
        }
        QuestionType::Essay => {
            "Each question must be an open-ended prompt. Do not include options or correctAnswer."
        }
    }
}

fn difficulty_guidance(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "Focus on recall of facts and definitions stated directly in the material.",
        Difficulty::Medium => "Test understanding and application of the concepts in the material.",
        Difficulty::Hard => "Require analysis, comparison or synthesis of several ideas from the material.",
    }
}

/// Builds the instruction sent to every provider.
pub fn build_prompt(
    material: &str,
    question_type: QuestionType,
    question_count: usize,
    difficulty: Difficulty,
) -> String {
    format!(
        "You are an experienced teacher preparing an exam.\n\
Create {count} {label} questions at {difficulty} difficulty based on the learning material below.\n\
{guidance}\n\
{rules}\n\
\n\
LEARNING MATERIAL:\n\
---\n\
{material}\n\
---\n\
\n\
Use exactly this JSON format (formatting example only):\n\
{schema}\n\
\n\
Respond with valid JSON only, containing exactly {count} questions. \
Do not add any text, explanation or markdown outside the JSON object.",
        count = question_count,
        label = question_type.label(),
        difficulty = difficulty.as_str(),
        guidance = difficulty_guidance(difficulty),
        rules = type_rules(question_type),
        material = material,
        schema = schema_example(question_type),
    )
}
