use crate::error::{Error, Result};
use crate::models::question::{Difficulty, GenerationRequest, Question, QuestionType};
use crate::services::ai_service::ProviderKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const MIN_MATERIAL_CHARS: usize = 50;
pub const MIN_QUESTION_COUNT: i64 = 1;
pub const MAX_QUESTION_COUNT: i64 = 10;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsPayload {
    #[validate(length(min = 50, message = "Material must be at least 50 characters long"))]
    pub material: String,
    pub question_type: String,
    #[validate(range(min = 1, max = 10, message = "Question count must be between 1 and 10"))]
    pub question_count: i64,
    pub difficulty: Option<String>,
}

impl GenerateQuestionsPayload {
    /// Validates the raw payload and converts it into a typed request.
    pub fn into_request(self) -> Result<GenerationRequest> {
        self.validate()?;

        if self.material.trim().chars().count() < MIN_MATERIAL_CHARS {
            return Err(Error::BadRequest(format!(
                "Material must be at least {} characters long",
                MIN_MATERIAL_CHARS
            )));
        }

        let question_type: QuestionType = self.question_type.parse().map_err(Error::BadRequest)?;
        let difficulty = match self.difficulty.as_deref().map(str::trim) {
            None | Some("") => Difficulty::default(),
            Some(raw) => raw.parse().map_err(Error::BadRequest)?,
        };

        Ok(GenerationRequest {
            material: self.material,
            question_type,
            question_count: self.question_count as usize,
            difficulty,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsResponse {
    pub success: bool,
    pub data: QuestionsData,
    pub metadata: GenerationMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionsData {
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub used_fallback: bool,
    pub failed_providers: Vec<ProviderKind>,
    pub question_type: QuestionType,
    pub question_count: usize,
    pub requested_count: usize,
    pub difficulty: Difficulty,
    pub material_length: usize,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(material: &str, question_type: &str, count: i64) -> GenerateQuestionsPayload {
        GenerateQuestionsPayload {
            material: material.to_string(),
            question_type: question_type.to_string(),
            question_count: count,
            difficulty: None,
        }
    }

    #[test]
    fn defaults_difficulty_to_medium() {
        let req = payload(&"a".repeat(60), "essay", 3).into_request().unwrap();
        assert_eq!(req.difficulty, Difficulty::Medium);
        assert_eq!(req.question_type, QuestionType::Essay);
        assert_eq!(req.question_count, 3);
    }

    #[test]
    fn rejects_short_material() {
        let err = payload("too short", "essay", 3).into_request().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn rejects_whitespace_padded_material() {
        let material = format!("{}{}", "short text", " ".repeat(60));
        let err = payload(&material, "essay", 3).into_request().unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[test]
    fn rejects_count_out_of_range() {
        assert!(payload(&"a".repeat(60), "essay", 0).into_request().is_err());
        assert!(payload(&"a".repeat(60), "essay", 11).into_request().is_err());
    }

    #[test]
    fn rejects_unknown_question_type_and_difficulty() {
        assert!(payload(&"a".repeat(60), "matching", 2).into_request().is_err());

        let mut p = payload(&"a".repeat(60), "true-false", 2);
        p.difficulty = Some("extreme".into());
        assert!(matches!(p.into_request().unwrap_err(), Error::BadRequest(_)));
    }
}
