use crate::{
    dto::generation_dto::{
        GenerateQuestionsPayload, GenerateQuestionsResponse, GenerationMetadata, QuestionsData,
        MAX_QUESTION_COUNT, MIN_MATERIAL_CHARS, MIN_QUESTION_COUNT,
    },
    error::{Error, Result},
    models::question::{Difficulty, QuestionType},
    AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

#[axum::debug_handler]
pub async fn generate_questions(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateQuestionsPayload>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload.map_err(|e| Error::BadRequest(e.body_text()))?;
    let request = payload.into_request()?;

    tracing::info!(
        question_type = %request.question_type,
        count = request.question_count,
        difficulty = %request.difficulty,
        material_chars = request.material.chars().count(),
        "Generating questions"
    );

    let output = state.ai_service.generate(&request).await.map_err(|e| {
        tracing::error!(error = %e, "Question generation failed");
        e
    })?;

    let response = GenerateQuestionsResponse {
        success: true,
        metadata: GenerationMetadata {
            provider: output.provider.to_string(),
            model: output.model.clone(),
            used_fallback: output.used_fallback(),
            failed_providers: output.failed_providers(),
            question_type: request.question_type,
            question_count: output.questions.len(),
            requested_count: request.question_count,
            difficulty: request.difficulty,
            material_length: request.material.chars().count(),
            generated_at: chrono::Utc::now(),
        },
        data: QuestionsData {
            questions: output.questions,
        },
    };

    Ok((StatusCode::OK, Json(response)))
}

pub async fn generation_info(State(state): State<AppState>) -> impl IntoResponse {
    let providers: Vec<&str> = state
        .ai_service
        .provider_kinds()
        .iter()
        .map(|p| p.as_str())
        .collect();

    Json(json!({
        "name": "generate-questions",
        "version": env!("CARGO_PKG_VERSION"),
        "supportedQuestionTypes": QuestionType::ALL.map(|t| t.as_str()),
        "difficulties": Difficulty::ALL.map(|d| d.as_str()),
        "defaultDifficulty": Difficulty::default().as_str(),
        "questionCount": { "min": MIN_QUESTION_COUNT, "max": MAX_QUESTION_COUNT },
        "minMaterialLength": MIN_MATERIAL_CHARS,
        "providers": providers,
        "templateFallback": state.ai_service.template_fallback_enabled(),
    }))
}
