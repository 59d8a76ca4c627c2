use crate::models::document::ExtractionResult;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ExtractTextResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: ExtractionResult,
}

impl From<ExtractionResult> for ExtractTextResponse {
    fn from(result: ExtractionResult) -> Self {
        Self {
            success: true,
            result,
        }
    }
}
