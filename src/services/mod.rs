pub mod ai_service;
pub mod extraction_service;
pub mod fallback_service;
pub mod gemini_service;
pub mod openrouter_service;
pub mod prompt_service;
pub mod response_parser;
