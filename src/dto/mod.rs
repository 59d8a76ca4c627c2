pub mod extraction_dto;
pub mod generation_dto;
