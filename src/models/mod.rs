pub mod document;
pub mod question;
