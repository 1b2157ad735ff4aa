pub mod chat;
pub mod course;
pub mod cover_letter;
pub mod document;
pub mod resume;
pub mod roadmap;
pub mod user;
