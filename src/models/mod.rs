pub mod comment;
pub mod idea;
pub mod news;
