#![allow(unused_imports)]

pub use super::comment::Entity as Comment;
pub use super::idea::Entity as Idea;
pub use super::vote::Entity as Vote;
