pub mod cost;
pub mod note;
pub mod shopping;
