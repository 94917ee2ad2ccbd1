pub mod prompts;
pub mod service;

pub use service::{TodoService, TodoSettings};
