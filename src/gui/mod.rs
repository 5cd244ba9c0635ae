pub mod frontend;
pub mod prompt;
