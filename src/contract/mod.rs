// File: ./src/contract/mod.rs
//! Textual request/response convention shared with the language model.
pub mod prompt;
pub mod response;

pub use prompt::{build_chat_prompt, build_extraction_prompt};
pub use response::{ParsedResponse, parse_response};
