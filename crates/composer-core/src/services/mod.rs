//! Service modules for prompt building and input handling

pub mod prompt_builder;
pub mod recipients;

pub use recipients::parse_recipients;
