//! Client modules for external services

pub mod gemini;
pub mod log_transport;
pub mod schema;

// Re-export all client types
pub use gemini::GeminiClient;
pub use log_transport::LoggingTransport;
pub use schema::ResponseSchema;
