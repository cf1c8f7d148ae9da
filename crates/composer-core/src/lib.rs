//! Mail Composer Core Library
//!
//! Drafts emails with a generative-language API, suggests subject lines,
//! rewrites the draft in a chosen tone and hands it to a mail transport.

pub mod config;
pub mod constants;
pub mod clients;
pub mod services;
pub mod workflow;
pub mod error;

// Re-export main types for easy access
pub use config::{ComposerConfig, GeminiConfig, TransportConfig};
pub use error::{ComposerError, Result};

// Re-export client types
pub use clients::{GeminiClient, LoggingTransport, ResponseSchema};

// Re-export workflow types
pub use workflow::{ComposerController, MailTransport, TextGenerator};

pub use composer_types::{
    Activity, ComposerSnapshot, EmailDraft, OperationKind, OperationState, SendReceipt, Tone,
};
