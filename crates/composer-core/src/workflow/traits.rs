//! Collaborator traits the composer controller is generic over

use async_trait::async_trait;
use composer_types::SendReceipt;
use crate::clients::ResponseSchema;
use crate::error::Result;

/// A text generation backend
///
/// Implementations issue exactly one request per call and never retry.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`; with a schema the result is JSON conforming to it
    async fn generate(&self, prompt: &str, schema: Option<&ResponseSchema>) -> Result<String>;
}

/// Delivers a composed email
///
/// A failure the transport can describe is returned as `ComposerError::Transport`
/// and its message is shown to the user verbatim.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, recipients: &[String], subject: &str, body: &str) -> Result<SendReceipt>;
}
