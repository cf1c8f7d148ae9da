//! Composer controller: drafts, subject suggestions, tone refinement and sending

use super::session::SessionState;
use super::traits::{MailTransport, TextGenerator};
use crate::constants::{MSG_PROMPT_REQUIRED, MSG_SEND_FIELDS_REQUIRED, MSG_SEND_UNEXPECTED};
use crate::error::{ComposerError, Result};
use crate::services::parse_recipients;
use crate::services::prompt_builder::{
    draft_body_prompt, parse_subject_suggestions, refine_tone_prompt, subject_suggestions_prompt,
    subject_suggestions_schema,
};
use composer_types::{ComposerSnapshot, EmailDraft, OperationKind, OperationState, SendReceipt, Tone};
use futures::FutureExt;
use log::{debug, error, info, warn};
use std::panic::AssertUnwindSafe;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Owns one composer session and runs its operations
///
/// Operations take `&self`. Session state sits behind a mutex that is only held
/// between suspension points, so `snapshot()` can be read while an operation
/// is waiting on the network.
pub struct ComposerController<G: TextGenerator, T: MailTransport> {
    generator: G,
    transport: T,
    state: Mutex<SessionState>,
}

impl<G: TextGenerator, T: MailTransport> ComposerController<G, T> {
    pub fn new(generator: G, transport: T) -> Self {
        Self {
            generator,
            transport,
            state: Mutex::new(SessionState::new()),
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut state = self.lock();
        let result = f(&mut *state);
        state.touch();
        result
    }

    pub fn snapshot(&self) -> ComposerSnapshot {
        self.lock().snapshot()
    }

    pub fn set_prompt(&self, prompt: impl Into<String>) {
        let prompt = prompt.into();
        self.update(|s| s.prompt = prompt);
    }

    pub fn set_recipients(&self, recipients: impl Into<String>) {
        let recipients = recipients.into();
        self.update(|s| s.recipients = recipients);
    }

    pub fn set_subject(&self, subject: impl Into<String>) {
        let subject = subject.into();
        self.update(|s| s.draft.subject = subject);
    }

    /// Manual edit of the body
    pub fn set_body(&self, body: impl Into<String>) {
        let body = body.into();
        self.update(|s| s.draft.body = body);
    }

    /// Copy suggestion `index` into the subject field and return it
    pub fn choose_suggestion(&self, index: usize) -> Result<String> {
        self.update(|s| {
            let chosen = s.draft.suggested_subjects.get(index).cloned().ok_or_else(|| {
                ComposerError::Validation(format!(
                    "No subject suggestion at position {} ({} available)",
                    index,
                    s.draft.suggested_subjects.len()
                ))
            })?;
            s.draft.subject = chosen.clone();
            Ok(chosen)
        })
    }

    pub fn clear_error(&self) {
        self.update(|s| s.error = None);
    }

    fn begin(&self, kind: OperationKind) -> Result<()> {
        self.update(|s| {
            if s.operations.get(kind).is_in_flight() {
                return Err(ComposerError::AlreadyInFlight(kind));
            }
            s.operations.set(kind, OperationState::InFlight);
            Ok(())
        })
    }

    fn finish(&self, kind: OperationKind, outcome: OperationState) {
        self.update(|s| s.operations.set(kind, outcome));
    }

    fn fail(&self, kind: OperationKind, err: &ComposerError) {
        let message = err.user_message();
        self.update(|s| {
            s.error = Some(message);
            s.operations.set(kind, OperationState::Failed);
        });
    }

    fn reject(&self, message: &str) -> ComposerError {
        let err = ComposerError::Validation(message.to_string());
        self.update(|s| s.error = Some(err.user_message()));
        err
    }

    /// Draft a body from the session prompt, then suggest subjects for it
    pub async fn generate(&self) -> Result<()> {
        let prompt = self.lock().prompt.clone();
        if prompt.trim().is_empty() {
            return Err(self.reject(MSG_PROMPT_REQUIRED));
        }

        self.begin(OperationKind::Generate)?;
        self.update(|s| {
            s.error = None;
            s.draft = EmailDraft::default();
            s.sent = false;
        });
        info!("Generating email body ({} chars of prompt)", prompt.len());

        match self.generator.generate(&draft_body_prompt(&prompt), None).await {
            Ok(body) => {
                self.update(|s| s.draft.body = body.clone());
                debug!("Draft body ready ({} chars), requesting subjects", body.len());

                self.suggest(&body).await;

                self.finish(OperationKind::Generate, OperationState::Succeeded);
                Ok(())
            }
            Err(e) => {
                error!("Email generation failed: {}", e);
                self.fail(OperationKind::Generate, &e);
                Err(e)
            }
        }
    }

    /// Best-effort subject suggestions for `body`; failures are only logged
    pub async fn suggest(&self, body: &str) {
        if let Err(e) = self.begin(OperationKind::Suggest) {
            warn!("Skipping subject suggestions: {}", e);
            return;
        }

        let schema = subject_suggestions_schema();
        let result = self
            .generator
            .generate(&subject_suggestions_prompt(body), Some(&schema))
            .await
            .and_then(|text| parse_subject_suggestions(&text));

        match result {
            Ok(subjects) => {
                debug!("Received {} subject suggestions", subjects.len());
                self.update(|s| {
                    s.draft.suggested_subjects = subjects;
                    s.operations.set(OperationKind::Suggest, OperationState::Succeeded);
                });
            }
            Err(e) => {
                warn!("Could not suggest subjects: {}", e);
                self.finish(OperationKind::Suggest, OperationState::Failed);
            }
        }
    }

    /// Rewrite the current body in `tone`; no-op when there is no body
    pub async fn refine(&self, tone: Tone) -> Result<()> {
        let body = self.lock().draft.body.clone();
        if body.trim().is_empty() {
            debug!("Refine requested without a body, ignoring");
            return Ok(());
        }

        self.begin(OperationKind::Refine)?;
        self.update(|s| s.error = None);
        info!("Refining email body to a {} tone", tone);

        match self.generator.generate(&refine_tone_prompt(tone, &body), None).await {
            Ok(refined) => {
                self.update(|s| {
                    s.draft.body = refined;
                    s.operations.set(OperationKind::Refine, OperationState::Succeeded);
                });
                Ok(())
            }
            Err(e) => {
                error!("Tone refinement failed: {}", e);
                self.fail(OperationKind::Refine, &e);
                Err(e)
            }
        }
    }

    /// Hand the draft to the transport; on success the session is cleared
    pub async fn send(&self) -> Result<SendReceipt> {
        let (recipients, subject, body) = {
            let s = self.lock();
            (s.recipients.clone(), s.draft.subject.clone(), s.draft.body.clone())
        };
        if [&recipients, &subject, &body].iter().any(|field| field.trim().is_empty()) {
            return Err(self.reject(MSG_SEND_FIELDS_REQUIRED));
        }

        self.begin(OperationKind::Send)?;
        self.update(|s| s.error = None);

        let recipient_list = parse_recipients(&recipients);
        info!("Sending email '{}' to {} recipient(s)", subject, recipient_list.len());

        let outcome = AssertUnwindSafe(self.transport.send(&recipient_list, &subject, &body))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(receipt)) => {
                info!("Email sent: {}", receipt.message);
                self.update(|s| {
                    s.reset_after_send();
                    s.operations.set(OperationKind::Send, OperationState::Succeeded);
                });
                Ok(receipt)
            }
            Ok(Err(ComposerError::Transport(message))) => {
                warn!("Transport rejected email: {}", message);
                let err = ComposerError::Transport(message);
                self.fail(OperationKind::Send, &err);
                Err(err)
            }
            Ok(Err(other)) => {
                error!("Transport failed unexpectedly: {}", other);
                self.send_unexpected()
            }
            Err(_) => {
                error!("Transport panicked while sending");
                self.send_unexpected()
            }
        }
    }

    fn send_unexpected(&self) -> Result<SendReceipt> {
        let err = ComposerError::Unexpected(MSG_SEND_UNEXPECTED.to_string());
        self.fail(OperationKind::Send, &err);
        Err(err)
    }
}
