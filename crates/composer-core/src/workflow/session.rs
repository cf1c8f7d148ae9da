//! In-memory state of one composer session

use chrono::{DateTime, Utc};
use composer_types::{ComposerSnapshot, EmailDraft, OperationKind, OperationState};
use uuid::Uuid;

/// Per-operation lifecycle, one slot per operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationBoard {
    generate: OperationState,
    suggest: OperationState,
    refine: OperationState,
    send: OperationState,
}

impl OperationBoard {
    pub fn get(&self, kind: OperationKind) -> OperationState {
        match kind {
            OperationKind::Generate => self.generate,
            OperationKind::Suggest => self.suggest,
            OperationKind::Refine => self.refine,
            OperationKind::Send => self.send,
        }
    }

    pub fn set(&mut self, kind: OperationKind, state: OperationState) {
        let slot = match kind {
            OperationKind::Generate => &mut self.generate,
            OperationKind::Suggest => &mut self.suggest,
            OperationKind::Refine => &mut self.refine,
            OperationKind::Send => &mut self.send,
        };
        *slot = state;
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub session_id: Uuid,
    pub prompt: String,
    pub recipients: String,
    pub draft: EmailDraft,
    pub operations: OperationBoard,
    pub error: Option<String>,
    pub sent: bool,
    pub updated_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            prompt: String::new(),
            recipients: String::new(),
            draft: EmailDraft::default(),
            operations: OperationBoard::default(),
            error: None,
            sent: false,
            updated_at: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Clears the fields a successful send consumes
    pub fn reset_after_send(&mut self) {
        self.recipients.clear();
        self.prompt.clear();
        self.draft = EmailDraft::default();
        self.sent = true;
    }

    pub fn snapshot(&self) -> ComposerSnapshot {
        ComposerSnapshot {
            session_id: self.session_id,
            prompt: self.prompt.clone(),
            recipients: self.recipients.clone(),
            draft: self.draft.clone(),
            generate: self.operations.get(OperationKind::Generate),
            suggest: self.operations.get(OperationKind::Suggest),
            refine: self.operations.get(OperationKind::Refine),
            send: self.operations.get(OperationKind::Send),
            error: self.error.clone(),
            sent: self.sent,
            updated_at: self.updated_at,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
