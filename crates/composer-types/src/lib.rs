//! Shared types for the mail composer

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Tone a drafted body can be rewritten into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Formal,
    Casual,
    Persuasive,
}

impl Tone {
    /// All tones offered to the user, in display order
    pub const ALL: [Tone; 3] = [Tone::Formal, Tone::Casual, Tone::Persuasive];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Formal => "Formal",
            Self::Casual => "Casual",
            Self::Persuasive => "Persuasive",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown tone '{0}' (expected Formal, Casual or Persuasive)")]
pub struct ParseToneError(pub String);

impl FromStr for Tone {
    type Err = ParseToneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .into_iter()
            .find(|tone| tone.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseToneError(s.to_string()))
    }
}

/// The operations a composer session exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Generate,
    Suggest,
    Refine,
    Send,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Generate => "generate",
            Self::Suggest => "suggest",
            Self::Refine => "refine",
            Self::Send => "send",
        };
        f.write_str(name)
    }
}

/// Lifecycle of a single operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OperationState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

impl OperationState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }
}

/// Coarse activity label for status display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activity {
    Idle,
    Generating,
    Suggesting,
    Refining,
    Sending,
}

/// Subject and body being composed, plus generated subject candidates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
    pub suggested_subjects: Vec<String>,
}

impl EmailDraft {
    pub fn is_empty(&self) -> bool {
        self.subject.is_empty() && self.body.is_empty() && self.suggested_subjects.is_empty()
    }
}

/// Acknowledgement returned by a transport after delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub message: String,
    pub recipients: usize,
}

/// Point-in-time view of a composer session, for binding by a presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposerSnapshot {
    pub session_id: Uuid,
    pub prompt: String,
    pub recipients: String,
    pub draft: EmailDraft,
    pub generate: OperationState,
    pub suggest: OperationState,
    pub refine: OperationState,
    pub send: OperationState,
    pub error: Option<String>,
    pub sent: bool,
    pub updated_at: DateTime<Utc>,
}

impl ComposerSnapshot {
    pub fn state_of(&self, kind: OperationKind) -> OperationState {
        match kind {
            OperationKind::Generate => self.generate,
            OperationKind::Suggest => self.suggest,
            OperationKind::Refine => self.refine,
            OperationKind::Send => self.send,
        }
    }

    /// Innermost in-flight operation; a Generate chained into Suggest reports Suggesting
    pub fn activity(&self) -> Activity {
        if self.send.is_in_flight() {
            Activity::Sending
        } else if self.refine.is_in_flight() {
            Activity::Refining
        } else if self.suggest.is_in_flight() {
            Activity::Suggesting
        } else if self.generate.is_in_flight() {
            Activity::Generating
        } else {
            Activity::Idle
        }
    }
}
