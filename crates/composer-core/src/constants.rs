/// Composer constants

/// Value shipped in sample configs; treated the same as a missing key
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY_HERE";

/// Only environment variable consulted, overrides the configured key
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// Simulated delivery latency of the logging transport
pub const DEFAULT_SEND_DELAY_MS: u64 = 1000;

/// Upper bound on stored subject suggestions
pub const MAX_SUBJECT_SUGGESTIONS: usize = 3;

pub const MSG_PROMPT_REQUIRED: &str = "Please enter a prompt for the email.";
pub const MSG_SEND_FIELDS_REQUIRED: &str =
    "Please provide recipients, a subject, and generate an email before sending.";
pub const MSG_SEND_UNEXPECTED: &str = "An unexpected error occurred while sending the email.";
pub const MSG_SEND_OK: &str = "Email sent successfully!";
