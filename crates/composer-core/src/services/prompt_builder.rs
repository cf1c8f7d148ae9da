//! Prompts sent to the generation service and parsing of its structured replies

use crate::clients::ResponseSchema;
use crate::constants::MAX_SUBJECT_SUGGESTIONS;
use crate::error::Result;
use composer_types::Tone;
use serde::Deserialize;

pub fn draft_body_prompt(prompt: &str) -> String {
    format!("Generate a complete email body based on the following prompt: {}", prompt)
}

pub fn subject_suggestions_prompt(body: &str) -> String {
    format!(
        "Based on the following email body, suggest {} concise and effective subject lines. Email Body: \"{}\"",
        MAX_SUBJECT_SUGGESTIONS, body
    )
}

pub fn refine_tone_prompt(tone: Tone, body: &str) -> String {
    format!(
        "Rewrite the following email to have a much more {} tone. Keep the core message the same:\n\n{}",
        tone, body
    )
}

/// `{"subjects": [string, ...]}`
pub fn subject_suggestions_schema() -> ResponseSchema {
    ResponseSchema::object([("subjects", ResponseSchema::array_of(ResponseSchema::String))])
}

#[derive(Debug, Deserialize)]
struct SubjectSuggestions {
    #[serde(default)]
    subjects: Vec<String>,
}

/// Parse a structured suggestion reply, keeping at most three subjects
pub fn parse_subject_suggestions(text: &str) -> Result<Vec<String>> {
    let parsed: SubjectSuggestions = serde_json::from_str(text.trim())?;
    Ok(parsed
        .subjects
        .into_iter()
        .take(MAX_SUBJECT_SUGGESTIONS)
        .collect())
}
