//! Recipient list handling

/// Split a comma-separated recipient field and trim each entry.
/// Entries are not validated and empty entries are kept.
pub fn parse_recipients(input: &str) -> Vec<String> {
    input.split(',').map(|entry| entry.trim().to_string()).collect()
}
