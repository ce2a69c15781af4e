//! Isolates the JSON object in free-form model output.
//!
//! Models wrap JSON in markdown fences and add chatter before or after it even when told
//! not to. The result is NOT guaranteed to be valid JSON; parsing is the caller's job.

const FENCE: &str = "```";

/// Trims, strips markdown fences when the text opens with one, then slices from the first
/// `{` to the last `}`. Without a usable brace pair the unfenced text is returned as-is.
pub fn normalize_response(raw: &str) -> String {
    let trimmed = raw.trim();
    let text = if trimmed.starts_with(FENCE) {
        strip_fences(trimmed)
    } else {
        trimmed.to_string()
    };

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => text[start..=end].to_string(),
        _ => text,
    }
}

/// Drops the opening fence with its language tag, then every remaining fence marker.
fn strip_fences(text: &str) -> String {
    let after_open = &text[FENCE.len()..];
    let tag_len = after_open
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+')))
        .unwrap_or(after_open.len());
    after_open[tag_len..].replace(FENCE, "").trim().to_string()
}
