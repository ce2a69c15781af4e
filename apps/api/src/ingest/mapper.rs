use serde_json::{Map, Value};
use tracing::warn;

use crate::errors::AppError;
use crate::ingest::classify::enforce_section_placement;
use crate::models::resume::ResumeContent;

/// Typed resume content plus a report of what the mapper changed.
#[derive(Debug, Clone)]
pub struct MappedResume {
    pub content: ResumeContent,
    /// Top-level keys that were unknown or had an unusable shape. Not persisted.
    pub quarantined_fields: Vec<String>,
    /// Entries moved out of `experience` by the placement pass.
    pub reclassified: usize,
}

/// Parses normalized model output into resume content.
///
/// Fails with `AppError::Parse` when the text is not a JSON object. Unknown keys and
/// known keys with an impossible shape are quarantined instead of failing the import.
pub fn map_resume(candidate: &str) -> Result<MappedResume, AppError> {
    let value: Value = serde_json::from_str(candidate)
        .map_err(|e| AppError::Parse(format!("AI response is not valid JSON: {e}")))?;
    let Value::Object(fields) = value else {
        return Err(AppError::Parse(
            "AI response is not a JSON object".to_string(),
        ));
    };

    let mut accepted = Map::new();
    let mut quarantined_fields = Vec::new();

    for (key, value) in fields {
        if !ResumeContent::FIELDS.contains(&key.as_str()) {
            warn!("Quarantined unknown field '{key}' from AI response");
            quarantined_fields.push(key);
            continue;
        }
        // Each field is checked on its own so one bad section doesn't sink the rest.
        let probe = Value::Object(Map::from_iter([(key.clone(), value.clone())]));
        if let Err(e) = serde_json::from_value::<ResumeContent>(probe) {
            warn!("Quarantined malformed field '{key}' from AI response: {e}");
            quarantined_fields.push(key);
            continue;
        }
        accepted.insert(key, value);
    }

    let mut content: ResumeContent = serde_json::from_value(Value::Object(accepted))
        .map_err(|e| AppError::Parse(format!("AI response has an unusable shape: {e}")))?;
    let reclassified = enforce_section_placement(&mut content);

    Ok(MappedResume {
        content,
        quarantined_fields,
        reclassified,
    })
}
