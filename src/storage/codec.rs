use serde_json::Value;
use tracing::warn;

use crate::domain::Entry;

/// Entries recovered from a stored blob, plus how many items were unusable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded {
    pub entries: Vec<Entry>,
    pub skipped: usize,
}

/// Serialize entries as the persisted JSON array.
pub fn encode_entries(entries: &[Entry]) -> serde_json::Result<String> {
    serde_json::to_string(entries)
}

/// Decode a persisted blob without ever failing.
///
/// Anything that is not a JSON array decodes to an empty ledger. Array items
/// that are not valid entries (a `null` amount, a missing label) are dropped.
pub fn decode_entries(raw: &str) -> Decoded {
    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(Value::Null) => return Decoded::default(),
        Ok(other) => {
            warn!(kind = json_kind(&other), "stored ledger is not an array, starting empty");
            return Decoded::default();
        }
        Err(e) => {
            warn!(error = %e, "stored ledger is not valid JSON, starting empty");
            return Decoded::default();
        }
    };

    let mut decoded = Decoded::default();
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Entry>(item) {
            Ok(entry) => decoded.entries.push(entry),
            Err(e) => {
                warn!(index, error = %e, "skipping unreadable ledger entry");
                decoded.skipped += 1;
            }
        }
    }
    decoded
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
