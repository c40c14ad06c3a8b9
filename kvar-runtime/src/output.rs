use std::collections::{BTreeMap, HashMap};

/// UTF-8 values as-is, anything else as `0x`-prefixed hex.
pub fn render_value(value: &[u8]) -> String {
    match std::str::from_utf8(value) {
        Ok(text) => text.to_string(),
        Err(_) => format!("0x{}", hex::encode(value)),
    }
}

/// JSON object of all values sorted by name, absent values as `null`.
pub fn render_snapshot(
    snapshot: &HashMap<String, Option<Vec<u8>>>,
) -> serde_json::Result<serde_json::Value> {
    let sorted: BTreeMap<&String, Option<String>> = snapshot
        .iter()
        .map(|(name, value)| (name, value.as_deref().map(render_value)))
        .collect();

    serde_json::to_value(sorted)
}
