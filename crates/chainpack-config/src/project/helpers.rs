use indexmap::IndexMap;
use serde_json::{json, Value};
use std::path::PathBuf;

// Helper defaults
pub(crate) fn default_output_path() -> PathBuf {
    PathBuf::from("dist")
}

pub(crate) fn default_public_path() -> String {
    "/".to_string()
}

pub(crate) fn default_hash() -> bool {
    true
}

pub(crate) fn default_inline_limit() -> u64 {
    10_000
}

pub(crate) fn default_targets() -> IndexMap<String, Value> {
    IndexMap::from([
        ("chrome".to_string(), json!(49)),
        ("firefox".to_string(), json!(64)),
        ("safari".to_string(), json!(10)),
        ("edge".to_string(), json!(13)),
        ("ios".to_string(), json!(10)),
    ])
}
