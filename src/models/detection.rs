use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Result of a single emotion inference call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub face_detected: bool,

    #[serde(default)]
    pub emotion: String,

    #[serde(default)]
    pub confidence: f64,

    /// Per-label scores for all seven emotion classes.
    #[serde(default)]
    pub all_emotions: HashMap<String, f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
