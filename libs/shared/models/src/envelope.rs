use serde::{Deserialize, Serialize};

/// Success bodies from the backend wrap their payload in a top-level
/// `items` field holding either an object or an ordered sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsEnvelope<T> {
    #[serde(default)]
    pub items: Option<T>,
}

impl<T> ItemsEnvelope<T> {
    pub fn into_items(self) -> Option<T> {
        self.items
    }
}

/// Error bodies carry a human-readable `Message`, surfaced verbatim to the
/// operator when present.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "Message")]
    pub message: Option<String>,
}
