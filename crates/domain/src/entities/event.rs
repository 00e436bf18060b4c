//! Event entity - something that happened at a point in time
//!
//! `happened_at` is an integer epoch. Its unit is chosen by callers but must
//! be consistent across a deployment, since window queries compare raw values.
//! Zero is a real instant and is always written out.

use serde::{Deserialize, Serialize};

use super::EntityKind;
use crate::ids::DocumentMeta;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(flatten)]
    pub meta: DocumentMeta,
    #[serde(default)]
    pub happened_at: i64,
}

impl Event {
    pub fn new(happened_at: i64) -> Self {
        Self {
            meta: DocumentMeta::default(),
            happened_at,
        }
    }
}

impl_entity!(Event, EntityKind::Event);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happened_at_uses_camel_case() {
        let json = serde_json::to_value(Event::new(1000)).expect("serialize");
        assert_eq!(json, serde_json::json!({ "happenedAt": 1000 }));
    }

    #[test]
    fn epoch_zero_is_serialized() {
        let json = serde_json::to_value(Event::new(0)).expect("serialize");
        assert_eq!(json, serde_json::json!({ "happenedAt": 0 }));
    }

    #[test]
    fn meta_is_flattened_on_decode() {
        let event: Event = serde_json::from_value(serde_json::json!({
            "id": "events/7",
            "key": "7",
            "rev": "_x",
            "happenedAt": 2000
        }))
        .expect("decode");
        assert_eq!(event.meta.key, "7");
        assert_eq!(event.happened_at, 2000);
    }
}
