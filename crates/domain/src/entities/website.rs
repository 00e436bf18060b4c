//! Website entity

use serde::{Deserialize, Serialize};

use super::EntityKind;
use crate::ids::DocumentMeta;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Website {
    #[serde(flatten)]
    pub meta: DocumentMeta,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}

impl Website {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            meta: DocumentMeta::default(),
            url: url.into(),
        }
    }
}

impl_entity!(Website, EntityKind::Website);
