//! Document identity and the qualified-id codec.
//!
//! The store assigns every document a collection-local `key`, a fully
//! qualified `id` of the form `<collection>/<key>`, and an opaque revision.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Store-assigned identity carried by every entity and relation.
///
/// Empty strings mean "not assigned yet"; they are skipped on
/// serialization so that create payloads never carry placeholder identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentMeta {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rev: String,
}

impl DocumentMeta {
    pub fn new(id: impl Into<String>, key: impl Into<String>, rev: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            rev: rev.into(),
        }
    }

    /// True when none of the identity fields has been assigned.
    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.key.is_empty() && self.rev.is_empty()
    }

    /// Drop any caller-supplied identity.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A fully qualified document identifier: `<collection>/<key>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedId {
    collection: String,
    key: String,
}

impl QualifiedId {
    /// Build an identifier from its halves. Both must be non-empty and free of `/`.
    pub fn new(collection: impl Into<String>, key: impl Into<String>) -> Result<Self, DomainError> {
        let collection = collection.into();
        let key = key.into();
        if collection.is_empty() || key.is_empty() {
            return Err(DomainError::invalid_id(format!(
                "collection and key must be non-empty (got '{collection}/{key}')"
            )));
        }
        if collection.contains('/') || key.contains('/') {
            return Err(DomainError::invalid_id(format!(
                "collection and key must not contain '/' (got '{collection}/{key}')"
            )));
        }
        Ok(Self { collection, key })
    }

    /// Split `<collection>/<key>` into its halves.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::invalid_id("identifier is empty"));
        }
        let mut parts = value.split('/');
        let (Some(collection), Some(key), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(DomainError::invalid_id(format!(
                "expected exactly one '/' in '{value}'"
            )));
        };
        Self::new(collection, key)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn into_parts(self) -> (String, String) {
        (self.collection, self.key)
    }
}

impl fmt::Display for QualifiedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.key)
    }
}

impl FromStr for QualifiedId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_collection_and_key() {
        let id = QualifiedId::parse("events/12345").expect("valid id");
        assert_eq!(id.collection(), "events");
        assert_eq!(id.key(), "12345");
    }

    #[test]
    fn display_is_inverse_of_parse() {
        let raw = "events_related_to_events/987";
        let id: QualifiedId = raw.parse().expect("valid id");
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for raw in ["", "not-a-qualified-id", "a/b/c", "/key", "events/", "/"] {
            let err = QualifiedId::parse(raw).expect_err(raw);
            assert!(matches!(err, DomainError::InvalidId(_)), "{raw}: {err}");
        }
    }

    #[test]
    fn new_rejects_slash_in_halves() {
        assert!(QualifiedId::new("events", "a/b").is_err());
        assert!(QualifiedId::new("", "a").is_err());
    }

    #[test]
    fn meta_skips_empty_fields_when_serialized() {
        let json = serde_json::to_value(DocumentMeta::default()).expect("serialize");
        assert_eq!(json, serde_json::json!({}));

        let meta = DocumentMeta::new("persons/1", "1", "_abc");
        let json = serde_json::to_value(&meta).expect("serialize");
        assert_eq!(json["id"], "persons/1");
        assert_eq!(json["rev"], "_abc");
    }

    #[test]
    fn clear_resets_identity() {
        let mut meta = DocumentMeta::new("persons/1", "1", "_abc");
        assert!(!meta.is_empty());
        meta.clear();
        assert!(meta.is_empty());
    }
}
