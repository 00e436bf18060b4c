//! Result and input types for event neighborhood queries.

use serde::Serialize;

use crate::entities::{AnyEntity, EntityKind, Event};
use crate::error::DomainError;
use crate::relation::Relation;

/// How strictly zero bounds are treated when building an [`EventWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowPolicy {
    /// Zero means "not provided": both bounds must be non-zero.
    #[default]
    RequireNonZero,
    /// Zero is an ordinary epoch value.
    AllowZero,
}

/// An inclusive `[start, end]` range over `happenedAt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    start: i64,
    end: i64,
}

impl EventWindow {
    pub fn new(start: i64, end: i64, policy: WindowPolicy) -> Result<Self, DomainError> {
        if policy == WindowPolicy::RequireNonZero {
            if start == 0 {
                return Err(DomainError::validation("start_time is required"));
            }
            if end == 0 {
                return Err(DomainError::validation("end_time is required"));
            }
        }
        if start > end {
            return Err(DomainError::validation(format!(
                "start_time ({start}) must not be after end_time ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn contains(&self, happened_at: i64) -> bool {
        (self.start..=self.end).contains(&happened_at)
    }
}

/// Events inside a window plus the relations internal to that set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventNeighborhood {
    pub events: Vec<Event>,
    pub relations: Vec<Relation>,
}

/// A non-event neighbor of an event together with the connecting edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedEntity {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub entity: AnyEntity,
    pub edge: Relation,
}
