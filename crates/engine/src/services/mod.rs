//! Service façade.
//!
//! Each operation validates its arguments, makes exactly one repository
//! call and maps the outcome into [`ServiceError`]. Transports stay thin
//! and share these services.

mod entity;
mod error;
mod event;
mod relationship;

pub use entity::{EntityService, OrganizationService, PersonService, SourceService, WebsiteService};
pub use error::{ServiceError, INTERNAL_ERROR_MESSAGE};
pub use event::EventService;
pub use relationship::RelationshipService;
