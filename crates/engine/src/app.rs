//! Application state and composition.

use std::sync::Arc;

use geovision_domain::WindowPolicy;

use crate::infrastructure::ports::DocumentStore;
use crate::repositories::{EntityRepository, EventGraphRepository, RelationshipRepository};
use crate::services::{
    EntityService, EventService, OrganizationService, PersonService, RelationshipService,
    SourceService, WebsiteService,
};

/// Main application state.
///
/// Holds one façade service per resource group, all sharing a single store
/// gateway. Passed to gRPC services and HTTP handlers behind an `Arc`.
pub struct App {
    pub events: EventService,
    pub persons: PersonService,
    pub organizations: OrganizationService,
    pub sources: SourceService,
    pub websites: WebsiteService,
    pub relationships: RelationshipService,
}

impl App {
    pub fn new(store: Arc<dyn DocumentStore>, graph: &str, window_policy: WindowPolicy) -> Self {
        Self {
            events: EventService::new(
                EntityService::new(EntityRepository::new(store.clone())),
                EventGraphRepository::new(store.clone(), graph),
                window_policy,
            ),
            persons: EntityService::new(EntityRepository::new(store.clone())),
            organizations: EntityService::new(EntityRepository::new(store.clone())),
            sources: EntityService::new(EntityRepository::new(store.clone())),
            websites: EntityService::new(EntityRepository::new(store.clone())),
            relationships: RelationshipService::new(RelationshipRepository::new(store, graph)),
        }
    }
}
