//! Tonic service implementations, one per resource group.
//!
//! Each RPC converts its request, calls the façade inside a request span
//! and converts the result. No validation happens here.

use std::sync::Arc;

use geovision_protocol::pb::{
    self, event_service_server, organization_service_server, person_service_server,
    relationship_service_server, source_service_server, website_service_server,
};
use tonic::{Request, Response, Status};
use tracing::Instrument;

use super::convert::{
    event_from_pb, event_to_pb, neighborhood_to_pb, organization_from_pb, organization_to_pb,
    person_from_pb, person_to_pb, related_entity_to_pb, relation_from_pb, relation_to_pb,
    source_from_pb, source_to_pb, website_from_pb, website_to_pb,
};
use super::request_span;
use crate::app::App;

type RpcResult<T> = Result<Response<T>, Status>;

// =============================================================================
// Events
// =============================================================================

pub struct EventGrpc {
    app: Arc<App>,
}

impl EventGrpc {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }
}

#[tonic::async_trait]
impl event_service_server::EventService for EventGrpc {
    async fn get_events(
        &self,
        request: Request<pb::GetEventsRequest>,
    ) -> RpcResult<pb::GetEventsResponse> {
        let span = request_span("GetEvents", &request);
        let req = request.into_inner();
        let neighborhood = self
            .app
            .events
            .get_events(req.start_time, req.end_time)
            .instrument(span)
            .await?;
        Ok(Response::new(neighborhood_to_pb(neighborhood)))
    }

    async fn get_related_events(
        &self,
        request: Request<pb::GetRelatedEventsRequest>,
    ) -> RpcResult<pb::GetRelatedEventsResponse> {
        let span = request_span("GetRelatedEvents", &request);
        let req = request.into_inner();
        let events = self
            .app
            .events
            .get_related_events(&req.key)
            .instrument(span)
            .await?;
        Ok(Response::new(pb::GetRelatedEventsResponse {
            events: events.into_iter().map(event_to_pb).collect(),
        }))
    }

    async fn get_event_related_entities(
        &self,
        request: Request<pb::GetEventRelatedEntitiesRequest>,
    ) -> RpcResult<pb::GetEventRelatedEntitiesResponse> {
        let span = request_span("GetEventRelatedEntities", &request);
        let req = request.into_inner();
        let entities = self
            .app
            .events
            .get_related_entities(&req.key)
            .instrument(span)
            .await?;
        Ok(Response::new(pb::GetEventRelatedEntitiesResponse {
            entities: entities.into_iter().map(related_entity_to_pb).collect(),
        }))
    }

    async fn get_event(
        &self,
        request: Request<pb::GetEventRequest>,
    ) -> RpcResult<pb::GetEventResponse> {
        let span = request_span("GetEvent", &request);
        let req = request.into_inner();
        let event = self.app.events.get(&req.key).instrument(span).await?;
        Ok(Response::new(pb::GetEventResponse {
            event: Some(event_to_pb(event)),
        }))
    }

    async fn create_event(
        &self,
        request: Request<pb::CreateEventRequest>,
    ) -> RpcResult<pb::CreateEventResponse> {
        let span = request_span("CreateEvent", &request);
        let req = request.into_inner();
        let event = self
            .app
            .events
            .create(req.event.map(event_from_pb))
            .instrument(span)
            .await?;
        Ok(Response::new(pb::CreateEventResponse {
            event: Some(event_to_pb(event)),
        }))
    }

    async fn update_event(
        &self,
        request: Request<pb::UpdateEventRequest>,
    ) -> RpcResult<pb::UpdateEventResponse> {
        let span = request_span("UpdateEvent", &request);
        let req = request.into_inner();
        let key = req
            .event
            .as_ref()
            .map(|e| e.key.clone())
            .unwrap_or_default();
        let event = self
            .app
            .events
            .update(&key, req.event.map(event_from_pb))
            .instrument(span)
            .await?;
        Ok(Response::new(pb::UpdateEventResponse {
            event: Some(event_to_pb(event)),
        }))
    }

    async fn delete_event(
        &self,
        request: Request<pb::DeleteEventRequest>,
    ) -> RpcResult<pb::DeleteEventResponse> {
        let span = request_span("DeleteEvent", &request);
        let req = request.into_inner();
        self.app.events.delete(&req.key).instrument(span).await?;
        Ok(Response::new(pb::DeleteEventResponse {}))
    }
}

// =============================================================================
// Persons
// =============================================================================

pub struct PersonGrpc {
    app: Arc<App>,
}

impl PersonGrpc {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }
}

#[tonic::async_trait]
impl person_service_server::PersonService for PersonGrpc {
    async fn get_persons(
        &self,
        request: Request<pb::GetPersonsRequest>,
    ) -> RpcResult<pb::GetPersonsResponse> {
        let span = request_span("GetPersons", &request);
        let persons = self.app.persons.list().instrument(span).await?;
        Ok(Response::new(pb::GetPersonsResponse {
            persons: persons.into_iter().map(person_to_pb).collect(),
        }))
    }

    async fn get_person(
        &self,
        request: Request<pb::GetPersonRequest>,
    ) -> RpcResult<pb::GetPersonResponse> {
        let span = request_span("GetPerson", &request);
        let req = request.into_inner();
        let person = self.app.persons.get(&req.key).instrument(span).await?;
        Ok(Response::new(pb::GetPersonResponse {
            person: Some(person_to_pb(person)),
        }))
    }

    async fn create_person(
        &self,
        request: Request<pb::CreatePersonRequest>,
    ) -> RpcResult<pb::CreatePersonResponse> {
        let span = request_span("CreatePerson", &request);
        let req = request.into_inner();
        let person = self
            .app
            .persons
            .create(req.person.map(person_from_pb))
            .instrument(span)
            .await?;
        Ok(Response::new(pb::CreatePersonResponse {
            person: Some(person_to_pb(person)),
        }))
    }

    async fn update_person(
        &self,
        request: Request<pb::UpdatePersonRequest>,
    ) -> RpcResult<pb::UpdatePersonResponse> {
        let span = request_span("UpdatePerson", &request);
        let req = request.into_inner();
        let key = req
            .person
            .as_ref()
            .map(|p| p.key.clone())
            .unwrap_or_default();
        let person = self
            .app
            .persons
            .update(&key, req.person.map(person_from_pb))
            .instrument(span)
            .await?;
        Ok(Response::new(pb::UpdatePersonResponse {
            person: Some(person_to_pb(person)),
        }))
    }

    async fn delete_person(
        &self,
        request: Request<pb::DeletePersonRequest>,
    ) -> RpcResult<pb::DeletePersonResponse> {
        let span = request_span("DeletePerson", &request);
        let req = request.into_inner();
        self.app.persons.delete(&req.key).instrument(span).await?;
        Ok(Response::new(pb::DeletePersonResponse {}))
    }
}

// =============================================================================
// Organizations
// =============================================================================

pub struct OrganizationGrpc {
    app: Arc<App>,
}

impl OrganizationGrpc {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }
}

#[tonic::async_trait]
impl organization_service_server::OrganizationService for OrganizationGrpc {
    async fn get_organization(
        &self,
        request: Request<pb::GetOrganizationRequest>,
    ) -> RpcResult<pb::GetOrganizationResponse> {
        let span = request_span("GetOrganization", &request);
        let req = request.into_inner();
        let organization = self
            .app
            .organizations
            .get(&req.key)
            .instrument(span)
            .await?;
        Ok(Response::new(pb::GetOrganizationResponse {
            organization: Some(organization_to_pb(organization)),
        }))
    }

    async fn create_organization(
        &self,
        request: Request<pb::CreateOrganizationRequest>,
    ) -> RpcResult<pb::CreateOrganizationResponse> {
        let span = request_span("CreateOrganization", &request);
        let req = request.into_inner();
        let organization = self
            .app
            .organizations
            .create(req.organization.map(organization_from_pb))
            .instrument(span)
            .await?;
        Ok(Response::new(pb::CreateOrganizationResponse {
            organization: Some(organization_to_pb(organization)),
        }))
    }

    async fn update_organization(
        &self,
        request: Request<pb::UpdateOrganizationRequest>,
    ) -> RpcResult<pb::UpdateOrganizationResponse> {
        let span = request_span("UpdateOrganization", &request);
        let req = request.into_inner();
        let key = req
            .organization
            .as_ref()
            .map(|o| o.key.clone())
            .unwrap_or_default();
        let organization = self
            .app
            .organizations
            .update(&key, req.organization.map(organization_from_pb))
            .instrument(span)
            .await?;
        Ok(Response::new(pb::UpdateOrganizationResponse {
            organization: Some(organization_to_pb(organization)),
        }))
    }

    async fn delete_organization(
        &self,
        request: Request<pb::DeleteOrganizationRequest>,
    ) -> RpcResult<pb::DeleteOrganizationResponse> {
        let span = request_span("DeleteOrganization", &request);
        let req = request.into_inner();
        self.app
            .organizations
            .delete(&req.key)
            .instrument(span)
            .await?;
        Ok(Response::new(pb::DeleteOrganizationResponse {}))
    }
}

// =============================================================================
// Sources
// =============================================================================

pub struct SourceGrpc {
    app: Arc<App>,
}

impl SourceGrpc {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }
}

#[tonic::async_trait]
impl source_service_server::SourceService for SourceGrpc {
    async fn get_source(
        &self,
        request: Request<pb::GetSourceRequest>,
    ) -> RpcResult<pb::GetSourceResponse> {
        let span = request_span("GetSource", &request);
        let req = request.into_inner();
        let source = self.app.sources.get(&req.key).instrument(span).await?;
        Ok(Response::new(pb::GetSourceResponse {
            source: Some(source_to_pb(source)),
        }))
    }

    async fn create_source(
        &self,
        request: Request<pb::CreateSourceRequest>,
    ) -> RpcResult<pb::CreateSourceResponse> {
        let span = request_span("CreateSource", &request);
        let req = request.into_inner();
        let source = self
            .app
            .sources
            .create(req.source.map(source_from_pb))
            .instrument(span)
            .await?;
        Ok(Response::new(pb::CreateSourceResponse {
            source: Some(source_to_pb(source)),
        }))
    }

    async fn update_source(
        &self,
        request: Request<pb::UpdateSourceRequest>,
    ) -> RpcResult<pb::UpdateSourceResponse> {
        let span = request_span("UpdateSource", &request);
        let req = request.into_inner();
        let key = req
            .source
            .as_ref()
            .map(|s| s.key.clone())
            .unwrap_or_default();
        let source = self
            .app
            .sources
            .update(&key, req.source.map(source_from_pb))
            .instrument(span)
            .await?;
        Ok(Response::new(pb::UpdateSourceResponse {
            source: Some(source_to_pb(source)),
        }))
    }

    async fn delete_source(
        &self,
        request: Request<pb::DeleteSourceRequest>,
    ) -> RpcResult<pb::DeleteSourceResponse> {
        let span = request_span("DeleteSource", &request);
        let req = request.into_inner();
        self.app.sources.delete(&req.key).instrument(span).await?;
        Ok(Response::new(pb::DeleteSourceResponse {}))
    }
}

// =============================================================================
// Websites
// =============================================================================

pub struct WebsiteGrpc {
    app: Arc<App>,
}

impl WebsiteGrpc {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }
}

#[tonic::async_trait]
impl website_service_server::WebsiteService for WebsiteGrpc {
    async fn get_website(
        &self,
        request: Request<pb::GetWebsiteRequest>,
    ) -> RpcResult<pb::GetWebsiteResponse> {
        let span = request_span("GetWebsite", &request);
        let req = request.into_inner();
        let website = self.app.websites.get(&req.key).instrument(span).await?;
        Ok(Response::new(pb::GetWebsiteResponse {
            website: Some(website_to_pb(website)),
        }))
    }

    async fn create_website(
        &self,
        request: Request<pb::CreateWebsiteRequest>,
    ) -> RpcResult<pb::CreateWebsiteResponse> {
        let span = request_span("CreateWebsite", &request);
        let req = request.into_inner();
        let website = self
            .app
            .websites
            .create(req.website.map(website_from_pb))
            .instrument(span)
            .await?;
        Ok(Response::new(pb::CreateWebsiteResponse {
            website: Some(website_to_pb(website)),
        }))
    }

    async fn update_website(
        &self,
        request: Request<pb::UpdateWebsiteRequest>,
    ) -> RpcResult<pb::UpdateWebsiteResponse> {
        let span = request_span("UpdateWebsite", &request);
        let req = request.into_inner();
        let key = req
            .website
            .as_ref()
            .map(|w| w.key.clone())
            .unwrap_or_default();
        let website = self
            .app
            .websites
            .update(&key, req.website.map(website_from_pb))
            .instrument(span)
            .await?;
        Ok(Response::new(pb::UpdateWebsiteResponse {
            website: Some(website_to_pb(website)),
        }))
    }

    async fn delete_website(
        &self,
        request: Request<pb::DeleteWebsiteRequest>,
    ) -> RpcResult<pb::DeleteWebsiteResponse> {
        let span = request_span("DeleteWebsite", &request);
        let req = request.into_inner();
        self.app.websites.delete(&req.key).instrument(span).await?;
        Ok(Response::new(pb::DeleteWebsiteResponse {}))
    }
}

// =============================================================================
// Relationships
// =============================================================================

pub struct RelationshipGrpc {
    app: Arc<App>,
}

impl RelationshipGrpc {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }
}

#[tonic::async_trait]
impl relationship_service_server::RelationshipService for RelationshipGrpc {
    async fn create_relationship(
        &self,
        request: Request<pb::CreateRelationshipRequest>,
    ) -> RpcResult<pb::CreateRelationshipResponse> {
        let span = request_span("CreateRelationship", &request);
        let req = request.into_inner();
        let relationship = self
            .app
            .relationships
            .create(req.relationship.map(relation_from_pb))
            .instrument(span)
            .await?;
        Ok(Response::new(pb::CreateRelationshipResponse {
            relationship: Some(relation_to_pb(relationship)),
        }))
    }

    async fn update_relationship(
        &self,
        request: Request<pb::UpdateRelationshipRequest>,
    ) -> RpcResult<pb::UpdateRelationshipResponse> {
        let span = request_span("UpdateRelationship", &request);
        let req = request.into_inner();
        let relationship = self
            .app
            .relationships
            .update(req.relationship.map(relation_from_pb))
            .instrument(span)
            .await?;
        Ok(Response::new(pb::UpdateRelationshipResponse {
            relationship: Some(relation_to_pb(relationship)),
        }))
    }

    async fn delete_relationship(
        &self,
        request: Request<pb::DeleteRelationshipRequest>,
    ) -> RpcResult<pb::DeleteRelationshipResponse> {
        let span = request_span("DeleteRelationship", &request);
        let req = request.into_inner();
        self.app
            .relationships
            .delete(&req.id)
            .instrument(span)
            .await?;
        Ok(Response::new(pb::DeleteRelationshipResponse {}))
    }
}
