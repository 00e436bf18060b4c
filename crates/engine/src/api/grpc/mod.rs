//! gRPC transport.

mod convert;
mod services;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use geovision_protocol::pb::{
    event_service_server::EventServiceServer,
    organization_service_server::OrganizationServiceServer,
    person_service_server::PersonServiceServer,
    relationship_service_server::RelationshipServiceServer,
    source_service_server::SourceServiceServer, website_service_server::WebsiteServiceServer,
};
use tonic::{Code, Request, Status};
use tower_http::trace::TraceLayer;

use crate::app::App;
use crate::infrastructure::correlation::{CorrelationId, CORRELATION_HEADER};
use crate::services::ServiceError;

pub use services::{
    EventGrpc, OrganizationGrpc, PersonGrpc, RelationshipGrpc, SourceGrpc, WebsiteGrpc,
};

/// Canonical gRPC code for a façade error.
pub fn status_code(error: &ServiceError) -> Code {
    match error {
        ServiceError::BadRequest(_) => Code::InvalidArgument,
        ServiceError::NotFound(_) => Code::NotFound,
        ServiceError::Internal => Code::Internal,
        ServiceError::Unimplemented(_) => Code::Unimplemented,
    }
}

impl From<ServiceError> for Status {
    fn from(e: ServiceError) -> Self {
        Status::new(status_code(&e), e.to_string())
    }
}

/// Span wrapping one RPC, keyed by the caller's correlation id if it sent one.
fn request_span<T>(operation: &'static str, request: &Request<T>) -> tracing::Span {
    let correlation_id = CorrelationId::from_header(
        request
            .metadata()
            .get(CORRELATION_HEADER)
            .and_then(|v| v.to_str().ok()),
    );
    tracing::info_span!(
        "rpc",
        operation,
        correlation_id = %correlation_id.short()
    )
}

/// Serve every resource group plus server reflection until `shutdown` resolves.
pub async fn serve<F>(
    app: Arc<App>,
    addr: SocketAddr,
    shutdown: F,
) -> Result<(), tonic::transport::Error>
where
    F: Future<Output = ()> + Send,
{
    let reflection = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(geovision_protocol::FILE_DESCRIPTOR_SET)
        .build_v1();
    let reflection = match reflection {
        Ok(service) => Some(service),
        Err(e) => {
            tracing::warn!(error = %e, "gRPC reflection unavailable");
            None
        }
    };

    tracing::info!(%addr, "gRPC server listening");
    tonic::transport::Server::builder()
        .layer(TraceLayer::new_for_grpc())
        .add_optional_service(reflection)
        .add_service(EventServiceServer::new(EventGrpc::new(app.clone())))
        .add_service(PersonServiceServer::new(PersonGrpc::new(app.clone())))
        .add_service(OrganizationServiceServer::new(OrganizationGrpc::new(app.clone())))
        .add_service(SourceServiceServer::new(SourceGrpc::new(app.clone())))
        .add_service(WebsiteServiceServer::new(WebsiteGrpc::new(app.clone())))
        .add_service(RelationshipServiceServer::new(RelationshipGrpc::new(app)))
        .serve_with_shutdown(addr, shutdown)
        .await
}
