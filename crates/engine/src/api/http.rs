//! HTTP routes.
//!
//! JSON façade over the same services the gRPC transport uses. Bodies are
//! the domain payloads themselves (`id`/`key`/`rev`, `happenedAt`,
//! `from`/`to`/`name`).

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, Request, State},
    http::{header::HeaderName, HeaderValue, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use geovision_domain::{
    Event, EventNeighborhood, Organization, Person, Relation, RelatedEntity, Source, Website,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use super::grpc::status_code;
use crate::app::App;
use crate::infrastructure::correlation::{CorrelationId, CORRELATION_HEADER};
use crate::services::ServiceError;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/health", get(health))
        .route("/v1/events", get(get_events).post(create_event))
        .route(
            "/v1/events/{key}",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .route(
            "/v1/events/{key}/related-entities",
            get(get_event_related_entities),
        )
        .route("/v1/events/{key}/related-events", get(get_related_events))
        .route("/v1/persons", get(get_persons).post(create_person))
        .route(
            "/v1/persons/{key}",
            get(get_person).patch(update_person).delete(delete_person),
        )
        .route("/v1/organizations", post(create_organization))
        .route(
            "/v1/organizations/{key}",
            get(get_organization)
                .patch(update_organization)
                .delete(delete_organization),
        )
        .route("/v1/sources", post(create_source))
        .route(
            "/v1/sources/{key}",
            get(get_source).patch(update_source).delete(delete_source),
        )
        .route("/v1/websites", post(create_website))
        .route(
            "/v1/websites/{key}",
            get(get_website).patch(update_website).delete(delete_website),
        )
        .route(
            "/v1/relationships",
            post(create_relationship).patch(update_relationship),
        )
        .route("/v1/relationships/{*id}", delete(delete_relationship))
        .fallback(no_route)
}

/// Routes with state, request correlation, tracing and optional CORS applied.
pub fn router(app: Arc<App>, cors_allowed_origins: Option<&str>) -> Router {
    let mut router = routes()
        .with_state(app)
        .layer(middleware::from_fn(correlate))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_allowed_origins.and_then(build_cors_layer) {
        router = router.layer(cors);
    }
    router
}

/// Serve the HTTP façade until `shutdown` resolves.
pub async fn serve<F>(
    app: Arc<App>,
    addr: SocketAddr,
    cors_allowed_origins: Option<&str>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "HTTP server listening");
    axum::serve(listener, router(app, cors_allowed_origins))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Run each request inside a span carrying its correlation id, and echo the id back.
async fn correlate(request: Request, next: Next) -> Response {
    let correlation_id = CorrelationId::from_header(
        request
            .headers()
            .get(CORRELATION_HEADER)
            .and_then(|v| v.to_str().ok()),
    );
    let span = tracing::info_span!(
        "http",
        method = %request.method(),
        path = %request.uri().path(),
        correlation_id = %correlation_id.short()
    );

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&correlation_id.to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(CORRELATION_HEADER), value);
    }
    response
}

fn build_cors_layer(allowed_origins: &str) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins.trim();
    if allowed_origins.is_empty() {
        return None;
    }

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static(CORRELATION_HEADER),
            axum::http::header::CONTENT_TYPE,
        ]);

    if allowed_origins == "*" {
        return Some(cors.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();

    if origins.is_empty() {
        return None;
    }
    Some(cors.allow_origin(origins))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

// =============================================================================
// Request / response bodies
// =============================================================================

#[derive(Debug, Deserialize)]
struct WindowQuery {
    #[serde(default, alias = "startTime")]
    start_time: i64,
    #[serde(default, alias = "endTime")]
    end_time: i64,
}

#[derive(Serialize)]
struct RelatedEntitiesResponse {
    entities: Vec<RelatedEntity>,
}

#[derive(Serialize)]
struct EventsResponse<T> {
    events: Vec<T>,
}

#[derive(Serialize)]
struct PersonsResponse {
    persons: Vec<Person>,
}

#[derive(Serialize)]
struct Empty {}

/// Treat a missing or malformed body as an absent payload, rejected by the service.
fn payload<T>(body: Result<Json<T>, JsonRejection>) -> Result<Option<T>, ApiError> {
    match body {
        Ok(Json(value)) => Ok(Some(value)),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(None),
        Err(e) => Err(ServiceError::bad_request(e.body_text()).into()),
    }
}

// =============================================================================
// Events
// =============================================================================

async fn get_events(
    State(app): State<Arc<App>>,
    query: Result<Query<WindowQuery>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<EventNeighborhood> {
    let Query(window) = query.map_err(|e| ServiceError::bad_request(e.body_text()))?;
    Ok(Json(
        app.events
            .get_events(window.start_time, window.end_time)
            .await?,
    ))
}

async fn get_event(State(app): State<Arc<App>>, Path(key): Path<String>) -> ApiResult<Event> {
    Ok(Json(app.events.get(&key).await?))
}

async fn create_event(
    State(app): State<Arc<App>>,
    body: Result<Json<Event>, JsonRejection>,
) -> ApiResult<Event> {
    Ok(Json(app.events.create(payload(body)?).await?))
}

async fn update_event(
    State(app): State<Arc<App>>,
    Path(key): Path<String>,
    body: Result<Json<Event>, JsonRejection>,
) -> ApiResult<Event> {
    Ok(Json(app.events.update(&key, payload(body)?).await?))
}

async fn delete_event(State(app): State<Arc<App>>, Path(key): Path<String>) -> ApiResult<Empty> {
    app.events.delete(&key).await?;
    Ok(Json(Empty {}))
}

async fn get_event_related_entities(
    State(app): State<Arc<App>>,
    Path(key): Path<String>,
) -> ApiResult<RelatedEntitiesResponse> {
    let entities = app.events.get_related_entities(&key).await?;
    Ok(Json(RelatedEntitiesResponse { entities }))
}

async fn get_related_events(
    State(app): State<Arc<App>>,
    Path(key): Path<String>,
) -> ApiResult<EventsResponse<Event>> {
    let events = app.events.get_related_events(&key).await?;
    Ok(Json(EventsResponse { events }))
}

// =============================================================================
// Persons
// =============================================================================

async fn get_persons(State(app): State<Arc<App>>) -> ApiResult<PersonsResponse> {
    let persons = app.persons.list().await?;
    Ok(Json(PersonsResponse { persons }))
}

async fn get_person(State(app): State<Arc<App>>, Path(key): Path<String>) -> ApiResult<Person> {
    Ok(Json(app.persons.get(&key).await?))
}

async fn create_person(
    State(app): State<Arc<App>>,
    body: Result<Json<Person>, JsonRejection>,
) -> ApiResult<Person> {
    Ok(Json(app.persons.create(payload(body)?).await?))
}

async fn update_person(
    State(app): State<Arc<App>>,
    Path(key): Path<String>,
    body: Result<Json<Person>, JsonRejection>,
) -> ApiResult<Person> {
    Ok(Json(app.persons.update(&key, payload(body)?).await?))
}

async fn delete_person(State(app): State<Arc<App>>, Path(key): Path<String>) -> ApiResult<Empty> {
    app.persons.delete(&key).await?;
    Ok(Json(Empty {}))
}

// =============================================================================
// Organizations
// =============================================================================

async fn get_organization(
    State(app): State<Arc<App>>,
    Path(key): Path<String>,
) -> ApiResult<Organization> {
    Ok(Json(app.organizations.get(&key).await?))
}

async fn create_organization(
    State(app): State<Arc<App>>,
    body: Result<Json<Organization>, JsonRejection>,
) -> ApiResult<Organization> {
    Ok(Json(app.organizations.create(payload(body)?).await?))
}

async fn update_organization(
    State(app): State<Arc<App>>,
    Path(key): Path<String>,
    body: Result<Json<Organization>, JsonRejection>,
) -> ApiResult<Organization> {
    Ok(Json(app.organizations.update(&key, payload(body)?).await?))
}

async fn delete_organization(
    State(app): State<Arc<App>>,
    Path(key): Path<String>,
) -> ApiResult<Empty> {
    app.organizations.delete(&key).await?;
    Ok(Json(Empty {}))
}

// =============================================================================
// Sources
// =============================================================================

async fn get_source(State(app): State<Arc<App>>, Path(key): Path<String>) -> ApiResult<Source> {
    Ok(Json(app.sources.get(&key).await?))
}

async fn create_source(
    State(app): State<Arc<App>>,
    body: Result<Json<Source>, JsonRejection>,
) -> ApiResult<Source> {
    Ok(Json(app.sources.create(payload(body)?).await?))
}

async fn update_source(
    State(app): State<Arc<App>>,
    Path(key): Path<String>,
    body: Result<Json<Source>, JsonRejection>,
) -> ApiResult<Source> {
    Ok(Json(app.sources.update(&key, payload(body)?).await?))
}

async fn delete_source(State(app): State<Arc<App>>, Path(key): Path<String>) -> ApiResult<Empty> {
    app.sources.delete(&key).await?;
    Ok(Json(Empty {}))
}

// =============================================================================
// Websites
// =============================================================================

async fn get_website(State(app): State<Arc<App>>, Path(key): Path<String>) -> ApiResult<Website> {
    Ok(Json(app.websites.get(&key).await?))
}

async fn create_website(
    State(app): State<Arc<App>>,
    body: Result<Json<Website>, JsonRejection>,
) -> ApiResult<Website> {
    Ok(Json(app.websites.create(payload(body)?).await?))
}

async fn update_website(
    State(app): State<Arc<App>>,
    Path(key): Path<String>,
    body: Result<Json<Website>, JsonRejection>,
) -> ApiResult<Website> {
    Ok(Json(app.websites.update(&key, payload(body)?).await?))
}

async fn delete_website(State(app): State<Arc<App>>, Path(key): Path<String>) -> ApiResult<Empty> {
    app.websites.delete(&key).await?;
    Ok(Json(Empty {}))
}

// =============================================================================
// Relationships
// =============================================================================

async fn create_relationship(
    State(app): State<Arc<App>>,
    body: Result<Json<Relation>, JsonRejection>,
) -> ApiResult<Relation> {
    Ok(Json(app.relationships.create(payload(body)?).await?))
}

async fn update_relationship(
    State(app): State<Arc<App>>,
    body: Result<Json<Relation>, JsonRejection>,
) -> ApiResult<Relation> {
    Ok(Json(app.relationships.update(payload(body)?).await?))
}

async fn delete_relationship(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> ApiResult<Empty> {
    app.relationships.delete(&id).await?;
    Ok(Json(Empty {}))
}

// =============================================================================
// Errors
// =============================================================================

/// Unknown paths, including ones with an empty `{key}` segment.
async fn no_route(uri: Uri) -> ApiError {
    ApiError(ServiceError::NotFound(format!("no route for {}", uri.path())))
}

#[derive(Debug)]
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Unimplemented(_) => StatusCode::NOT_IMPLEMENTED,
        };
        let body = json!({
            "code": status_code(&self.0) as i32,
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
