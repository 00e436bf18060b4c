//! ArangoDB test harness for E2E testing.
//!
//! Provides testcontainer-based ArangoDB instance management for integration tests.

use std::sync::Arc;
use std::time::Duration;

use geovision_domain::WindowPolicy;
use testcontainers::{core::WaitFor, runners::AsyncRunner, ContainerAsync, GenericImage};
use tokio::time::sleep;
use url::Url;

use crate::app::App;
use crate::config::{ArangoConfig, DEFAULT_GRAPH_NAME};
use crate::infrastructure::arango::{ensure_schema, ArangoStore};
use crate::infrastructure::ports::DocumentStore;

/// Root password used for ArangoDB test containers.
pub const TEST_ARANGO_PASSWORD: &str = "testpassword";

/// Database created inside each test container.
pub const TEST_DATABASE: &str = "geovision_test";

type HarnessResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// ArangoDB test harness managing container lifecycle.
pub struct ArangoTestHarness {
    _container: ContainerAsync<GenericImage>,
    store: ArangoStore,
}

impl ArangoTestHarness {
    /// Start a new ArangoDB container, connect, and provision the schema.
    pub async fn start() -> HarnessResult<Self> {
        let container: ContainerAsync<GenericImage> =
            arango_image(TEST_ARANGO_PASSWORD).start().await;
        let port = container.get_host_port_ipv4(8529).await;

        let config = ArangoConfig {
            url: Url::parse(&format!("http://127.0.0.1:{port}"))?,
            database: TEST_DATABASE.to_string(),
            username: "root".to_string(),
            password: TEST_ARANGO_PASSWORD.to_string(),
            timeout: Duration::from_secs(30),
        };
        let store = connect_with_retry(&config).await?;
        ensure_schema(&store, DEFAULT_GRAPH_NAME).await?;

        Ok(Self {
            _container: container,
            store,
        })
    }

    /// Shared store handle for direct assertions.
    pub fn store(&self) -> Arc<dyn DocumentStore> {
        Arc::new(self.store.clone())
    }

    /// Application wired to this container with the default window policy.
    pub fn app(&self) -> App {
        App::new(self.store(), DEFAULT_GRAPH_NAME, WindowPolicy::RequireNonZero)
    }
}

/// Create an ArangoDB container image with the given root password.
///
/// Readiness is verified by `connect_with_retry`, not by log parsing.
pub fn arango_image(password: &str) -> GenericImage {
    GenericImage::new("arangodb", "3.11")
        .with_env_var("ARANGO_ROOT_PASSWORD", password)
        .with_exposed_port(8529)
        .with_wait_for(WaitFor::seconds(3))
}

/// Connect with exponential backoff (500ms doubling, capped at 5s, 30 attempts).
pub async fn connect_with_retry(config: &ArangoConfig) -> HarnessResult<ArangoStore> {
    let max_attempts = 30;
    let max_delay = Duration::from_secs(5);
    let mut delay = Duration::from_millis(500);
    let mut last_err: Option<String> = None;

    for attempt in 1..=max_attempts {
        match ArangoStore::connect(config).await {
            Ok(store) => {
                tracing::info!(attempt, "ArangoDB connection established");
                return Ok(store);
            }
            Err(e) => last_err = Some(e.to_string()),
        }

        tracing::debug!(
            attempt,
            delay_ms = delay.as_millis(),
            error = last_err.as_deref().unwrap_or("unknown"),
            "Retrying ArangoDB connection"
        );
        sleep(delay).await;
        delay = std::cmp::min(delay.saturating_mul(2), max_delay);
    }

    Err(format!(
        "Failed to connect to ArangoDB at {} after {max_attempts} attempts: {:?}",
        config.url, last_err
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::BindVars;

    #[tokio::test]
    #[ignore = "requires docker (testcontainers)"]
    async fn harness_provisions_vertex_collections() {
        let harness = ArangoTestHarness::start()
            .await
            .expect("Failed to start ArangoDB harness");
        let store = harness.store();

        for name in ["events", "persons", "organizations", "sources", "websites"] {
            assert!(
                store.collection_exists(name).await.expect("lookup"),
                "{name} should exist"
            );
        }

        let mut cursor = store
            .query("RETURN 1", BindVars::new())
            .await
            .expect("query");
        assert_eq!(
            cursor.next().await.expect("row"),
            Some(serde_json::json!(1))
        );
    }

    #[tokio::test]
    #[ignore = "requires docker (testcontainers)"]
    async fn schema_provisioning_is_idempotent() {
        let harness = ArangoTestHarness::start()
            .await
            .expect("Failed to start ArangoDB harness");
        ensure_schema(harness.store().as_ref(), DEFAULT_GRAPH_NAME)
            .await
            .expect("second provisioning run succeeds");
        harness
            .store
            .ensure_database()
            .await
            .expect("existing database is accepted");
    }
}
