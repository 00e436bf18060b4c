//! Thin HTTP client for the ArangoDB REST API.

use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::config::ArangoConfig;
use crate::infrastructure::ports::StoreError;

/// ArangoDB error numbers the gateway gives meaning to.
pub(super) mod error_num {
    pub const CONFLICT: i64 = 1200;
    pub const DOCUMENT_NOT_FOUND: i64 = 1202;
    pub const DATA_SOURCE_NOT_FOUND: i64 = 1203;
    pub const DUPLICATE_NAME: i64 = 1207;
    pub const DATABASE_NOT_FOUND: i64 = 1228;
    pub const CURSOR_NOT_FOUND: i64 = 1600;
    pub const GRAPH_COLLECTION_MULTI_USE: i64 = 1920;
    pub const GRAPH_COLLECTION_USE_IN_MULTI_GRAPHS: i64 = 1921;
    pub const GRAPH_NOT_FOUND: i64 = 1924;
    pub const GRAPH_DUPLICATE: i64 = 1925;
    pub const GRAPH_EMPTY: i64 = 1940;
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    error_num: i64,
    #[serde(default)]
    error_message: String,
}

/// Authenticated HTTP access to one ArangoDB database.
#[derive(Clone)]
pub struct ArangoClient {
    http: Client,
    base_url: Url,
    database: String,
    username: String,
    password: String,
}

impl ArangoClient {
    pub fn new(config: &ArangoConfig) -> Self {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            base_url: config.url.clone(),
            database: config.database.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// URL of a server-level endpoint such as `/_api/database`.
    pub fn server_url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                StoreError::Transport(format!("'{}' cannot be used as a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL of an endpoint scoped to the configured database (`/_db/<db>/...`).
    ///
    /// Each segment is percent-encoded, so document keys never alter the path.
    pub fn db_url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut all = Vec::with_capacity(segments.len() + 2);
        all.push("_db");
        all.push(self.database.as_str());
        all.extend_from_slice(segments);
        self.server_url(&all)
    }

    /// Send a request and return the decoded JSON body of a successful response.
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Value, StoreError> {
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .basic_auth(&self.username, Some(&self.password));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str::<Value>(&text) {
                Ok(value) => value,
                Err(_) if !status.is_success() => {
                    return Err(StoreError::Store {
                        status: status.as_u16(),
                        error_num: 0,
                        message: text,
                    });
                }
                Err(e) => {
                    return Err(StoreError::decode(format!(
                        "{method} {}: {e}",
                        url.path()
                    )));
                }
            }
        };

        if status.is_success() {
            Ok(body)
        } else {
            Err(error_from_response(status.as_u16(), body))
        }
    }

    pub async fn get(&self, url: Url) -> Result<Value, StoreError> {
        self.send(Method::GET, url, None).await
    }

    pub async fn post(&self, url: Url, body: &Value) -> Result<Value, StoreError> {
        self.send(Method::POST, url, Some(body)).await
    }

    pub async fn put(&self, url: Url) -> Result<Value, StoreError> {
        self.send(Method::PUT, url, None).await
    }

    pub async fn patch(&self, url: Url, body: &Value) -> Result<Value, StoreError> {
        self.send(Method::PATCH, url, Some(body)).await
    }

    pub async fn delete(&self, url: Url) -> Result<Value, StoreError> {
        self.send(Method::DELETE, url, None).await
    }
}

/// Classify an ArangoDB error response by its `errorNum`.
pub(super) fn error_from_response(status: u16, body: Value) -> StoreError {
    let parsed: ErrorBody = serde_json::from_value(body).unwrap_or_default();
    let message = if parsed.error_message.is_empty() {
        format!("HTTP {status}")
    } else {
        parsed.error_message
    };

    match parsed.error_num {
        error_num::DOCUMENT_NOT_FOUND
        | error_num::DATA_SOURCE_NOT_FOUND
        | error_num::DATABASE_NOT_FOUND
        | error_num::CURSOR_NOT_FOUND
        | error_num::GRAPH_NOT_FOUND => StoreError::NotFound(message),
        error_num::DUPLICATE_NAME
        | error_num::GRAPH_DUPLICATE
        | error_num::GRAPH_COLLECTION_MULTI_USE
        | error_num::GRAPH_COLLECTION_USE_IN_MULTI_GRAPHS => StoreError::AlreadyExists(message),
        error_num::GRAPH_EMPTY => StoreError::GraphEmpty(message),
        error_num::CONFLICT => StoreError::Conflict(message),
        num => StoreError::Store {
            status,
            error_num: num,
            message,
        },
    }
}
