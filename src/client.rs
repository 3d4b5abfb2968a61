//! GraphQL-over-HTTP collaborator.
//!
//! Thin wrapper around a blocking HTTP client: posts `{query, variables}`
//! and surfaces transport failures and GraphQL `errors` arrays as one error
//! type. Subscription transports and caching live outside this crate.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced by a query execution.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, body decode)
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from the endpoint
    #[error("GraphQL error ({status}): {message}")]
    Status { status: u16, message: String },

    /// The endpoint answered with a GraphQL `errors` array
    #[error("GraphQL errors:\n{0}")]
    GraphQl(String),

    /// The response carried no usable `data` field
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    variables: &'a Value,
}

/// Blocking GraphQL client for a single endpoint.
#[derive(Debug)]
pub struct GraphQlClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    headers: HashMap<String, String>,
}

impl GraphQlClient {
    /// Create a client for an endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            headers: HashMap::new(),
        })
    }

    /// Attach custom headers sent with every request.
    #[must_use]
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute a query or mutation and return the response's `data` field.
    pub fn execute(&self, query: &str, variables: &Value) -> Result<Value, ClientError> {
        info!("Connecting to GraphQL at {}", self.endpoint);

        let mut request = self
            .http
            .post(&self.endpoint)
            .json(&QueryRequest { query, variables });
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        let response = request.send()?;
        let status = response.status();
        let body: Value = response.json()?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: error_messages(&body).unwrap_or_else(|| body.to_string()),
            });
        }

        if let Some(messages) = error_messages(&body) {
            return Err(ClientError::GraphQl(messages));
        }

        debug!("Response {body}");

        match body.get("data") {
            Some(data) if !data.is_null() => Ok(data.clone()),
            _ => Err(ClientError::InvalidResponse(body.to_string())),
        }
    }
}

/// Join the messages of a GraphQL `errors` array, if the body carries one.
fn error_messages(body: &Value) -> Option<String> {
    let errors = body.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }
    let messages: Vec<&str> = errors
        .iter()
        .filter_map(|e| e.get("message").and_then(Value::as_str))
        .collect();
    Some(messages.join("\n"))
}
