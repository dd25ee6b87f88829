//! HTTP transport for the GraphQL endpoint

use super::query::GraphQlRequest;
use crate::adapters::auth::Session;
use crate::adapters::http::build_http_client;
use crate::domain::{GraphQlError, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Executes one GraphQL request and returns the decoded response body
///
/// Implementations must be shareable across page workers.
#[async_trait]
pub trait GraphQlTransport: Send + Sync {
    async fn execute(&self, request: &GraphQlRequest, timeout: Duration) -> Result<Value>;
}

/// reqwest-backed transport bound to one authenticated session
///
/// # Example
///
/// ```no_run
/// use vulnex::adapters::auth::{CredentialProvider, LoginCredentialProvider};
/// use vulnex::adapters::graphql::{count_query, GraphQlClient, GraphQlTransport};
/// use vulnex::config::load_config;
/// use std::time::Duration;
///
/// # async fn example() -> vulnex::domain::Result<()> {
/// let config = load_config("vulnex.toml")?;
/// let session = LoginCredentialProvider::new(config.api.clone()).authorize().await?;
/// let client = GraphQlClient::new(config.api.graphql_url(), &session)?;
/// let body = client
///     .execute(&count_query(&config.query.filter), Duration::from_secs(30))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct GraphQlClient {
    endpoint: String,
    client: Client,
    headers: HeaderMap,
}

impl GraphQlClient {
    /// Create a client that sends the session headers and trusts the session anchor
    pub fn new(endpoint: impl Into<String>, session: &Session) -> Result<Self> {
        Ok(Self {
            endpoint: endpoint.into(),
            client: build_http_client(session.trust_anchor())?,
            headers: session.headers().clone(),
        })
    }
}

#[async_trait]
impl GraphQlTransport for GraphQlClient {
    async fn execute(&self, request: &GraphQlRequest, timeout: Duration) -> Result<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .timeout(timeout)
            .json(request)
            .send()
            .await
            .map_err(GraphQlError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GraphQlError::from_status(status.as_u16(), message).into());
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| GraphQlError::InvalidResponse(e.to_string()).into())
    }
}
