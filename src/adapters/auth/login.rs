//! Username/password login against the vendor's auth endpoint

use super::certificate::{fetch_certificate_chain, TrustAnchor};
use super::{CredentialProvider, Session};
use crate::adapters::http::build_http_client;
use crate::config::ApiConfig;
use crate::domain::{AuthError, Result, VulnexError};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// Logs in with the configured credentials and returns a bearer session
///
/// For `https://` endpoints with pinning enabled, the server's chain is
/// captured first and written to the system temp directory; the login
/// request and the returned session trust only that chain.
///
/// # Example
///
/// ```no_run
/// use vulnex::adapters::auth::{CredentialProvider, LoginCredentialProvider};
/// use vulnex::config::load_config;
///
/// # async fn example() -> vulnex::domain::Result<()> {
/// let config = load_config("vulnex.toml")?;
/// let provider = LoginCredentialProvider::new(config.api);
/// let session = provider.authorize().await?;
/// # session.close()?;
/// # Ok(())
/// # }
/// ```
pub struct LoginCredentialProvider {
    config: ApiConfig,
}

impl LoginCredentialProvider {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    async fn pin_certificate(&self) -> Result<TrustAnchor> {
        let (host, port) = self.config.host_and_port()?;
        let timeout = Duration::from_secs(self.config.login_timeout_seconds);

        let chain = tokio::task::spawn_blocking({
            let host = host.clone();
            move || fetch_certificate_chain(&host, port, timeout)
        })
        .await
        .map_err(|e| VulnexError::Other(format!("Certificate task failed: {e}")))??;

        tracing::debug!(host = %host, certificates = chain.len(), "Pinning server certificate chain");
        TrustAnchor::write(&std::env::temp_dir(), &self.config.trust_anchor_file, &chain)
    }

    async fn login(&self, trust_anchor: Option<&TrustAnchor>) -> Result<String> {
        let client = build_http_client(trust_anchor)?;
        let body = LoginRequest {
            username: &self.config.username,
            password: self.config.password.expose_secret().as_ref(),
        };

        let response = client
            .post(self.config.login_url())
            .timeout(Duration::from_secs(self.config.login_timeout_seconds))
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::LoginFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::LoginFailed(format!("HTTP {}", status.as_u16())).into());
        }

        let login: LoginResponse = response
            .json()
            .await
            .map_err(|e| AuthError::LoginFailed(format!("unreadable response: {e}")))?;

        match login.access_token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(AuthError::NoToken.into()),
        }
    }
}

#[async_trait]
impl CredentialProvider for LoginCredentialProvider {
    async fn authorize(&self) -> Result<Session> {
        let trust_anchor = if self.config.pins_certificate() {
            Some(self.pin_certificate().await?)
        } else {
            None
        };

        match self.login(trust_anchor.as_ref()).await {
            Ok(token) => {
                tracing::info!(username = %self.config.username, "Login successful");
                Session::bearer(&token, trust_anchor)
            }
            Err(e) => {
                if let Some(anchor) = trust_anchor {
                    if let Err(cleanup) = anchor.remove() {
                        tracing::warn!(error = %cleanup, "Failed to remove trust anchor");
                    }
                }
                Err(e)
            }
        }
    }
}
