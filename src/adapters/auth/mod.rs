//! Credential provider
//!
//! Produces an authenticated [`Session`]: the header map every GraphQL call
//! carries, plus the pinned trust anchor (when one was captured) that the
//! HTTP client must trust. Any failure here is fatal for the run.

pub mod certificate;
pub mod login;

pub use certificate::{fetch_certificate_chain, pem_blocks, CertificateChain, TrustAnchor};
pub use login::LoginCredentialProvider;

use crate::domain::{AuthError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};

/// Source of authenticated sessions
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Authenticate and return the headers and trust settings for the run
    async fn authorize(&self) -> Result<Session>;
}

/// Authenticated request context
#[derive(Debug)]
pub struct Session {
    headers: HeaderMap,
    trust_anchor: Option<TrustAnchor>,
}

impl Session {
    pub fn new(headers: HeaderMap, trust_anchor: Option<TrustAnchor>) -> Self {
        Self {
            headers,
            trust_anchor,
        }
    }

    /// JSON session authorized with `Bearer <token>`
    pub fn bearer(token: &str, trust_anchor: Option<TrustAnchor>) -> Result<Self> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json;charset=UTF-8"),
        );

        Ok(Self::new(headers, trust_anchor))
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn trust_anchor(&self) -> Option<&TrustAnchor> {
        self.trust_anchor.as_ref()
    }

    /// End the session, deleting the pinned trust anchor file
    pub fn close(self) -> Result<()> {
        match self.trust_anchor {
            Some(anchor) => anchor.remove(),
            None => Ok(()),
        }
    }
}
