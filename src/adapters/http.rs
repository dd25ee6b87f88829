//! Shared HTTP client construction

use super::auth::TrustAnchor;
use crate::domain::{Result, VulnexError};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Build the client used for login and GraphQL calls
///
/// Always rustls. With a trust anchor, only the pinned chain is trusted and
/// the built-in roots are disabled. Per-request timeouts are set by the callers.
pub fn build_http_client(trust_anchor: Option<&TrustAnchor>) -> Result<Client> {
    let mut builder = ClientBuilder::new()
        .use_rustls_tls()
        .connect_timeout(Duration::from_secs(30))
        .gzip(true)
        .brotli(true)
        .deflate(true);

    if let Some(anchor) = trust_anchor {
        builder = builder.tls_built_in_root_certs(false);
        for certificate in anchor.load_certificates()? {
            builder = builder.add_root_certificate(certificate);
        }
    }

    builder
        .build()
        .map_err(|e| VulnexError::Configuration(format!("Failed to build HTTP client: {e}")))
}
