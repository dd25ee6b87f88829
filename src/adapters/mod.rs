//! External system integrations for Vulnex.
//!
//! - [`auth`] - Certificate pinning, login and the authorized session
//! - [`graphql`] - Query documents and the GraphQL transport
//! - [`http`] - Shared HTTP client construction
//!
//! # Example
//!
//! ```rust,no_run
//! use vulnex::adapters::auth::{CredentialProvider, LoginCredentialProvider};
//! use vulnex::adapters::graphql::{count_query, GraphQlClient, GraphQlTransport};
//! use vulnex::config::load_config;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("vulnex.toml")?;
//! let session = LoginCredentialProvider::new(config.api.clone()).authorize().await?;
//! let client = GraphQlClient::new(config.api.graphql_url(), &session)?;
//!
//! let body = client
//!     .execute(&count_query(&config.query.filter), Duration::from_secs(30))
//!     .await?;
//! println!("{body}");
//! session.close()?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod graphql;
pub mod http;
