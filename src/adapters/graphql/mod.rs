//! Vulnerability GraphQL API
//!
//! [`GraphQlTransport`] is the seam between the export pipeline and HTTP;
//! [`GraphQlClient`] is the production implementation.

pub mod client;
pub mod query;

pub use client::{GraphQlClient, GraphQlTransport};
pub use query::{
    count_query, extract_count, extract_records, list_query, GraphQlRequest, COUNT_FIELD,
    LIST_FIELD, OPERATION_NAME,
};
