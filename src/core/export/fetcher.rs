//! Record count and page fetching with a fixed-delay retry policy

use super::summary::DroppedPage;
use crate::adapters::graphql::{count_query, extract_count, extract_records, list_query, GraphQlTransport};
use crate::config::VulnexConfig;
use crate::core::transform::RowFlattener;
use crate::domain::{Page, Result};
use crate::{log_page_fetched, log_retry_attempt};
use std::sync::Arc;
use std::time::Duration;

/// How often and how patiently a page is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per page, including the first
    pub max_attempts: usize,

    /// Pause between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

/// Result of fetching one offset
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Fetched(Page),
    Dropped(DroppedPage),
}

/// Query the total number of matching records
///
/// A single attempt; the caller decides what a failure means.
pub async fn count_records(transport: &dyn GraphQlTransport, filter: &str, timeout: Duration) -> Result<u64> {
    let body = transport.execute(&count_query(filter), timeout).await?;
    let count = extract_count(&body)?;
    tracing::info!(count = count, "Total records to fetch");
    Ok(count)
}

/// Fetches and flattens one page per offset
///
/// Every failure (transport, HTTP status, GraphQL `errors`, undecodable
/// body, unflattenable record) is retried with a fixed delay. Once the
/// attempts run out the page is reported as [`PageOutcome::Dropped`] rather
/// than failing the run.
pub struct PageFetcher {
    transport: Arc<dyn GraphQlTransport>,
    flattener: RowFlattener,
    filter: String,
    page_size: u64,
    timeout: Duration,
    retry: RetryPolicy,
}

impl PageFetcher {
    pub fn new(
        transport: Arc<dyn GraphQlTransport>,
        flattener: RowFlattener,
        filter: impl Into<String>,
        page_size: u64,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            flattener,
            filter: filter.into(),
            page_size,
            timeout,
            retry,
        }
    }

    /// Fetcher configured from the `[query]`, `[export]` and `[api]` sections
    pub fn from_config(transport: Arc<dyn GraphQlTransport>, config: &VulnexConfig) -> Self {
        Self::new(
            transport,
            RowFlattener::host_vulnerability(),
            config.query.filter.clone(),
            config.query.page_size,
            Duration::from_secs(config.api.data_timeout_seconds),
            RetryPolicy::new(
                config.export.max_retries,
                Duration::from_millis(config.export.retry_delay_ms),
            ),
        )
    }

    pub fn flattener(&self) -> &RowFlattener {
        &self.flattener
    }

    /// Fetch the page at `offset`, retrying until the policy is exhausted
    pub async fn fetch(&self, offset: u64) -> PageOutcome {
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.try_fetch(offset).await {
                Ok(page) => return PageOutcome::Fetched(page),
                Err(e) => {
                    if attempt >= self.retry.max_attempts {
                        tracing::error!(
                            offset = offset,
                            attempts = attempt,
                            error = %e,
                            "Dropping page after exhausting retries"
                        );
                        return PageOutcome::Dropped(DroppedPage {
                            offset,
                            attempts: attempt,
                            error: e.to_string(),
                        });
                    }

                    let reason = format!("offset {offset}: {e}");
                    log_retry_attempt!(attempt, self.retry.max_attempts, reason.as_str());
                    tokio::time::sleep(self.retry.delay).await;
                }
            }
        }
    }

    async fn try_fetch(&self, offset: u64) -> Result<Page> {
        let request = list_query(&self.filter, self.page_size, offset);
        let body = self.transport.execute(&request, self.timeout).await?;
        let records = extract_records(body)?;
        let rows = self.flattener.flatten_page(&records)?;

        log_page_fetched!(offset, records.len(), rows.len());
        Ok(Page::new(offset, rows))
    }
}
