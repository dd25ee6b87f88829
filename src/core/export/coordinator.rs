//! Export coordinator - main orchestrator for the export process
//!
//! Authenticate, count, plan the offsets still missing from today's output,
//! fetch them with the worker pool, then write and archive the CSV.

use crate::adapters::auth::{CredentialProvider, LoginCredentialProvider, Session};
use crate::adapters::graphql::{GraphQlClient, GraphQlTransport};
use crate::config::VulnexConfig;
use crate::core::export::fetcher::{count_records, PageFetcher};
use crate::core::export::pool::WorkerPool;
use crate::core::export::summary::{ExportError, ExportErrorType, ExportSummary};
use crate::core::persist::{archive_file, concat_pages, CsvSink, WriteMode};
use crate::core::state::{plan_offsets, ResumePlan, StateManager};
use crate::domain::Result;
use crate::log_error_with_context;
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Export coordinator
pub struct ExportCoordinator {
    config: VulnexConfig,
    credentials: Arc<dyn CredentialProvider>,
    state: StateManager,
    date: NaiveDate,
}

impl ExportCoordinator {
    /// Coordinator for today's export, logging in with the configured credentials
    pub fn new(config: VulnexConfig) -> Self {
        let credentials = Arc::new(LoginCredentialProvider::new(config.api.clone()));
        Self::with_parts(config, credentials, Local::now().date_naive())
    }

    /// Coordinator with an explicit credential provider and output date
    pub fn with_parts(
        config: VulnexConfig,
        credentials: Arc<dyn CredentialProvider>,
        date: NaiveDate,
    ) -> Self {
        let state = StateManager::new(&config.output, date);
        Self {
            config,
            credentials,
            state,
            date,
        }
    }

    /// Target the output files of another day
    pub fn with_date(self, date: NaiveDate) -> Self {
        Self::with_parts(self.config, self.credentials, date)
    }

    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Execute the export
    ///
    /// Authentication failures and storage failures are returned as errors.
    /// A failed count and dropped pages are recorded in the summary instead,
    /// so the caller can report a partial run.
    pub async fn execute_export(&self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new();
        summary.dry_run = self.config.application.dry_run;

        tracing::info!(
            date = %self.date,
            csv = %self.state.paths().csv.display(),
            dry_run = summary.dry_run,
            "Starting export process"
        );

        let session = self.credentials.authorize().await?;
        let outcome = self.run_with_session(&session, &mut summary).await;

        if let Err(e) = session.close() {
            log_error_with_context!(&e, "Failed to remove trust anchor");
            summary.add_error(ExportError::new(ExportErrorType::Cleanup, e.to_string()));
        }
        outcome?;

        Ok(summary.with_duration(start_time.elapsed()))
    }

    async fn run_with_session(&self, session: &Session, summary: &mut ExportSummary) -> Result<()> {
        let transport: Arc<dyn GraphQlTransport> =
            Arc::new(GraphQlClient::new(self.config.api.graphql_url(), session)?);

        summary.total_count = self.count(transport.as_ref(), summary).await;

        let progress = self.state.load_progress()?;
        summary.prior_rows = progress.map(|p| p.rows);

        let (offsets, mode) = match plan_offsets(
            summary.prior_rows,
            summary.total_count,
            self.config.query.page_size,
        ) {
            ResumePlan::NothingToDo => {
                tracing::info!("No records to export");
                return Ok(());
            }
            ResumePlan::UpToDate { prior_rows, total } => {
                tracing::info!(prior_rows = prior_rows, total = total, "No new data needed, exiting");
                summary.up_to_date = true;
                return Ok(());
            }
            ResumePlan::Fetch { offsets, mode } => (offsets, mode),
        };
        summary.pages_planned = offsets.len();

        let fetcher = Arc::new(PageFetcher::from_config(transport, &self.config));
        let columns = fetcher.flattener().columns().clone();
        let pool = WorkerPool::new(self.config.export.effective_workers());

        let output = pool.run(offsets, fetcher).await?;
        summary.pages_fetched = output.pages.len();
        for dropped in output.dropped {
            summary.add_dropped_page(dropped);
        }

        let rows = concat_pages(output.pages);

        if summary.dry_run {
            tracing::info!(rows = rows.len(), mode = ?mode, "Dry run: skipping CSV write");
            return Ok(());
        }

        if rows.is_empty() && mode == WriteMode::Overwrite {
            tracing::warn!("No rows fetched; nothing written");
            return Ok(());
        }

        let paths = self.state.paths();
        if let Some(parent) = paths.csv.parent() {
            std::fs::create_dir_all(parent)?;
        }
        if let (WriteMode::Append, Some(progress)) = (mode, progress.as_ref()) {
            self.state.prepare_append(progress)?;
        }

        let sink = CsvSink::new(&paths.csv, columns);
        summary.rows_written = sink.write(&rows, mode)?;
        summary.csv_path = Some(paths.csv.clone());

        if self.config.output.archive {
            archive_file(&paths.csv, &paths.archive)?;
            summary.archive_path = Some(paths.archive.clone());
        }

        Ok(())
    }

    /// Record count, or 0 with a recorded error when the count query fails
    async fn count(&self, transport: &dyn GraphQlTransport, summary: &mut ExportSummary) -> u64 {
        let timeout = Duration::from_secs(self.config.api.count_timeout_seconds);
        match count_records(transport, &self.config.query.filter, timeout).await {
            Ok(count) => count,
            Err(e) => {
                log_error_with_context!(&e, "Failed to count records");
                summary.add_error(
                    ExportError::new(ExportErrorType::Count, e.to_string())
                        .with_context(format!("filter={}", self.config.query.filter)),
                );
                0
            }
        }
    }
}
