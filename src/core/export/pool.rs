//! Bounded worker pool over a shared offset queue

use super::fetcher::{PageFetcher, PageOutcome};
use super::summary::DroppedPage;
use crate::domain::{Page, Result, VulnexError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Everything the pool produced, in no particular order
#[derive(Debug, Default)]
pub struct PoolOutput {
    pub pages: Vec<Page>,
    pub dropped: Vec<DroppedPage>,
}

impl PoolOutput {
    pub fn dropped_offsets(&self) -> Vec<u64> {
        let mut offsets: Vec<u64> = self.dropped.iter().map(|d| d.offset).collect();
        offsets.sort_unstable();
        offsets
    }
}

/// Runs at most `workers` page fetches at a time
///
/// Workers pull offsets from a FIFO queue until it is empty; each offset is
/// taken by exactly one worker. Outcomes are sent to a single collector, so
/// a dropped page never stops the other workers.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Fetch every offset and gather the outcomes
    ///
    /// # Errors
    ///
    /// Only a panicked worker is an error; failed pages come back in
    /// [`PoolOutput::dropped`].
    pub async fn run(&self, offsets: Vec<u64>, fetcher: Arc<PageFetcher>) -> Result<PoolOutput> {
        let total = offsets.len();
        if total == 0 {
            return Ok(PoolOutput::default());
        }

        let worker_count = self.workers.min(total);
        let queue = Arc::new(Mutex::new(VecDeque::from(offsets)));
        let (tx, mut rx) = mpsc::channel::<PageOutcome>(worker_count * 2);

        tracing::info!(workers = worker_count, pages = total, "Starting page workers");

        let mut join_set = JoinSet::new();
        for worker in 0..worker_count {
            let queue = Arc::clone(&queue);
            let fetcher = Arc::clone(&fetcher);
            let tx = tx.clone();

            join_set.spawn(async move {
                loop {
                    let next = queue
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .pop_front();
                    let Some(offset) = next else {
                        break;
                    };

                    tracing::debug!(worker = worker, offset = offset, "Processing page");
                    let outcome = fetcher.fetch(offset).await;
                    if tx.send(outcome).await.is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        let mut output = PoolOutput::default();
        while let Some(outcome) = rx.recv().await {
            match outcome {
                PageOutcome::Fetched(page) => output.pages.push(page),
                PageOutcome::Dropped(dropped) => output.dropped.push(dropped),
            }
            tracing::debug!(
                completed = output.pages.len() + output.dropped.len(),
                total = total,
                "Page completed"
            );
        }

        while let Some(joined) = join_set.join_next().await {
            joined.map_err(|e| VulnexError::Export(format!("Page worker failed: {e}")))?;
        }

        Ok(output)
    }
}
