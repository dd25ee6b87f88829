//! Resume planning
//!
//! The number of rows already in today's output is treated as the offset
//! to resume from. A run either has nothing to do, is already up to date,
//! or fetches every page from that offset up to the current count.
//!
//! Rows and records are not the same unit: a record with several targets
//! writes several rows. Offsets computed from rows can therefore skip
//! records when targets were exploded.

use crate::core::persist::WriteMode;

/// What a run has to fetch and how the result reaches the CSV
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumePlan {
    /// The API reports no matching records
    NothingToDo,

    /// The output already holds at least as many rows as the API reports
    UpToDate { prior_rows: u64, total: u64 },

    /// Fetch these offsets, in ascending order
    Fetch { offsets: Vec<u64>, mode: WriteMode },
}

impl ResumePlan {
    pub fn page_count(&self) -> usize {
        match self {
            ResumePlan::Fetch { offsets, .. } => offsets.len(),
            _ => 0,
        }
    }
}

/// Decide which offsets to fetch
///
/// `prior_rows` is `None` when no output exists yet for today. Offsets run
/// from `prior_rows` (or 0) up to but excluding `total`, stepping by
/// `page_size`; a `page_size` of 0 is treated as 1.
///
/// # Examples
///
/// ```
/// use vulnex::core::persist::WriteMode;
/// use vulnex::core::state::{plan_offsets, ResumePlan};
///
/// assert_eq!(
///     plan_offsets(Some(10000), 12000, 5000),
///     ResumePlan::Fetch { offsets: vec![10000], mode: WriteMode::Append }
/// );
/// assert_eq!(
///     plan_offsets(None, 12000, 5000),
///     ResumePlan::Fetch { offsets: vec![0, 5000, 10000], mode: WriteMode::Overwrite }
/// );
/// ```
pub fn plan_offsets(prior_rows: Option<u64>, total: u64, page_size: u64) -> ResumePlan {
    if total == 0 {
        return ResumePlan::NothingToDo;
    }

    let (start, mode) = match prior_rows {
        Some(rows) if rows >= total => {
            return ResumePlan::UpToDate {
                prior_rows: rows,
                total,
            }
        }
        Some(rows) => (rows, WriteMode::Append),
        None => (0, WriteMode::Overwrite),
    };

    let step = page_size.max(1);
    let offsets = (start..total).step_by(step as usize).collect();
    ResumePlan::Fetch { offsets, mode }
}
