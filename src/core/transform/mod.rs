//! Data transformation logic
//!
//! Turns nested GraphQL records into fixed-width CSV rows. See
//! [`flatten`] for the rules.

pub mod flatten;

pub use flatten::{clean_free_text, flatten_page, flatten_record, FlattenSpec};

use crate::domain::{ColumnSet, FlatRow, Result};
use serde_json::Value;

/// Flattening rules bound to an output column set
///
/// Cheap to clone; shared by every page worker.
#[derive(Debug, Clone)]
pub struct RowFlattener {
    spec: FlattenSpec,
    columns: ColumnSet,
}

impl RowFlattener {
    pub fn new(spec: FlattenSpec, columns: ColumnSet) -> Self {
        Self { spec, columns }
    }

    /// Host vulnerability rules over the 25-column contract
    pub fn host_vulnerability() -> Self {
        Self::new(FlattenSpec::host_vulnerability(), ColumnSet::host_vulnerability())
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn flatten_record(&self, record: &Value) -> Result<Vec<FlatRow>> {
        flatten_record(record, &self.spec, &self.columns)
    }

    pub fn flatten_page(&self, records: &[Value]) -> Result<Vec<FlatRow>> {
        flatten_page(records, &self.spec, &self.columns)
    }
}
