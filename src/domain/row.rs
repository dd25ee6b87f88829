//! Tabular output model
//!
//! A [`ColumnSet`] is the fixed, ordered output contract. A [`FlatRow`] holds
//! exactly one cell per column of that contract, and a [`Page`] is the ordered
//! batch of rows produced from a single paginated request.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Output columns for the host vulnerability export, in CSV order
pub const HOST_VULNERABILITY_COLUMNS: [&str; 25] = [
    "targets_name",
    "targets_domains",
    "targets_ipAddresses",
    "targets_operatingSystem",
    "targets_dnsName",
    "targets_fqdn",
    "targets_netbiosName",
    "definition_qid",
    "type",
    "definition_name",
    "definition_cves",
    "exportableOutput",
    "definition_exportableSolution",
    "internetFacing",
    "riskRating",
    "ageInDays",
    "complianceStatus",
    "dueDate",
    "firstFound",
    "lastFound",
    "timesFound",
    "lastFixed",
    "disposition",
    "status",
    "primaryConsolidationKey",
];

/// Fixed, ordered list of output column names
///
/// Cloning is cheap; the names are shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ColumnSet {
    names: Arc<[String]>,
    index: Arc<HashMap<String, usize>>,
}

impl ColumnSet {
    /// Build a column set from names, in order
    ///
    /// Duplicate names keep their first position.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(position);
        }

        Self {
            names: names.into(),
            index: Arc::new(index),
        }
    }

    /// The column contract of the host vulnerability CSV
    pub fn host_vulnerability() -> Self {
        Self::new(HOST_VULNERABILITY_COLUMNS)
    }

    /// Column names in order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of a column, if it is part of the contract
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl PartialEq for ColumnSet {
    fn eq(&self, other: &Self) -> bool {
        self.names == other.names
    }
}

/// One output row: a cell per column of the [`ColumnSet`] it was built for
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRow {
    cells: Vec<Value>,
}

impl FlatRow {
    /// A row of `width` null cells
    pub fn empty(width: usize) -> Self {
        Self {
            cells: vec![Value::Null; width],
        }
    }

    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    /// Cell value by column name
    pub fn get(&self, columns: &ColumnSet, name: &str) -> Option<&Value> {
        columns.position(name).and_then(|i| self.cells.get(i))
    }

    /// Overwrite the cell at `position`; out-of-range positions are ignored
    pub(crate) fn set(&mut self, position: usize, value: Value) {
        if let Some(cell) = self.cells.get_mut(position) {
            *cell = value;
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Rows fetched at one offset, in API response order
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Offset the page was requested at
    pub offset: u64,

    /// Flattened rows
    pub rows: Vec<FlatRow>,
}

impl Page {
    pub fn new(offset: u64, rows: Vec<FlatRow>) -> Self {
        Self { offset, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
