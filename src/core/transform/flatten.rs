//! Record flattening
//!
//! Converts one nested vulnerability record into one or more [`FlatRow`]s:
//!
//! - nested objects become `parent_child` columns (`definition.qid` →
//!   `definition_qid`)
//! - each element of the exploded list (`targets`) yields its own row, with
//!   its fields prefixed `targets_`; an empty or missing list yields a single
//!   row with those columns null
//! - the identifier list (`definition_cves`) is reduced to its `uid` strings
//! - newlines and tabs in free-text columns are replaced by spaces
//! - columns outside the [`ColumnSet`] are dropped, missing ones stay null

use crate::domain::{ColumnSet, FlatRow, GraphQlError, Result};
use serde_json::{Map, Value};

/// Field rules for flattening one record type
#[derive(Debug, Clone)]
pub struct FlattenSpec {
    /// List field whose elements each produce a row
    pub explode_field: String,

    /// Column holding a list of objects reduced to one key
    pub id_list_column: String,

    /// Key kept from each element of the id list
    pub id_key: String,

    /// Columns whose newlines and tabs are replaced by spaces
    pub free_text_columns: Vec<String>,

    /// Joins parent and child keys
    pub separator: char,
}

impl FlattenSpec {
    /// Rules for `listHostVulnerability` records
    pub fn host_vulnerability() -> Self {
        Self {
            explode_field: "targets".to_string(),
            id_list_column: "definition_cves".to_string(),
            id_key: "uid".to_string(),
            free_text_columns: vec![
                "exportableOutput".to_string(),
                "definition_exportableSolution".to_string(),
                "definition_name".to_string(),
            ],
            separator: '_',
        }
    }
}

/// Flatten one record into rows over `columns`
///
/// # Errors
///
/// Returns [`GraphQlError::InvalidFormat`] when the record is not a JSON object.
///
/// # Examples
///
/// ```
/// use vulnex::core::transform::flatten::{flatten_record, FlattenSpec};
/// use vulnex::domain::ColumnSet;
/// use serde_json::json;
///
/// let columns = ColumnSet::host_vulnerability();
/// let record = json!({
///     "status": "Active",
///     "definition": {"qid": 1, "cves": [{"uid": "CVE-1"}]},
///     "targets": [{"name": "h1"}, {"name": "h2"}]
/// });
///
/// let rows = flatten_record(&record, &FlattenSpec::host_vulnerability(), &columns).unwrap();
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[1].get(&columns, "targets_name"), Some(&json!("h2")));
/// assert_eq!(rows[0].get(&columns, "definition_cves"), Some(&json!(["CVE-1"])));
/// ```
pub fn flatten_record(record: &Value, spec: &FlattenSpec, columns: &ColumnSet) -> Result<Vec<FlatRow>> {
    let object = record.as_object().ok_or_else(|| {
        GraphQlError::InvalidFormat(format!("expected a record object, got {}", type_name(record)))
    })?;

    let mut base = FlatRow::empty(columns.len());
    for (key, value) in object {
        if key != &spec.explode_field {
            write_flattened(&mut base, columns, key, value, spec.separator);
        }
    }

    if let Some(position) = columns.position(&spec.id_list_column) {
        let ids = reduce_id_list(&base.cells()[position], &spec.id_key);
        base.set(position, ids);
    }

    let entries = explode_entries(object.get(&spec.explode_field));
    let mut rows = Vec::with_capacity(entries.len());

    for entry in entries {
        let mut row = base.clone();
        if let Some(fields) = entry {
            for (key, value) in fields {
                let column = format!("{}{}{}", spec.explode_field, spec.separator, key);
                write_flattened(&mut row, columns, &column, value, spec.separator);
            }
        }
        clean_free_text_columns(&mut row, columns, &spec.free_text_columns);
        rows.push(row);
    }

    Ok(rows)
}

/// Flatten every record of a page, preserving order
pub fn flatten_page(records: &[Value], spec: &FlattenSpec, columns: &ColumnSet) -> Result<Vec<FlatRow>> {
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        rows.extend(flatten_record(record, spec, columns)?);
    }
    Ok(rows)
}

/// Replace `\r`, `\n` and `\t` with single spaces
pub fn clean_free_text(text: &str) -> String {
    text.replace(['\r', '\n', '\t'], " ")
}

/// Elements that each produce one row; `None` stands for an all-null entry
fn explode_entries(value: Option<&Value>) -> Vec<Option<&Map<String, Value>>> {
    match value {
        Some(Value::Array(items)) if !items.is_empty() => {
            items.iter().map(Value::as_object).collect()
        }
        Some(Value::Object(fields)) => vec![Some(fields)],
        _ => vec![None],
    }
}

fn write_flattened(row: &mut FlatRow, columns: &ColumnSet, name: &str, value: &Value, separator: char) {
    match value {
        Value::Object(fields) if !fields.is_empty() => {
            for (key, child) in fields {
                let child_name = format!("{name}{separator}{key}");
                write_flattened(row, columns, &child_name, child, separator);
            }
        }
        _ => {
            if let Some(position) = columns.position(name) {
                row.set(position, value.clone());
            }
        }
    }
}

/// `[{uid: a}, {uid: b}]` → `["a", "b"]`; null or missing → `[]`
///
/// Elements without the key are skipped. Bare strings are kept as ids.
fn reduce_id_list(value: &Value, id_key: &str) -> Value {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Value::Array(Vec::new()),
        other => return other.clone(),
    };

    let ids = items
        .iter()
        .filter_map(|item| match item {
            Value::Object(fields) => fields.get(id_key).filter(|id| !id.is_null()).cloned(),
            Value::String(_) => Some(item.clone()),
            _ => None,
        })
        .collect();

    Value::Array(ids)
}

fn clean_free_text_columns(row: &mut FlatRow, columns: &ColumnSet, names: &[String]) {
    for name in names {
        let Some(position) = columns.position(name) else {
            continue;
        };
        if let Some(Value::String(text)) = row.cells().get(position) {
            if text.contains(['\r', '\n', '\t']) {
                let cleaned = clean_free_text(text);
                row.set(position, Value::String(cleaned));
            }
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
