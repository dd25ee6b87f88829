//! Integration tests for resume planning over real output files

use chrono::NaiveDate;
use vulnex::config::OutputConfig;
use vulnex::core::persist::{archive_file, count_rows, CsvSink, WriteMode};
use vulnex::core::state::{plan_offsets, ProgressSource, ResumePlan, StateManager};
use vulnex::core::transform::{FlattenSpec, RowFlattener};
use vulnex::domain::{ColumnSet, FlatRow};
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

fn output_config(dir: &Path, archive: bool) -> OutputConfig {
    OutputConfig {
        directory: dir.to_string_lossy().into_owned(),
        file_prefix: "WorkStations_AVR".to_string(),
        archive,
        resume_from_archive: true,
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
}

fn rows(columns: &ColumnSet, count: usize) -> Vec<FlatRow> {
    let records: Vec<_> = (0..count)
        .map(|i| json!({"primaryConsolidationKey": format!("k{i}"), "targets": [{"name": format!("ws-{i}")}]}))
        .collect();
    RowFlattener::new(FlattenSpec::host_vulnerability(), columns.clone())
        .flatten_page(&records)
        .unwrap()
}

#[test]
fn test_fresh_day_fetches_everything() {
    let dir = TempDir::new().unwrap();
    let state = StateManager::new(&output_config(dir.path(), true), date());

    let progress = state.load_progress().unwrap();
    assert!(progress.is_none());

    assert_eq!(
        plan_offsets(progress.map(|p| p.rows), 12000, 5000),
        ResumePlan::Fetch {
            offsets: vec![0, 5000, 10000],
            mode: WriteMode::Overwrite
        }
    );
}

#[test]
fn test_resume_from_csv_appends_last_page() {
    let dir = TempDir::new().unwrap();
    let state = StateManager::new(&output_config(dir.path(), false), date());
    let columns = ColumnSet::host_vulnerability();

    let sink = CsvSink::new(&state.paths().csv, columns.clone());
    sink.write(&rows(&columns, 10000), WriteMode::Overwrite).unwrap();

    let progress = state.load_progress().unwrap().unwrap();
    assert_eq!(progress.rows, 10000);
    assert_eq!(progress.source, ProgressSource::Csv);

    let plan = plan_offsets(Some(progress.rows), 12000, 5000);
    assert_eq!(
        plan,
        ResumePlan::Fetch {
            offsets: vec![10000],
            mode: WriteMode::Append
        }
    );
    assert_eq!(plan.page_count(), 1);

    sink.write(&rows(&columns, 2000), WriteMode::Append).unwrap();
    assert_eq!(count_rows(&state.paths().csv).unwrap(), 12000);

    let raw = std::fs::read_to_string(&state.paths().csv).unwrap();
    assert_eq!(raw.matches("\"targets_name\"").count(), 1);
}

#[test]
fn test_resume_from_archive_restores_before_append() {
    let dir = TempDir::new().unwrap();
    let state = StateManager::new(&output_config(dir.path(), true), date());
    let columns = ColumnSet::host_vulnerability();
    let paths = state.paths().clone();

    let sink = CsvSink::new(&paths.csv, columns.clone());
    sink.write(&rows(&columns, 3), WriteMode::Overwrite).unwrap();
    archive_file(&paths.csv, &paths.archive).unwrap();
    assert!(!paths.csv.exists());

    let progress = state.load_progress().unwrap().unwrap();
    assert_eq!(progress.rows, 3);
    assert_eq!(progress.source, ProgressSource::Archive);
    // Counting reads the archive in place
    assert!(!paths.csv.exists());

    state.prepare_append(&progress).unwrap();
    assert!(paths.csv.exists());

    sink.write(&rows(&columns, 2), WriteMode::Append).unwrap();
    archive_file(&paths.csv, &paths.archive).unwrap();

    let progress = state.load_progress().unwrap().unwrap();
    assert_eq!(progress.rows, 5);
}

#[test]
fn test_up_to_date_output_is_left_alone() {
    let dir = TempDir::new().unwrap();
    let state = StateManager::new(&output_config(dir.path(), false), date());
    let columns = ColumnSet::host_vulnerability();

    CsvSink::new(&state.paths().csv, columns.clone())
        .write(&rows(&columns, 5), WriteMode::Overwrite)
        .unwrap();
    let before = std::fs::read(&state.paths().csv).unwrap();

    let progress = state.load_progress().unwrap().unwrap();
    assert_eq!(
        plan_offsets(Some(progress.rows), 5, 2),
        ResumePlan::UpToDate {
            prior_rows: 5,
            total: 5
        }
    );
    assert_eq!(
        plan_offsets(Some(progress.rows), 4, 2),
        ResumePlan::UpToDate {
            prior_rows: 5,
            total: 4
        }
    );
    assert_eq!(std::fs::read(&state.paths().csv).unwrap(), before);
}

#[test]
fn test_other_days_are_independent() {
    let dir = TempDir::new().unwrap();
    let columns = ColumnSet::host_vulnerability();
    let yesterday = StateManager::new(
        &output_config(dir.path(), false),
        NaiveDate::from_ymd_opt(2025, 3, 6).unwrap(),
    );
    CsvSink::new(&yesterday.paths().csv, columns.clone())
        .write(&rows(&columns, 4), WriteMode::Overwrite)
        .unwrap();

    let today = StateManager::new(&output_config(dir.path(), false), date());
    assert!(today.load_progress().unwrap().is_none());
    assert_eq!(yesterday.load_progress().unwrap().unwrap().rows, 4);
}
