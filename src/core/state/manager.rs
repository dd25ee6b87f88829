//! Output state for the current day
//!
//! Today's CSV and archive are the only record of progress. The
//! [`StateManager`] locates them, reports how many rows they already hold,
//! and restores the CSV from the archive when a run is about to append.

use crate::config::OutputConfig;
use crate::core::persist::{count_archived_rows, count_rows, restore_from_archive};
use crate::domain::Result;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Date-stamped output file locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// `<dir>/<prefix>_<YYYY-MM-DD>.csv`
    pub csv: PathBuf,

    /// `<dir>/<prefix>_<YYYY-MM-DD>.zip`
    pub archive: PathBuf,
}

impl OutputPaths {
    pub fn new(directory: &Path, prefix: &str, date: NaiveDate) -> Self {
        let stem = format!("{}_{}", prefix, date.format("%Y-%m-%d"));
        Self {
            csv: directory.join(format!("{stem}.csv")),
            archive: directory.join(format!("{stem}.zip")),
        }
    }

    /// File name of the CSV, also the entry name inside the archive
    pub fn csv_file_name(&self) -> String {
        self.csv
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Where existing rows for today were found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressSource {
    Csv,
    Archive,
}

/// Rows already exported today
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub rows: u64,
    pub source: ProgressSource,
}

/// Tracks today's output files
#[derive(Debug, Clone)]
pub struct StateManager {
    paths: OutputPaths,
    use_archive: bool,
}

impl StateManager {
    /// State for `date` under the configured output directory
    pub fn new(config: &OutputConfig, date: NaiveDate) -> Self {
        Self {
            paths: OutputPaths::new(&config.resolved_directory(), &config.file_prefix, date),
            use_archive: config.resume_from_archive,
        }
    }

    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }

    /// Rows already present, or `None` when nothing exists yet
    ///
    /// A CSV on disk wins over the archive. The archive is read in place.
    pub fn load_progress(&self) -> Result<Option<Progress>> {
        if self.paths.csv.exists() {
            let rows = count_rows(&self.paths.csv)?;
            tracing::info!(csv = %self.paths.csv.display(), rows = rows, "Found existing CSV");
            return Ok(Some(Progress {
                rows,
                source: ProgressSource::Csv,
            }));
        }

        if self.use_archive && self.paths.archive.exists() {
            let rows = count_archived_rows(&self.paths.archive, &self.paths.csv_file_name())?;
            tracing::info!(
                archive = %self.paths.archive.display(),
                rows = rows,
                "Found existing archive"
            );
            return Ok(Some(Progress {
                rows,
                source: ProgressSource::Archive,
            }));
        }

        Ok(None)
    }

    /// Make sure the CSV is on disk before appending to it
    pub fn prepare_append(&self, progress: &Progress) -> Result<()> {
        if progress.source == ProgressSource::Archive && !self.paths.csv.exists() {
            restore_from_archive(&self.paths.archive, &self.paths.csv)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persist::archive_file;
    use std::fs;
    use tempfile::TempDir;

    fn output_config(dir: &Path) -> OutputConfig {
        OutputConfig {
            directory: dir.to_string_lossy().into_owned(),
            file_prefix: "WorkStations_AVR".to_string(),
            archive: true,
            resume_from_archive: true,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
    }

    #[test]
    fn test_output_paths() {
        let paths = OutputPaths::new(Path::new("/data"), "WorkStations_AVR", date());
        assert_eq!(paths.csv, PathBuf::from("/data/WorkStations_AVR_2025-03-07.csv"));
        assert_eq!(paths.archive, PathBuf::from("/data/WorkStations_AVR_2025-03-07.zip"));
        assert_eq!(paths.csv_file_name(), "WorkStations_AVR_2025-03-07.csv");
    }

    #[test]
    fn test_no_progress_when_nothing_exists() {
        let dir = TempDir::new().unwrap();
        let state = StateManager::new(&output_config(dir.path()), date());
        assert_eq!(state.load_progress().unwrap(), None);
    }

    #[test]
    fn test_progress_from_csv() {
        let dir = TempDir::new().unwrap();
        let state = StateManager::new(&output_config(dir.path()), date());
        fs::write(&state.paths().csv, "\"h\"\n\"1\"\n\"2\"\n").unwrap();

        let progress = state.load_progress().unwrap().unwrap();
        assert_eq!(progress.rows, 2);
        assert_eq!(progress.source, ProgressSource::Csv);
    }

    #[test]
    fn test_progress_from_archive_and_restore() {
        let dir = TempDir::new().unwrap();
        let state = StateManager::new(&output_config(dir.path()), date());
        fs::write(&state.paths().csv, "\"h\"\n\"1\"\n").unwrap();
        archive_file(&state.paths().csv, &state.paths().archive).unwrap();

        let progress = state.load_progress().unwrap().unwrap();
        assert_eq!(progress.rows, 1);
        assert_eq!(progress.source, ProgressSource::Archive);
        assert!(!state.paths().csv.exists());

        state.prepare_append(&progress).unwrap();
        assert!(state.paths().csv.exists());
    }

    #[test]
    fn test_archive_ignored_when_disabled() {
        let dir = TempDir::new().unwrap();
        let mut config = output_config(dir.path());
        config.resume_from_archive = false;
        let state = StateManager::new(&config, date());

        fs::write(&state.paths().csv, "\"h\"\n\"1\"\n").unwrap();
        archive_file(&state.paths().csv, &state.paths().archive).unwrap();

        assert_eq!(state.load_progress().unwrap(), None);
    }
}
