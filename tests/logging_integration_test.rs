//! Integration tests for logging functionality

use vulnex::config::LoggingConfig;
use vulnex::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "logs");
    assert_eq!(config.local_rotation, "daily");
}

// The global subscriber can only be installed once per test binary, so the
// file layer and the second-install failure are checked in one test.
#[test]
fn test_file_logging_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    let guard = init_logging("debug", &config).expect("logging should initialize");
    tracing::info!(offset = 0u64, "Page fetched");
    assert!(log_path.exists());

    assert!(init_logging("info", &LoggingConfig::default()).is_err());

    drop(guard);
    let entries: Vec<_> = std::fs::read_dir(&log_path).unwrap().collect();
    assert!(!entries.is_empty());
}
