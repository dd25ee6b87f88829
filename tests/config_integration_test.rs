//! Integration tests for configuration loading and validation
//!
//! Tests that touch environment variables hold ENV_MUTEX.

use vulnex::config::load_config;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("VULNEX_APPLICATION_LOG_LEVEL");
    std::env::remove_var("VULNEX_APPLICATION_DRY_RUN");
    std::env::remove_var("VULNEX_API_PASSWORD");
    std::env::remove_var("VULNEX_QUERY_PAGE_SIZE");
    std::env::remove_var("VULNEX_EXPORT_WORKERS");
    std::env::remove_var("VULNEX_OUTPUT_FILE_PREFIX");
    std::env::remove_var("TEST_VULNEX_PASSWORD");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"
dry_run = true

[api]
base_url = "https://tenant.example.net"
graphql_path = "/graphql/caasm"
login_path = "/api/auth/login"
username = "reportGenerator"
password = "test_pass"
tls_pin_certificate = false
trust_anchor_file = "anchor.pem"
login_timeout_seconds = 10
count_timeout_seconds = 20
data_timeout_seconds = 60

[query]
filter = "status = Active"
page_size = 1000

[export]
workers = 4
max_retries = 5
retry_delay_ms = 250

[output]
directory = "/tmp/vulnex"
file_prefix = "WorkStations_AVR"
archive = false
resume_from_archive = false

[logging]
local_enabled = false
local_path = "/tmp/vulnex/logs"
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);

    assert_eq!(config.api.graphql_url(), "https://tenant.example.net/graphql/caasm");
    assert_eq!(config.api.login_url(), "https://tenant.example.net/api/auth/login");
    assert_eq!(config.api.password.expose_secret(), "test_pass");
    assert!(!config.api.pins_certificate());
    assert_eq!(config.api.trust_anchor_file, "anchor.pem");
    assert_eq!(config.api.data_timeout_seconds, 60);

    assert_eq!(config.query.filter, "status = Active");
    assert_eq!(config.query.page_size, 1000);

    assert_eq!(config.export.effective_workers(), 4);
    assert_eq!(config.export.max_retries, 5);
    assert_eq!(config.export.retry_delay_ms, 250);

    assert_eq!(config.output.resolved_directory().to_str(), Some("/tmp/vulnex"));
    assert!(!config.output.archive);
    assert!(!config.output.resume_from_archive);

    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[api]
base_url = "https://tenant.example.net"
username = "reportGenerator"
password = "pass"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert!(!config.application.dry_run);
    assert!(config.api.pins_certificate());
    assert_eq!(config.api.login_timeout_seconds, 30);
    assert_eq!(config.api.count_timeout_seconds, 30);
    assert_eq!(config.api.data_timeout_seconds, 120);
    assert!(config.query.filter.contains("status = Active"));
    assert_eq!(config.query.page_size, 5000);
    assert_eq!(config.export.workers, 0);
    assert!(config.export.effective_workers() >= 1);
    assert_eq!(config.export.max_retries, 3);
    assert_eq!(config.export.retry_delay_ms, 5000);
    assert_eq!(config.output.file_prefix, "host_vulnerabilities");
    assert!(config.output.archive);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_VULNEX_PASSWORD", "secret_pass");

    let temp_file = write_config(
        r#"
[api]
base_url = "https://tenant.example.net"
username = "reportGenerator"
password = "${TEST_VULNEX_PASSWORD}"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert_eq!(config.api.password.expose_secret(), "secret_pass");

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_an_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[api]
base_url = "https://tenant.example.net"
username = "reportGenerator"
password = "${TEST_VULNEX_PASSWORD}"
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_VULNEX_PASSWORD"));
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("VULNEX_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("VULNEX_QUERY_PAGE_SIZE", "250");
    std::env::set_var("VULNEX_EXPORT_WORKERS", "3");
    std::env::set_var("VULNEX_OUTPUT_FILE_PREFIX", "Servers_AVR");

    let temp_file = write_config(
        r#"
[api]
base_url = "https://tenant.example.net"
username = "reportGenerator"
password = "pass"

[query]
page_size = 5000
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.query.page_size, 250);
    assert_eq!(config.export.workers, 3);
    assert_eq!(config.output.file_prefix, "Servers_AVR");

    cleanup_env_vars();
}

#[test]
fn test_invalid_values_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        ("[api]\nbase_url = \"ftp://tenant\"\nusername = \"u\"\npassword = \"p\"\n", "base_url"),
        (
            "[api]\nbase_url = \"https://tenant\"\nusername = \"u\"\npassword = \"p\"\n[query]\npage_size = 0\n",
            "page_size",
        ),
        (
            "[api]\nbase_url = \"https://tenant\"\nusername = \"u\"\npassword = \"p\"\n[export]\nmax_retries = 0\n",
            "max_retries",
        ),
        (
            "[api]\nbase_url = \"https://tenant\"\nusername = \"u\"\npassword = \"p\"\n[logging]\nlocal_rotation = \"weekly\"\n",
            "local_rotation",
        ),
        (
            "[api]\nbase_url = \"https://tenant\"\nusername = \"u\"\npassword = \"p\"\n[query]\nfilter = 'status = Active\\'\n",
            "query.filter",
        ),
    ];

    for (content, field) in cases {
        let temp_file = write_config(content);
        let err = load_config(temp_file.path()).unwrap_err();
        assert!(
            err.to_string().contains(field),
            "expected error about {field}, got {err}"
        );
    }
}

#[test]
fn test_missing_api_section_is_an_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("[application]\nlog_level = \"info\"\n");
    assert!(load_config(temp_file.path()).is_err());
}
