//! Test harness helpers.

use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};
use tracing_subscriber::EnvFilter;

/// Install a test-friendly tracing subscriber.
///
/// Honours `RUST_LOG` and writes through the test harness so output is
/// captured per test. Safe to call from every test; only the first call
/// installs anything.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Create a temporary directory for testing.
///
/// The directory is removed when the returned `TempDir` is dropped.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
pub fn test_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Create a temporary `.toml` file with the given content.
///
/// # Panics
///
/// Panics if the file cannot be created or written.
#[must_use]
pub fn test_toml_file(content: &str) -> NamedTempFile {
    use std::io::Write;

    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

/// Write a file into a temporary directory and return its path.
///
/// # Panics
///
/// Panics if the file cannot be written.
#[must_use]
pub fn test_file_in_dir(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}
