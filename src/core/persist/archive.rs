//! Zip archiving of the finished CSV
//!
//! The archive holds a single deflated entry named after the CSV file. Once
//! it is written the CSV is deleted; a later run on the same day can
//! restore it from the archive and append to it.

use super::csv::count_rows_in;
use crate::domain::context::ResultExt;
use crate::domain::{Result, VulnexError};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Compress `source` into `archive` and delete `source`
///
/// An existing archive is replaced.
pub fn archive_file(source: &Path, archive: &Path) -> Result<()> {
    let entry_name = entry_name(source)?;
    let mut input = BufReader::new(
        File::open(source).with_context(|| format!("Failed to open {}", source.display()))?,
    );

    let output = File::create(archive)
        .with_context(|| format!("Failed to create archive {}", archive.display()))?;
    let mut zip_writer = ZipWriter::new(BufWriter::new(output));
    let zip_options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .compression_level(Some(6))
        .large_file(true);

    zip_writer.start_file(entry_name, zip_options)?;
    io::copy(&mut input, &mut zip_writer)
        .with_context(|| format!("Failed to compress {}", source.display()))?;
    zip_writer.finish()?.flush()?;
    drop(input);

    fs::remove_file(source)
        .with_context(|| format!("Failed to remove {} after archiving", source.display()))?;

    tracing::info!(
        source = %source.display(),
        archive = %archive.display(),
        "File compressed and original deleted"
    );
    Ok(())
}

/// Extract the entry for `csv` from `archive` back to `csv`
pub fn restore_from_archive(archive: &Path, csv: &Path) -> Result<()> {
    let entry_name = entry_name(csv)?;
    let mut zip_archive = ZipArchive::new(BufReader::new(File::open(archive)?))?;
    let mut entry = zip_archive.by_name(entry_name).map_err(|e| {
        VulnexError::Archive(format!(
            "{} has no entry {entry_name}: {e}",
            archive.display()
        ))
    })?;

    let mut output = BufWriter::new(File::create(csv)?);
    io::copy(&mut entry, &mut output)
        .with_context(|| format!("Failed to extract {entry_name}"))?;
    output.flush()?;

    tracing::info!(
        archive = %archive.display(),
        csv = %csv.display(),
        "Restored CSV from archive"
    );
    Ok(())
}

/// Data rows of the CSV entry inside `archive`, read without extracting
pub fn count_archived_rows(archive: &Path, csv_name: &str) -> Result<u64> {
    let mut zip_archive = ZipArchive::new(BufReader::new(File::open(archive)?))?;
    let entry = zip_archive.by_name(csv_name)?;
    count_rows_in(entry).with_context(|| format!("Failed to read {csv_name} in {}", archive.display()))
}

fn entry_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| VulnexError::Archive(format!("Invalid file name: {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CSV: &str = "\"a\",\"b\"\n\"1\",\"2\"\n\"3\",\"4\"\n";

    #[test]
    fn test_archive_deletes_source_and_restores() {
        let dir = TempDir::new().unwrap();
        let csv = dir.path().join("report_2025-01-02.csv");
        let zip = dir.path().join("report_2025-01-02.zip");
        fs::write(&csv, CSV).unwrap();

        archive_file(&csv, &zip).unwrap();
        assert!(!csv.exists());
        assert!(zip.exists());
        assert_eq!(count_archived_rows(&zip, "report_2025-01-02.csv").unwrap(), 2);

        restore_from_archive(&zip, &csv).unwrap();
        assert_eq!(fs::read_to_string(&csv).unwrap(), CSV);
    }

    #[test]
    fn test_archive_replaces_existing_archive() {
        let dir = TempDir::new().unwrap();
        let csv = dir.path().join("r.csv");
        let zip = dir.path().join("r.zip");

        fs::write(&csv, CSV).unwrap();
        archive_file(&csv, &zip).unwrap();

        fs::write(&csv, "\"a\",\"b\"\n").unwrap();
        archive_file(&csv, &zip).unwrap();

        assert_eq!(count_archived_rows(&zip, "r.csv").unwrap(), 0);
    }

    #[test]
    fn test_restore_missing_entry() {
        let dir = TempDir::new().unwrap();
        let csv = dir.path().join("r.csv");
        let zip = dir.path().join("r.zip");
        fs::write(&csv, CSV).unwrap();
        archive_file(&csv, &zip).unwrap();

        let other = dir.path().join("other.csv");
        let err = restore_from_archive(&zip, &other).unwrap_err();
        assert!(matches!(err, VulnexError::Archive(_)));
    }

    #[test]
    fn test_archive_missing_source() {
        let dir = TempDir::new().unwrap();
        let zip = dir.path().join("nope.zip");
        let result = archive_file(&dir.path().join("nope.csv"), &zip);
        assert!(result.is_err());
        assert!(!zip.exists());
    }
}
