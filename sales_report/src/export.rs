//! ZIP bundling of rendered artifacts

use crate::error::{ReportError, Result};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

fn export_error(path: &Path, err: impl std::fmt::Display) -> ReportError {
    ReportError::Export(format!("{}: {}", path.display(), err))
}

/// Bundle `artifacts` into a ZIP archive at `archive_path`.
///
/// Each artifact is stored under its file name. Every artifact must exist
/// and file names must be unique before the archive is created. A partly
/// written archive is removed on failure; the artifacts themselves never are.
pub fn bundle<P: AsRef<Path>>(artifacts: &[PathBuf], archive_path: P) -> Result<PathBuf> {
    let archive_path = archive_path.as_ref();

    let mut entries = Vec::with_capacity(artifacts.len());
    let mut seen = HashSet::new();
    for artifact in artifacts {
        if !artifact.is_file() {
            return Err(export_error(artifact, "artifact does not exist"));
        }
        let name = artifact
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| export_error(artifact, "artifact has no usable file name"))?;
        if !seen.insert(name) {
            return Err(export_error(
                artifact,
                format!("duplicate entry name '{}'", name),
            ));
        }
        entries.push((artifact, name));
    }

    if let Some(parent) = archive_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| export_error(parent, e))?;
        }
    }

    let file = File::create(archive_path).map_err(|e| export_error(archive_path, e))?;
    if let Err(err) = write_entries(file, &entries) {
        if let Err(remove_err) = fs::remove_file(archive_path) {
            log::warn!(
                "Could not remove partial archive {}: {}",
                archive_path.display(),
                remove_err
            );
        }
        return Err(err);
    }

    log::info!(
        "Exported {} artifacts to {}",
        artifacts.len(),
        archive_path.display()
    );
    Ok(archive_path.to_path_buf())
}

fn write_entries(file: File, entries: &[(&PathBuf, &str)]) -> Result<()> {
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (artifact, name) in entries {
        zip.start_file(*name, options)?;
        let mut source = File::open(artifact).map_err(|e| export_error(artifact, e))?;
        io::copy(&mut source, &mut zip).map_err(|e| export_error(artifact, e))?;
    }
    zip.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Read;
    use tempfile::tempdir;
    use zip::ZipArchive;

    #[test]
    fn test_bundle_stores_files_by_name() {
        let dir = tempdir().unwrap();
        let trend = dir.path().join("trend.csv");
        let region = dir.path().join("region.csv");
        fs::write(&trend, "Date,TotalPrice\n").unwrap();
        fs::write(&region, "Region,TotalPrice\nNorth,1\n").unwrap();

        let target = dir.path().join("out").join("dashboard.zip");
        let archive = bundle(&[trend, region], target).unwrap();

        let mut zip = ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        assert_eq!(zip.len(), 2);
        let mut content = String::new();
        zip.by_name("region.csv")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "Region,TotalPrice\nNorth,1\n");
    }

    #[test]
    fn test_missing_artifact_is_export_error() {
        let dir = tempdir().unwrap();
        let present = dir.path().join("trend.csv");
        fs::write(&present, "x").unwrap();
        let archive = dir.path().join("dashboard.zip");

        let err = bundle(&[present.clone(), dir.path().join("gone.csv")], &archive).unwrap_err();
        assert!(matches!(err, ReportError::Export(_)));
        assert!(present.exists());
        assert!(!archive.exists());
    }

    #[test]
    fn test_duplicate_entry_names_are_rejected() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        let first = dir.path().join("a").join("trend.csv");
        let second = dir.path().join("b").join("trend.csv");
        fs::write(&first, "x").unwrap();
        fs::write(&second, "y").unwrap();
        let archive = dir.path().join("dashboard.zip");

        let err = bundle(&[first.clone(), second.clone()], &archive).unwrap_err();
        assert!(matches!(err, ReportError::Export(_)));
        assert!(err.to_string().contains("duplicate entry name 'trend.csv'"));
        assert!(!archive.exists());
        assert!(first.exists() && second.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_write_removes_partial_archive() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let readable = dir.path().join("trend.csv");
        let unreadable = dir.path().join("region.csv");
        fs::write(&readable, "x").unwrap();
        fs::write(&unreadable, "y").unwrap();
        fs::set_permissions(&unreadable, fs::Permissions::from_mode(0o000)).unwrap();
        if File::open(&unreadable).is_ok() {
            // running as root, permissions are not enforced
            return;
        }
        let archive = dir.path().join("dashboard.zip");

        let err = bundle(&[readable.clone(), unreadable], &archive).unwrap_err();
        assert!(matches!(err, ReportError::Export(_)));
        assert!(!archive.exists());
        assert!(readable.exists());
    }
}
