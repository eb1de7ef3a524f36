use crate::error::{AppError, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Path helpers for list display and logging.
pub trait PathExt {
    /// File name as UTF-8, lossily converted. Empty for paths without one.
    fn file_name_lossy(&self) -> String;
    /// Whether the path has a non-empty extension.
    fn has_file_extension(&self) -> bool;
}

impl PathExt for Path {
    fn file_name_lossy(&self) -> String {
        self.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn has_file_extension(&self) -> bool {
        self.extension().is_some_and(|ext| !ext.is_empty())
    }
}

/// Lists the regular files directly inside `dir` that have an extension,
/// sorted by file name.
///
/// Entries that cannot be read are skipped; only failing to open `dir`
/// itself is an error.
pub fn scan_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| AppError::DirectoryScan(format!("{}: {}", dir.display(), e)))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                debug!("Skipping unreadable entry in {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|path| path.is_file() && path.has_file_extension())
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
