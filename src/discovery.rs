//! Bounded-depth enumeration of raw observation files.
//!
//! Lists every file with a given extension under a root directory, stopping
//! the descent a fixed number of levels below the root. Used by the batch
//! pipeline to collect one file per site-year.

use crate::error::{MbsError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// List data files under `root` with the given extension (without the dot).
///
/// `depth` bounds the recursion: 0 lists only files directly in `root`,
/// 1 additionally descends into its immediate subdirectories, and so on.
/// Returns a deduplicated, unordered set of paths.
pub fn list_data_files(root: &Path, extension: &str, depth: usize) -> Result<HashSet<PathBuf>> {
    if !root.exists() {
        return Err(MbsError::DatasetNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(MbsError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    // walkdir counts the root itself as depth 0, so files directly in the
    // root sit at depth 1.
    let mut files = HashSet::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(depth + 1) {
        let entry = entry.map_err(|e| MbsError::ProcessingFailed {
            path: root.to_path_buf(),
            reason: format!("directory walk failed: {e}"),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if path.extension().is_some_and(|ext| ext == extension) {
            debug!("Found datafile: {}", path.display());
            files.insert(path);
        }
    }

    info!(
        "Found {} ice mass balance datafile(s) in {}",
        files.len(),
        root.display()
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_depth_zero_lists_only_root() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("2010");
        fs::create_dir(&sub).unwrap();
        touch(&dir.path().join("BRW_mbs_2009.csv"));
        touch(&sub.join("BRW_mbs_2010.csv"));

        let files = list_data_files(dir.path(), "csv", 0).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files.contains(&dir.path().join("BRW_mbs_2009.csv")));
    }

    #[test]
    fn test_depth_one_descends_one_level() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("2010");
        let subsub = sub.join("raw");
        fs::create_dir_all(&subsub).unwrap();
        touch(&sub.join("BRW_mbs_2010.csv"));
        touch(&subsub.join("BRW_mbs_2011.csv"));

        let files = list_data_files(dir.path(), "csv", 1).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files.contains(&sub.join("BRW_mbs_2010.csv")));
    }

    #[test]
    fn test_extension_filter() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("BRW_mbs_2009.csv"));
        touch(&dir.path().join("notes_2009.txt"));

        let files = list_data_files(dir.path(), "csv", 0).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_non_directory_root_fails() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("BRW_mbs_2009.csv");
        touch(&file);

        let err = list_data_files(&file, "csv", 0).unwrap_err();
        assert!(matches!(err, MbsError::NotADirectory { .. }));
    }

    #[test]
    fn test_missing_root_fails() {
        let err = list_data_files(Path::new("/no/such/dir"), "csv", 0).unwrap_err();
        assert!(matches!(err, MbsError::DatasetNotFound { .. }));
    }
}
