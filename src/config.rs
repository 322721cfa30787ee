//! Configuration management.
//!
//! A TOML site-configuration file names the base data directory and the
//! per-dataset subdirectory and file keys, replacing the historical
//! hostname-keyed configuration lookup: the path to the file is always
//! passed explicitly at the entry point. Run-time processing knobs live in
//! [`ProcessingOptions`] with builder-style setters.

use crate::constants::{
    DEFAULT_FILE_EXTENSION, DEFAULT_LOCATION, DEFAULT_OUTPUT_FILE, DEFAULT_SEARCH_DEPTH,
};
use crate::error::{MbsError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Site configuration file contents.
///
/// ```toml
/// [site]
/// dir = "/data/SIZONet"
///
/// [mbs]
/// subdir = "mbs"
/// output = "mbs_data.parquet"
/// freezeup = "freezup_dates.txt"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub mbs: MbsSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSection {
    /// Base directory holding all site datasets.
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MbsSection {
    /// Subdirectory of the base directory holding the raw buoy files.
    pub subdir: PathBuf,

    /// Output file name for the normalized table, relative to the subdir.
    #[serde(default = "default_output")]
    pub output: String,

    /// Freeze-up observation file name, relative to the subdir.
    pub freezeup: Option<String>,
}

fn default_output() -> String {
    DEFAULT_OUTPUT_FILE.to_string()
}

impl SiteConfig {
    /// Load and parse a site configuration file. Failures are fatal
    /// configuration errors.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| MbsError::Configuration {
            message: format!("cannot read config file {}: {e}", path.display()),
        })?;
        toml::from_str(&text).map_err(|e| MbsError::Configuration {
            message: format!("cannot parse config file {}: {e}", path.display()),
        })
    }

    /// Directory holding the raw mass-balance files.
    pub fn mbs_dir(&self) -> PathBuf {
        self.site.dir.join(&self.mbs.subdir)
    }

    /// Output path for the normalized table.
    pub fn output_path(&self) -> PathBuf {
        self.mbs_dir().join(&self.mbs.output)
    }

    /// Path to the freeze-up observation file, if configured.
    pub fn freezeup_path(&self) -> Option<PathBuf> {
        self.mbs.freezeup.as_ref().map(|f| self.mbs_dir().join(f))
    }
}

/// Run-time options for the batch pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingOptions {
    /// Recursion depth for file enumeration (0 = dataset directory only).
    pub search_depth: usize,

    /// Raw file extension, without the dot.
    pub file_extension: String,

    /// Site label attached to extracted profiles.
    pub location: String,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            search_depth: DEFAULT_SEARCH_DEPTH,
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            location: DEFAULT_LOCATION.to_string(),
        }
    }
}

impl ProcessingOptions {
    /// Set the enumeration depth.
    pub fn with_search_depth(mut self, depth: usize) -> Self {
        self.search_depth = depth;
        self
    }

    /// Set the raw file extension.
    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    /// Set the site label.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_site_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("BRW.toml");
        fs::write(
            &path,
            r#"
[site]
dir = "/data/SIZONet"

[mbs]
subdir = "mbs"
freezeup = "freezup_dates.txt"
"#,
        )
        .unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.mbs_dir(), PathBuf::from("/data/SIZONet/mbs"));
        assert_eq!(
            config.output_path(),
            PathBuf::from("/data/SIZONet/mbs").join(DEFAULT_OUTPUT_FILE)
        );
        assert_eq!(
            config.freezeup_path(),
            Some(PathBuf::from("/data/SIZONet/mbs/freezup_dates.txt"))
        );
    }

    #[test]
    fn test_malformed_config_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("BRW.toml");
        fs::write(&path, "[site]\n").unwrap();

        let err = SiteConfig::load(&path).unwrap_err();
        assert!(matches!(err, MbsError::Configuration { .. }));
    }

    #[test]
    fn test_missing_config_is_fatal() {
        let err = SiteConfig::load(Path::new("/no/such/BRW.toml")).unwrap_err();
        assert!(matches!(err, MbsError::Configuration { .. }));
    }
}
