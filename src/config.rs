//! Archive configuration module.
//!
//! Handles loading and validating the `config.toml` that tells a build where
//! everything lives. There is exactly one config file per archive; it is read
//! once at startup and treated as read-only for the rest of the run.
//!
//! ## Configuration Options
//!
//! ```toml
//! site_title = "Dokument-Archiv"   # Shown in the frame of every page
//! templates_dir = "templates"      # Required: the five HTML templates
//! archive_dir = "/srv/archive"     # Required: metadata records + stored files
//! static_dir = "static"            # Required: CSS and other assets
//! output_dir = "public"            # Required: generated site (wiped each build)
//! trigger_file = "semaphore"       # Marker in archive_dir that requests a build
//! metadata_extension = "json"      # Extension of per-document metadata files
//! alias_mode = "symlink"           # "symlink" or "redirect"
//! ```
//!
//! Relative directories are resolved against the directory holding the config
//! file, so an archive checkout can be built from anywhere.
//!
//! Unknown keys are rejected to catch typos early.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// How the `index.html` and `documents` aliases are materialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasMode {
    /// Filesystem symbolic links.
    #[default]
    Symlink,
    /// A meta-refresh page for `index.html` and a copy for `documents`.
    Redirect,
}

/// Archive configuration loaded from `config.toml`.
///
/// The four directories have no defaults: an archive without them cannot be
/// built, so a missing key is a load error rather than a silent guess.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Site-wide page title, substituted into every page frame.
    #[serde(default = "default_site_title")]
    pub site_title: String,
    /// Directory holding the five HTML templates.
    pub templates_dir: PathBuf,
    /// Root of the document archive (metadata records and stored files).
    pub archive_dir: PathBuf,
    /// Static assets copied verbatim into the output directory.
    pub static_dir: PathBuf,
    /// Destination of the generated site. Removed and rebuilt on every run.
    pub output_dir: PathBuf,
    /// Name of the marker file in `archive_dir` that requests a build.
    #[serde(default = "default_trigger_file")]
    pub trigger_file: String,
    /// File extension (without dot) identifying metadata records.
    #[serde(default = "default_metadata_extension")]
    pub metadata_extension: String,
    /// How aliases in the output tree are created.
    #[serde(default)]
    pub alias_mode: AliasMode,
}

fn default_site_title() -> String {
    "Dokument-Archiv".to_string()
}

fn default_trigger_file() -> String {
    "semaphore".to_string()
}

fn default_metadata_extension() -> String {
    "json".to_string()
}

impl ArchiveConfig {
    /// Validate that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site_title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site_title must not be empty".into(),
            ));
        }
        for (key, dir) in [
            ("templates_dir", &self.templates_dir),
            ("archive_dir", &self.archive_dir),
            ("static_dir", &self.static_dir),
            ("output_dir", &self.output_dir),
        ] {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.trigger_file.is_empty() {
            return Err(ConfigError::Validation(
                "trigger_file must not be empty".into(),
            ));
        }
        if self.trigger_file.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "trigger_file must be a plain file name".into(),
            ));
        }
        if self.metadata_extension.is_empty() || self.metadata_extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "metadata_extension must be a non-empty extension without leading dot".into(),
            ));
        }
        Ok(())
    }

    /// Resolve relative directories against `base`.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        for dir in [
            &mut self.templates_dir,
            &mut self.archive_dir,
            &mut self.static_dir,
            &mut self.output_dir,
        ] {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        self
    }

    /// Full path of the trigger marker.
    pub fn trigger_path(&self) -> PathBuf {
        self.archive_dir.join(&self.trigger_file)
    }
}

/// Parse and validate config text without touching the filesystem.
pub fn parse_config(content: &str) -> Result<ArchiveConfig, ConfigError> {
    let config: ArchiveConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from a `config.toml` file.
///
/// The file must exist: there is no useful archive build without one.
/// Relative directories are anchored at the file's parent directory.
pub fn load_config(path: &Path) -> Result<ArchiveConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&content)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(config.resolve_paths(base))
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Document Archive Configuration
# ==============================
# Relative paths are resolved against the directory containing this file.
# Unknown keys will cause an error.

# Title shown in the frame of every generated page.
site_title = "Dokument-Archiv"

# ---------------------------------------------------------------------------
# Directories (all required)
# ---------------------------------------------------------------------------

# The five HTML templates: page_template.html, listpage_template.html,
# simpleitem_template.html, pageitem_template.html, keyword_template.html
templates_dir = "templates"

# Root of the document archive. Scanned recursively for metadata records;
# the generated site links to it as `documents`.
archive_dir = "archive"

# Static assets (stylesheets, icons) copied into the output directory.
static_dir = "static"

# Generated site. WARNING: removed completely at the start of every build.
output_dir = "public"

# ---------------------------------------------------------------------------
# Build trigger
# ---------------------------------------------------------------------------

# A build only runs while this file exists in archive_dir.
# It is deleted after a successful build.
trigger_file = "semaphore"

# ---------------------------------------------------------------------------
# Metadata
# ---------------------------------------------------------------------------

# Extension of per-document metadata files (JSON content).
metadata_extension = "json"

# ---------------------------------------------------------------------------
# Aliases
# ---------------------------------------------------------------------------

# "symlink": index.html and documents are symbolic links.
# "redirect": index.html is a redirect page, documents is a copy.
alias_mode = "symlink"
"##
}
