//! Configuration file support
//!
//! Settings come from a TOML file and are overridden by command-line flags:
//!
//! ```toml
//! [border]
//! color = [246, 175, 170]
//! tolerance = 30
//!
//! [output]
//! public_root = "../public"
//! url_prefix = "/img/features"
//! jpeg_quality = 95
//!
//! [fetch]
//! timeout_secs = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::border::{BorderColor, BorderOptions};
use crate::codec::DEFAULT_JPEG_QUALITY;
use crate::fetch::FetchOptions;
use crate::planner::DEFAULT_URL_PREFIX;

/// Config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "md-image-localizer.toml";

/// Directory name under the user config dir
const CONFIG_DIR_NAME: &str = "md-image-localizer";

/// Config error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

// ============================================================
// File config
// ============================================================

/// Output location settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Web root that the URL prefix is relative to. Derived from the
    /// document location when unset.
    pub public_root: Option<PathBuf>,
    /// Public URL prefix for rewritten links
    pub url_prefix: String,
    /// JPEG encoding quality
    pub jpeg_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            public_root: None,
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Settings loaded from a config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub border: BorderOptions,
    pub output: OutputConfig,
    pub fetch: FetchOptions,
}

impl Config {
    /// Load the first config file found in the search paths, or defaults
    pub fn load() -> Result<Self> {
        for path in Self::search_paths() {
            if path.is_file() {
                debug!("Loading config from {}", path.display());
                return Self::load_from_path(&path);
            }
        }
        Ok(Self::default())
    }

    /// Config locations in priority order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join(CONFIG_DIR_NAME).join("config.toml"));
        }
        paths
    }

    /// Load a specific config file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML content
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply command-line overrides (CLI takes precedence)
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> LocalizeConfig {
        let mut border = self.border;
        if let Some(color) = cli.border_color {
            border.color = color;
        }
        if let Some(tolerance) = cli.tolerance {
            border.tolerance = tolerance;
        }

        let mut fetch = self.fetch.clone();
        if let Some(timeout) = cli.timeout_secs {
            fetch.timeout_secs = timeout;
        }

        LocalizeConfig {
            border,
            fetch,
            output_dir: cli.output_dir.clone(),
            public_root: self.output.public_root.clone(),
            url_prefix: self.output.url_prefix.clone(),
            jpeg_quality: self.output.jpeg_quality.clamp(1, 100),
            dry_run: cli.dry_run,
        }
    }
}

// ============================================================
// CLI overrides
// ============================================================

/// Values set explicitly on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dry_run: bool,
    pub output_dir: Option<PathBuf>,
    pub tolerance: Option<u8>,
    pub border_color: Option<BorderColor>,
    pub timeout_secs: Option<u64>,
}

impl CliOverrides {
    /// Create empty overrides
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================
// Effective config
// ============================================================

/// Effective settings for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizeConfig {
    pub border: BorderOptions,
    pub fetch: FetchOptions,
    /// Explicit output directory, bypassing public root resolution
    pub output_dir: Option<PathBuf>,
    pub public_root: Option<PathBuf>,
    pub url_prefix: String,
    pub jpeg_quality: u8,
    pub dry_run: bool,
}

impl Default for LocalizeConfig {
    fn default() -> Self {
        Config::default().merge_with_cli(&CliOverrides::default())
    }
}

impl LocalizeConfig {
    /// Directory that receives `<base>/<section>/<NN>.<ext>` for `document`.
    ///
    /// Without an explicit directory this is `<public root>/<url prefix>`,
    /// where the default public root is the `public` directory beside the
    /// document's third ancestor (`app/content/doc.md` -> `public/`).
    pub fn resolve_output_dir(&self, document: &Path) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }

        let root = self
            .public_root
            .clone()
            .unwrap_or_else(|| Self::default_public_root(document));

        self.url_prefix
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(root, |dir, part| dir.join(part))
    }

    fn default_public_root(document: &Path) -> PathBuf {
        let canonical = document
            .canonicalize()
            .unwrap_or_else(|_| document.to_path_buf());
        let base = canonical
            .ancestors()
            .nth(3)
            .or_else(|| canonical.ancestors().last())
            .unwrap_or_else(|| Path::new(""));
        base.join("public")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.border.tolerance, 30);
        assert_eq!(config.output.url_prefix, "/img/features");
        assert_eq!(config.output.jpeg_quality, 95);
        assert_eq!(config.fetch.timeout_secs, 10);
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml_str(
            r#"
            [border]
            color = [255, 0, 255]
            tolerance = 12

            [output]
            public_root = "/srv/www"
            url_prefix = "/static/img"
            jpeg_quality = 80

            [fetch]
            timeout_secs = 4
            user_agent = "test-agent"
            "#,
        )
        .unwrap();

        assert_eq!(config.border.color, BorderColor::new(255, 0, 255));
        assert_eq!(config.border.tolerance, 12);
        assert_eq!(config.output.public_root, Some(PathBuf::from("/srv/www")));
        assert_eq!(config.output.url_prefix, "/static/img");
        assert_eq!(config.output.jpeg_quality, 80);
        assert_eq!(config.fetch.timeout_secs, 4);
        assert_eq!(config.fetch.user_agent, "test-agent");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::from_toml_str("[border]\ntolerance = 5\n").unwrap();
        assert_eq!(config.border.tolerance, 5);
        assert_eq!(config.border.color, BorderColor::new(246, 175, 170));
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_invalid_config() {
        let result = Config::from_toml_str("[border]\ntolerance = \"high\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_missing_path() {
        let result = Config::load_from_path(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[output]\nurl_prefix = \"/x\"\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.output.url_prefix, "/x");
    }

    #[test]
    fn test_cli_overrides_take_precedence() {
        let config = Config::from_toml_str("[border]\ntolerance = 5\n[fetch]\ntimeout_secs = 2\n").unwrap();
        let overrides = CliOverrides {
            dry_run: true,
            output_dir: Some(PathBuf::from("/out")),
            tolerance: Some(40),
            border_color: Some(BorderColor::new(1, 2, 3)),
            timeout_secs: Some(30),
        };

        let merged = config.merge_with_cli(&overrides);
        assert_eq!(merged.border.tolerance, 40);
        assert_eq!(merged.border.color, BorderColor::new(1, 2, 3));
        assert_eq!(merged.fetch.timeout_secs, 30);
        assert!(merged.dry_run);
        assert_eq!(merged.output_dir, Some(PathBuf::from("/out")));
    }

    #[test]
    fn test_empty_overrides_keep_file_values() {
        let config = Config::from_toml_str("[border]\ntolerance = 5\n").unwrap();
        let merged = config.merge_with_cli(&CliOverrides::new());
        assert_eq!(merged.border.tolerance, 5);
        assert!(!merged.dry_run);
    }

    #[test]
    fn test_resolve_explicit_output_dir() {
        let config = LocalizeConfig {
            output_dir: Some(PathBuf::from("/out")),
            ..Default::default()
        };
        assert_eq!(config.resolve_output_dir(Path::new("doc.md")), PathBuf::from("/out"));
    }

    #[test]
    fn test_resolve_public_root() {
        let config = LocalizeConfig {
            public_root: Some(PathBuf::from("/srv/www")),
            url_prefix: "/img/features/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_output_dir(Path::new("doc.md")),
            PathBuf::from("/srv/www/img/features")
        );
    }

    #[test]
    fn test_resolve_default_layout() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("site/app/content");
        std::fs::create_dir_all(&content).unwrap();
        let doc = content.join("guide.md");
        std::fs::write(&doc, "").unwrap();

        let resolved = LocalizeConfig::default().resolve_output_dir(&doc);
        let expected = dir
            .path()
            .canonicalize()
            .unwrap()
            .join("site/public/img/features");
        assert_eq!(resolved, expected);
    }
}
