//! Configuration management for FigureMark.
//!
//! Parses `figuremark.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [figuremark]
//! enabled = false
//! extensions = ["md", "markdown"]
//! defaults = ":link-caption=all"
//!
//! [docs]
//! source_dir = "docs"
//! output_dir = "build"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `figuremark.defaults`
//! - `docs.source_dir`
//! - `docs.output_dir`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override build output directory.
    pub output_dir: Option<PathBuf>,
    /// Override the site-wide enabled flag.
    pub enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "figuremark.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Conversion settings.
    pub figuremark: FigureMarkConfig,
    /// Documentation configuration (paths are relative strings from TOML).
    #[serde(default)]
    docs: DocsConfigRaw,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Conversion settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FigureMarkConfig {
    /// Whether documents without a `figuremark` front matter flag are converted.
    pub enabled: bool,
    /// File extensions treated as Markdown, without the leading dot.
    pub extensions: Vec<String>,
    /// Attribute list seeding the global state of every document.
    pub defaults: Option<String>,
}

impl Default for FigureMarkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            extensions: vec!["md".to_owned(), "markdown".to_owned()],
            defaults: None,
        }
    }
}

impl FigureMarkConfig {
    /// Check whether `path` has one of the configured Markdown extensions.
    ///
    /// Comparison ignores ASCII case.
    #[must_use]
    pub fn is_markdown(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(ext))
            })
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Source directory for Markdown files.
    pub source_dir: PathBuf,
    /// Directory the converted tree is written to.
    pub output_dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`docs.source_dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_ROOT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load the configuration and apply command line overrides.
    ///
    /// An explicit `config_path` must exist. Without one, the nearest
    /// `figuremark.toml` is used, falling back to defaults rooted at the
    /// working directory. Overrides in `cli_settings` win over file values and
    /// the result is validated again.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails, or
    /// the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(enabled) = settings.enabled {
            self.figuremark.enabled = enabled;
        }
    }

    /// Find `figuremark.toml` in the working directory or the nearest parent.
    fn discover_config() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        cwd.ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    /// Defaults rooted at the working directory, used when no file is found.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Defaults with `docs/` and `build/` under `base`.
    fn default_with_base(base: &Path) -> Self {
        Self {
            figuremark: FigureMarkConfig::default(),
            docs: DocsConfigRaw::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                output_dir: base.join("build"),
            },
            config_path: None,
        }
    }

    /// Parse, expand, resolve and validate a config file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(&std::fs::read_to_string(path)?)?;

        // Paths may reference variables, so expand first
        config.expand_env_vars()?;
        config.resolve_paths(path.parent().unwrap_or(Path::new(".")));
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after applying CLI
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_figuremark()?;
        self.validate_docs()?;
        Ok(())
    }

    fn validate_figuremark(&self) -> Result<(), ConfigError> {
        if self.figuremark.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "figuremark.extensions cannot be empty".to_owned(),
            ));
        }
        for ext in &self.figuremark.extensions {
            require_non_empty(ext, "figuremark.extensions entry")?;
            if ext.starts_with('.') {
                return Err(ConfigError::Validation(format!(
                    "figuremark.extensions entry \"{ext}\" must not start with a dot"
                )));
            }
        }
        Ok(())
    }

    fn validate_docs(&self) -> Result<(), ConfigError> {
        let docs = &self.docs_resolved;
        if docs.source_dir == docs.output_dir {
            return Err(ConfigError::Validation(format!(
                "docs.output_dir cannot be the same as docs.source_dir ({})",
                docs.source_dir.display()
            )));
        }
        Ok(())
    }

    /// Expand `${VAR}` references in string values.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref defaults) = self.figuremark.defaults {
            self.figuremark.defaults = Some(expand::expand_env(defaults, "figuremark.defaults")?);
        }
        if let Some(ref dir) = self.docs.source_dir {
            self.docs.source_dir = Some(expand::expand_env(dir, "docs.source_dir")?);
        }
        if let Some(ref dir) = self.docs.output_dir {
            self.docs.output_dir = Some(expand::expand_env(dir, "docs.output_dir")?);
        }
        Ok(())
    }

    /// Resolve docs paths against the directory holding the config file.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            output_dir: resolve(self.docs.output_dir.as_deref(), "build"),
        };
    }
}
