//! Configuration management for mdwalk.
//!
//! Parses `mdwalk.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [parser]
//! gfm = true
//! footnotes = true
//!
//! [render]
//! max_depth = 256
//! fade_out_trailing_paragraph = false
//!
//! [output]
//! format = "text"
//! ```

use std::path::{Path, PathBuf};

use mdwalk_ast::ParseOptions;
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdwalk.toml";

/// Largest accepted `render.max_depth`.
///
/// Rendering recurses once per nesting level; deeper limits would let
/// pathological input exhaust the main thread's stack.
pub const MAX_RENDER_DEPTH: usize = 1024;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output format.
    pub format: Option<OutputFormat>,
    /// Override maximum nesting depth.
    pub max_depth: Option<usize>,
    /// Override trailing paragraph fade-out.
    pub fade_out_trailing_paragraph: Option<bool>,
    /// Override GitHub Flavored Markdown extensions.
    pub gfm: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markdown parser configuration.
    pub parser: ParserConfig,
    /// Rendering configuration.
    pub render: RenderConfig,
    /// Output configuration.
    pub output: OutputConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Markdown parser configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Tables, strikethrough and task lists.
    pub gfm: bool,
    /// Footnote references and definitions.
    pub footnotes: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            footnotes: true,
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Deepest node nesting rendered before subtrees are skipped.
    pub max_depth: usize,
    /// Mark the last paragraph of a document as fading out.
    pub fade_out_trailing_paragraph: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            fade_out_trailing_paragraph: false,
        }
    }
}

/// Output configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// What the `render` command prints.
    pub format: OutputFormat,
}

/// What the `render` command prints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain-text preview of the layout.
    #[default]
    Text,
    /// Layout tree as JSON.
    Json,
    /// Syntax tree outline.
    Ast,
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
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdwalk.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading and take precedence over config
    /// file values. The result is validated once more afterwards.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or a value is out of range.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Search for a config file in `start` and its parents.
    #[must_use]
    pub fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns error if the file can't be read, parsed or validated.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max_depth = self.render.max_depth;
        if max_depth == 0 {
            return Err(ConfigError::Validation(
                "render.max_depth must be greater than 0".to_owned(),
            ));
        }
        if max_depth > MAX_RENDER_DEPTH {
            return Err(ConfigError::Validation(format!(
                "render.max_depth cannot exceed {MAX_RENDER_DEPTH}"
            )));
        }
        Ok(())
    }

    /// Parser options derived from the `[parser]` and `[render]` sections.
    #[must_use]
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            gfm: self.parser.gfm,
            footnotes: self.parser.footnotes,
            fade_out_trailing_paragraph: self.render.fade_out_trailing_paragraph,
        }
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(format) = settings.format {
            self.output.format = format;
        }
        if let Some(max_depth) = settings.max_depth {
            self.render.max_depth = max_depth;
        }
        if let Some(fade_out) = settings.fade_out_trailing_paragraph {
            self.render.fade_out_trailing_paragraph = fade_out;
        }
        if let Some(gfm) = settings.gfm {
            self.parser.gfm = gfm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.parser.gfm);
        assert!(config.parser.footnotes);
        assert_eq!(config.render.max_depth, 256);
        assert!(!config.render.fade_out_trailing_paragraph);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.render.max_depth, 256);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[parser]
gfm = false
footnotes = false

[render]
max_depth = 32
fade_out_trailing_paragraph = true

[output]
format = "json"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.parser.gfm);
        assert!(!config.parser.footnotes);
        assert_eq!(config.render.max_depth, 32);
        assert!(config.render.fade_out_trailing_paragraph);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let toml = r"
[render]
fade_out_trailing_paragraph = true
";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.render.max_depth, 256);
        assert!(config.parser.gfm);
    }

    #[test]
    fn test_unknown_format_is_parse_error() {
        let result: Result<Config, _> = toml::from_str("[output]\nformat = \"html\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_options() {
        let toml = r"
[parser]
footnotes = false

[render]
fade_out_trailing_paragraph = true
";
        let config: Config = toml::from_str(toml).unwrap();
        let options = config.parse_options();
        assert!(options.gfm);
        assert!(!options.footnotes);
        assert!(options.fade_out_trailing_paragraph);
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let mut config = Config::default();
        config.render.max_depth = 0;
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("max_depth"));
    }

    #[test]
    fn test_validate_rejects_excessive_depth() {
        let mut config = Config::default();
        config.render.max_depth = MAX_RENDER_DEPTH;
        config.validate().unwrap();

        config.render.max_depth = 10_000_000;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("cannot exceed"));
    }

    #[test]
    fn test_cli_depth_override_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        let overrides = CliSettings {
            max_depth: Some(MAX_RENDER_DEPTH + 1),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        let overrides = CliSettings {
            format: Some(OutputFormat::Ast),
            max_depth: Some(8),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.output.format, OutputFormat::Ast);
        assert_eq!(config.render.max_depth, 8);
        assert!(config.parser.gfm); // Unchanged
        assert!(!config.render.fade_out_trailing_paragraph); // Unchanged
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[render]\nmax_depth = 10\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.render.max_depth, 10);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_from_file_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[render]\nmax_depth = 0\n").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_cli_settings_are_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        let overrides = CliSettings {
            max_depth: Some(0),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_discover_from_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&config_path, "").unwrap();
        let nested = dir.path().join("docs").join("guides");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(Config::discover_from(&nested), Some(config_path));
    }

    #[test]
    fn test_discover_ignores_directory_named_like_config() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join(CONFIG_FILENAME);
        std::fs::create_dir_all(&nested).unwrap();

        assert_ne!(
            Config::discover_from(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }
}
