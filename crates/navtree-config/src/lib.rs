//! Configuration management for navtree.
//!
//! Parses `navtree.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Programmatic settings can be applied during load via [`Overrides`].
//!
//! ```toml
//! [source]
//! dir = "html"               # relative to the config file
//! navtree = "navtreedata.js"
//! menu = "menudata.js"       # "" disables the menu
//!
//! [fragments]
//! enabled = true
//!
//! [placeholders]
//! patterns = ['^[@\\](ref|link)\s+\S+']
//!
//! [sync]
//! enabled_message = "click to disable panel synchronisation"
//! disabled_message = "click to enable panel synchronisation"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct Overrides {
    /// Override data directory.
    pub source_dir: Option<PathBuf>,
    /// Override navigation tree file name.
    pub navtree: Option<String>,
    /// Override menu file name. An empty name disables the menu.
    pub menu: Option<String>,
    /// Override fragment loading.
    pub fragments_enabled: Option<bool>,
    /// Override placeholder patterns.
    pub placeholder_patterns: Option<Vec<String>>,
}

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "navtree.toml";

const DEFAULT_SOURCE_DIR: &str = "html";
const DEFAULT_NAVTREE: &str = "navtreedata.js";
const DEFAULT_MENU: &str = "menudata.js";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data file configuration (paths are relative strings from TOML).
    source: SourceConfigRaw,
    /// Fragment loading configuration.
    pub fragments: FragmentsConfig,
    /// Placeholder target configuration.
    pub placeholders: PlaceholdersConfig,
    /// Panel synchronisation message overrides.
    pub sync: SyncConfig,

    /// Resolved data file configuration (set after loading).
    #[serde(skip)]
    pub source_resolved: SourceConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw data file configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SourceConfigRaw {
    dir: Option<String>,
    navtree: Option<String>,
    menu: Option<String>,
}

/// Resolved data file configuration with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Directory holding Doxygen's data files.
    pub dir: PathBuf,
    /// Navigation tree file name.
    pub navtree: String,
    /// Menu file name, `None` when disabled.
    pub menu: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            navtree: DEFAULT_NAVTREE.to_owned(),
            menu: Some(DEFAULT_MENU.to_owned()),
        }
    }
}

/// Fragment loading configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FragmentsConfig {
    /// Whether fragment files are loaded.
    pub enabled: bool,
}

impl Default for FragmentsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Placeholder target configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaceholdersConfig {
    /// Regular expressions matching placeholder targets.
    ///
    /// `None` uses the built-in patterns. An empty list disables detection.
    pub patterns: Option<Vec<String>>,
}

/// Panel synchronisation messages.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Replaces the "synchronisation on" message.
    pub enabled_message: Option<String>,
    /// Replaces the "synchronisation off" message.
    pub disabled_message: Option<String>,
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

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Map an empty menu name to a disabled menu.
fn menu_name(name: &str) -> Option<String> {
    if name.is_empty() {
        None
    } else {
        Some(name.to_owned())
    }
}

impl Config {
    /// Load configuration from file with optional overrides.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `navtree.toml` in current directory and parents.
    ///
    /// Overrides are applied after loading and path resolution, then the
    /// result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        overrides: Option<&Overrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(overrides) = overrides {
            config.apply_overrides(overrides);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply overrides to the configuration.
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(dir) = &overrides.source_dir {
            self.source_resolved.dir.clone_from(dir);
        }
        if let Some(navtree) = &overrides.navtree {
            self.source_resolved.navtree.clone_from(navtree);
        }
        if let Some(menu) = &overrides.menu {
            self.source_resolved.menu = menu_name(menu);
        }
        if let Some(enabled) = overrides.fragments_enabled {
            self.fragments.enabled = enabled;
        }
        if let Some(patterns) = &overrides.placeholder_patterns {
            self.placeholders.patterns = Some(patterns.clone());
        }
    }

    /// Search for config file in `start` and its parents.
    #[must_use]
    pub fn discover_config(start: &Path) -> Option<PathBuf> {
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

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            source: SourceConfigRaw::default(),
            fragments: FragmentsConfig::default(),
            placeholders: PlaceholdersConfig::default(),
            sync: SyncConfig::default(),
            source_resolved: SourceConfig {
                dir: base.join(DEFAULT_SOURCE_DIR),
                ..SourceConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.source_resolved.navtree, "source.navtree")?;
        if let Some(menu) = &self.source_resolved.menu {
            require_non_empty(menu, "source.menu")?;
        }
        self.validate_placeholders()?;
        Ok(())
    }

    fn validate_placeholders(&self) -> Result<(), ConfigError> {
        for pattern in self.placeholders.patterns.iter().flatten() {
            regex::Regex::new(pattern).map_err(|e| {
                ConfigError::Validation(format!(
                    "placeholders.patterns: invalid pattern {pattern:?}: {e}"
                ))
            })?;
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let source = &self.source;
        self.source_resolved = SourceConfig {
            dir: config_dir.join(source.dir.as_deref().unwrap_or(DEFAULT_SOURCE_DIR)),
            navtree: source
                .navtree
                .clone()
                .unwrap_or_else(|| DEFAULT_NAVTREE.to_owned()),
            menu: source
                .menu
                .as_deref()
                .map_or_else(|| Some(DEFAULT_MENU.to_owned()), menu_name),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.source_resolved.dir, PathBuf::from("/test/html"));
        assert_eq!(config.source_resolved.navtree, "navtreedata.js");
        assert_eq!(config.source_resolved.menu.as_deref(), Some("menudata.js"));
        assert!(config.fragments.enabled);
        assert!(config.placeholders.patterns.is_none());
        assert!(config.sync.enabled_message.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.source_resolved.dir, PathBuf::from("/project/html"));
        assert_eq!(config.source_resolved.navtree, "navtreedata.js");
        assert!(config.fragments.enabled);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[source]
dir = "build/html"
navtree = "tree.js"
menu = "menu.js"

[fragments]
enabled = false

[placeholders]
patterns = ['^@ref\s']

[sync]
enabled_message = "Sync on"
disabled_message = "Sync off"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.source_resolved,
            SourceConfig {
                dir: PathBuf::from("/project/build/html"),
                navtree: "tree.js".to_owned(),
                menu: Some("menu.js".to_owned()),
            }
        );
        assert!(!config.fragments.enabled);
        assert_eq!(
            config.placeholders.patterns,
            Some(vec![r"^@ref\s".to_owned()])
        );
        assert_eq!(config.sync.enabled_message.as_deref(), Some("Sync on"));
        assert_eq!(config.sync.disabled_message.as_deref(), Some("Sync off"));
    }

    #[test]
    fn test_empty_menu_disables_menu() {
        let toml = r#"
[source]
menu = ""
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert!(config.source_resolved.menu.is_none());
    }

    #[test]
    fn test_absolute_source_dir_is_kept() {
        let toml = r#"
[source]
dir = "/srv/docs/html"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.source_resolved.dir, PathBuf::from("/srv/docs/html"));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[source]\ndir = \"out\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.source_resolved.dir, dir.path().join("out"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(
            matches!(err, ConfigError::NotFound(ref p) if *p == path),
            "Expected ConfigError::NotFound, got {err:?}"
        );
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[source\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(
            matches!(err, ConfigError::Parse(_)),
            "Expected ConfigError::Parse, got {err:?}"
        );
    }

    #[test]
    fn test_load_wrong_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[fragments]\nenabled = \"yes\"\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_config(&nested);

        assert_eq!(found, Some(dir.path().join(CONFIG_FILENAME)));
    }

    #[test]
    fn test_discover_config_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        std::fs::write(nested.join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_config(&nested);

        assert_eq!(found, Some(nested.join(CONFIG_FILENAME)));
    }

    #[test]
    fn test_discover_config_ignores_directory_named_like_config() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs");
        std::fs::create_dir_all(nested.join(CONFIG_FILENAME)).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_config(&nested);

        assert_eq!(found, Some(dir.path().join(CONFIG_FILENAME)));
    }

    #[test]
    fn test_apply_overrides_source() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = Overrides {
            source_dir: Some(PathBuf::from("/custom/html")),
            navtree: Some("tree.js".to_owned()),
            ..Default::default()
        };

        config.apply_overrides(&overrides);

        assert_eq!(config.source_resolved.dir, PathBuf::from("/custom/html"));
        assert_eq!(config.source_resolved.navtree, "tree.js");
        assert_eq!(config.source_resolved.menu.as_deref(), Some("menudata.js")); // Unchanged
    }

    #[test]
    fn test_apply_overrides_disable_menu() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = Overrides {
            menu: Some(String::new()),
            ..Default::default()
        };

        config.apply_overrides(&overrides);

        assert!(config.source_resolved.menu.is_none());
    }

    #[test]
    fn test_apply_overrides_fragments_and_patterns() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = Overrides {
            fragments_enabled: Some(false),
            placeholder_patterns: Some(Vec::new()),
            ..Default::default()
        };

        config.apply_overrides(&overrides);

        assert!(!config.fragments.enabled);
        assert_eq!(config.placeholders.patterns, Some(Vec::new()));
    }

    #[test]
    fn test_apply_overrides_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_overrides(&Overrides::default());

        assert_eq!(config.source_resolved.dir, PathBuf::from("/test/html"));
        assert!(config.fragments.enabled);
    }

    #[test]
    fn test_load_applies_overrides_after_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[fragments]\nenabled = true\n").unwrap();
        let overrides = Overrides {
            fragments_enabled: Some(false),
            ..Default::default()
        };

        let config = Config::load(Some(&path), Some(&overrides)).unwrap();

        assert!(!config.fragments.enabled);
    }

    #[test]
    fn test_load_validates_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        let overrides = Overrides {
            navtree: Some(String::new()),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_navtree_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.source_resolved.navtree = "  ".to_owned();

        let err = config.validate().unwrap_err();

        assert_eq!(
            err.to_string(),
            "Configuration error: source.navtree cannot be empty"
        );
    }

    #[test]
    fn test_validate_invalid_pattern() {
        let toml = r#"
[placeholders]
patterns = ["^@ref(", "ok"]
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        let err = config.validate().unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("placeholders.patterns"));
        assert!(err.to_string().contains("^@ref("));
    }

    #[test]
    fn test_load_invalid_pattern_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[placeholders]\npatterns = [\"[\"]\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
