//! Configuration management for dv.
//!
//! Parses `dv.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Registering documentation
//!
//! Every `[[entities]]` table registers one documentation tree. Several tables
//! sharing a `key` with different `version` values form the version history of
//! one entity:
//!
//! ```toml
//! [docs]
//! link_base = "dev/docs"
//!
//! [[entities]]
//! key = "framework"
//! title = "Framework"
//! path = "vendor/framework/docs"
//! version = "4.0"
//! stable = true
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `${VAR}` references are expanded (and must be set) in:
//! - `server.host`
//! - `entities[].path`

mod expand;

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the URL prefix documentation is served under.
    pub link_base: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dv.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Viewer-wide documentation settings.
    pub docs: DocsConfig,
    /// Registered documentation trees (paths are relative strings from TOML).
    entities: Vec<EntityConfigRaw>,

    /// Resolved entity registrations (set after loading).
    #[serde(skip)]
    pub entities_resolved: Vec<EntityConfig>,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7980,
        }
    }
}

/// Documentation settings shared by all entities.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// URL prefix under which documentation is served (e.g. `dev/docs`).
    pub link_base: String,
    /// Directory names recognised as language roots.
    pub languages: Vec<String>,
    /// Language assumed for trees without language directories.
    pub default_language: String,
    /// Version label assumed for trees without version directories.
    pub default_version: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            link_base: "docs".to_owned(),
            languages: vec!["en".to_owned()],
            default_language: "en".to_owned(),
            default_version: "master".to_owned(),
        }
    }
}

/// Raw entity registration as parsed from TOML.
#[derive(Debug, Deserialize)]
struct EntityConfigRaw {
    key: String,
    title: Option<String>,
    path: String,
    version: Option<String>,
    #[serde(default)]
    stable: bool,
}

/// Resolved entity registration with an absolute path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityConfig {
    /// Stable identifier grouping registrations into one entity.
    pub key: String,
    /// Human-readable title.
    pub title: String,
    /// Root directory of this documentation tree.
    pub path: PathBuf,
    /// Version label this tree provides, if it is not versioned by directory.
    pub version: Option<String>,
    /// Whether this registration's version is the entity's stable version.
    pub stable: bool,
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
        /// Config field path (e.g., "`entities.path`").
        field: String,
        /// Error message (e.g., "${`DOCS_ROOT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `dv.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
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
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Parse configuration from a TOML string, resolving relative entity
    /// paths against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml_str(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve_paths(base_dir);
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(link_base) = &settings.link_base {
            self.docs.link_base.clone_from(link_base);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml_str(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
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
        self.validate_server()?;
        self.validate_docs()?;
        self.validate_entities()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_docs(&self) -> Result<(), ConfigError> {
        if self.docs.languages.is_empty() {
            return Err(ConfigError::Validation(
                "docs.languages must list at least one language".to_owned(),
            ));
        }
        require_non_empty(&self.docs.default_language, "docs.default_language")?;
        if !self.docs.languages.contains(&self.docs.default_language) {
            return Err(ConfigError::Validation(format!(
                "docs.default_language \"{}\" is not listed in docs.languages",
                self.docs.default_language
            )));
        }
        require_non_empty(&self.docs.default_version, "docs.default_version")?;
        Ok(())
    }

    fn validate_entities(&self) -> Result<(), ConfigError> {
        for (i, entity) in self.entities.iter().enumerate() {
            require_non_empty(&entity.key, &format!("entities[{i}].key"))?;
            if entity.key.starts_with('/') || entity.key.ends_with('/') {
                return Err(ConfigError::Validation(format!(
                    "entities[{i}].key cannot start or end with '/'"
                )));
            }
            require_non_empty(&entity.path, &format!("entities[{i}].path"))?;
            if let Some(version) = &entity.version {
                require_non_empty(version, &format!("entities[{i}].version"))?;
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        for entity in &mut self.entities {
            entity.path = expand::expand_env(&entity.path, "entities.path")?;
        }

        Ok(())
    }

    /// Resolve relative entity paths against the config directory.
    ///
    /// `docs/../shared` style paths are collapsed so that a registration
    /// pointing outside the config directory reads like any other path.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.entities_resolved = self
            .entities
            .iter()
            .map(|raw| EntityConfig {
                key: raw.key.clone(),
                title: raw.title.clone().unwrap_or_else(|| raw.key.clone()),
                path: normalize_path(&config_dir.join(&raw.path)),
                version: raw.version.clone(),
                stable: raw.stable,
            })
            .collect();
    }
}

/// Lexically remove `.` and `..` components.
///
/// Leading `..` of a relative path is kept; `..` above the root is dropped.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7980);
        assert_eq!(config.docs.link_base, "docs");
        assert_eq!(config.docs.languages, vec!["en".to_owned()]);
        assert_eq!(config.docs.default_language, "en");
        assert_eq!(config.docs.default_version, "master");
        assert!(config.entities_resolved.is_empty());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::from_toml_str("", Path::new("/project")).unwrap();
        assert_eq!(config.server.port, 7980);
        assert!(config.entities_resolved.is_empty());
    }

    #[test]
    fn test_parse_docs_config() {
        let toml = r#"
[docs]
link_base = "dev/docs"
languages = ["en", "fr"]
default_language = "fr"
"#;
        let config = Config::from_toml_str(toml, Path::new("/project")).unwrap();
        assert_eq!(config.docs.link_base, "dev/docs");
        assert_eq!(config.docs.languages, vec!["en".to_owned(), "fr".to_owned()]);
        assert_eq!(config.docs.default_language, "fr");
        assert_eq!(config.docs.default_version, "master");
    }

    #[test]
    fn test_parse_entities_resolves_paths() {
        let toml = r#"
[[entities]]
key = "testdocs"
title = "Doc Test"
path = "docs/"
version = "2.3"

[[entities]]
key = "testdocs"
title = "Doc Test"
path = "/abs/docs-v2.4"
version = "2.4"
stable = true

[[entities]]
key = "framework"
path = "framework"
"#;
        let config = Config::from_toml_str(toml, Path::new("/project")).unwrap();

        assert_eq!(
            config.entities_resolved,
            vec![
                EntityConfig {
                    key: "testdocs".to_owned(),
                    title: "Doc Test".to_owned(),
                    path: PathBuf::from("/project/docs/"),
                    version: Some("2.3".to_owned()),
                    stable: false,
                },
                EntityConfig {
                    key: "testdocs".to_owned(),
                    title: "Doc Test".to_owned(),
                    path: PathBuf::from("/abs/docs-v2.4"),
                    version: Some("2.4".to_owned()),
                    stable: true,
                },
                EntityConfig {
                    key: "framework".to_owned(),
                    title: "framework".to_owned(),
                    path: PathBuf::from("/project/framework"),
                    version: None,
                    stable: false,
                },
            ]
        );
    }

    #[test]
    fn test_parse_entities_collapses_parent_components() {
        let toml = r#"
[[entities]]
key = "shared"
path = "../docs"

[[entities]]
key = "nested"
path = "./vendor/../framework/./docs"
"#;
        let config = Config::from_toml_str(toml, Path::new("/project/site")).unwrap();

        assert_eq!(config.entities_resolved[0].path, PathBuf::from("/project/docs"));
        assert_eq!(
            config.entities_resolved[1].path,
            PathBuf::from("/project/site/framework/docs")
        );
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/a/b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize_path(Path::new("../site/../docs")), PathBuf::from("../docs"));
        assert_eq!(normalize_path(Path::new("../../docs")), PathBuf::from("../../docs"));
        assert_eq!(normalize_path(Path::new("docs/..")), PathBuf::from("."));
    }

    #[test]
    fn test_entity_requires_key_and_path() {
        let toml = r#"
[[entities]]
title = "No key"
path = "docs"
"#;
        let result = Config::from_toml_str(toml, Path::new("/project"));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_entity_empty_key_rejected() {
        let toml = r#"
[[entities]]
key = ""
path = "docs"
"#;
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(err.to_string().contains("entities[0].key"));
    }

    #[test]
    fn test_entity_key_with_slash_edges_rejected() {
        let toml = r#"
[[entities]]
key = "framework/"
path = "docs"
"#;
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_default_language_must_be_listed() {
        let toml = r#"
[docs]
languages = ["en"]
default_language = "de"
"#;
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(err.to_string().contains("docs.default_language"));
    }

    #[test]
    fn test_empty_languages_rejected() {
        let toml = r"
[docs]
languages = []
";
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(err.to_string().contains("docs.languages"));
    }

    #[test]
    fn test_zero_port_rejected() {
        let toml = r"
[server]
port = 0
";
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        let settings = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(9000),
            link_base: Some("dev/docs".to_owned()),
        };

        config.apply_cli_settings(&settings);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.docs.link_base, "dev/docs");
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.docs.link_base, "docs");
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("dv.toml");
        std::fs::write(
            &config_path,
            r#"
[[entities]]
key = "framework"
path = "framework-docs"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&config_path), None).unwrap();

        assert_eq!(config.config_path, Some(config_path));
        assert_eq!(
            config.entities_resolved[0].path,
            temp_dir.path().join("framework-docs")
        );
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let result = Config::load(Some(Path::new("/nonexistent/dv.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_expand_env_vars_entity_path() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("DV_TEST_ENTITY_ROOT", "/srv/vendor");
        }
        let toml = r#"
[[entities]]
key = "cms"
path = "${DV_TEST_ENTITY_ROOT}/cms/docs"
"#;
        let config = Config::from_toml_str(toml, Path::new("/project")).unwrap();
        assert_eq!(
            config.entities_resolved[0].path,
            PathBuf::from("/srv/vendor/cms/docs")
        );
        unsafe {
            std::env::remove_var("DV_TEST_ENTITY_ROOT");
        }
    }
}
