//! Shared configuration for the hivemap CLI and TUI.
//!
//! TOML profiles layered with `HIVEMAP_` environment variables, and
//! translation to `hivemap_core::DashboardConfig`. Both binaries depend on
//! this crate; the CLI adds `GlobalOpts`-aware overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hivemap_core::config::{DEFAULT_CLUSTER_CELL, DEFAULT_SOURCE};
use hivemap_core::overlay::default_connection_pairs;
use hivemap_core::{DashboardConfig, FixtureSource, Locale};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named dashboard profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// The profile called `name`, or the built-in one when `name` is the
    /// default profile and the file does not define it.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        if let Some(profile) = self.profiles.get(name) {
            return Ok(profile.clone());
        }
        if self.default_profile.as_deref().unwrap_or("default") == name {
            return Ok(Profile::default());
        }
        Err(ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub language: Locale,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            language: Locale::default(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// A named dashboard profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Fixture URL (`http(s)://...`) or file path.
    #[serde(default = "default_source")]
    pub source: String,

    /// Fetch timeout in seconds. Unset means no timeout.
    pub timeout: Option<u64>,

    /// Overrides `defaults.language`.
    pub language: Option<Locale>,

    /// Facility id pairs for the connection overlay.
    pub connections: Option<Vec<[String; 2]>>,

    /// Grid cell size for clustering, in degrees.
    pub cluster_cell_degrees: Option<f64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            source: default_source(),
            timeout: None,
            language: None,
            connections: None,
            cluster_cell_degrees: None,
        }
    }
}

fn default_source() -> String {
    DEFAULT_SOURCE.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "hivemap", "hivemap").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("hivemap");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path, still layering `HIVEMAP_` env vars.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HIVEMAP_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `DashboardConfig` from a profile, falling back to `defaults`
/// for the language.
pub fn profile_to_dashboard_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<DashboardConfig, ConfigError> {
    let source = FixtureSource::parse(&profile.source).map_err(|e| ConfigError::Validation {
        field: "source".into(),
        reason: e.to_string(),
    })?;

    let cluster_cell_degrees = profile
        .cluster_cell_degrees
        .unwrap_or(DEFAULT_CLUSTER_CELL);
    if !cluster_cell_degrees.is_finite() {
        return Err(ConfigError::Validation {
            field: "cluster_cell_degrees".into(),
            reason: format!("expected a number, got {cluster_cell_degrees}"),
        });
    }

    let connections = profile.connections.as_ref().map_or_else(default_connection_pairs, |pairs| {
        pairs
            .iter()
            .map(|[a, b]| (a.clone(), b.clone()))
            .collect()
    });

    Ok(DashboardConfig {
        source,
        timeout: profile.timeout.map(Duration::from_secs),
        locale: profile.language.unwrap_or(defaults.language),
        connections,
        cluster_cell_degrees,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.output, "table");
        assert!(cfg.profiles.is_empty());
        assert_eq!(cfg.profile("default").unwrap(), Profile::default());
        assert!(matches!(
            cfg.profile("lab"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn reads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "remote"

[defaults]
language = "de"

[profiles.remote]
source = "https://fixtures.example.com/facilities.json"
timeout = 5
connections = [["port-1", "power-1"]]
cluster_cell_degrees = 0.5
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        let profile = cfg.profile("remote").unwrap();
        let dashboard = profile_to_dashboard_config(&profile, &cfg.defaults).unwrap();

        assert!(matches!(dashboard.source, FixtureSource::Remote(_)));
        assert_eq!(dashboard.timeout, Some(Duration::from_secs(5)));
        assert_eq!(dashboard.locale, Locale::De);
        assert_eq!(
            dashboard.connections,
            vec![("port-1".to_owned(), "power-1".to_owned())]
        );
        assert!((dashboard.cluster_cell_degrees - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn default_profile_maps_to_default_dashboard() {
        let dashboard =
            profile_to_dashboard_config(&Profile::default(), &Defaults::default()).unwrap();
        assert_eq!(dashboard, DashboardConfig::default());
    }

    #[test]
    fn rejects_bad_source_urls() {
        let profile = Profile {
            source: "https://".into(),
            ..Profile::default()
        };
        let err = profile_to_dashboard_config(&profile, &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "source"));
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                timeout: Some(10),
                language: Some(Locale::De),
                ..Profile::default()
            },
        );

        save_config_to(&cfg, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded.profiles.get("default"), cfg.profiles.get("default"));
    }
}
