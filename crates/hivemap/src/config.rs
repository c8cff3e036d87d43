//! CLI configuration: a thin wrapper around `hivemap_config`.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--source, --lang, --timeout).

use std::time::Duration;

use hivemap_core::{DashboardConfig, FixtureSource, Locale};

use crate::cli::{GlobalOpts, Language};
use crate::error::CliError;

pub use hivemap_config::{
    Config, Profile, config_path, load_config, profile_to_dashboard_config, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

pub fn locale_of(lang: Language) -> Locale {
    match lang {
        Language::En => Locale::En,
        Language::De => Locale::De,
    }
}

/// Build the `DashboardConfig` for this invocation.
///
/// Flags and `HIVEMAP_*` variables take priority over profile values.
pub fn resolve(global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let cfg = load_config()?;
    resolve_with(&cfg, global)
}

pub fn resolve_with(cfg: &Config, global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);
    let profile = cfg.profile(&profile_name).map_err(|_| {
        let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
        available.sort();
        CliError::ProfileNotFound {
            name: profile_name.clone(),
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        }
    })?;

    let mut resolved = profile_to_dashboard_config(&profile, &cfg.defaults)?;

    if let Some(ref raw) = global.source {
        resolved.source = FixtureSource::parse(raw).map_err(|e| CliError::Validation {
            field: "source".into(),
            reason: e.to_string(),
        })?;
    }
    if let Some(lang) = global.lang {
        resolved.locale = locale_of(lang);
    }
    if let Some(secs) = global.timeout {
        resolved.timeout = Some(Duration::from_secs(secs));
    }

    tracing::debug!(profile = %profile_name, source = ?resolved.source, "resolved dashboard config");
    Ok(resolved)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["hivemap"];
        argv.extend_from_slice(args);
        argv.push("types");
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_profile() {
        let g = global(&["--source", "fixtures/a.json", "--lang", "de", "--timeout", "4"]);
        let resolved = resolve_with(&Config::default(), &g).unwrap();

        assert_eq!(resolved.source, FixtureSource::Local("fixtures/a.json".into()));
        assert_eq!(resolved.locale, Locale::De);
        assert_eq!(resolved.timeout, Some(Duration::from_secs(4)));
    }

    #[test]
    fn unknown_profile_lists_available() {
        let mut cfg = Config::default();
        cfg.profiles.insert("lab".into(), Profile::default());
        let g = global(&["--profile", "prod"]);

        let err = resolve_with(&cfg, &g).unwrap_err();
        assert!(
            matches!(err, CliError::ProfileNotFound { ref available, .. } if available == "lab")
        );
    }
}
