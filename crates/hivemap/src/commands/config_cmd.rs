//! Config subcommand handlers.

use dialoguer::{Input, Select};

use hivemap_core::Locale;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# unable to render config: {e}"))
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Ask for profile name, source and language.
fn prompt_profile() -> Result<(String, Profile), CliError> {
    let name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let source: String = Input::new()
        .with_prompt("Facility fixture (path or URL)")
        .default(Profile::default().source)
        .interact_text()
        .map_err(prompt_err)?;

    hivemap_core::FixtureSource::parse(&source).map_err(|e| CliError::Validation {
        field: "source".into(),
        reason: e.to_string(),
    })?;

    let languages = &["English", "Deutsch"];
    let language = match Select::new()
        .with_prompt("Language")
        .items(languages)
        .default(0)
        .interact()
        .map_err(prompt_err)?
    {
        1 => Locale::De,
        _ => Locale::En,
    };

    Ok((
        name,
        Profile {
            source,
            language: Some(language),
            ..Profile::default()
        },
    ))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: guided setup ──────────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            if config_path.exists()
                && !util::confirm(
                    &format!("{} exists. Overwrite?", config_path.display()),
                    global.yes,
                )?
            {
                eprintln!("Config left unchanged");
                return Ok(());
            }

            let (name, profile) = if global.yes {
                let profile = Profile {
                    source: global
                        .source
                        .clone()
                        .unwrap_or_else(|| Profile::default().source),
                    language: global.lang.map(config::locale_of),
                    ..Profile::default()
                };
                (
                    global.profile.clone().unwrap_or_else(|| "default".into()),
                    profile,
                )
            } else {
                eprintln!("hivemap configuration");
                eprintln!("   Config path: {}\n", config_path.display());
                prompt_profile()?
            };

            let mut cfg = Config {
                default_profile: Some(name.clone()),
                ..Config::default()
            };
            cfg.profiles.insert(name.clone(), profile);

            let written = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Configuration written to {}", written.display());
                eprintln!("  Active profile: {name}");
                eprintln!("\n  Try it: hivemap facilities list");
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(&global.output, &cfg, format_config, |c| {
                c.default_profile.clone().unwrap_or_else(|| "default".into())
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}
