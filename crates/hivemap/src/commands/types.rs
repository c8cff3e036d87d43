//! Facility category listing. Needs no fixture.

use serde::Serialize;
use strum::IntoEnumIterator;
use tabled::Tabled;

use hivemap_core::FacilityType;
use hivemap_core::terminal::schema_for;

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct TypeInfo {
    token: &'static str,
    label: &'static str,
    terminal: &'static str,
}

#[derive(Tabled)]
struct TypeRow {
    #[tabled(rename = "Token")]
    token: &'static str,
    #[tabled(rename = "Label")]
    label: &'static str,
    #[tabled(rename = "Terminal")]
    terminal: &'static str,
}

#[allow(clippy::unnecessary_wraps)]
pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let locale = global.lang.map_or_else(
        || {
            config::load_config()
                .map(|cfg| cfg.defaults.language)
                .unwrap_or_default()
        },
        config::locale_of,
    );
    let types: Vec<TypeInfo> = FacilityType::iter()
        .map(|kind| TypeInfo {
            token: kind.into(),
            label: locale.type_label(kind),
            terminal: schema_for(kind).title,
        })
        .collect();

    let out = output::render_list(
        &global.output,
        &types,
        |t| TypeRow {
            token: t.token,
            label: t.label,
            terminal: t.terminal,
        },
        |t| t.token.to_owned(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
