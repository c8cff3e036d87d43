//! Critical alert listing.

use std::sync::Arc;

use owo_colors::OwoColorize;
use tabled::Tabled;

use hivemap_core::{Dashboard, Facility};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Since")]
    since: String,
}

#[allow(clippy::unnecessary_wraps)]
pub fn handle(dashboard: &Dashboard, global: &GlobalOpts) -> Result<(), CliError> {
    let locale = dashboard.locale();
    let critical: Vec<Arc<Facility>> = dashboard.critical();

    if matches!(global.output, OutputFormat::Table) && !global.quiet && !critical.is_empty() {
        let banner = locale.critical_alert();
        if output::should_color(&global.color) {
            println!("{}", banner.red().bold());
        } else {
            println!("{banner}");
        }
    }

    let out = output::render_list(
        &global.output,
        &critical,
        |f| AlertRow {
            id: f.id.to_string(),
            name: f.name.clone(),
            kind: locale.type_label(f.kind).into(),
            country: f.country.clone(),
            since: f
                .last_change()
                .filter(|h| h.status.is_critical())
                .map_or_else(|| "-".into(), |h| h.timestamp.format("%Y-%m-%d %H:%M").to_string()),
        },
        |f| f.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
