//! Facility command handlers.

use std::fmt::Write as _;
use std::sync::Arc;

use tabled::Tabled;

use hivemap_core::{Dashboard, Facility, FacilityId, Locale};

use crate::cli::{FacilitiesArgs, FacilitiesCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct FacilityRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Position")]
    position: String,
}

impl FacilityRow {
    fn new(f: &Facility, locale: Locale, color: bool) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            kind: locale.type_label(f.kind).into(),
            status: output::paint_status(f.status, locale.status_label(f.status), color),
            country: f.country.clone(),
            position: format!("{:.4}, {:.4}", f.position.lat(), f.position.lon()),
        }
    }
}

fn detail(f: &Facility, locale: Locale) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:          {}", f.id);
    let _ = writeln!(out, "Name:        {}", f.name);
    let _ = writeln!(out, "Type:        {}", locale.type_label(f.kind));
    let _ = writeln!(out, "Status:      {}", locale.status_label(f.status));
    let _ = writeln!(
        out,
        "Country:     {}",
        locale
            .country_label(&f.country)
            .map_or_else(|| f.country.clone(), |name| format!("{name} ({})", f.country))
    );
    let _ = writeln!(
        out,
        "Position:    {:.4}, {:.4}",
        f.position.lat(),
        f.position.lon()
    );
    let _ = writeln!(out, "Description: {}", util::or_dash(f.description.as_deref()));
    let _ = write!(out, "Info:        {}", util::or_dash(f.info_url.as_deref()));

    if !f.history.is_empty() {
        let _ = write!(out, "\n\nHistory:");
        let mut history: Vec<_> = f.history.iter().collect();
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        for entry in history {
            let _ = write!(
                out,
                "\n  {}  {}",
                entry.timestamp.format("%Y-%m-%d %H:%M"),
                locale.status_label(entry.status)
            );
        }
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(
    dashboard: &Dashboard,
    args: FacilitiesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let locale = dashboard.locale();
    let color = output::should_color(&global.color);

    match args.command {
        FacilitiesCommand::List(filter) => {
            let criteria = util::criteria_from_args(&filter)?;
            let shown: Vec<Arc<Facility>> = dashboard.filtered(&criteria);
            let out = output::render_list(
                &global.output,
                &shown,
                |f| FacilityRow::new(f, locale, color),
                |f| f.id.to_string(),
            );
            output::print_output(&out, global.quiet);

            if matches!(global.output, OutputFormat::Table) && !global.quiet {
                eprintln!("{}", locale.results(shown.len(), dashboard.facilities().len()));
            }
            Ok(())
        }

        FacilitiesCommand::Get { id } => {
            let facility = dashboard.get(&FacilityId::from(id))?;
            let out = output::render_single(
                &global.output,
                &*facility,
                |f| detail(f, locale),
                |f| f.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
