//! Overlay command handlers: heatmap, connections, clusters, stations.

use tabled::Tabled;

use hivemap_core::overlay::{Cluster, Connection, HeatPoint, RAIL_STATIONS, RailStation};
use hivemap_core::{Dashboard, Position};

use crate::cli::{GlobalOpts, OverlaysArgs, OverlaysCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct HeatRow {
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Intensity")]
    intensity: String,
}

#[derive(Tabled)]
struct ConnectionRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Line")]
    line: String,
}

#[derive(Tabled)]
struct ClusterRow {
    #[tabled(rename = "Center")]
    center: String,
    #[tabled(rename = "Size")]
    size: usize,
    #[tabled(rename = "Critical")]
    critical: usize,
    #[tabled(rename = "Members")]
    members: String,
}

#[derive(Tabled)]
struct StationRow {
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Description")]
    description: &'static str,
}

fn fmt_pos(p: Position) -> String {
    format!("{:.4}, {:.4}", p.lat(), p.lon())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(
    dashboard: &Dashboard,
    args: OverlaysArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let out = match args.command {
        OverlaysCommand::Heatmap => {
            let points: Vec<HeatPoint> = dashboard.heat_points();
            output::render_list(
                &global.output,
                &points,
                |p| HeatRow {
                    position: fmt_pos(p.position),
                    intensity: format!("{:.1}", p.intensity),
                },
                |p| format!("{} {} {}", p.position.lat(), p.position.lon(), p.intensity),
            )
        }

        OverlaysCommand::Connections => {
            let lines: Vec<Connection> = dashboard.connections();
            output::render_list(
                &global.output,
                &lines,
                |c| ConnectionRow {
                    from: c.from.to_string(),
                    to: c.to.to_string(),
                    line: format!("{} → {}", fmt_pos(c.from_position), fmt_pos(c.to_position)),
                },
                |c| format!("{} {}", c.from, c.to),
            )
        }

        OverlaysCommand::Clusters { cell, filter } => {
            let criteria = util::criteria_from_args(&filter)?;
            let cell = cell.unwrap_or(dashboard.config().cluster_cell_degrees);
            if !cell.is_finite() {
                return Err(CliError::Validation {
                    field: "cell".into(),
                    reason: format!("expected a finite number of degrees, got {cell}"),
                });
            }
            dashboard.ui().set_criteria(criteria);
            let clusters: Vec<Cluster> = dashboard.clusters_with_cell(cell);
            output::render_list(
                &global.output,
                &clusters,
                |c| ClusterRow {
                    center: fmt_pos(c.center),
                    size: c.len(),
                    critical: c.critical,
                    members: c
                        .members
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", "),
                },
                |c| {
                    c.members
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(" ")
                },
            )
        }

        OverlaysCommand::Stations => output::render_list(
            &global.output,
            RAIL_STATIONS,
            |s: &RailStation| StationRow {
                name: s.name,
                position: format!("{:.4}, {:.4}", s.lat, s.lon),
                description: s.description,
            },
            |s| s.name.to_owned(),
        ),
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
