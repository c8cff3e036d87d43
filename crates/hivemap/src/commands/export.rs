//! CSV export of every loaded facility.

use std::io::Write;
use std::path::PathBuf;

use hivemap_core::Dashboard;
use hivemap_core::export::DEFAULT_FILE_NAME;

use crate::cli::{ExportArgs, GlobalOpts};
use crate::error::CliError;

use super::util;

pub async fn handle(
    dashboard: &Dashboard,
    args: ExportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let csv = dashboard.export_csv()?;

    if args.stdout {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(csv.as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    let path = args.file.unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME));
    if tokio::fs::try_exists(&path).await.unwrap_or(false)
        && !util::confirm(&format!("Overwrite {}?", path.display()), global.yes)?
    {
        if !global.quiet {
            eprintln!("Export cancelled");
        }
        return Ok(());
    }

    tokio::fs::write(&path, csv.as_bytes()).await?;
    tracing::info!(path = %path.display(), rows = dashboard.facilities().len(), "exported facilities");
    if !global.quiet {
        eprintln!(
            "✓ Exported {} facilities to {}",
            dashboard.facilities().len(),
            path.display()
        );
    }
    Ok(())
}
