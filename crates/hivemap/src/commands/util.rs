//! Shared helpers for command handlers.

use std::str::FromStr;

use hivemap_core::{FacilityStatus, FacilityType, FilterCriteria};

use crate::cli::FilterArgs;
use crate::error::CliError;

/// Translate repeated filter flags into `FilterCriteria`.
///
/// Type and status tokens are matched case-insensitively; country codes
/// are upper-cased since the fixture stores them that way.
pub fn criteria_from_args(args: &FilterArgs) -> Result<FilterCriteria, CliError> {
    let mut criteria = FilterCriteria::new();

    for raw in &args.types {
        let kind = FacilityType::from_str(raw.trim()).map_err(|_| CliError::Validation {
            field: "type".into(),
            reason: format!("unknown facility type '{raw}'. Run: hivemap types"),
        })?;
        criteria.types.insert(kind);
    }
    for raw in &args.statuses {
        let status = FacilityStatus::from_str(raw.trim()).map_err(|_| CliError::Validation {
            field: "status".into(),
            reason: format!("unknown status '{raw}'. Expected active, critical or offline"),
        })?;
        criteria.statuses.insert(status);
    }
    for raw in &args.countries {
        criteria.countries.insert(raw.trim().to_uppercase());
    }
    if let Some(ref search) = args.search {
        criteria.search.clone_from(search);
    }

    Ok(criteria)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Render an optional string as `-` when absent.
pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builds_criteria_from_flags() {
        let args = FilterArgs {
            types: vec!["Power".into(), "airport".into()],
            statuses: vec!["critical".into()],
            countries: vec!["de".into()],
            search: Some("  Nord ".into()),
        };
        let criteria = criteria_from_args(&args).unwrap();

        assert_eq!(criteria.types.len(), 2);
        assert!(criteria.types.contains(&FacilityType::Power));
        assert!(criteria.statuses.contains(&FacilityStatus::Critical));
        assert!(criteria.countries.contains("DE"));
        assert_eq!(criteria.needle().as_deref(), Some("nord"));
    }

    #[test]
    fn rejects_unknown_type() {
        let args = FilterArgs {
            types: vec!["castle".into()],
            ..FilterArgs::default()
        };
        assert!(matches!(
            criteria_from_args(&args),
            Err(CliError::Validation { ref field, .. }) if field == "type"
        ));
    }

    #[test]
    fn empty_flags_mean_no_constraint() {
        let criteria = criteria_from_args(&FilterArgs::default()).unwrap();
        assert!(!criteria.is_active());
    }
}
