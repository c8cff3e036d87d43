//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::fmt;
use std::path::PathBuf;

use hivemap_core::terminal::ButtonAction;
use hivemap_core::{
    FacilityId, FacilityStatus, FacilityType, LoadReport, Readings, Snapshot, UiState,
};

use crate::screen::ScreenId;

/// Map overlay layers that can be switched on and off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Connections,
    Rail,
    Heatmap,
    Stations,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connections => "Connections",
            Self::Rail => "Rail network",
            Self::Heatmap => "Heatmap",
            Self::Stations => "Stations",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Pending confirmation. Blocks all other input while shown.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmAction {
    EmergencyShutdown { title: String },
    PressButton { label: &'static str, action: ButtonAction },
    OverwriteExport { path: PathBuf },
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmergencyShutdown { title } => {
                write!(f, "EMERGENCY SHUTDOWN of {title}? Controls lock.")
            }
            Self::PressButton { label, .. } => write!(f, "{label}?"),
            Self::OverwriteExport { path } => write!(f, "Overwrite {}?", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ─────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,
    ToggleHelp,

    // ── Search ────────────────────────────────────────────────────
    OpenSearch,
    CloseSearch,
    SearchInput(String),
    SearchSubmit,

    // ── Filters ───────────────────────────────────────────────────
    ToggleFilterPanel,
    ToggleType(FacilityType),
    ToggleStatus(FacilityStatus),
    ToggleCountry(String),
    ResetFilters,

    // ── Map layers ────────────────────────────────────────────────
    ToggleLayer(Layer),
    AdjustOpacity(f64),

    // ── Selection / terminals ─────────────────────────────────────
    SelectFacility(Option<FacilityId>),
    OpenTerminal(FacilityId),
    CloseTerminal,
    /// A terminal button press the user confirmed.
    TerminalButton(ButtonAction),

    // ── Data ──────────────────────────────────────────────────────
    FacilitiesLoaded {
        facilities: Snapshot,
        report: LoadReport,
    },
    /// The startup load failed; carries the localized message.
    LoadFailed(String),
    UiStateChanged(Box<UiState>),
    ReadingsUpdated {
        facility: FacilityId,
        readings: Readings,
    },

    // ── Export ────────────────────────────────────────────────────
    ExportCsv,
    WriteExport(PathBuf),

    // ── Dialogs / notifications ───────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,
    Notify(Notification),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn confirm_prompts() {
        assert_eq!(
            ConfirmAction::EmergencyShutdown {
                title: "Power plant control Brokdorf".into()
            }
            .to_string(),
            "EMERGENCY SHUTDOWN of Power plant control Brokdorf? Controls lock."
        );
        assert_eq!(
            ConfirmAction::OverwriteExport {
                path: "facilities.csv".into()
            }
            .to_string(),
            "Overwrite facilities.csv?"
        );
    }
}
