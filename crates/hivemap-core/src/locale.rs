// ── Display labels ──
//
// English ships by default; German is selectable per profile or flag.
// Only category, status, country and load-state strings are localized.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::model::{FacilityStatus, FacilityType};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Locale {
    #[default]
    En,
    De,
}

/// Country codes offered by the filter panel, in display order.
pub const KNOWN_COUNTRIES: &[&str] = &[
    "DE", "AT", "CH", "NL", "FR", "UK", "IT", "ES", "PL", "NO", "SE", "DK", "RU", "KR",
];

impl Locale {
    pub fn type_label(self, kind: FacilityType) -> &'static str {
        match self {
            Self::En => match kind {
                FacilityType::Power => "Power plants",
                FacilityType::Airport => "Airports",
                FacilityType::Server => "Data centers",
                FacilityType::Gov => "Government",
                FacilityType::Water => "Waterworks",
                FacilityType::Base => "Military bases",
                FacilityType::Hospital => "Hospitals",
                FacilityType::Fire => "Fire stations",
                FacilityType::Police => "Police",
                FacilityType::School => "Schools",
                FacilityType::CityHall => "City halls",
                FacilityType::Bridge => "Bridges",
                FacilityType::Port => "Ports",
                FacilityType::Energy => "Substations",
                FacilityType::Metro => "Metro",
                FacilityType::University => "Universities",
                FacilityType::Control => "Control centers",
            },
            Self::De => match kind {
                FacilityType::Power => "Kraftwerke",
                FacilityType::Airport => "Flughäfen",
                FacilityType::Server => "Rechenzentren",
                FacilityType::Gov => "Behörden",
                FacilityType::Water => "Wasserwerke",
                FacilityType::Base => "Militärbasen",
                FacilityType::Hospital => "Krankenhäuser",
                FacilityType::Fire => "Feuerwachen",
                FacilityType::Police => "Polizei",
                FacilityType::School => "Schulen",
                FacilityType::CityHall => "Rathäuser",
                FacilityType::Bridge => "Brücken",
                FacilityType::Port => "Häfen",
                FacilityType::Energy => "Umspannwerke",
                FacilityType::Metro => "U-Bahn",
                FacilityType::University => "Universitäten",
                FacilityType::Control => "Leitstellen",
            },
        }
    }

    pub fn status_label(self, status: FacilityStatus) -> &'static str {
        match (self, status) {
            (Self::En, FacilityStatus::Active) => "Active",
            (Self::En, FacilityStatus::Critical) => "Critical",
            (_, FacilityStatus::Offline) => "Offline",
            (Self::De, FacilityStatus::Active) => "Aktiv",
            (Self::De, FacilityStatus::Critical) => "Kritisch",
        }
    }

    /// Human name of a country code, `None` for codes outside the known list.
    pub fn country_label(self, code: &str) -> Option<&'static str> {
        let (en, de) = match code {
            "DE" => ("Germany", "Deutschland"),
            "AT" => ("Austria", "Österreich"),
            "CH" => ("Switzerland", "Schweiz"),
            "NL" => ("Netherlands", "Niederlande"),
            "FR" => ("France", "Frankreich"),
            "UK" => ("United Kingdom", "Vereinigtes Königreich"),
            "IT" => ("Italy", "Italien"),
            "ES" => ("Spain", "Spanien"),
            "PL" => ("Poland", "Polen"),
            "NO" => ("Norway", "Norwegen"),
            "SE" => ("Sweden", "Schweden"),
            "DK" => ("Denmark", "Dänemark"),
            "RU" => ("Russia", "Russland"),
            "KR" => ("South Korea", "Südkorea"),
            _ => return None,
        };
        Some(match self {
            Self::En => en,
            Self::De => de,
        })
    }

    /// The fixed message stored when the startup load fails.
    pub fn load_error(self) -> &'static str {
        match self {
            Self::En => "Failed to load facilities",
            Self::De => "Fehler beim Laden der Standorte",
        }
    }

    pub fn loading(self) -> &'static str {
        match self {
            Self::En => "Loading facilities…",
            Self::De => "Lade Standorte…",
        }
    }

    pub fn critical_alert(self) -> &'static str {
        match self {
            Self::En => "Critical alert: at least one facility reports a critical state",
            Self::De => "Kritische Warnung: mindestens ein Standort meldet einen kritischen Zustand",
        }
    }

    /// The "Results: N of M shown" counter.
    pub fn results(self, shown: usize, total: usize) -> String {
        match self {
            Self::En => format!("Results: {shown} of {total} shown"),
            Self::De => format!("Ergebnisse: {shown} von {total} angezeigt"),
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_known_country_has_labels_in_every_locale() {
        for locale in Locale::iter() {
            for code in KNOWN_COUNTRIES {
                assert!(locale.country_label(code).is_some(), "{locale} {code}");
            }
            assert!(locale.country_label("XX").is_none());
        }
    }

    #[test]
    fn german_labels() {
        assert_eq!(Locale::De.type_label(FacilityType::Power), "Kraftwerke");
        assert_eq!(Locale::De.status_label(FacilityStatus::Critical), "Kritisch");
        assert_eq!(Locale::De.load_error(), "Fehler beim Laden der Standorte");
        assert_eq!(Locale::En.results(3, 20), "Results: 3 of 20 shown");
    }
}
