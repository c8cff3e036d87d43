// ── Filter predicate engine ──
//
// Pure reduction of a facility sequence plus a `FilterCriteria` to the
// order-preserving subset that satisfies every active dimension. Used by
// both front ends on every criteria change; nothing here is cached.

use std::borrow::Borrow;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::model::{Facility, FacilityStatus, FacilityType};

/// User-selected constraints narrowing the visible facility set.
///
/// An empty set means "no constraint" on that dimension. The search text is
/// kept exactly as typed; matching trims and lower-cases it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub types: IndexSet<FacilityType>,
    #[serde(default)]
    pub statuses: IndexSet<FacilityStatus>,
    #[serde(default)]
    pub countries: IndexSet<String>,
    #[serde(default)]
    pub search: String,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Builders ─────────────────────────────────────────────────────

    pub fn with_type(mut self, kind: FacilityType) -> Self {
        self.types.insert(kind);
        self
    }

    pub fn with_status(mut self, status: FacilityStatus) -> Self {
        self.statuses.insert(status);
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.countries.insert(country.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    // ── Multi-select toggles ─────────────────────────────────────────
    //
    // Each returns whether the value is selected afterwards.

    pub fn toggle_type(&mut self, kind: FacilityType) -> bool {
        toggle(&mut self.types, kind)
    }

    pub fn toggle_status(&mut self, status: FacilityStatus) -> bool {
        toggle(&mut self.statuses, status)
    }

    pub fn toggle_country(&mut self, country: &str) -> bool {
        toggle(&mut self.countries, country.to_owned())
    }

    /// Reset all four dimensions ("Reset All").
    pub fn clear(&mut self) {
        self.types.clear();
        self.statuses.clear();
        self.countries.clear();
        self.search.clear();
    }

    /// Whether any dimension constrains the result.
    pub fn is_active(&self) -> bool {
        !self.types.is_empty()
            || !self.statuses.is_empty()
            || !self.countries.is_empty()
            || self.needle().is_some()
    }

    /// The normalized search string, or `None` when search is blank.
    pub fn needle(&self) -> Option<String> {
        let trimmed = self.search.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
    }

    /// Whether a single facility passes every active dimension.
    pub fn matches(&self, facility: &Facility) -> bool {
        self.matches_with(facility, self.needle().as_deref())
    }

    fn matches_with(&self, facility: &Facility, needle: Option<&str>) -> bool {
        if !self.types.is_empty() && !self.types.contains(&facility.kind) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&facility.status) {
            return false;
        }
        if !self.countries.is_empty() && !self.countries.contains(&facility.country) {
            return false;
        }
        match needle {
            None => true,
            Some(needle) => {
                facility.name.to_lowercase().contains(needle)
                    || facility
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(needle))
            }
        }
    }
}

fn toggle<T: std::hash::Hash + Eq>(set: &mut IndexSet<T>, value: T) -> bool {
    if set.shift_remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}

// ── Engine ───────────────────────────────────────────────────────────

/// Apply `criteria` to an optional facility sequence.
///
/// Returns the matching facilities in their original order. An absent
/// sequence yields an empty result. Works for owned facilities as well as
/// the `Arc<Facility>` snapshots the store hands out.
pub fn apply<F>(facilities: Option<&[F]>, criteria: &FilterCriteria) -> Vec<F>
where
    F: Borrow<Facility> + Clone,
{
    let Some(facilities) = facilities else {
        return Vec::new();
    };
    let needle = criteria.needle();
    facilities
        .iter()
        .filter(|f| criteria.matches_with((*f).borrow(), needle.as_deref()))
        .cloned()
        .collect()
}

/// Number of facilities `criteria` would keep, without collecting them.
pub fn count_matching<F>(facilities: &[F], criteria: &FilterCriteria) -> usize
where
    F: Borrow<Facility>,
{
    let needle = criteria.needle();
    facilities
        .iter()
        .filter(|f| criteria.matches_with((*f).borrow(), needle.as_deref()))
        .count()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::{Position, SourceRecord};

    fn facility(
        id: &str,
        name: &str,
        kind: FacilityType,
        status: FacilityStatus,
        country: &str,
        description: Option<&str>,
    ) -> Facility {
        Facility {
            id: id.into(),
            name: name.into(),
            kind,
            status,
            country: country.into(),
            position: Position::new(50.0, 10.0).expect("valid"),
            description: description.map(Into::into),
            history: Vec::new(),
            info_url: None,
            source: SourceRecord::new(),
        }
    }

    fn scenario_p1() -> Vec<Facility> {
        vec![
            facility("1", "Plant A", FacilityType::Power, FacilityStatus::Active, "DE", None),
            facility("2", "Plant B", FacilityType::Power, FacilityStatus::Critical, "FR", None),
            facility(
                "3",
                "Hospital C",
                FacilityType::Hospital,
                FacilityStatus::Critical,
                "DE",
                None,
            ),
        ]
    }

    fn ids(facilities: &[Facility]) -> Vec<&str> {
        facilities.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn empty_criteria_returns_input_unchanged() {
        let all = scenario_p1();
        let out = apply(Some(all.as_slice()), &FilterCriteria::new());
        assert_eq!(out, all);
        assert!(!FilterCriteria::new().is_active());
    }

    #[test]
    fn type_and_status_are_conjunctive() {
        let all = scenario_p1();
        let criteria = FilterCriteria::new()
            .with_type(FacilityType::Power)
            .with_status(FacilityStatus::Critical);

        assert_eq!(ids(&apply(Some(all.as_slice()), &criteria)), ["2"]);
    }

    #[test]
    fn country_filter_preserves_order() {
        let all = scenario_p1();
        let criteria = FilterCriteria::new().with_country("DE");

        assert_eq!(ids(&apply(Some(all.as_slice()), &criteria)), ["1", "3"]);
    }

    #[test]
    fn search_matches_description_case_insensitively() {
        let all = vec![
            facility(
                "a",
                "Alpha",
                FacilityType::Port,
                FacilityStatus::Active,
                "NL",
                Some("Main Hub"),
            ),
            facility("b", "Beta", FacilityType::Port, FacilityStatus::Active, "NL", None),
        ];
        let criteria = FilterCriteria::new().with_search("  hub ");

        assert_eq!(ids(&apply(Some(all.as_slice()), &criteria)), ["a"]);
    }

    #[test]
    fn search_without_description_does_not_match_or_fail() {
        let all = vec![facility(
            "x",
            "Xenon Works",
            FacilityType::Energy,
            FacilityStatus::Offline,
            "AT",
            None,
        )];
        let criteria = FilterCriteria::new().with_search("reactor");

        assert!(apply(Some(all.as_slice()), &criteria).is_empty());
    }

    #[test]
    fn blank_search_is_inactive() {
        let criteria = FilterCriteria::new().with_search("   ");
        assert!(criteria.needle().is_none());
        assert!(!criteria.is_active());
        assert_eq!(apply(Some(scenario_p1().as_slice()), &criteria).len(), 3);
    }

    #[test]
    fn missing_collection_yields_empty_result() {
        let criteria = FilterCriteria::new().with_type(FacilityType::Power);
        assert!(apply::<Facility>(None, &criteria).is_empty());
    }

    #[test]
    fn soundness_and_completeness() {
        let all = scenario_p1();
        let criteria = FilterCriteria::new()
            .with_status(FacilityStatus::Critical)
            .with_search("b");
        let out = apply(Some(all.as_slice()), &criteria);

        assert!(out.iter().all(|f| criteria.matches(f)));
        let missed = all
            .iter()
            .filter(|f| criteria.matches(f))
            .filter(|f| !out.contains(f))
            .count();
        assert_eq!(missed, 0);
        assert_eq!(count_matching(&all, &criteria), out.len());
    }

    #[test]
    fn applying_twice_is_idempotent() {
        let all = scenario_p1();
        let criteria = FilterCriteria::new().with_country("DE").with_search("a");
        let once = apply(Some(all.as_slice()), &criteria);
        let twice = apply(Some(once.as_slice()), &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn works_on_shared_snapshots() {
        let all: Vec<Arc<Facility>> = scenario_p1().into_iter().map(Arc::new).collect();
        let criteria = FilterCriteria::new().with_type(FacilityType::Hospital);
        let out = apply(Some(all.as_slice()), &criteria);
        assert_eq!(out.len(), 1);
        assert!(Arc::ptr_eq(&out[0], &all[2]));
    }

    #[test]
    fn two_facility_scenarios() {
        let all = vec![
            facility("p1", "Kraftwerk A", FacilityType::Power, FacilityStatus::Active, "DE", None),
            facility(
                "p2",
                "Airport B",
                FacilityType::Airport,
                FacilityStatus::Critical,
                "FR",
                None,
            ),
        ];
        let cases: [(FilterCriteria, &[&str]); 4] = [
            (FilterCriteria::new(), &["p1", "p2"]),
            (FilterCriteria::new().with_type(FacilityType::Power), &["p1"]),
            (FilterCriteria::new().with_search("air"), &["p2"]),
            (
                FilterCriteria::new()
                    .with_type(FacilityType::Power)
                    .with_type(FacilityType::Airport)
                    .with_status(FacilityStatus::Critical),
                &["p2"],
            ),
        ];

        for (criteria, expected) in &cases {
            assert_eq!(
                ids(&apply(Some(all.as_slice()), criteria)),
                *expected,
                "{criteria:?}"
            );
        }
    }

    #[test]
    fn search_is_a_case_insensitive_substring() {
        let all = vec![
            facility(
                "berlin",
                "Berlin Hauptbahnhof",
                FacilityType::Metro,
                FacilityStatus::Active,
                "DE",
                None,
            ),
            facility("munich", "Munich", FacilityType::Metro, FacilityStatus::Active, "DE", None),
        ];

        let out = apply(Some(all.as_slice()), &FilterCriteria::new().with_search("ber"));

        assert_eq!(ids(&out), ["berlin"]);
    }

    #[test]
    fn toggles_flip_membership_and_clear_resets() {
        let mut criteria = FilterCriteria::new();
        assert!(criteria.toggle_type(FacilityType::Metro));
        assert!(criteria.toggle_country("SE"));
        assert!(criteria.toggle_status(FacilityStatus::Offline));
        assert!(!criteria.toggle_type(FacilityType::Metro));
        assert!(criteria.is_active());

        criteria.search = "x".into();
        criteria.clear();
        assert_eq!(criteria, FilterCriteria::new());
    }
}
