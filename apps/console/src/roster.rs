//! Derived views over the current roster snapshot: the filtered listing, the
//! select options and the summary counters. Everything here is recomputed on
//! each render from the snapshot plus the filter inputs.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::StaffRecord;

pub const ALL_SENTINEL: &str = "all";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterChoice {
    #[default]
    All,
    Only(String),
}

impl FilterChoice {
    pub fn from_select_value(value: &str) -> Self {
        if value == ALL_SENTINEL {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }

    pub fn as_select_value(&self) -> &str {
        match self {
            Self::All => ALL_SENTINEL,
            Self::Only(value) => value.as_str(),
        }
    }

    fn admits(&self, candidate: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => {
                candidate.is_some_and(|value| value.to_lowercase() == wanted.to_lowercase())
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffFilter {
    pub search_term: String,
    pub department: FilterChoice,
    pub role: FilterChoice,
}

impl StaffFilter {
    pub fn is_unconstrained(&self) -> bool {
        self.search_term.trim().is_empty()
            && self.department == FilterChoice::All
            && self.role == FilterChoice::All
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, record: &StaffRecord) -> bool {
        self.matches_search(record)
            && self.department.admits(record.department.as_deref())
            && self.role.admits(record.role_label())
    }

    fn matches_search(&self, record: &StaffRecord) -> bool {
        let needle = self.search_term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [
            Some(record.first_name.as_str()),
            Some(record.last_name.as_str()),
            record.email.as_deref(),
            record.role_label(),
            record.department.as_deref(),
            record.position.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|field| !field.is_empty())
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Records admitted by `filter`, in roster order.
pub fn filter_staff<'a>(roster: &'a [StaffRecord], filter: &StaffFilter) -> Vec<&'a StaffRecord> {
    roster.iter().filter(|record| filter.matches(record)).collect()
}

pub fn department_options(roster: &[StaffRecord]) -> Vec<String> {
    select_options(roster.iter().map(|record| record.department.as_deref()))
}

pub fn role_options(roster: &[StaffRecord]) -> Vec<String> {
    select_options(roster.iter().map(StaffRecord::role_label))
}

fn select_options<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut options = vec![ALL_SENTINEL.to_string()];
    for value in values.flatten() {
        if seen.insert(value) {
            options.push(value.to_string());
        }
    }
    options
}

/// Counters shown above the listing. Always computed over the full roster,
/// never the filtered view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RosterStats {
    pub total: usize,
    pub active: usize,
    pub lawyers: usize,
    pub available: usize,
}

impl RosterStats {
    pub fn from_roster(roster: &[StaffRecord]) -> Self {
        roster.iter().fold(Self::default(), |mut stats, record| {
            let active = record.is_active();
            let lawyer = record.is_lawyer();
            stats.total += 1;
            stats.active += usize::from(active);
            stats.lawyers += usize::from(lawyer);
            stats.available += usize::from(active && lawyer);
            stats
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedStatus {
    #[default]
    Connecting,
    Live,
    Unavailable(String),
}

/// What the listing area should show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListingState {
    Connecting,
    Unavailable(String),
    NoStaff,
    FilteredOut,
    Populated(usize),
}

impl ListingState {
    pub fn resolve(feed: &FeedStatus, roster_len: usize, visible_len: usize) -> Self {
        match feed {
            FeedStatus::Connecting if roster_len == 0 => Self::Connecting,
            FeedStatus::Unavailable(reason) if roster_len == 0 => {
                Self::Unavailable(reason.clone())
            }
            _ if roster_len == 0 => Self::NoStaff,
            _ if visible_len == 0 => Self::FilteredOut,
            _ => Self::Populated(visible_len),
        }
    }

    pub fn shows_empty_state(&self) -> bool {
        matches!(self, Self::NoStaff | Self::FilteredOut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::staff::sample_roster;
    use crate::models::{ingest_snapshot, StaffRole, StaffStatus};
    use serde_json::json;

    fn member(id: &str, role: &str, status: &str, department: &str) -> StaffRecord {
        StaffRecord {
            id: id.into(),
            first_name: format!("First{id}"),
            last_name: format!("Last{id}"),
            role: Some(StaffRole::parse(role)),
            status: Some(StaffStatus::parse(status)),
            department: Some(department.into()),
            ..StaffRecord::default()
        }
    }

    #[test]
    fn unconstrained_filter_keeps_whole_roster_in_order() {
        let roster = sample_roster();
        let filter = StaffFilter::default();
        assert!(filter.is_unconstrained());

        let visible = filter_staff(&roster, &filter);
        let ids: Vec<&str> = visible.iter().map(|r| r.id.as_str()).collect();
        let expected: Vec<&str> = roster.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn search_is_case_insensitive_substring_over_email() {
        let roster = sample_roster();
        let filter = StaffFilter {
            search_term: "  SARAH ".into(),
            ..StaffFilter::default()
        };
        let visible = filter_staff(&roster, &filter);
        assert_eq!(visible.len(), 1);
        assert_eq!(
            visible[0].email.as_deref(),
            Some("sarah.johnson@legalflow.com")
        );

        let mut record = StaffRecord::blank("x");
        record.email = Some("Sarah.Johnson@x.com".into());
        let filter = StaffFilter {
            search_term: "sarah".into(),
            ..StaffFilter::default()
        };
        assert!(filter.matches(&record));
    }

    #[test]
    fn search_covers_role_and_department() {
        let roster = vec![
            member("1", "Accountant", "active", "Finance"),
            member("2", "Paralegal", "busy", "Litigation"),
        ];
        let by_role = StaffFilter {
            search_term: "paraleg".into(),
            ..StaffFilter::default()
        };
        assert_eq!(filter_staff(&roster, &by_role)[0].id, "2");

        let by_department = StaffFilter {
            search_term: "finan".into(),
            ..StaffFilter::default()
        };
        assert_eq!(filter_staff(&roster, &by_department)[0].id, "1");
    }

    #[test]
    fn search_reaches_position_alongside_role() {
        let roster = ingest_snapshot(vec![json!({
            "id": "1",
            "firstName": "Ana",
            "lastName": "Ruiz",
            "role": "Senior_Lawyer",
            "position": "Head of Litigation"
        })]);
        let filter = StaffFilter {
            search_term: "head".into(),
            ..StaffFilter::default()
        };
        assert_eq!(filter_staff(&roster, &filter).len(), 1);
    }

    #[test]
    fn absent_fields_never_match_a_constrained_filter() {
        let record = StaffRecord::blank("bare");
        let filter = StaffFilter {
            department: FilterChoice::Only("Finance".into()),
            ..StaffFilter::default()
        };
        assert!(!filter.matches(&record));

        let filter = StaffFilter {
            search_term: "anything".into(),
            ..StaffFilter::default()
        };
        assert!(!filter.matches(&record));
    }

    #[test]
    fn department_and_role_compare_case_insensitively() {
        let roster = vec![
            member("1", "Senior_Lawyer", "active", "Corporate Law"),
            member("2", "Accountant", "active", "Finance"),
            member("3", "Junior_Lawyer", "away", "corporate law"),
        ];
        let filter = StaffFilter {
            department: FilterChoice::from_select_value("CORPORATE LAW"),
            role: FilterChoice::from_select_value("senior_lawyer"),
            ..StaffFilter::default()
        };
        let ids: Vec<&str> = filter_staff(&roster, &filter)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn filtered_view_is_always_a_subset() {
        let roster = sample_roster();
        let filter = StaffFilter {
            search_term: "o".into(),
            department: FilterChoice::Only("Corporate Law".into()),
            role: FilterChoice::All,
        };
        for record in filter_staff(&roster, &filter) {
            assert!(roster.contains(record));
        }
    }

    #[test]
    fn select_options_start_with_sentinel_and_deduplicate() {
        let roster = vec![
            member("1", "Senior_Lawyer", "active", "Corporate Law"),
            member("2", "Legal_Secretary", "active", "Corporate Law"),
        ];
        assert_eq!(department_options(&roster), vec!["all", "Corporate Law"]);
        assert_eq!(
            role_options(&roster),
            vec!["all", "Senior_Lawyer", "Legal_Secretary"]
        );
        assert_eq!(department_options(&[]), vec!["all"]);
    }

    #[test]
    fn select_value_round_trips_through_choice() {
        assert_eq!(FilterChoice::from_select_value("all"), FilterChoice::All);
        let choice = FilterChoice::from_select_value("Finance");
        assert_eq!(choice.as_select_value(), "Finance");
    }

    #[test]
    fn stats_single_active_senior_lawyer() {
        let roster = vec![member("1", "Senior_Lawyer", "active", "Corporate Law")];
        assert_eq!(
            RosterStats::from_roster(&roster),
            RosterStats {
                total: 1,
                active: 1,
                lawyers: 1,
                available: 1
            }
        );
    }

    #[test]
    fn stats_ignore_the_filter_and_bound_available() {
        let roster = sample_roster();
        let stats = RosterStats::from_roster(&roster);
        assert_eq!(stats.total, roster.len());
        assert!(stats.available <= stats.active.min(stats.lawyers));

        let mixed = vec![
            member("1", "Senior_Partner", "busy", "Litigation"),
            member("2", "Accountant", "ACTIVE", "Finance"),
            member("3", "Junior_Lawyer", "Active", "Litigation"),
        ];
        let stats = RosterStats::from_roster(&mixed);
        assert_eq!((stats.active, stats.lawyers, stats.available), (2, 2, 1));
    }

    #[test]
    fn empty_roster_is_all_zero_and_shows_empty_state() {
        let roster: Vec<StaffRecord> = Vec::new();
        let filter = StaffFilter::default();
        assert!(filter_staff(&roster, &filter).is_empty());
        assert_eq!(RosterStats::from_roster(&roster), RosterStats::default());

        let state = ListingState::resolve(&FeedStatus::Live, 0, 0);
        assert_eq!(state, ListingState::NoStaff);
        assert!(state.shows_empty_state());
    }

    #[test]
    fn listing_state_separates_loading_from_filtered_out() {
        assert_eq!(
            ListingState::resolve(&FeedStatus::Connecting, 0, 0),
            ListingState::Connecting
        );
        assert_eq!(
            ListingState::resolve(&FeedStatus::Unavailable("down".into()), 0, 0),
            ListingState::Unavailable("down".into())
        );
        assert_eq!(
            ListingState::resolve(&FeedStatus::Live, 4, 0),
            ListingState::FilteredOut
        );
        assert_eq!(
            ListingState::resolve(&FeedStatus::Live, 4, 2),
            ListingState::Populated(2)
        );
    }
}
