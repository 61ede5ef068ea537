//! Client-side filter state for the directory view

use serde::{Deserialize, Serialize};

/// Value meaning "do not filter on this field"
pub const ALL: &str = "all";

/// Ephemeral filter state, never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub role: String,
    pub school: String,
    pub cohort: String,
    pub status: String,
    pub search_term: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            role: ALL.to_string(),
            school: ALL.to_string(),
            cohort: ALL.to_string(),
            status: ALL.to_string(),
            search_term: String::new(),
        }
    }
}

/// A single field of [`FilterState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Role,
    School,
    Cohort,
    Status,
    SearchTerm,
}

impl FilterState {
    /// Update one field, leaving the others untouched
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FilterField::Role => self.role = value,
            FilterField::School => self.school = value,
            FilterField::Cohort => self.cohort = value,
            FilterField::Status => self.status = value,
            FilterField::SearchTerm => self.search_term = value,
        }
    }

    /// Builder-style variant of [`FilterState::set`]
    pub fn with(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when no predicate would be applied
    pub fn is_unfiltered(&self) -> bool {
        self.search_term.trim().is_empty()
            && [&self.role, &self.school, &self.cohort, &self.status]
                .iter()
                .all(|value| value.as_str() == ALL)
    }
}

/// Option entry for a filter select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Role filter options, in display order
pub const ROLE_FILTER_OPTIONS: [FilterOption; 5] = [
    FilterOption {
        value: ALL,
        label: "All Roles",
    },
    FilterOption {
        value: "student",
        label: "Trainees (Students)",
    },
    FilterOption {
        value: "teacher",
        label: "Trainers (Teachers)",
    },
    FilterOption {
        value: "manager",
        label: "School Managers",
    },
    FilterOption {
        value: "admin",
        label: "Administrators",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unfiltered() {
        assert!(FilterState::default().is_unfiltered());
    }

    #[test]
    fn test_set_and_reset() {
        let mut filters = FilterState::default();
        filters.set(FilterField::Role, "teacher");
        filters.set(FilterField::SearchTerm, "ahmed");
        assert_eq!(filters.role, "teacher");
        assert_eq!(filters.search_term, "ahmed");
        assert!(!filters.is_unfiltered());

        filters.reset();
        assert_eq!(filters, FilterState::default());
    }

    #[test]
    fn test_blank_search_term_counts_as_unfiltered() {
        let filters = FilterState::default().with(FilterField::SearchTerm, "   ");
        assert!(filters.is_unfiltered());
    }

    #[test]
    fn test_role_options_start_with_all() {
        assert_eq!(ROLE_FILTER_OPTIONS[0].value, ALL);
        assert_eq!(ROLE_FILTER_OPTIONS.len(), 5);
    }
}
