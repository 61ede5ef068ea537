//! Filter engine for the in-memory directory list
//!
//! Predicates run conjunctively in a fixed order: search term, role, school,
//! cohort, status. A predicate whose value is `"all"` (or, for the search
//! term, blank) is skipped. Output keeps the relative order of the input.

use crate::models::filter::ALL;
use crate::models::{DirectoryUser, FilterState};

/// Compute the visible subset of `users` for the given filter state
pub fn apply_filters(users: &[DirectoryUser], filters: &FilterState) -> Vec<DirectoryUser> {
    let search = !filters.search_term.trim().is_empty();
    let needle = filters.search_term.to_lowercase();

    users
        .iter()
        .filter(|user| !search || matches_search(user, &needle))
        .filter(|user| matches_exact(&filters.role, user.role.as_str()))
        .filter(|user| matches_exact(&filters.school, &user.school))
        .filter(|user| matches_exact(&filters.cohort, &user.cohort))
        .filter(|user| matches_exact(&filters.status, user.status.as_str()))
        .cloned()
        .collect()
}

fn matches_search(user: &DirectoryUser, needle: &str) -> bool {
    [&user.fullname, &user.email, &user.username]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn matches_exact(wanted: &str, actual: &str) -> bool {
    wanted == ALL || wanted == actual
}

/// Filtered view plus the size of the list it was taken from
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView {
    pub users: Vec<DirectoryUser>,
    pub total: usize,
}

impl FilteredView {
    pub fn new(users: &[DirectoryUser], filters: &FilterState) -> Self {
        Self {
            users: apply_filters(users, filters),
            total: users.len(),
        }
    }

    /// The "no results" state; distinct from a load failure
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn summary(&self) -> String {
        if self.is_empty() {
            "No users found".to_string()
        } else {
            format!("{} of {} users", self.users.len(), self.total)
        }
    }
}
