//! Directory view state
//!
//! The user list is only ever replaced wholesale. Each load is stamped with
//! a monotonically increasing epoch and a completion is applied only if its
//! epoch is still the latest one started, so a slow earlier response can
//! never overwrite a newer one.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::filter::FilteredView;
use crate::models::{DirectoryFetch, DirectoryOrigin, DirectoryUser, FilterField, FilterState};

/// Load state of the directory list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Loaded,
    LoadedFallback,
}

#[derive(Debug)]
struct DirectoryState {
    phase: LoadPhase,
    epoch: u64,
    users: Vec<DirectoryUser>,
    organizations: Vec<String>,
    cohorts: Vec<String>,
    filters: FilterState,
    selected: Option<DirectoryUser>,
}

impl Default for DirectoryState {
    fn default() -> Self {
        Self {
            phase: LoadPhase::Idle,
            epoch: 0,
            users: Vec::new(),
            organizations: Vec::new(),
            cohorts: Vec::new(),
            filters: FilterState::default(),
            selected: None,
        }
    }
}

/// Shared handle on the directory view state
#[derive(Debug, Clone, Default)]
pub struct DirectoryStore {
    state: Arc<Mutex<DirectoryState>>,
}

impl DirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `Loading` and return the epoch of the new load
    pub async fn begin_load(&self) -> u64 {
        let mut state = self.state.lock().await;
        state.epoch += 1;
        state.phase = LoadPhase::Loading;
        state.epoch
    }

    /// Apply a finished load. Returns false if a newer load superseded it.
    pub async fn complete_load(&self, epoch: u64, fetch: DirectoryFetch) -> bool {
        let mut state = self.state.lock().await;
        if epoch != state.epoch {
            debug!(
                "Discarding stale directory response (epoch {}, current {})",
                epoch, state.epoch
            );
            return false;
        }

        state.phase = match fetch.origin {
            DirectoryOrigin::Remote => LoadPhase::Loaded,
            DirectoryOrigin::Fallback => LoadPhase::LoadedFallback,
        };
        state.users = fetch.users;

        // Keep the detail view on the fresh copy of the selected record.
        if let Some(selected_id) = state.selected.as_ref().map(|u| u.id.clone()) {
            state.selected = state.users.iter().find(|u| u.id == selected_id).cloned();
        }

        true
    }

    pub async fn phase(&self) -> LoadPhase {
        self.state.lock().await.phase
    }

    pub async fn epoch(&self) -> u64 {
        self.state.lock().await.epoch
    }

    pub async fn users(&self) -> Vec<DirectoryUser> {
        self.state.lock().await.users.clone()
    }

    pub async fn find_user(&self, id: &str) -> Option<DirectoryUser> {
        self.state
            .lock()
            .await
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    pub async fn set_organizations(&self, organizations: Vec<String>) {
        self.state.lock().await.organizations = organizations;
    }

    pub async fn organizations(&self) -> Vec<String> {
        self.state.lock().await.organizations.clone()
    }

    pub async fn set_cohorts(&self, cohorts: Vec<String>) {
        self.state.lock().await.cohorts = cohorts;
    }

    pub async fn cohorts(&self) -> Vec<String> {
        self.state.lock().await.cohorts.clone()
    }

    pub async fn filters(&self) -> FilterState {
        self.state.lock().await.filters.clone()
    }

    pub async fn set_filter(&self, field: FilterField, value: impl Into<String>) {
        self.state.lock().await.filters.set(field, value);
    }

    pub async fn reset_filters(&self) {
        self.state.lock().await.filters.reset();
    }

    /// Visible subset for the current list and filters
    pub async fn visible(&self) -> FilteredView {
        let state = self.state.lock().await;
        FilteredView::new(&state.users, &state.filters)
    }

    pub async fn select(&self, user: DirectoryUser) {
        self.state.lock().await.selected = Some(user);
    }

    pub async fn clear_selection(&self) {
        self.state.lock().await.selected = None;
    }

    pub async fn selected(&self) -> Option<DirectoryUser> {
        self.state.lock().await.selected.clone()
    }
}
