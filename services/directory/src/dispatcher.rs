//! User actions and directory loading
//!
//! [`Directory`] owns the remote client, the view store and the notifier.
//! Actions never return errors: outcomes are reported on the notification
//! channel. Only a successful suspend or create triggers a re-fetch; a
//! password reset does not change any field the directory shows.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::client::DirectoryClient;
use crate::error::{DirectoryError, DirectoryResult};
use crate::models::{DirectoryUser, NewUserRequest};
use crate::notification::Notifier;
use crate::store::{DirectoryStore, LoadPhase};
use crate::validation::validate_new_user;

/// Message shown when the directory had to fall back to demo data
pub const DEGRADED_MESSAGE: &str = "Failed to fetch users from the LMS. Using demo data.";

/// Operations a user row offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    View,
    Edit,
    Suspend,
    ResetPassword,
}

impl UserAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserAction::View => "view",
            UserAction::Edit => "edit",
            UserAction::Suspend => "suspend",
            UserAction::ResetPassword => "reset-password",
        }
    }
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(UserAction::View),
            "edit" => Ok(UserAction::Edit),
            "suspend" => Ok(UserAction::Suspend),
            "reset-password" => Ok(UserAction::ResetPassword),
            other => Err(format!("Unknown user action: {}", other)),
        }
    }
}

/// Directory controller
#[derive(Clone)]
pub struct Directory {
    client: DirectoryClient,
    store: DirectoryStore,
    notifier: Notifier,
}

impl Directory {
    pub fn new(client: DirectoryClient, notifier: Notifier) -> Self {
        Self {
            client,
            store: DirectoryStore::new(),
            notifier,
        }
    }

    pub fn store(&self) -> &DirectoryStore {
        &self.store
    }

    pub fn client(&self) -> &DirectoryClient {
        &self.client
    }

    /// Re-fetch the whole directory list
    ///
    /// Returns the phase after this load, which is still `Loading` when a
    /// newer load superseded this one.
    pub async fn refresh(&self) -> LoadPhase {
        let epoch = self.store.begin_load().await;
        let fetch = self.client.fetch_users().await;
        let degraded = fetch.is_degraded();

        if self.store.complete_load(epoch, fetch).await && degraded {
            self.notifier.error(DEGRADED_MESSAGE);
        }

        self.store.phase().await
    }

    pub async fn load_organizations(&self) {
        let organizations = self.client.fetch_organizations().await;
        self.store.set_organizations(organizations).await;
    }

    pub async fn load_cohorts(&self) {
        let cohorts = self.client.fetch_cohorts().await;
        self.store.set_cohorts(cohorts).await;
    }

    /// Initial load: users, organizations and cohorts concurrently
    pub async fn load_all(&self) {
        info!("Loading directory from {}", self.client.endpoint());
        tokio::join!(self.refresh(), self.load_organizations(), self.load_cohorts());
    }

    /// Run a named action; unknown names are ignored
    pub async fn dispatch_named(&self, action: &str, user: &DirectoryUser) {
        match action.parse::<UserAction>() {
            Ok(action) => self.dispatch(action, user).await,
            Err(_) => debug!("Ignoring unknown action {:?} for user {}", action, user.id),
        }
    }

    /// Run an action against one user
    pub async fn dispatch(&self, action: UserAction, user: &DirectoryUser) {
        match action {
            UserAction::View => self.store.select(user.clone()).await,
            UserAction::Edit => self
                .notifier
                .info(format!("Editing {} is not yet available", user.fullname)),
            UserAction::Suspend => match self.client.suspend_user(&user.id).await {
                Ok(()) => {
                    self.notifier
                        .success(format!("{} has been suspended", user.fullname));
                    self.refresh().await;
                }
                Err(err) => self.report_failure(action, user, &err),
            },
            UserAction::ResetPassword => match self.client.reset_password(&user.id).await {
                Ok(()) => self
                    .notifier
                    .success(format!("Password reset email sent to {}", user.email)),
                Err(err) => self.report_failure(action, user, &err),
            },
        }
    }

    fn report_failure(&self, action: UserAction, user: &DirectoryUser, err: &DirectoryError) {
        warn!(kind = ?err.kind(), "Failed to {} user {}: {}", action, user.id, err);
        self.notifier.error(format!("Failed to {} user", action));
    }

    /// Validate and create an account, then reload the directory
    ///
    /// Validation failures are returned without contacting the service.
    pub async fn create_user(&self, request: &NewUserRequest) -> DirectoryResult<()> {
        validate_new_user(request).map_err(|errors| DirectoryError::Validation(errors.to_string()))?;

        match self.client.create_user(request).await {
            Ok(()) => {
                self.notifier.success(format!(
                    "User {} {} created successfully!",
                    request.firstname, request.lastname
                ));
                self.refresh().await;
                Ok(())
            }
            Err(err) => {
                warn!(kind = ?err.kind(), "Failed to create user {}: {}", request.username, err);
                self.notifier.error("Failed to create user. Please try again.");
                Err(err)
            }
        }
    }
}
