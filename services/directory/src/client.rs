//! Remote directory client for the LMS REST web service
//!
//! Every call is one form-encoded POST to the configured endpoint carrying
//! the token, the JSON format marker and a named remote function. There is
//! no retry and no caching. Reads degrade to the fixed fallback data; writes
//! surface their error to the caller.

use std::time::Duration;

use common::config::LmsConfig;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{DirectoryError, DirectoryResult};
use crate::fallback;
use crate::models::{DirectoryFetch, DirectoryOrigin, DirectoryUser, NewUserRequest};
use crate::wire::{
    self, CompaniesResponse, CreatedUser, NamedEntry, UsersResponse, WarningsResponse,
};

/// Remote function names
pub mod functions {
    pub const GET_USERS: &str = "core_user_get_users";
    pub const GET_COMPANIES: &str = "block_iomad_company_admin_get_companies";
    pub const GET_COHORTS: &str = "core_cohort_get_cohorts";
    pub const CREATE_USERS: &str = "core_user_create_users";
    pub const UPDATE_USERS: &str = "core_user_update_users";
}

/// Preference that makes the account choose a new password on next login
const FORCE_PASSWORD_CHANGE: &str = "auth_forcepasswordchange";

type FormParams = Vec<(&'static str, String)>;

/// Client for the remote user, organization and cohort endpoints
#[derive(Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl DirectoryClient {
    /// Create a new directory client
    pub fn new(config: &LmsConfig) -> DirectoryResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue one remote function call and return the parsed body
    async fn call(&self, function: &str, params: FormParams) -> DirectoryResult<Value> {
        debug!("Calling remote function {}", function);

        let mut form: FormParams = vec![
            ("wstoken", self.token.clone()),
            ("wsfunction", function.to_string()),
            ("moodlewsrestformat", "json".to_string()),
        ];
        form.extend(params);

        let response = self.http.post(&self.endpoint).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let value = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body)?
        };

        if let Some(err) = wire::remote_exception(&value) {
            return Err(err);
        }

        Ok(value)
    }

    /// Fetch all non-deleted accounts, without fallback
    pub async fn try_fetch_users(&self) -> DirectoryResult<Vec<DirectoryUser>> {
        let body = self
            .call(
                functions::GET_USERS,
                vec![
                    ("criteria[0][key]", "deleted".to_string()),
                    ("criteria[0][value]", "0".to_string()),
                ],
            )
            .await?;

        let response: UsersResponse = wire::decode(body, "user list")?;
        Ok(response
            .users
            .into_iter()
            .map(|raw| raw.into_directory_user())
            .collect())
    }

    /// Fetch the directory, substituting the demo dataset on any failure
    pub async fn fetch_users(&self) -> DirectoryFetch {
        match self.try_fetch_users().await {
            Ok(users) => {
                info!("Fetched {} users from the LMS", users.len());
                DirectoryFetch {
                    users,
                    origin: DirectoryOrigin::Remote,
                }
            }
            Err(err) => {
                warn!(kind = ?err.kind(), "Failed to fetch users, using demo data: {}", err);
                DirectoryFetch {
                    users: fallback::demo_users(),
                    origin: DirectoryOrigin::Fallback,
                }
            }
        }
    }

    /// Fetch organization names, without fallback
    pub async fn try_fetch_organizations(&self) -> DirectoryResult<Vec<String>> {
        let body = self.call(functions::GET_COMPANIES, Vec::new()).await?;
        let response: CompaniesResponse = wire::decode(body, "organization list")?;
        Ok(response.companies.into_iter().map(|c| c.name).collect())
    }

    /// Fetch organization names, substituting the fallback list on failure
    pub async fn fetch_organizations(&self) -> Vec<String> {
        self.try_fetch_organizations()
            .await
            .unwrap_or_else(|err| {
                warn!(kind = ?err.kind(), "Failed to fetch organizations: {}", err);
                fallback::fallback_organizations()
            })
    }

    /// Fetch cohort names, without fallback
    pub async fn try_fetch_cohorts(&self) -> DirectoryResult<Vec<String>> {
        let body = self.call(functions::GET_COHORTS, Vec::new()).await?;
        let cohorts: Vec<NamedEntry> = wire::decode(body, "cohort list")?;
        Ok(cohorts.into_iter().map(|c| c.name).collect())
    }

    /// Fetch cohort names, substituting the fallback list on failure
    pub async fn fetch_cohorts(&self) -> Vec<String> {
        self.try_fetch_cohorts().await.unwrap_or_else(|err| {
            warn!(kind = ?err.kind(), "Failed to fetch cohorts: {}", err);
            fallback::fallback_cohorts()
        })
    }

    /// Create an account. The request must already be validated.
    pub async fn create_user(&self, request: &NewUserRequest) -> DirectoryResult<()> {
        info!("Creating LMS user: {}", request.username);

        let body = self
            .call(
                functions::CREATE_USERS,
                vec![
                    ("users[0][username]", request.username.clone()),
                    ("users[0][password]", request.password.clone()),
                    ("users[0][firstname]", request.firstname.clone()),
                    ("users[0][lastname]", request.lastname.clone()),
                    ("users[0][email]", request.email.clone()),
                    ("users[0][phone1]", request.phone.clone()),
                    ("users[0][city]", request.city.clone()),
                    ("users[0][country]", request.country.clone()),
                    ("users[0][department]", request.department.clone()),
                ],
            )
            .await?;

        let created: Vec<CreatedUser> = wire::decode(body, "account creation")?;
        match created.first() {
            Some(user) => {
                info!("Created LMS user {}", user.id);
                Ok(())
            }
            None => Err(DirectoryError::Decode(
                "account creation returned no record".to_string(),
            )),
        }
    }

    /// Suspend an account
    pub async fn suspend_user(&self, id: &str) -> DirectoryResult<()> {
        info!("Suspending LMS user {}", id);
        self.update_user(
            id,
            vec![("users[0][suspended]", "1".to_string())],
        )
        .await
    }

    /// Force a password change on the account's next login
    pub async fn reset_password(&self, id: &str) -> DirectoryResult<()> {
        info!("Resetting password for LMS user {}", id);
        self.update_user(
            id,
            vec![
                ("users[0][preferences][0][type]", FORCE_PASSWORD_CHANGE.to_string()),
                ("users[0][preferences][0][value]", "1".to_string()),
            ],
        )
        .await
    }

    async fn update_user(&self, id: &str, fields: FormParams) -> DirectoryResult<()> {
        let mut params: FormParams = vec![("users[0][id]", id.to_string())];
        params.extend(fields);

        let body = self.call(functions::UPDATE_USERS, params).await?;

        // Older services answer null, newer ones a warnings list.
        if body.is_null() {
            return Ok(());
        }
        let response: WarningsResponse = wire::decode(body, "account update")?;
        match response.warnings.into_iter().next() {
            Some(warning) => Err(DirectoryError::Remote {
                errorcode: warning.warningcode.unwrap_or_else(|| "warning".to_string()),
                message: warning
                    .message
                    .unwrap_or_else(|| "Account update rejected".to_string()),
            }),
            None => Ok(()),
        }
    }
}
