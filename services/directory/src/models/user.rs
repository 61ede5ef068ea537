//! Directory user model and related functionality

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse role classification of a directory account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Manager,
    Admin,
}

impl Role {
    /// Get the role name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    /// Human readable label used by the create-user form
    pub fn label(&self) -> &'static str {
        match self {
            Role::Student => "Trainee (Student)",
            Role::Teacher => "Trainer (Teacher)",
            Role::Manager => "School Manager",
            Role::Admin => "Administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Suspended,
    Inactive,
}

impl UserStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Suspended => "suspended",
            UserStatus::Inactive => "inactive",
        }
    }

    /// Capitalized label for display
    pub fn label(&self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Suspended => "Suspended",
            UserStatus::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One platform account as seen by the directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub fullname: String,
    /// Inferred, see [`crate::role::detect_role`]
    pub role: Role,
    pub status: UserStatus,
    /// Organization name, `"Unassigned"` when the account has none
    pub school: String,
    /// Cohort name, `"Default"` when the account has none
    pub cohort: String,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    /// Epoch seconds; `None` means never accessed
    pub firstaccess: Option<i64>,
    /// Epoch seconds; `None` means never accessed
    pub lastaccess: Option<i64>,
    pub auth: Option<String>,
}

impl DirectoryUser {
    /// Initials shown in the avatar badge
    pub fn initials(&self) -> String {
        self.firstname
            .chars()
            .next()
            .into_iter()
            .chain(self.lastname.chars().next())
            .collect()
    }

    pub fn first_access_at(&self) -> Option<DateTime<Utc>> {
        self.firstaccess.and_then(epoch_to_datetime)
    }

    pub fn last_access_at(&self) -> Option<DateTime<Utc>> {
        self.lastaccess.and_then(epoch_to_datetime)
    }

    /// Last access as a calendar date, or `"Never"`
    pub fn last_access_label(&self) -> String {
        match self.last_access_at() {
            Some(at) => at.format("%Y-%m-%d").to_string(),
            None => "Never".to_string(),
        }
    }
}

// Remote services report 0 for accounts that never logged in.
fn epoch_to_datetime(secs: i64) -> Option<DateTime<Utc>> {
    if secs <= 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0)
}

/// Where the current directory list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryOrigin {
    Remote,
    Fallback,
}

/// Result of a directory fetch: the full list and its origin
#[derive(Debug, Clone)]
pub struct DirectoryFetch {
    pub users: Vec<DirectoryUser>,
    pub origin: DirectoryOrigin,
}

impl DirectoryFetch {
    pub fn is_degraded(&self) -> bool {
        self.origin == DirectoryOrigin::Fallback
    }
}

/// New account creation payload
#[derive(Clone, Serialize, Deserialize)]
pub struct NewUserRequest {
    pub username: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub role: Role,
    pub school: String,
    pub phone: String,
    pub city: String,
    pub country: String,
    pub department: String,
}

impl fmt::Debug for NewUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUserRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("firstname", &self.firstname)
            .field("lastname", &self.lastname)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("school", &self.school)
            .field("phone", &self.phone)
            .field("city", &self.city)
            .field("country", &self.country)
            .field("department", &self.department)
            .finish()
    }
}

impl Default for NewUserRequest {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            firstname: String::new(),
            lastname: String::new(),
            email: String::new(),
            role: Role::Student,
            school: String::new(),
            phone: String::new(),
            city: String::new(),
            country: "Saudi Arabia".to_string(),
            department: String::new(),
        }
    }
}
