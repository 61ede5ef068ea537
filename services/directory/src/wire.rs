//! Response schemas for the remote LMS web service
//!
//! The service is loose about types: ids arrive as numbers or strings, the
//! suspended flag as a bool or 0/1, and optional fields may be missing or
//! null. Decoders here accept all of those and apply the directory defaults.

use serde::Deserialize;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde_json::Value;

use crate::error::DirectoryError;
use crate::models::{DirectoryUser, UserStatus};
use crate::role::detect_role;

pub const DEFAULT_SCHOOL: &str = "Unassigned";
pub const DEFAULT_COHORT: &str = "Default";

/// `core_user_get_users` response
#[derive(Debug, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<RawUser>,
}

/// One user record as returned by the service
#[derive(Debug, Deserialize)]
pub struct RawUser {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub cohort: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub suspended: bool,
    #[serde(default, deserialize_with = "lenient_epoch")]
    pub firstaccess: Option<i64>,
    #[serde(default, deserialize_with = "lenient_epoch")]
    pub lastaccess: Option<i64>,
    #[serde(default)]
    pub phone1: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub auth: Option<String>,
}

impl RawUser {
    pub fn into_directory_user(self) -> DirectoryUser {
        let role = detect_role(
            self.username.as_deref(),
            self.department.as_deref(),
            self.auth.as_deref(),
        );
        let status = if self.suspended {
            UserStatus::Suspended
        } else {
            UserStatus::Active
        };

        let firstname = self.firstname.unwrap_or_default();
        let lastname = self.lastname.unwrap_or_default();
        let fullname = non_empty(self.fullname)
            .unwrap_or_else(|| format!("{} {}", firstname, lastname).trim().to_string());
        let department = non_empty(self.department);

        DirectoryUser {
            id: self.id,
            username: self.username.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            firstname,
            lastname,
            fullname,
            role,
            status,
            school: department
                .clone()
                .unwrap_or_else(|| DEFAULT_SCHOOL.to_string()),
            cohort: non_empty(self.cohort).unwrap_or_else(|| DEFAULT_COHORT.to_string()),
            department,
            phone: non_empty(self.phone1),
            city: non_empty(self.city),
            country: non_empty(self.country),
            firstaccess: self.firstaccess,
            lastaccess: self.lastaccess,
            auth: self.auth,
        }
    }
}

/// `block_iomad_company_admin_get_companies` response
#[derive(Debug, Deserialize)]
pub struct CompaniesResponse {
    pub companies: Vec<NamedEntry>,
}

/// Any record that only matters for its `name`
#[derive(Debug, Deserialize)]
pub struct NamedEntry {
    pub name: String,
}

/// One entry of the `core_user_create_users` response
#[derive(Debug, Deserialize)]
pub struct CreatedUser {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Warning list returned by update functions; the key is mandatory
#[derive(Debug, Deserialize)]
pub struct WarningsResponse {
    pub warnings: Vec<RemoteWarning>,
}

#[derive(Debug, Deserialize)]
pub struct RemoteWarning {
    #[serde(default)]
    pub warningcode: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Keys that mark an object as a regular payload rather than an error
const PAYLOAD_KEYS: [&str; 3] = ["users", "companies", "warnings"];

/// Extract a service exception from a response body, if it carries one
///
/// An object with `exception` or `errorcode` is an exception; so is one that
/// carries a `message` and none of the payload keys.
pub fn remote_exception(body: &Value) -> Option<DirectoryError> {
    let object = body.as_object()?;
    let is_exception = object.contains_key("exception") || object.contains_key("errorcode");
    let is_bare_message = object.contains_key("message")
        && !PAYLOAD_KEYS.iter().any(|key| object.contains_key(*key));
    if !is_exception && !is_bare_message {
        return None;
    }

    let field = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);
    Some(DirectoryError::Remote {
        errorcode: field("errorcode")
            .or_else(|| field("exception"))
            .unwrap_or_else(|| "unknown".to_string()),
        message: field("message").unwrap_or_else(|| "Unknown error".to_string()),
    })
}

/// Decode a typed payload out of an already parsed body
pub fn decode<T: DeserializeOwned>(body: Value, what: &str) -> Result<T, DirectoryError> {
    serde_json::from_value(body).map_err(|e| DirectoryError::Decode(format!("{}: {}", what, e)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => matches!(s.trim(), "1" | "true"),
        _ => false,
    })
}

fn lenient_epoch<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|v| v as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use serde_json::json;

    #[test]
    fn test_full_record_mapping() {
        let raw: RawUser = serde_json::from_value(json!({
            "id": 42,
            "username": "omar.k",
            "firstname": "Omar",
            "lastname": "Khalid",
            "fullname": "Omar Khalid",
            "email": "omar@school.edu.sa",
            "department": "Teacher Training",
            "suspended": false,
            "firstaccess": 1700000000,
            "lastaccess": 1700003600,
            "phone1": "+966500000000",
            "city": "Dammam",
            "country": "SA",
            "auth": "ldap"
        }))
        .unwrap();

        let user = raw.into_directory_user();
        assert_eq!(user.id, "42");
        assert_eq!(user.role, Role::Teacher);
        assert_eq!(user.status, UserStatus::Active);
        assert_eq!(user.school, "Teacher Training");
        assert_eq!(user.cohort, DEFAULT_COHORT);
        assert_eq!(user.phone.as_deref(), Some("+966500000000"));
        assert_eq!(user.lastaccess, Some(1700003600));
    }

    #[test]
    fn test_sparse_record_gets_defaults() {
        let raw: RawUser = serde_json::from_value(json!({
            "id": "7",
            "firstname": "Sara",
            "lastname": "Ali",
            "department": "",
            "suspended": 1,
            "lastaccess": null
        }))
        .unwrap();
        let textual: RawUser = serde_json::from_value(json!({
            "id": "8",
            "suspended": "true",
            "firstaccess": "1700000000",
            "lastaccess": " 1700003600 "
        }))
        .unwrap();
        let numeric_text: RawUser =
            serde_json::from_value(json!({"id": 9, "suspended": "1", "lastaccess": "never"}))
                .unwrap();
        let cleared: RawUser =
            serde_json::from_value(json!({"id": 10, "suspended": "0"})).unwrap();

        assert!(textual.suspended);
        assert_eq!(textual.firstaccess, Some(1700000000));
        assert_eq!(textual.lastaccess, Some(1700003600));
        assert!(numeric_text.suspended);
        assert_eq!(numeric_text.lastaccess, None);
        assert!(!cleared.suspended);

        let user = raw.into_directory_user();
        assert_eq!(user.id, "7");
        assert_eq!(user.fullname, "Sara Ali");
        assert_eq!(user.school, DEFAULT_SCHOOL);
        assert_eq!(user.department, None);
        assert_eq!(user.status, UserStatus::Suspended);
        assert_eq!(user.lastaccess, None);
        assert_eq!(user.role, Role::Student);
    }

    #[test]
    fn test_record_without_id_is_rejected() {
        let result: Result<RawUser, _> = serde_json::from_value(json!({"username": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_remote_exception_detection() {
        let body = json!({
            "exception": "moodle_exception",
            "errorcode": "invalidtoken",
            "message": "Invalid token - token not found"
        });
        match remote_exception(&body) {
            Some(DirectoryError::Remote { errorcode, message }) => {
                assert_eq!(errorcode, "invalidtoken");
                assert_eq!(message, "Invalid token - token not found");
            }
            other => panic!("expected remote error, got {:?}", other),
        }

        match remote_exception(&json!({"message": "Username already exists"})) {
            Some(DirectoryError::Remote { errorcode, message }) => {
                assert_eq!(errorcode, "unknown");
                assert_eq!(message, "Username already exists");
            }
            other => panic!("expected remote error, got {:?}", other),
        }

        assert!(remote_exception(&json!({"users": []})).is_none());
        assert!(remote_exception(&json!({"warnings": [], "message": "ok"})).is_none());
        assert!(remote_exception(&json!([{"name": "x"}])).is_none());
        assert!(remote_exception(&Value::Null).is_none());
    }

    #[test]
    fn test_warnings_key_is_required() {
        let ok: WarningsResponse = decode(json!({"warnings": []}), "account update").unwrap();
        assert!(ok.warnings.is_empty());

        for body in [json!({}), json!({"error": "Invalid token"}), json!(true)] {
            let result: Result<WarningsResponse, _> = decode(body, "account update");
            assert!(matches!(result, Err(DirectoryError::Decode(_))));
        }
    }

    #[test]
    fn test_created_user_needs_an_id() {
        let created: Vec<CreatedUser> =
            decode(json!([{"id": 99, "username": "new.trainer"}]), "account creation").unwrap();
        assert_eq!(created[0].id, "99");

        let result: Result<Vec<CreatedUser>, _> =
            decode(json!([{"username": "new.trainer"}]), "account creation");
        assert!(matches!(result, Err(DirectoryError::Decode(_))));
    }

    #[test]
    fn test_missing_users_collection_is_malformed() {
        let result: Result<UsersResponse, _> = decode(json!({"warnings": []}), "user list");
        assert!(matches!(result, Err(DirectoryError::Decode(_))));
    }
}
