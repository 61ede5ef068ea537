//! Input validation for the create-user form

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::NewUserRequest;

/// Minimum password length accepted by the form
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Field name to message, for every field that failed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    fn check(&mut self, field: &'static str, result: Result<(), String>) {
        if let Err(message) = result {
            self.0.insert(field, message);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        f.write_str(&messages.join("; "))
    }
}

fn required(value: &str, message: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(message.to_string());
    }
    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
    });

    if !email.is_empty() && !regex.is_match(email) {
        return Err("Please enter a valid email address".to_string());
    }

    required(email, "Email is required")
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }

    required(password, "Password is required")
}

/// Validate a whole creation request, collecting every failing field
pub fn validate_new_user(request: &NewUserRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    errors.check(
        "firstname",
        required(&request.firstname, "First name is required"),
    );
    errors.check("lastname", required(&request.lastname, "Last name is required"));
    errors.check("email", validate_email(&request.email));
    errors.check("username", required(&request.username, "Username is required"));
    errors.check("password", validate_password(&request.password));
    if request.school.is_empty() {
        errors.check("school", Err("School is required".to_string()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
