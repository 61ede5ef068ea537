//! Role inference for directory records
//!
//! The remote service exposes no canonical role, so the role is guessed from
//! the username, the department text and the authentication method. The
//! checks run in a fixed order and the first match wins.

use crate::models::Role;

/// Authentication method treated as an administrator signal
pub const MANUAL_AUTH: &str = "manual";

/// Infer a role from raw record fields
pub fn detect_role(username: Option<&str>, department: Option<&str>, auth: Option<&str>) -> Role {
    if username.is_some_and(|name| name.contains("admin")) || auth == Some(MANUAL_AUTH) {
        return Role::Admin;
    }

    let department = department.map(str::to_lowercase).unwrap_or_default();
    if department.contains("teacher") {
        Role::Teacher
    } else if department.contains("student") {
        Role::Student
    } else if department.contains("manager") {
        Role::Manager
    } else {
        Role::Student
    }
}
