//! Fixed demo data served when the remote directory cannot be read

use chrono::Utc;

use crate::models::{DirectoryUser, Role, UserStatus};

/// Organization names used when the organization list cannot be fetched
pub const FALLBACK_ORGANIZATIONS: [&str; 3] = [
    "Riyadh International School",
    "Al-Faisal Academy",
    "Modern Education Center",
];

/// Cohort names used when the cohort list cannot be fetched
pub const FALLBACK_COHORTS: [&str; 4] = [
    "2024 Intake",
    "Advanced Teachers",
    "New Trainers",
    "Leadership Program",
];

pub fn fallback_organizations() -> Vec<String> {
    FALLBACK_ORGANIZATIONS.iter().map(|s| s.to_string()).collect()
}

pub fn fallback_cohorts() -> Vec<String> {
    FALLBACK_COHORTS.iter().map(|s| s.to_string()).collect()
}

/// The three demo accounts. Last access times are relative to now.
pub fn demo_users() -> Vec<DirectoryUser> {
    let now = Utc::now().timestamp();

    vec![
        demo_user(DemoAccount {
            id: "1",
            firstname: "Ahmed",
            lastname: "Al-Rashid",
            email: "ahmed.rashid@school.edu.sa",
            username: "ahmed.rashid",
            role: Role::Teacher,
            school: "Riyadh International School",
            cohort: "Advanced Teachers",
            lastaccess: now - 3600,
            phone: "+966501234567",
            city: "Riyadh",
            department: "Mathematics",
        }),
        demo_user(DemoAccount {
            id: "2",
            firstname: "Fatima",
            lastname: "Hassan",
            email: "fatima.hassan@school.edu.sa",
            username: "fatima.hassan",
            role: Role::Student,
            school: "Al-Faisal Academy",
            cohort: "2024 Intake",
            lastaccess: now - 7200,
            phone: "+966507654321",
            city: "Jeddah",
            department: "Science",
        }),
        demo_user(DemoAccount {
            id: "3",
            firstname: "Mohammed",
            lastname: "Al-Zahra",
            email: "mohammed.zahra@admin.edu.sa",
            username: "admin.mohammed",
            role: Role::Admin,
            school: "System Administration",
            cohort: "Leadership Program",
            lastaccess: now - 1800,
            phone: "+966509876543",
            city: "Riyadh",
            department: "Administration",
        }),
    ]
}

struct DemoAccount {
    id: &'static str,
    firstname: &'static str,
    lastname: &'static str,
    email: &'static str,
    username: &'static str,
    role: Role,
    school: &'static str,
    cohort: &'static str,
    lastaccess: i64,
    phone: &'static str,
    city: &'static str,
    department: &'static str,
}

fn demo_user(account: DemoAccount) -> DirectoryUser {
    DirectoryUser {
        id: account.id.to_string(),
        username: account.username.to_string(),
        email: account.email.to_string(),
        firstname: account.firstname.to_string(),
        lastname: account.lastname.to_string(),
        fullname: format!("{} {}", account.firstname, account.lastname),
        role: account.role,
        status: UserStatus::Active,
        school: account.school.to_string(),
        cohort: account.cohort.to_string(),
        department: Some(account.department.to_string()),
        phone: Some(account.phone.to_string()),
        city: Some(account.city.to_string()),
        country: Some("Saudi Arabia".to_string()),
        firstaccess: None,
        lastaccess: Some(account.lastaccess),
        auth: None,
    }
}
