//! End-to-end flows against a mocked LMS web service

use common::config::LmsConfig;
use directory::models::{FilterField, UserStatus};
use directory::{Directory, DirectoryClient, LoadPhase, Notification, NotificationLevel, Notifier, UserAction};
use httpmock::prelude::*;
use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;

const SERVER_PATH: &str = "/webservice/rest/server.php";

fn directory_for(endpoint: String) -> (Directory, UnboundedReceiver<Notification>) {
    let config = LmsConfig {
        endpoint,
        token: "integration-token".to_string(),
        request_timeout_secs: 5,
    };
    let client = DirectoryClient::new(&config).expect("Failed to build client");
    let (notifier, rx) = Notifier::channel();
    (Directory::new(client, notifier), rx)
}

fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

fn user_record(suspended: bool) -> serde_json::Value {
    json!({
        "id": 21,
        "username": "khalid.t",
        "firstname": "Khalid",
        "lastname": "Tamimi",
        "fullname": "Khalid Tamimi",
        "email": "khalid.tamimi@school.edu.sa",
        "department": "Student Services",
        "suspended": suspended,
        "lastaccess": 1700000000,
        "auth": "ldap"
    })
}

#[tokio::test]
async fn suspend_then_refetch_shows_suspended_status() {
    let server = MockServer::start_async().await;

    let mut list = server.mock(|when, then| {
        when.method(POST)
            .path(SERVER_PATH)
            .body_includes("wstoken=integration-token")
            .body_includes("wsfunction=core_user_get_users");
        then.status(200)
            .json_body(json!({ "users": [user_record(false)] }));
    });

    let (directory, mut rx) = directory_for(server.url(SERVER_PATH));
    assert_eq!(directory.refresh().await, LoadPhase::Loaded);

    let user = directory.store().find_user("21").await.expect("user loaded");
    assert_eq!(user.status, UserStatus::Active);

    // The service now reports the account as suspended.
    list.delete();
    let list = server.mock(|when, then| {
        when.method(POST)
            .path(SERVER_PATH)
            .body_includes("wsfunction=core_user_get_users");
        then.status(200)
            .json_body(json!({ "users": [user_record(true)] }));
    });
    let update = server.mock(|when, then| {
        when.method(POST)
            .path(SERVER_PATH)
            .body_includes("wsfunction=core_user_update_users")
            .body_includes("users%5B0%5D%5Bsuspended%5D=1");
        then.status(200).body("null");
    });

    directory.dispatch(UserAction::Suspend, &user).await;

    update.assert_calls(1);
    list.assert_calls(1);

    let suspended = directory
        .store()
        .visible()
        .await
        .users
        .into_iter()
        .find(|u| u.id == "21")
        .expect("user still listed");
    assert_eq!(suspended.status, UserStatus::Suspended);

    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Success);
    assert_eq!(notes[0].message, "Khalid Tamimi has been suspended");
}

#[tokio::test]
async fn unreachable_service_yields_demo_directory() {
    let (directory, mut rx) = directory_for("http://127.0.0.1:1/webservice/rest/server.php".to_string());

    directory.load_all().await;

    let store = directory.store();
    assert_eq!(store.phase().await, LoadPhase::LoadedFallback);

    let users = store.visible().await.users;
    let names: Vec<&str> = users.iter().map(|u| u.fullname.as_str()).collect();
    assert_eq!(names, vec!["Ahmed Al-Rashid", "Fatima Hassan", "Mohammed Al-Zahra"]);
    assert_eq!(store.organizations().await.len(), 3);
    assert_eq!(store.cohorts().await.len(), 4);

    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
}

#[tokio::test]
async fn load_all_populates_independent_state() {
    let server = MockServer::start_async().await;

    server.mock(|when, then| {
        when.method(POST)
            .path(SERVER_PATH)
            .body_includes("wsfunction=core_user_get_users");
        then.status(200)
            .json_body(json!({ "users": [user_record(false)] }));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path(SERVER_PATH)
            .body_includes("wsfunction=block_iomad_company_admin_get_companies");
        then.status(200).json_body(json!({
            "companies": [{"name": "Princess Nourah Academy"}, {"name": "King Abdulaziz School"}]
        }));
    });
    // Cohort lookups fail independently of the rest.
    server.mock(|when, then| {
        when.method(POST)
            .path(SERVER_PATH)
            .body_includes("wsfunction=core_cohort_get_cohorts");
        then.status(500);
    });

    let (directory, mut rx) = directory_for(server.url(SERVER_PATH));
    directory.load_all().await;

    let store = directory.store();
    assert_eq!(store.phase().await, LoadPhase::Loaded);
    assert_eq!(
        store.organizations().await,
        vec!["Princess Nourah Academy".to_string(), "King Abdulaziz School".to_string()]
    );
    assert_eq!(store.cohorts().await[0], "2024 Intake");
    assert!(drain(&mut rx).is_empty());

    store.set_filter(FilterField::Role, "student").await;
    assert_eq!(store.visible().await.len(), 1);

    store.set_filter(FilterField::Status, "suspended").await;
    let view = store.visible().await;
    assert!(view.is_empty());
    assert_eq!(view.total, 1);
}
