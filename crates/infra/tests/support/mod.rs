//! Shared fixtures for `agencydesk-infra` integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use agencydesk_domain::{
    EntityStatus, NewClient, NewTask, NewUserRecord, Password, TaskPriority, TaskStatus, UserRole,
};
use agencydesk_infra::{ApiClient, ApiClientConfig, RestDataService, SessionTokens};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const ADMIN_EMAIL: &str = "ana@agency.test";
pub const ADMIN_PASSWORD: &str = "s3cret!";
pub const TIMESTAMP: &str = "2024-03-01T09:00:00Z";

/// REST service pointed at `server`, retrying quickly.
pub fn rest_service(server: &MockServer) -> (RestDataService, Arc<SessionTokens>) {
    let tokens = Arc::new(SessionTokens::new());
    let config = ApiClientConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
        max_attempts: 3,
        backoff: Duration::from_millis(1),
    };
    let client = ApiClient::new(config, tokens.clone()).expect("api client should build");
    (RestDataService::with_client(client, tokens.clone()), tokens)
}

pub fn user_json(id: &str, email: &str, role: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": "Ana García",
        "email": email,
        "role": role,
        "status": status,
        "avatar": "AG",
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    })
}

pub fn client_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "contact": "Jo Bloggs",
        "email": "jo@acme.test",
        "industry": "Retail",
        "status": "active",
        "task_count": 0,
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    })
}

pub fn task_json(id: &str, client_id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "title": "Landing page",
        "description": null,
        "status": status,
        "priority": "high",
        "assignee_id": "u1",
        "client_id": client_id,
        "due_date": "2024-03-15",
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP,
    })
}

pub fn admin_record() -> NewUserRecord {
    NewUserRecord {
        name: "Ana García".into(),
        email: ADMIN_EMAIL.into(),
        role: UserRole::Admin,
        status: EntityStatus::Active,
        avatar: "AG".into(),
        password: Password::new(ADMIN_PASSWORD),
    }
}

pub fn new_client(name: &str) -> NewClient {
    NewClient {
        name: name.into(),
        contact: "Jo Bloggs".into(),
        email: format!("contact@{}.test", name.to_lowercase()),
        phone: Some("+34 600 000 000".into()),
        industry: "Retail".into(),
        status: EntityStatus::Active,
    }
}

pub fn new_task(title: &str, client_id: &str, assignee_id: Option<&str>) -> NewTask {
    NewTask {
        title: title.into(),
        description: Some("First draft".into()),
        status: TaskStatus::Pending,
        priority: TaskPriority::Medium,
        assignee_id: assignee_id.map(str::to_string),
        client_id: client_id.into(),
        due_date: None,
    }
}
