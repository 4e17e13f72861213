//! Users, clients and tasks through the store's CRUD operations.

mod support;

use agencydesk_core::DataStore;
use agencydesk_domain::constants::{LOCATION_CLIENTS, LOCATION_TASKS, LOCATION_USERS};
use agencydesk_domain::{
    AgencyError, ChangeAction, EntityKind, EntityStatus, NewClient, NewTask, NewUser, Password,
    PasswordChange, TaskPriority, TaskStatus, UserRole,
};
use serde_json::json;
use support::{assert_task_counts_consistent, Harness};

fn new_client(name: &str) -> NewClient {
    NewClient {
        name: name.to_string(),
        contact: "Laura Gómez".to_string(),
        email: "laura@client.test".to_string(),
        phone: Some("+34 600 000 000".to_string()),
        industry: "Retail".to_string(),
        status: EntityStatus::Active,
    }
}

fn new_task(title: &str, client_id: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: None,
        status: TaskStatus::Pending,
        priority: TaskPriority::High,
        assignee_id: None,
        client_id: client_id.to_string(),
        due_date: None,
    }
}

fn new_user(email: &str, password: &str, confirmation: &str) -> NewUser {
    NewUser {
        name: "Carlos Martín".to_string(),
        email: email.to_string(),
        role: UserRole::Copywriter,
        status: EntityStatus::Active,
        password: Password::from(password),
        confirm_password: Password::from(confirmation),
    }
}

fn client_count(store: &DataStore, client_id: &str) -> u32 {
    store.client_by_id(client_id).map(|c| c.task_count).unwrap_or_default()
}

#[tokio::test]
async fn adding_a_client_logs_activity_and_change() {
    let harness = Harness::signed_in().await;

    let client = harness.store.add_client(new_client("Acme")).await.unwrap();

    assert_eq!(client.task_count, 0);
    assert_eq!(harness.store.clients(), vec![client.clone()]);

    let activity = harness.store.activity_logs().pop().unwrap();
    assert_eq!(activity.action, "Added client: Acme");
    assert_eq!(activity.location, LOCATION_CLIENTS);
    assert_eq!(activity.user_id, harness.admin.id);

    let change = harness.store.change_logs().pop().unwrap();
    assert_eq!(change.entity_type, EntityKind::Client);
    assert_eq!(change.action, ChangeAction::Create);
    assert_eq!(change.entity_id, client.id);
    assert_eq!(change.details["name"], json!("Acme"));
}

#[tokio::test]
async fn task_counts_follow_every_task_mutation() {
    let harness = Harness::signed_in().await;
    let acme = harness.store.add_client(new_client("Acme")).await.unwrap();
    let globex = harness.store.add_client(new_client("Globex")).await.unwrap();

    let first = harness.store.add_task(new_task("Brief", &acme.id)).await.unwrap();
    harness.store.add_task(new_task("Moodboard", &acme.id)).await.unwrap();
    assert_eq!(client_count(&harness.store, &acme.id), 2);
    assert_task_counts_consistent(&harness.store);

    let mut moved = first.clone();
    moved.client_id = globex.id.clone();
    harness.store.update_task(moved).await.unwrap();
    assert_eq!(client_count(&harness.store, &acme.id), 1);
    assert_eq!(client_count(&harness.store, &globex.id), 1);
    assert_task_counts_consistent(&harness.store);

    harness.store.delete_task(&first.id).await.unwrap();
    assert_eq!(client_count(&harness.store, &globex.id), 0);
    assert_task_counts_consistent(&harness.store);

    let last = harness.store.activity_logs().pop().unwrap();
    assert_eq!(last.action, "Deleted task: Brief");
    assert_eq!(last.location, LOCATION_TASKS);
}

#[tokio::test]
async fn updating_a_client_keeps_the_derived_counter() {
    let harness = Harness::signed_in().await;
    let acme = harness.store.add_client(new_client("Acme")).await.unwrap();
    harness.store.add_task(new_task("Brief", &acme.id)).await.unwrap();

    let mut edited = harness.store.client_by_id(&acme.id).unwrap();
    edited.name = "Acme Corp".to_string();
    edited.task_count = 42;
    let saved = harness.store.update_client(edited).await.unwrap();

    assert_eq!(saved.task_count, 1);
    let change = harness.store.change_logs().pop().unwrap();
    assert_eq!(change.action, ChangeAction::Update);
    assert_eq!(change.details, json!({ "name": { "from": "Acme", "to": "Acme Corp" } }));
}

#[tokio::test]
async fn deleting_a_client_cascades_to_its_tasks() {
    let harness = Harness::signed_in().await;
    let acme = harness.store.add_client(new_client("Acme")).await.unwrap();
    let globex = harness.store.add_client(new_client("Globex")).await.unwrap();
    harness.store.add_task(new_task("Brief", &acme.id)).await.unwrap();
    harness.store.add_task(new_task("Copy", &acme.id)).await.unwrap();
    let survivor = harness.store.add_task(new_task("Audit", &globex.id)).await.unwrap();

    let removed = harness.store.delete_client(&acme.id).await.unwrap();

    assert_eq!(removed, 2);
    assert!(harness.store.client_by_id(&acme.id).is_none());
    assert_eq!(harness.store.tasks(), vec![survivor]);
    assert!(harness.store.tasks_by_client(&acme.id).is_empty());
    assert_task_counts_consistent(&harness.store);

    let activity = harness.store.activity_logs().pop().unwrap();
    assert_eq!(activity.action, "Deleted client: Acme and 2 associated tasks");
    let change = harness.store.change_logs().pop().unwrap();
    assert_eq!(change.action, ChangeAction::Delete);
    assert_eq!(change.details["removed_task_ids"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn failed_remote_mutation_leaves_state_untouched() {
    let harness = Harness::signed_in().await;
    let acme = harness.store.add_client(new_client("Acme")).await.unwrap();
    let activity_before = harness.store.activity_logs().len();
    harness.remote.fail("clients.update");

    let mut edited = acme.clone();
    edited.name = "Renamed".to_string();
    let err = harness.store.update_client(edited).await.unwrap_err();

    assert!(matches!(err, AgencyError::Network(_)));
    assert_eq!(harness.store.client_by_id(&acme.id), Some(acme));
    assert_eq!(harness.store.activity_logs().len(), activity_before);
    assert_eq!(harness.notifier.errors().len(), 1);
    assert!(harness.store.error_logs().is_empty());
}

#[tokio::test]
async fn validation_failures_never_reach_the_remote() {
    let harness = Harness::signed_in().await;
    let calls_before = harness.remote.total_calls();

    let short = harness.store.add_user(new_user("carlos@agency.test", "abc", "abc")).await;
    let mismatch = harness.store.add_user(new_user("carlos@agency.test", "abcdef", "abcdeg")).await;
    let bad_email = harness.store.add_client(NewClient {
        email: "not-an-email".to_string(),
        ..new_client("Acme")
    });
    let bad_email = bad_email.await;
    let no_title = harness.store.add_task(new_task("  ", "client-1")).await;

    for result in [short.map(|_| ()), mismatch.map(|_| ()), bad_email.map(|_| ()), no_title.map(|_| ())]
    {
        assert!(matches!(result, Err(AgencyError::Validation(_))));
    }
    assert_eq!(harness.remote.total_calls(), calls_before);
    assert!(harness.store.error_logs().is_empty());
    assert!(harness.notifier.all().is_empty());
}

#[tokio::test]
async fn adding_a_user_derives_the_avatar_and_rejects_duplicates() {
    let harness = Harness::signed_in().await;

    let user = harness
        .store
        .add_user(new_user("carlos@agency.test", "abcdef", "abcdef"))
        .await
        .unwrap();
    assert_eq!(user.avatar, "CM");
    assert_eq!(harness.remote.stored_password(&user.id).as_deref(), Some("abcdef"));
    assert_eq!(harness.store.activity_logs().pop().unwrap().location, LOCATION_USERS);

    let duplicate =
        harness.store.add_user(new_user("CARLOS@agency.test", "abcdef", "abcdef")).await;
    assert!(matches!(duplicate, Err(AgencyError::Validation(msg)) if msg.contains("email")));
}

#[tokio::test]
async fn updating_a_user_records_a_field_diff() {
    let harness = Harness::signed_in().await;
    let user = harness
        .store
        .add_user(new_user("carlos@agency.test", "abcdef", "abcdef"))
        .await
        .unwrap();

    let mut edited = user.clone();
    edited.name = "Carla Marín".to_string();
    edited.role = UserRole::Manager;
    let change = PasswordChange {
        password: Password::from("newpass1"),
        confirm_password: Password::from("newpass1"),
    };
    let saved = harness.store.update_user(edited, Some(change)).await.unwrap();

    assert_eq!(saved.avatar, "CM");
    assert_eq!(harness.remote.stored_password(&user.id).as_deref(), Some("newpass1"));

    let details = harness.store.change_logs().pop().unwrap().details;
    assert_eq!(details["name"], json!({ "from": "Carlos Martín", "to": "Carla Marín" }));
    assert_eq!(details["role"], json!({ "from": "copywriter", "to": "manager" }));
    assert_eq!(details["password"], json!({ "changed": true }));
    assert!(details.get("avatar").is_none());
}

#[tokio::test]
async fn editing_yourself_refreshes_the_session() {
    let harness = Harness::signed_in().await;

    let mut me = harness.store.current_user().unwrap();
    me.name = "Ana G. Pérez".to_string();
    harness.store.update_user(me.clone(), None).await.unwrap();
    assert_eq!(harness.store.current_user().unwrap().name, "Ana G. Pérez");

    me.status = EntityStatus::Inactive;
    let err = harness.store.update_user(me, None).await.unwrap_err();
    assert!(matches!(err, AgencyError::Validation(_)));
    assert!(harness.store.current_user().unwrap().is_active());
}

#[tokio::test]
async fn deleting_a_user_deactivates_the_profile() {
    let harness = Harness::signed_in().await;
    let user = harness
        .store
        .add_user(new_user("carlos@agency.test", "abcdef", "abcdef"))
        .await
        .unwrap();

    let deleted = harness.store.delete_user(&user.id).await.unwrap();

    assert_eq!(deleted.status, EntityStatus::Inactive);
    assert_eq!(harness.store.user_by_id(&user.id), Some(deleted));
    let change = harness.store.change_logs().pop().unwrap();
    assert_eq!(change.action, ChangeAction::Delete);
    assert_eq!(change.details["soft_delete"], json!(true));

    let own = harness.store.delete_user(&harness.admin.id).await;
    assert!(matches!(own, Err(AgencyError::Validation(_))));
}

#[tokio::test]
async fn unknown_ids_are_not_found_without_remote_calls() {
    let harness = Harness::signed_in().await;
    let calls_before = harness.remote.total_calls();

    assert!(matches!(harness.store.delete_task("task-404").await, Err(AgencyError::NotFound(_))));
    assert!(matches!(
        harness.store.delete_client("client-404").await,
        Err(AgencyError::NotFound(_))
    ));
    assert!(matches!(harness.store.delete_user("user-404").await, Err(AgencyError::NotFound(_))));
    assert_eq!(harness.remote.total_calls(), calls_before);
    assert!(harness.store.task_by_id("task-404").is_none());
}

#[tokio::test]
async fn tasks_must_reference_known_client_and_assignee() {
    let harness = Harness::signed_in().await;
    let acme = harness.store.add_client(new_client("Acme")).await.unwrap();

    let orphan = harness.store.add_task(new_task("Brief", "client-missing")).await;
    assert!(matches!(orphan, Err(AgencyError::Validation(msg)) if msg.contains("client_id")));

    let mut ghost_assignee = new_task("Brief", &acme.id);
    ghost_assignee.assignee_id = Some("user-missing".to_string());
    let ghost = harness.store.add_task(ghost_assignee).await;
    assert!(matches!(ghost, Err(AgencyError::Validation(msg)) if msg.contains("assignee_id")));

    let mut assigned = new_task("Brief", &acme.id);
    assigned.assignee_id = Some(harness.admin.id.clone());
    let task = harness.store.add_task(assigned).await.unwrap();
    assert_eq!(harness.store.tasks_by_assignee(&harness.admin.id), vec![task]);
}

#[tokio::test]
async fn any_status_can_be_set_directly() {
    let harness = Harness::signed_in().await;
    let acme = harness.store.add_client(new_client("Acme")).await.unwrap();
    let mut draft = new_task("Brief", &acme.id);
    draft.status = TaskStatus::Completed;
    let mut task = harness.store.add_task(draft).await.unwrap();

    task.status = TaskStatus::Pending;
    let reopened = harness.store.update_task(task).await.unwrap();
    assert_eq!(reopened.status, TaskStatus::Pending);

    let change = harness.store.change_logs().pop().unwrap();
    assert_eq!(change.details["status"], json!({ "from": "completed", "to": "pending" }));
}

#[tokio::test]
async fn change_log_ids_strictly_increase() {
    let harness = Harness::signed_in().await;
    let acme = harness.store.add_client(new_client("Acme")).await.unwrap();
    let task = harness.store.add_task(new_task("Brief", &acme.id)).await.unwrap();
    harness.store.delete_task(&task.id).await.unwrap();
    harness.store.delete_client(&acme.id).await.unwrap();

    let ids: Vec<u64> = harness.store.change_logs().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn lookups_by_name_ignore_case_and_padding() {
    let harness = Harness::signed_in().await;
    let acme = harness.store.add_client(new_client("Acme")).await.unwrap();
    harness.store.add_client(new_client("Globex")).await.unwrap();
    let mut assigned = new_task("Brief", &acme.id);
    assigned.assignee_id = Some(harness.admin.id.clone());
    let task = harness.store.add_task(assigned).await.unwrap();

    assert_eq!(harness.store.tasks_by_client_name("  acme "), vec![task.clone()]);
    assert!(harness.store.tasks_by_client_name("Globex").is_empty());
    assert!(harness.store.tasks_by_client_name("Initech").is_empty());

    assert_eq!(harness.store.tasks_by_assignee_name(" ANA GARCÍA"), vec![task]);
    assert!(harness.store.tasks_by_assignee_name("Nobody").is_empty());
}

#[tokio::test]
async fn task_created_after_sign_out_is_not_merged() {
    let harness = Harness::signed_in().await;
    let acme = harness.store.add_client(new_client("Acme")).await.unwrap();
    let changes_before = harness.store.change_logs().len();
    let gate = harness.remote.hold("tasks.create");

    let (created, ()) = tokio::join!(harness.store.add_task(new_task("Brief", &acme.id)), async {
        while harness.remote.calls("tasks.create") == 0 {
            tokio::task::yield_now().await;
        }
        harness.store.logout().await;
        gate.notify_one();
    });

    let created = created.expect("the service accepted the task");
    assert_eq!(harness.remote.stored_tasks(), vec![created]);
    assert!(!harness.store.is_logged_in());
    assert!(harness.store.tasks().is_empty());
    assert!(harness.store.clients().is_empty());
    assert_eq!(harness.store.change_logs().len(), changes_before);
    assert!(harness.store.activity_logs().iter().all(|a| a.action != "Added task: Brief"));
}

#[tokio::test]
async fn task_removed_during_update_is_not_logged() {
    let harness = Harness::signed_in().await;
    let acme = harness.store.add_client(new_client("Acme")).await.unwrap();
    let task = harness.store.add_task(new_task("Brief", &acme.id)).await.unwrap();
    let changes_before = harness.store.change_logs().len();
    let gate = harness.remote.hold("tasks.update");

    let mut edited = task.clone();
    edited.title = "Final brief".to_string();
    let (updated, ()) = tokio::join!(harness.store.update_task(edited), async {
        while harness.remote.calls("tasks.update") == 0 {
            tokio::task::yield_now().await;
        }
        harness.remote.forget_task(&task.id);
        harness.store.refresh().await;
        gate.notify_one();
    });

    assert_eq!(updated.unwrap().title, "Final brief");
    assert!(harness.store.task_by_id(&task.id).is_none());
    assert_eq!(harness.store.change_logs().len(), changes_before);
    assert_eq!(client_count(&harness.store, &acme.id), 0);
    assert_task_counts_consistent(&harness.store);
}
