//! Scriptable in-memory remote service
//!
//! Implements every gateway port over plain vectors. Operations can be
//! switched into failure mode by name to simulate outages, and every call
//! is counted so tests can assert that validation short-circuits before the
//! remote is touched.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use agencydesk_core::{AuthGateway, ClientGateway, TaskGateway, UserGateway};
use agencydesk_domain::{
    AgencyError, Client, EntityCount, EntityStatus, NewClient, NewTask, NewUserRecord, Password,
    Result as DomainResult, SignInResult, Task, TaskPriority, TaskStatus, User, UserRole,
};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    passwords: HashMap<String, String>,
    clients: Vec<Client>,
    tasks: Vec<Task>,
    sessions: HashMap<String, String>,
    recovery_outbox: Vec<String>,
    next_id: u64,
}

impl Tables {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

#[derive(Default)]
pub struct FakeRemote {
    tables: Mutex<Tables>,
    failing: Mutex<HashSet<&'static str>>,
    calls: Mutex<Vec<&'static str>>,
    held: Mutex<HashMap<&'static str, Arc<Notify>>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call to `operation` fail with a network error.
    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn heal(&self, operation: &'static str) {
        self.failing.lock().unwrap().remove(operation);
    }

    /// Number of calls made to `operation`
    pub fn calls(&self, operation: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == operation).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Delay the response of `operation` until the returned handle is
    /// notified. The remote change itself is applied before the wait.
    pub fn hold(&self, operation: &'static str) -> Arc<Notify> {
        self.held.lock().unwrap().entry(operation).or_default().clone()
    }

    async fn respond(&self, operation: &'static str) {
        let gate = self.held.lock().unwrap().get(operation).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn enter(&self, operation: &'static str) -> DomainResult<()> {
        self.calls.lock().unwrap().push(operation);
        if self.failing.lock().unwrap().contains(operation) {
            return Err(AgencyError::Network(format!("{operation}: simulated outage")));
        }
        Ok(())
    }

    pub fn seed_user(
        &self,
        name: &str,
        email: &str,
        role: UserRole,
        status: EntityStatus,
        password: &str,
    ) -> User {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        let user = User {
            id: tables.next_id("user"),
            name: name.to_string(),
            email: email.to_string(),
            role,
            status,
            avatar: String::new(),
            created_at: now,
            updated_at: now,
        };
        tables.passwords.insert(user.id.clone(), password.to_string());
        tables.users.push(user.clone());
        user
    }

    pub fn seed_client(&self, name: &str) -> Client {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        let client = Client {
            id: tables.next_id("client"),
            name: name.to_string(),
            contact: format!("{name} Contact"),
            email: format!("hello@{}.test", name.to_lowercase().replace(' ', "-")),
            phone: None,
            industry: "Retail".to_string(),
            status: EntityStatus::Active,
            task_count: 0,
            created_at: now,
            updated_at: now,
        };
        tables.clients.push(client.clone());
        client
    }

    pub fn seed_task(
        &self,
        title: &str,
        client_id: &str,
        assignee_id: Option<&str>,
        status: TaskStatus,
    ) -> Task {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        let task = Task {
            id: tables.next_id("task"),
            title: title.to_string(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            assignee_id: assignee_id.map(str::to_string),
            client_id: client_id.to_string(),
            due_date: None,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.push(task.clone());
        task
    }

    /// Open a session for `user_id` as if it had signed in earlier.
    pub fn open_session(&self, user_id: &str) -> String {
        let mut tables = self.tables.lock().unwrap();
        let token = tables.next_id("token");
        tables.sessions.insert(token.clone(), user_id.to_string());
        token
    }

    pub fn session_count(&self) -> usize {
        self.tables.lock().unwrap().sessions.len()
    }

    pub fn stored_tasks(&self) -> Vec<Task> {
        self.tables.lock().unwrap().tasks.clone()
    }

    /// Drop a task on the service side only, as another client would.
    pub fn forget_task(&self, id: &str) {
        self.tables.lock().unwrap().tasks.retain(|t| t.id != id);
    }

    pub fn stored_password(&self, user_id: &str) -> Option<String> {
        self.tables.lock().unwrap().passwords.get(user_id).cloned()
    }

    pub fn recovery_outbox(&self) -> Vec<String> {
        self.tables.lock().unwrap().recovery_outbox.clone()
    }
}

fn counts(keys: impl Iterator<Item = String>) -> Vec<EntityCount> {
    let mut totals: HashMap<String, usize> = HashMap::new();
    for key in keys {
        *totals.entry(key).or_default() += 1;
    }
    let mut rows: Vec<EntityCount> =
        totals.into_iter().map(|(id, count)| EntityCount { id, count }).collect();
    rows.sort_by(|a, b| a.id.cmp(&b.id));
    rows
}

#[async_trait]
impl UserGateway for FakeRemote {
    async fn list(&self) -> DomainResult<Vec<User>> {
        self.enter("users.list")?;
        Ok(self.tables.lock().unwrap().users.clone())
    }

    async fn create(&self, record: NewUserRecord) -> DomainResult<User> {
        self.enter("users.create")?;
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        let user = User {
            id: tables.next_id("user"),
            name: record.name,
            email: record.email,
            role: record.role,
            status: record.status,
            avatar: record.avatar,
            created_at: now,
            updated_at: now,
        };
        tables.passwords.insert(user.id.clone(), record.password.expose().to_string());
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, mut user: User, password: Option<Password>) -> DomainResult<User> {
        self.enter("users.update")?;
        let mut tables = self.tables.lock().unwrap();
        let slot = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| AgencyError::NotFound(format!("user {}", user.id)))?;
        user.updated_at = Utc::now();
        *slot = user.clone();
        if let Some(password) = password {
            tables.passwords.insert(user.id.clone(), password.expose().to_string());
        }
        Ok(user)
    }
}

#[async_trait]
impl ClientGateway for FakeRemote {
    async fn list(&self) -> DomainResult<Vec<Client>> {
        self.enter("clients.list")?;
        Ok(self.tables.lock().unwrap().clients.clone())
    }

    async fn create(&self, draft: NewClient) -> DomainResult<Client> {
        self.enter("clients.create")?;
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        let client = Client {
            id: tables.next_id("client"),
            name: draft.name,
            contact: draft.contact,
            email: draft.email,
            phone: draft.phone,
            industry: draft.industry,
            status: draft.status,
            task_count: 0,
            created_at: now,
            updated_at: now,
        };
        tables.clients.push(client.clone());
        Ok(client)
    }

    async fn update(&self, mut client: Client) -> DomainResult<Client> {
        self.enter("clients.update")?;
        let mut tables = self.tables.lock().unwrap();
        let slot = tables
            .clients
            .iter_mut()
            .find(|c| c.id == client.id)
            .ok_or_else(|| AgencyError::NotFound(format!("client {}", client.id)))?;
        client.updated_at = Utc::now();
        *slot = client.clone();
        Ok(client)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.enter("clients.delete")?;
        let mut tables = self.tables.lock().unwrap();
        tables.clients.retain(|c| c.id != id);
        tables.tasks.retain(|t| t.client_id != id);
        Ok(())
    }
}

#[async_trait]
impl TaskGateway for FakeRemote {
    async fn list(&self) -> DomainResult<Vec<Task>> {
        self.enter("tasks.list")?;
        Ok(self.tables.lock().unwrap().tasks.clone())
    }

    async fn create(&self, draft: NewTask) -> DomainResult<Task> {
        self.enter("tasks.create")?;
        let task = {
            let mut tables = self.tables.lock().unwrap();
            let now = Utc::now();
            let task = Task {
                id: tables.next_id("task"),
                title: draft.title,
                description: draft.description,
                status: draft.status,
                priority: draft.priority,
                assignee_id: draft.assignee_id,
                client_id: draft.client_id,
                due_date: draft.due_date,
                created_at: now,
                updated_at: now,
            };
            tables.tasks.push(task.clone());
            task
        };
        self.respond("tasks.create").await;
        Ok(task)
    }

    async fn update(&self, mut task: Task) -> DomainResult<Task> {
        self.enter("tasks.update")?;
        {
            let mut tables = self.tables.lock().unwrap();
            let slot = tables
                .tasks
                .iter_mut()
                .find(|t| t.id == task.id)
                .ok_or_else(|| AgencyError::NotFound(format!("task {}", task.id)))?;
            task.updated_at = Utc::now();
            *slot = task.clone();
        }
        self.respond("tasks.update").await;
        Ok(task)
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.enter("tasks.delete")?;
        self.tables.lock().unwrap().tasks.retain(|t| t.id != id);
        Ok(())
    }

    async fn count_by_client(&self) -> DomainResult<Vec<EntityCount>> {
        self.enter("tasks.count_by_client")?;
        let tables = self.tables.lock().unwrap();
        Ok(counts(tables.tasks.iter().map(|t| t.client_id.clone())))
    }

    async fn count_by_user(&self) -> DomainResult<Vec<EntityCount>> {
        self.enter("tasks.count_by_user")?;
        let tables = self.tables.lock().unwrap();
        Ok(counts(tables.tasks.iter().filter_map(|t| t.assignee_id.clone())))
    }
}

#[async_trait]
impl AuthGateway for FakeRemote {
    async fn sign_in(&self, email: &str, password: &Password) -> DomainResult<SignInResult> {
        self.enter("auth.sign_in")?;
        let mut tables = self.tables.lock().unwrap();
        let Some(user) = tables.users.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned()
        else {
            return Ok(SignInResult::UnknownEmail);
        };
        if tables.passwords.get(&user.id).map(String::as_str) != Some(password.expose()) {
            return Ok(SignInResult::WrongPassword);
        }
        let token = tables.next_id("token");
        tables.sessions.insert(token.clone(), user.id.clone());
        Ok(SignInResult::Authenticated { user, token })
    }

    async fn sign_up(&self, profile: NewUserRecord) -> DomainResult<User> {
        self.enter("auth.sign_up")?;
        {
            let tables = self.tables.lock().unwrap();
            if tables.users.iter().any(|u| u.email.eq_ignore_ascii_case(&profile.email)) {
                return Err(AgencyError::Conflict("Email already registered".into()));
            }
        }
        UserGateway::create(self, profile).await
    }

    async fn sign_out(&self, token: &str) -> DomainResult<()> {
        self.enter("auth.sign_out")?;
        self.tables.lock().unwrap().sessions.remove(token);
        Ok(())
    }

    async fn resume_session(&self, token: &str) -> DomainResult<User> {
        self.enter("auth.resume")?;
        let tables = self.tables.lock().unwrap();
        let user_id = tables
            .sessions
            .get(token)
            .ok_or_else(|| AgencyError::Auth("Session expired".into()))?;
        tables
            .users
            .iter()
            .find(|u| &u.id == user_id)
            .cloned()
            .ok_or_else(|| AgencyError::Auth("Session user no longer exists".into()))
    }

    async fn send_password_recovery(&self, email: &str) -> DomainResult<bool> {
        self.enter("auth.recover")?;
        let mut tables = self.tables.lock().unwrap();
        if !tables.users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Ok(false);
        }
        tables.recovery_outbox.push(email.to_string());
        Ok(true)
    }
}
