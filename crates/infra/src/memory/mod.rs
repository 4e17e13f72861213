//! Self-contained backend for offline use and tests
//!
//! [`InMemoryBackend`] implements every gateway port against process-local
//! collections. It behaves like the remote service where the store can
//! observe it: ids and timestamps are assigned here, deleting a client
//! removes its tasks, clients report their live task count, and credentials
//! are checked against Argon2 hashes.

use std::collections::HashMap;

use agencydesk_common::security::{CredentialHasher, HashedPassword};
use agencydesk_core::{AuthGateway, ClientGateway, TaskGateway, UserGateway};
use agencydesk_domain::{
    AgencyError, Client, EntityCount, NewClient, NewTask, NewUserRecord, Password, Result,
    SignInResult, Task, User,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tokio::task;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::errors::InfraError;

struct Account {
    user: User,
    hash: HashedPassword,
}

#[derive(Default)]
struct Collections {
    accounts: Vec<Account>,
    clients: Vec<Client>,
    tasks: Vec<Task>,
    /// Session token to user id
    sessions: HashMap<String, String>,
    /// Addresses a recovery email was sent to, oldest first
    recovery_outbox: Vec<String>,
}

impl Collections {
    fn account_by_email(&self, email: &str) -> Option<&Account> {
        let email = email.trim();
        self.accounts.iter().find(|a| a.user.email.eq_ignore_ascii_case(email))
    }

    fn email_taken(&self, email: &str, except_id: Option<&str>) -> bool {
        self.account_by_email(email).is_some_and(|a| Some(a.user.id.as_str()) != except_id)
    }

    fn with_task_count(&self, client: &Client) -> Client {
        let count = self.tasks.iter().filter(|t| t.client_id == client.id).count();
        Client { task_count: u32::try_from(count).unwrap_or(u32::MAX), ..client.clone() }
    }

    fn require_client(&self, client_id: &str) -> Result<()> {
        if self.clients.iter().any(|c| c.id == client_id) {
            Ok(())
        } else {
            Err(AgencyError::Validation(format!("client_id: unknown client {client_id}")))
        }
    }
}

/// Users, clients and tasks held in memory
pub struct InMemoryBackend {
    data: RwLock<Collections>,
    hasher: CredentialHasher,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self { data: RwLock::new(Collections::default()), hasher: CredentialHasher::new() }
    }

    /// Register an account directly, e.g. to seed an administrator.
    pub async fn register(&self, record: NewUserRecord) -> Result<User> {
        self.insert_account(record).await
    }

    /// Every address a recovery email was sent to, oldest first.
    pub fn recovery_outbox(&self) -> Vec<String> {
        self.data.read().recovery_outbox.clone()
    }

    pub fn active_sessions(&self) -> usize {
        self.data.read().sessions.len()
    }

    async fn hash(&self, password: &Password) -> Result<HashedPassword> {
        let hasher = self.hasher.clone();
        let plain = password.expose().to_string();
        task::spawn_blocking(move || hasher.hash(&plain))
            .await
            .map_err(|e| AgencyError::Internal(format!("hashing task failed: {e}")))?
            .map_err(|e| AgencyError::from(InfraError::from(e)))
    }

    async fn verify(&self, password: &Password, hash: HashedPassword) -> Result<bool> {
        let hasher = self.hasher.clone();
        let plain = password.expose().to_string();
        task::spawn_blocking(move || hasher.verify(&plain, &hash))
            .await
            .map_err(|e| AgencyError::Internal(format!("verification task failed: {e}")))?
            .map_err(|e| AgencyError::from(InfraError::from(e)))
    }

    async fn insert_account(&self, record: NewUserRecord) -> Result<User> {
        if self.data.read().email_taken(&record.email, None) {
            return Err(email_conflict(&record.email));
        }
        let hash = self.hash(&record.password).await?;

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7().to_string(),
            name: record.name,
            email: record.email.trim().to_string(),
            role: record.role,
            status: record.status,
            avatar: record.avatar,
            created_at: now,
            updated_at: now,
        };

        let mut data = self.data.write();
        // Re-check under the write lock; hashing ran unlocked.
        if data.email_taken(&user.email, None) {
            return Err(email_conflict(&user.email));
        }
        data.accounts.push(Account { user: user.clone(), hash });
        debug!(user_id = %user.id, "Account registered");
        Ok(user)
    }
}

#[async_trait]
impl UserGateway for InMemoryBackend {
    async fn list(&self) -> Result<Vec<User>> {
        Ok(self.data.read().accounts.iter().map(|a| a.user.clone()).collect())
    }

    async fn create(&self, user: NewUserRecord) -> Result<User> {
        self.insert_account(user).await
    }

    #[instrument(skip(self, user, password), fields(user_id = %user.id))]
    async fn update(&self, user: User, password: Option<Password>) -> Result<User> {
        let hash = match &password {
            Some(password) => Some(self.hash(password).await?),
            None => None,
        };

        let mut data = self.data.write();
        if data.email_taken(&user.email, Some(&user.id)) {
            return Err(email_conflict(&user.email));
        }
        let account = data
            .accounts
            .iter_mut()
            .find(|a| a.user.id == user.id)
            .ok_or_else(|| AgencyError::NotFound(format!("user {}", user.id)))?;

        account.user = User { created_at: account.user.created_at, updated_at: Utc::now(), ..user };
        if let Some(hash) = hash {
            account.hash = hash;
        }
        Ok(account.user.clone())
    }
}

#[async_trait]
impl ClientGateway for InMemoryBackend {
    async fn list(&self) -> Result<Vec<Client>> {
        let data = self.data.read();
        Ok(data.clients.iter().map(|c| data.with_task_count(c)).collect())
    }

    async fn create(&self, client: NewClient) -> Result<Client> {
        let now = Utc::now();
        let client = Client {
            id: Uuid::now_v7().to_string(),
            name: client.name,
            contact: client.contact,
            email: client.email,
            phone: client.phone,
            industry: client.industry,
            status: client.status,
            task_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.data.write().clients.push(client.clone());
        Ok(client)
    }

    async fn update(&self, client: Client) -> Result<Client> {
        let mut data = self.data.write();
        let stored = data
            .clients
            .iter_mut()
            .find(|c| c.id == client.id)
            .ok_or_else(|| AgencyError::NotFound(format!("client {}", client.id)))?;

        *stored = Client { created_at: stored.created_at, updated_at: Utc::now(), ..client };
        let stored = stored.clone();
        Ok(data.with_task_count(&stored))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<()> {
        let mut data = self.data.write();
        let before = data.clients.len();
        data.clients.retain(|c| c.id != id);
        if data.clients.len() == before {
            return Err(AgencyError::NotFound(format!("client {id}")));
        }
        let tasks_before = data.tasks.len();
        data.tasks.retain(|t| t.client_id != id);
        debug!(removed_tasks = tasks_before - data.tasks.len(), "Client deleted");
        Ok(())
    }
}

#[async_trait]
impl TaskGateway for InMemoryBackend {
    async fn list(&self) -> Result<Vec<Task>> {
        Ok(self.data.read().tasks.clone())
    }

    async fn create(&self, task: NewTask) -> Result<Task> {
        let mut data = self.data.write();
        data.require_client(&task.client_id)?;

        let now = Utc::now();
        let task = Task {
            id: Uuid::now_v7().to_string(),
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            assignee_id: task.assignee_id,
            client_id: task.client_id,
            due_date: task.due_date,
            created_at: now,
            updated_at: now,
        };
        data.tasks.push(task.clone());
        Ok(task)
    }

    async fn update(&self, task: Task) -> Result<Task> {
        let mut data = self.data.write();
        data.require_client(&task.client_id)?;
        let stored = data
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| AgencyError::NotFound(format!("task {}", task.id)))?;

        *stored = Task { created_at: stored.created_at, updated_at: Utc::now(), ..task };
        Ok(stored.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut data = self.data.write();
        let before = data.tasks.len();
        data.tasks.retain(|t| t.id != id);
        if data.tasks.len() == before {
            return Err(AgencyError::NotFound(format!("task {id}")));
        }
        Ok(())
    }

    async fn count_by_client(&self) -> Result<Vec<EntityCount>> {
        let data = self.data.read();
        Ok(count_by(data.tasks.iter().map(|t| Some(t.client_id.as_str()))))
    }

    async fn count_by_user(&self) -> Result<Vec<EntityCount>> {
        let data = self.data.read();
        Ok(count_by(data.tasks.iter().map(|t| t.assignee_id.as_deref())))
    }
}

fn email_conflict(email: &str) -> AgencyError {
    AgencyError::Conflict(format!("email {email} is already registered"))
}

/// Totals per key in first-seen order. `None` keys are skipped.
fn count_by<'a>(keys: impl Iterator<Item = Option<&'a str>>) -> Vec<EntityCount> {
    let mut counts: Vec<EntityCount> = Vec::new();
    for key in keys.flatten() {
        match counts.iter_mut().find(|c| c.id == key) {
            Some(entry) => entry.count += 1,
            None => counts.push(EntityCount { id: key.to_string(), count: 1 }),
        }
    }
    counts
}

#[async_trait]
impl AuthGateway for InMemoryBackend {
    #[instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &Password) -> Result<SignInResult> {
        let found = self
            .data
            .read()
            .account_by_email(email)
            .map(|a| (a.user.id.clone(), a.hash.clone()));
        let Some((user_id, hash)) = found else {
            return Ok(SignInResult::UnknownEmail);
        };

        if !self.verify(password, hash).await? {
            return Ok(SignInResult::WrongPassword);
        }

        let mut data = self.data.write();
        let user = data
            .accounts
            .iter()
            .find(|a| a.user.id == user_id)
            .map(|a| a.user.clone())
            .ok_or_else(|| AgencyError::NotFound(format!("user {user_id}")))?;
        let token = Uuid::new_v4().simple().to_string();
        data.sessions.insert(token.clone(), user_id);
        info!(user_id = %user.id, "Session opened");
        Ok(SignInResult::Authenticated { user, token })
    }

    async fn sign_up(&self, profile: NewUserRecord) -> Result<User> {
        self.insert_account(profile).await
    }

    async fn sign_out(&self, token: &str) -> Result<()> {
        if self.data.write().sessions.remove(token).is_some() {
            debug!("Session closed");
        }
        Ok(())
    }

    async fn resume_session(&self, token: &str) -> Result<User> {
        let data = self.data.read();
        let user_id = data
            .sessions
            .get(token)
            .ok_or_else(|| AgencyError::Auth("session expired".to_string()))?;
        data.accounts
            .iter()
            .find(|a| &a.user.id == user_id)
            .map(|a| a.user.clone())
            .ok_or_else(|| AgencyError::Auth("session user no longer exists".to_string()))
    }

    #[instrument(skip(self))]
    async fn send_password_recovery(&self, email: &str) -> Result<bool> {
        let mut data = self.data.write();
        let Some(address) = data.account_by_email(email).map(|a| a.user.email.clone()) else {
            return Ok(false);
        };
        data.recovery_outbox.push(address);
        Ok(true)
    }
}
