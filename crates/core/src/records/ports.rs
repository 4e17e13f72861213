//! Port interfaces for the remote data service
//!
//! One gateway per mirrored collection. The store only ever replaces its
//! local copy with what these return, so implementations must echo the
//! server-assigned ids and timestamps.

use agencydesk_domain::{
    Client, EntityCount, NewClient, NewTask, NewUserRecord, Password, Result, Task, User,
};
use async_trait::async_trait;

/// Remote user profiles
#[async_trait]
pub trait UserGateway: Send + Sync {
    /// Fetch every profile
    async fn list(&self) -> Result<Vec<User>>;

    /// Register a profile together with its initial password
    async fn create(&self, user: NewUserRecord) -> Result<User>;

    /// Replace a profile, optionally setting a new password
    async fn update(&self, user: User, password: Option<Password>) -> Result<User>;
}

/// Remote clients
#[async_trait]
pub trait ClientGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Client>>;

    async fn create(&self, client: NewClient) -> Result<Client>;

    async fn update(&self, client: Client) -> Result<Client>;

    /// Delete a client. The service removes its tasks in storage.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Remote tasks
#[async_trait]
pub trait TaskGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Task>>;

    async fn create(&self, task: NewTask) -> Result<Task>;

    async fn update(&self, task: Task) -> Result<Task>;

    async fn delete(&self, id: &str) -> Result<()>;

    /// Server-side task totals keyed by client id
    async fn count_by_client(&self) -> Result<Vec<EntityCount>>;

    /// Server-side task totals keyed by assignee id. Unassigned tasks are
    /// not counted.
    async fn count_by_user(&self) -> Result<Vec<EntityCount>>;
}
