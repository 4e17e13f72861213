//! Read-only lookups and dashboard aggregates

use agencydesk_domain::{
    Client, ClientTaskCount, DailyActivityCount, DailyTaskCount, EntityCount, Result, Task,
    TaskStatusDistribution, User, UserActivityCount, UserTaskCount,
};

use super::DataStore;
use crate::aggregates;

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

impl DataStore {
    /// Loaded user with this id
    pub fn user_by_id(&self, id: &str) -> Option<User> {
        self.state.read().user(id).cloned()
    }

    /// Loaded client with this id
    pub fn client_by_id(&self, id: &str) -> Option<Client> {
        self.state.read().client(id).cloned()
    }

    /// Loaded task with this id
    pub fn task_by_id(&self, id: &str) -> Option<Task> {
        self.state.read().task(id).cloned()
    }

    /// Case-insensitive email lookup
    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.state.read().user_by_email(email).cloned()
    }

    /// Tasks belonging to a client
    pub fn tasks_by_client(&self, client_id: &str) -> Vec<Task> {
        let state = self.state.read();
        state.tasks.iter().filter(|t| t.client_id == client_id).cloned().collect()
    }

    /// Tasks assigned to a user
    pub fn tasks_by_assignee(&self, user_id: &str) -> Vec<Task> {
        let state = self.state.read();
        state.tasks.iter().filter(|t| t.assignee_id.as_deref() == Some(user_id)).cloned().collect()
    }

    /// Tasks of the client called `name`. Empty when no client has that
    /// name.
    pub fn tasks_by_client_name(&self, name: &str) -> Vec<Task> {
        let state = self.state.read();
        let Some(client) = state.clients.iter().find(|c| same_name(&c.name, name)) else {
            return Vec::new();
        };
        state.tasks.iter().filter(|t| t.client_id == client.id).cloned().collect()
    }

    /// Tasks assigned to the user called `name`. Empty when no user has
    /// that name.
    pub fn tasks_by_assignee_name(&self, name: &str) -> Vec<Task> {
        let state = self.state.read();
        let Some(user) = state.users.iter().find(|u| same_name(&u.name, name)) else {
            return Vec::new();
        };
        state
            .tasks
            .iter()
            .filter(|t| t.assignee_id.as_deref() == Some(user.id.as_str()))
            .cloned()
            .collect()
    }

    /// Activity entries per UTC day, oldest first
    pub fn daily_activity_count(&self) -> Vec<DailyActivityCount> {
        aggregates::daily_activity_count(self.state.read().trail.activity())
    }

    /// Activity entries per user, busiest first
    pub fn user_activity_counts(&self) -> Vec<UserActivityCount> {
        aggregates::user_activity_counts(self.state.read().trail.activity())
    }

    /// Task totals per loaded client
    pub fn task_count_by_client(&self) -> Vec<ClientTaskCount> {
        let state = self.state.read();
        aggregates::task_count_by_client(&state.clients, &state.tasks)
    }

    /// Task totals per assignee. Unassigned tasks are not counted.
    pub fn task_count_by_user(&self) -> Vec<UserTaskCount> {
        let state = self.state.read();
        aggregates::task_count_by_user(&state.users, &state.tasks)
    }

    /// Number of tasks in each status
    pub fn task_status_distribution(&self) -> TaskStatusDistribution {
        aggregates::task_status_distribution(&self.state.read().tasks)
    }

    /// Tasks due per day, optionally for one assignee or only completed ones
    pub fn tasks_due_per_day(
        &self,
        user_id: Option<&str>,
        completed_only: bool,
    ) -> Vec<DailyTaskCount> {
        aggregates::tasks_due_per_day(&self.state.read().tasks, user_id, completed_only)
    }

    /// Task totals per client as computed by the remote service
    pub async fn remote_task_counts_by_client(&self) -> Result<Vec<EntityCount>> {
        self.tasks_api
            .count_by_client()
            .await
            .map_err(|err| self.remote_failure("Failed to load task counts", err))
    }

    /// Task totals per assignee as computed by the remote service
    pub async fn remote_task_counts_by_user(&self) -> Result<Vec<EntityCount>> {
        self.tasks_api
            .count_by_user()
            .await
            .map_err(|err| self.remote_failure("Failed to load task counts", err))
    }
}
