//! Task administration
//!
//! Every confirmed task mutation re-derives `task_count` on the clients it
//! touches.

use agencydesk_domain::constants::LOCATION_TASKS;
use agencydesk_domain::{AgencyError, ChangeAction, EntityKind, NewTask, Result, Task};
use tracing::{debug, info, instrument};

use super::state::{replace, upsert, StoreState};
use super::{DataStore, Mutation};
use crate::aggregates;
use crate::audit::diff::{field_diff, snapshot, BOOKKEEPING_FIELDS};
use crate::validation;

/// Check that a task's references resolve against the loaded collections.
fn check_references(state: &StoreState, client_id: &str, assignee_id: Option<&str>) -> Result<()> {
    if state.client(client_id).is_none() {
        return Err(AgencyError::Validation(format!("client_id: Unknown client {client_id}")));
    }
    if let Some(assignee_id) = assignee_id {
        if state.user(assignee_id).is_none() {
            return Err(AgencyError::Validation(format!(
                "assignee_id: Unknown user {assignee_id}"
            )));
        }
    }
    Ok(())
}

impl DataStore {
    /// Create a task for a loaded client and bump that client's counter.
    #[instrument(skip(self, draft), fields(client_id = %draft.client_id))]
    pub async fn add_task(&self, draft: NewTask) -> Result<Task> {
        validation::new_task(&draft)?;
        check_references(&self.state.read(), &draft.client_id, draft.assignee_id.as_deref())?;
        let owner = self.session_owner();

        let created = self
            .tasks_api
            .create(draft)
            .await
            .map_err(|err| self.remote_failure("Failed to add task", err))?;

        let entries = {
            let mut state = self.state.write();
            if Self::session_changed(&state, owner.as_deref(), "add_task") {
                return Ok(created);
            }
            upsert(&mut state.tasks, created.clone());
            let state = &mut *state;
            aggregates::recount(&mut state.clients, &state.tasks, &[created.client_id.as_str()]);
            Self::audit_mutation(
                state,
                Mutation {
                    kind: EntityKind::Task,
                    entity_id: &created.id,
                    action: ChangeAction::Create,
                    description: format!("Added task: {}", created.title),
                    location: LOCATION_TASKS,
                    details: snapshot(&created),
                },
            )
        };
        info!(task_id = %created.id, "Task added");
        self.commit_audit(entries).await;
        Ok(created)
    }

    /// Save an edited task. Moving a task to another client recounts both
    /// clients.
    #[instrument(skip(self, task), fields(task_id = %task.id))]
    pub async fn update_task(&self, task: Task) -> Result<Task> {
        validation::task(&task)?;
        let existing = {
            let state = self.state.read();
            let existing = state
                .task(&task.id)
                .cloned()
                .ok_or_else(|| AgencyError::NotFound(format!("task {}", task.id)))?;
            check_references(&state, &task.client_id, task.assignee_id.as_deref())?;
            existing
        };
        let owner = self.session_owner();

        let updated = self
            .tasks_api
            .update(task)
            .await
            .map_err(|err| self.remote_failure("Failed to update task", err))?;

        let entries = {
            let mut state = self.state.write();
            if Self::session_changed(&state, owner.as_deref(), "update_task") {
                return Ok(updated);
            }
            if !replace(&mut state.tasks, updated.clone()) {
                debug!(task_id = %updated.id, "Task left the collection during update");
                return Ok(updated);
            }
            let state = &mut *state;
            aggregates::recount(
                &mut state.clients,
                &state.tasks,
                &[existing.client_id.as_str(), updated.client_id.as_str()],
            );
            Self::audit_mutation(
                state,
                Mutation {
                    kind: EntityKind::Task,
                    entity_id: &updated.id,
                    action: ChangeAction::Update,
                    description: format!("Updated task: {}", updated.title),
                    location: LOCATION_TASKS,
                    details: field_diff(&existing, &updated, BOOKKEEPING_FIELDS),
                },
            )
        };
        self.commit_audit(entries).await;
        Ok(updated)
    }

    /// Delete a task and decrement its client's counter. Returns the removed
    /// task.
    #[instrument(skip(self))]
    pub async fn delete_task(&self, id: &str) -> Result<Task> {
        let existing = self
            .state
            .read()
            .task(id)
            .cloned()
            .ok_or_else(|| AgencyError::NotFound(format!("task {id}")))?;
        let owner = self.session_owner();

        self.tasks_api
            .delete(id)
            .await
            .map_err(|err| self.remote_failure("Failed to delete task", err))?;

        let entries = {
            let mut state = self.state.write();
            if Self::session_changed(&state, owner.as_deref(), "delete_task") {
                return Ok(existing);
            }
            state.tasks.retain(|t| t.id != id);
            let state = &mut *state;
            aggregates::recount(&mut state.clients, &state.tasks, &[existing.client_id.as_str()]);
            Self::audit_mutation(
                state,
                Mutation {
                    kind: EntityKind::Task,
                    entity_id: id,
                    action: ChangeAction::Delete,
                    description: format!("Deleted task: {}", existing.title),
                    location: LOCATION_TASKS,
                    details: snapshot(&existing),
                },
            )
        };
        info!(task_id = %id, "Task deleted");
        self.commit_audit(entries).await;
        Ok(existing)
    }
}
