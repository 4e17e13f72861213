//! Client administration

use agencydesk_domain::constants::LOCATION_CLIENTS;
use agencydesk_domain::{AgencyError, ChangeAction, Client, EntityKind, NewClient, Result};
use serde_json::json;
use tracing::{debug, info, instrument};

use super::state::{replace, upsert};
use super::{DataStore, Mutation};
use crate::aggregates;
use crate::audit::diff::{field_diff, snapshot, BOOKKEEPING_FIELDS};
use crate::validation;

impl DataStore {
    /// Register a new client. Its counter starts from the tasks already
    /// loaded for it, normally zero.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn add_client(&self, draft: NewClient) -> Result<Client> {
        validation::new_client(&draft)?;
        let owner = self.session_owner();

        let mut created = self
            .clients_api
            .create(draft)
            .await
            .map_err(|err| self.remote_failure("Failed to add client", err))?;

        let entries = {
            let mut state = self.state.write();
            if Self::session_changed(&state, owner.as_deref(), "add_client") {
                return Ok(created);
            }
            created.task_count = aggregates::task_count_for(&state.tasks, &created.id);
            upsert(&mut state.clients, created.clone());
            Self::audit_mutation(
                &mut state,
                Mutation {
                    kind: EntityKind::Client,
                    entity_id: &created.id,
                    action: ChangeAction::Create,
                    description: format!("Added client: {}", created.name),
                    location: LOCATION_CLIENTS,
                    details: snapshot(&created),
                },
            )
        };
        info!(client_id = %created.id, "Client added");
        self.commit_audit(entries).await;
        Ok(created)
    }

    /// Save an edited client. The task counter is derived locally and never
    /// taken from the caller or the service.
    #[instrument(skip(self, client), fields(client_id = %client.id))]
    pub async fn update_client(&self, client: Client) -> Result<Client> {
        validation::client(&client)?;
        let existing = self
            .state
            .read()
            .client(&client.id)
            .cloned()
            .ok_or_else(|| AgencyError::NotFound(format!("client {}", client.id)))?;
        let owner = self.session_owner();

        let mut updated = self
            .clients_api
            .update(client)
            .await
            .map_err(|err| self.remote_failure("Failed to update client", err))?;

        let entries = {
            let mut state = self.state.write();
            if Self::session_changed(&state, owner.as_deref(), "update_client") {
                return Ok(updated);
            }
            updated.task_count = aggregates::task_count_for(&state.tasks, &updated.id);
            if !replace(&mut state.clients, updated.clone()) {
                debug!(client_id = %updated.id, "Client left the collection during update");
                return Ok(updated);
            }
            let mut ignored = BOOKKEEPING_FIELDS.to_vec();
            ignored.push("task_count");
            Self::audit_mutation(
                &mut state,
                Mutation {
                    kind: EntityKind::Client,
                    entity_id: &updated.id,
                    action: ChangeAction::Update,
                    description: format!("Updated client: {}", updated.name),
                    location: LOCATION_CLIENTS,
                    details: field_diff(&existing, &updated, &ignored),
                },
            )
        };
        self.commit_audit(entries).await;
        Ok(updated)
    }

    /// Delete a client together with its tasks. Returns the number of tasks
    /// removed.
    #[instrument(skip(self))]
    pub async fn delete_client(&self, id: &str) -> Result<usize> {
        let existing = self
            .state
            .read()
            .client(id)
            .cloned()
            .ok_or_else(|| AgencyError::NotFound(format!("client {id}")))?;
        let owner = self.session_owner();

        self.clients_api
            .delete(id)
            .await
            .map_err(|err| self.remote_failure("Failed to delete client", err))?;

        let (entries, removed) = {
            let mut state = self.state.write();
            if Self::session_changed(&state, owner.as_deref(), "delete_client") {
                return Ok(0);
            }
            state.clients.retain(|c| c.id != id);
            let removed: Vec<String> = state
                .tasks
                .iter()
                .filter(|t| t.client_id == id)
                .map(|t| t.id.clone())
                .collect();
            state.tasks.retain(|t| t.client_id != id);
            let removed_count = removed.len();

            let entries = Self::audit_mutation(
                &mut state,
                Mutation {
                    kind: EntityKind::Client,
                    entity_id: id,
                    action: ChangeAction::Delete,
                    description: format!(
                        "Deleted client: {} and {} associated tasks",
                        existing.name, removed_count
                    ),
                    location: LOCATION_CLIENTS,
                    details: json!({
                        "client": snapshot(&existing),
                        "removed_task_ids": removed,
                    }),
                },
            );
            (entries, removed_count)
        };
        info!(client_id = %id, removed_tasks = removed, "Client deleted");
        self.commit_audit(entries).await;
        Ok(removed)
    }
}
