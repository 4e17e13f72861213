//! State guarded by the store's lock

use agencydesk_domain::{AuthState, Client, CollectionKind, CollectionStatus, Task, User};

use crate::audit::AuditTrail;

/// Load status of the three mirrored collections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LoadStatus {
    users: CollectionStatus,
    clients: CollectionStatus,
    tasks: CollectionStatus,
}

impl LoadStatus {
    pub(crate) fn get(&self, kind: CollectionKind) -> &CollectionStatus {
        match kind {
            CollectionKind::Users => &self.users,
            CollectionKind::Clients => &self.clients,
            CollectionKind::Tasks => &self.tasks,
        }
    }

    pub(crate) fn set(&mut self, kind: CollectionKind, status: CollectionStatus) {
        match kind {
            CollectionKind::Users => self.users = status,
            CollectionKind::Clients => self.clients = status,
            CollectionKind::Tasks => self.tasks = status,
        }
    }

    pub(crate) fn set_all(&mut self, status: &CollectionStatus) {
        self.users = status.clone();
        self.clients = status.clone();
        self.tasks = status.clone();
    }
}

#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub(crate) auth: AuthState,
    pub(crate) users: Vec<User>,
    pub(crate) clients: Vec<Client>,
    pub(crate) tasks: Vec<Task>,
    pub(crate) trail: AuditTrail,
    pub(crate) status: LoadStatus,
}

impl StoreState {
    /// The signed-in user, cloned so it can outlive the lock guard.
    pub(crate) fn actor(&self) -> Option<User> {
        self.auth.user().cloned()
    }

    pub(crate) fn clear_collections(&mut self) {
        self.users.clear();
        self.clients.clear();
        self.tasks.clear();
        self.status = LoadStatus::default();
    }

    pub(crate) fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub(crate) fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub(crate) fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub(crate) fn user_by_email(&self, email: &str) -> Option<&User> {
        let email = email.trim();
        self.users.iter().find(|u| u.email.eq_ignore_ascii_case(email))
    }
}

/// Entities addressed by a string id
pub(crate) trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for User {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Client {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Task {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Replace the entry with the same id, or append it when absent.
pub(crate) fn upsert<T: Keyed>(items: &mut Vec<T>, item: T) {
    match items.iter().position(|existing| existing.key() == item.key()) {
        Some(index) => items[index] = item,
        None => items.push(item),
    }
}

/// Replace the entry with the same id. Returns `false` when the entry is no
/// longer present.
pub(crate) fn replace<T: Keyed>(items: &mut [T], item: T) -> bool {
    match items.iter().position(|existing| existing.key() == item.key()) {
        Some(index) => {
            items[index] = item;
            true
        }
        None => false,
    }
}
