//! Dashboard aggregates
//!
//! Pure functions over the mirrored collections. The store calls these from
//! its getters while holding a read lock, so none of them perform I/O.

use std::collections::{BTreeMap, HashMap};

use agencydesk_domain::{
    ActivityLog, Client, ClientTaskCount, DailyActivityCount, DailyTaskCount, Task,
    TaskStatus, TaskStatusDistribution, User, UserActivityCount, UserTaskCount,
};

/// Number of tasks that reference `client_id`.
pub fn task_count_for(tasks: &[Task], client_id: &str) -> u32 {
    let count = tasks.iter().filter(|t| t.client_id == client_id).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Recompute `task_count` for every client from `tasks`.
pub fn recount_all(clients: &mut [Client], tasks: &[Task]) {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for task in tasks {
        *counts.entry(task.client_id.as_str()).or_default() += 1;
    }
    for client in clients {
        client.task_count = counts.get(client.id.as_str()).copied().unwrap_or(0);
    }
}

/// Recompute `task_count` for the clients named in `client_ids` only.
pub fn recount(clients: &mut [Client], tasks: &[Task], client_ids: &[&str]) {
    for client in clients.iter_mut().filter(|c| client_ids.contains(&c.id.as_str())) {
        client.task_count = task_count_for(tasks, &client.id);
    }
}

/// Activity entries per UTC calendar day, ascending by date.
pub fn daily_activity_count(logs: &[ActivityLog]) -> Vec<DailyActivityCount> {
    let mut per_day: BTreeMap<_, usize> = BTreeMap::new();
    for entry in logs {
        *per_day.entry(entry.timestamp.date_naive()).or_default() += 1;
    }
    per_day.into_iter().map(|(date, count)| DailyActivityCount { date, count }).collect()
}

/// Activity entries per user name, most active first. Ties are broken by
/// name so the order is stable.
pub fn user_activity_counts(logs: &[ActivityLog]) -> Vec<UserActivityCount> {
    let mut per_user: HashMap<&str, usize> = HashMap::new();
    for entry in logs {
        *per_user.entry(entry.user_name.as_str()).or_default() += 1;
    }

    let mut counts: Vec<UserActivityCount> = per_user
        .into_iter()
        .map(|(user, count)| UserActivityCount { user: user.to_string(), count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.user.cmp(&b.user)));
    counts
}

/// Tasks per client, including clients without tasks, highest count first.
pub fn task_count_by_client(clients: &[Client], tasks: &[Task]) -> Vec<ClientTaskCount> {
    let mut counts: Vec<ClientTaskCount> = clients
        .iter()
        .map(|client| ClientTaskCount {
            client_id: client.id.clone(),
            client_name: client.name.clone(),
            count: tasks.iter().filter(|t| t.client_id == client.id).count(),
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.client_name.cmp(&b.client_name)));
    counts
}

/// Assigned tasks per user, highest count first. Users without tasks and
/// unassigned tasks are left out.
pub fn task_count_by_user(users: &[User], tasks: &[Task]) -> Vec<UserTaskCount> {
    let mut counts: Vec<UserTaskCount> = users
        .iter()
        .map(|user| UserTaskCount {
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            count: tasks
                .iter()
                .filter(|t| t.assignee_id.as_deref() == Some(user.id.as_str()))
                .count(),
        })
        .filter(|row| row.count > 0)
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.user_name.cmp(&b.user_name)));
    counts
}

pub fn task_status_distribution(tasks: &[Task]) -> TaskStatusDistribution {
    tasks.iter().fold(TaskStatusDistribution::default(), |mut dist, task| {
        match task.status {
            TaskStatus::Pending => dist.pending += 1,
            TaskStatus::InProgress => dist.in_progress += 1,
            TaskStatus::Completed => dist.completed += 1,
        }
        dist
    })
}

/// Tasks per due date, ascending. Tasks without a due date are skipped.
///
/// `assignee_id` narrows the count to one user; `completed_only` keeps only
/// completed tasks.
pub fn tasks_due_per_day(
    tasks: &[Task],
    assignee_id: Option<&str>,
    completed_only: bool,
) -> Vec<DailyTaskCount> {
    let mut per_day: BTreeMap<_, usize> = BTreeMap::new();
    let selected = tasks
        .iter()
        .filter(|t| assignee_id.map_or(true, |id| t.assignee_id.as_deref() == Some(id)))
        .filter(|t| !completed_only || t.status == TaskStatus::Completed);
    for task in selected {
        if let Some(date) = task.due_date {
            *per_day.entry(date).or_default() += 1;
        }
    }
    per_day.into_iter().map(|(date, count)| DailyTaskCount { date, count }).collect()
}
