//! Filtering, ordering and counters behind the to-do view.

use chrono::NaiveDate;
use shared_types::{
    SortDirection, Task, TaskFilter, TaskSort, TaskSortField, TaskStats, TaskStatus, TasksResponse,
};
use std::cmp::Ordering;

/// An open task whose due date is before `today`.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    !task.status.is_closed() && task.due_on().is_some_and(|due| due < today)
}

fn contains_ignoring_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

pub fn matches_filter(task: &Task, filter: &TaskFilter, today: NaiveDate) -> bool {
    if filter.status.is_some_and(|status| status != task.status) {
        return false;
    }
    if filter.priority.is_some_and(|priority| priority != task.priority) {
        return false;
    }

    if let Some(assignee) = filter.assignee.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        let assigned = task
            .assigned_to
            .as_deref()
            .is_some_and(|current| current.trim().to_lowercase() == assignee.to_lowercase());
        if !assigned {
            return false;
        }
    }

    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        let found = contains_ignoring_case(&task.title, &needle)
            || task
                .description
                .as_deref()
                .is_some_and(|d| contains_ignoring_case(d, &needle));
        if !found {
            return false;
        }
    }

    !filter.overdue_only || is_overdue(task, today)
}

pub fn filter_tasks(tasks: Vec<Task>, filter: &TaskFilter, today: NaiveDate) -> Vec<Task> {
    tasks
        .into_iter()
        .filter(|task| matches_filter(task, filter, today))
        .collect()
}

fn compare(a: &Task, b: &Task, sort: TaskSort) -> Ordering {
    let directed = |ordering: Ordering| match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    };

    match sort.field {
        // undated tasks go last whichever way the list is sorted
        TaskSortField::DueDate => match (a.due_on(), b.due_on()) {
            (Some(x), Some(y)) => directed(x.cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        TaskSortField::Priority => directed(a.priority.cmp(&b.priority)),
        TaskSortField::CreatedAt => directed(a.created_at.cmp(&b.created_at)),
        TaskSortField::Title => directed(a.title.to_lowercase().cmp(&b.title.to_lowercase())),
    }
}

/// Sorts in place. Ties fall back to ascending id.
pub fn sort_tasks(tasks: &mut [Task], sort: TaskSort) {
    tasks.sort_by(|a, b| compare(a, b, sort).then_with(|| a.id.cmp(&b.id)));
}

pub fn task_stats(tasks: &[Task], today: NaiveDate) -> TaskStats {
    let mut stats = TaskStats {
        total: tasks.len(),
        ..Default::default()
    };

    for task in tasks {
        match task.status {
            TaskStatus::Todo => stats.todo += 1,
            TaskStatus::InProgress => stats.in_progress += 1,
            TaskStatus::Review => stats.review += 1,
            TaskStatus::Done => stats.done += 1,
            TaskStatus::Cancelled => stats.cancelled += 1,
        }
        if is_overdue(task, today) {
            stats.overdue += 1;
        }
    }

    let active = stats.total - stats.cancelled;
    if active > 0 {
        stats.completion_rate = (stats.done * 100 / active) as u8;
    }

    stats
}

/// Filters, sorts and summarizes `tasks`. Counters cover the filtered set.
pub fn build_task_view(
    tasks: Vec<Task>,
    filter: &TaskFilter,
    sort: TaskSort,
    today: NaiveDate,
) -> TasksResponse {
    let mut tasks = filter_tasks(tasks, filter, today);
    sort_tasks(&mut tasks, sort);
    let stats = task_stats(&tasks, today);

    TasksResponse { tasks, stats }
}
