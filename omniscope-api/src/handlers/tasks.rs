use actix_web::{web, HttpResponse, Result as ActixResult};
use serde::Deserialize;
use shared_types::{
    CreateTaskRequest, SortDirection, TaskFilter, TaskPriority, TaskSort, TaskSortField,
    TaskStatus, UpdateTaskRequest,
};
use std::sync::Arc;

use crate::database::tasks as db;
use crate::database::Database;
use crate::handlers::{require_text, ApiError};

const TASK_VIEW_LIMIT: usize = 1000;

/// Query string of the to-do view. Kept flat so it maps onto plain
/// `key=value` pairs.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    assignee: Option<String>,
    search: Option<String>,
    overdue_only: Option<bool>,
    sort: Option<TaskSortField>,
    direction: Option<SortDirection>,
}

impl TaskListQuery {
    fn filter(&self) -> TaskFilter {
        TaskFilter {
            status: self.status,
            priority: self.priority,
            assignee: self.assignee.clone(),
            search: self.search.clone(),
            overdue_only: self.overdue_only.unwrap_or(false),
        }
    }

    fn sort(&self) -> TaskSort {
        TaskSort {
            field: self.sort.unwrap_or_default(),
            direction: self.direction.unwrap_or_default(),
        }
    }
}

pub async fn list_tasks(
    database: web::Data<Arc<Database>>,
    query: web::Query<TaskListQuery>,
) -> ActixResult<HttpResponse> {
    let tasks = db::list_tasks(database.async_connection.clone(), TASK_VIEW_LIMIT)
        .await
        .map_err(ApiError::from)?;

    let today = chrono::Local::now().date_naive();
    let view = record_ops::build_task_view(tasks, &query.filter(), query.sort(), today);

    Ok(HttpResponse::Ok().json(view))
}

pub async fn create_task(
    database: web::Data<Arc<Database>>,
    request: web::Json<CreateTaskRequest>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();
    require_text("Task title", &request.title)?;

    let id = db::insert_task(database.async_connection.clone(), &request)
        .await
        .map_err(ApiError::from)?;
    let task = db::get_task(database.async_connection.clone(), id)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Created().json(task))
}

pub async fn update_task(
    database: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    request: web::Json<UpdateTaskRequest>,
) -> ActixResult<HttpResponse> {
    let task_id = path.into_inner();
    let update = request.into_inner();
    if let Some(title) = &update.title {
        require_text("Task title", title)?;
    }

    let task = db::update_task(database.async_connection.clone(), task_id, &update)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(task))
}
