use actix_web::{web, HttpResponse, Result as ActixResult};
use shared_types::CalendarEventsResponse;
use std::sync::Arc;

use crate::database::calendar_events as db;
use crate::database::Database;
use crate::handlers::ApiError;
use crate::integrations::google_calendar::CalendarFeed;

pub async fn list_calendar_events(database: web::Data<Arc<Database>>) -> ActixResult<HttpResponse> {
    let events = db::list_calendar_events(database.async_connection.clone(), 100)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(CalendarEventsResponse { events }))
}

pub async fn import_calendar(
    database: web::Data<Arc<Database>>,
    feed: web::Json<CalendarFeed>,
) -> ActixResult<HttpResponse> {
    let summary = db::import_calendar_feed(database.async_connection.clone(), feed.into_inner())
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(summary))
}
