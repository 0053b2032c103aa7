use actix_web::{web, HttpResponse, Result as ActixResult};
use shared_types::{CreateMeetingRequest, MeetingsResponse};
use std::sync::Arc;

use crate::database::meetings as db;
use crate::database::Database;
use crate::handlers::{require_text, ApiError};

pub async fn list_meetings(database: web::Data<Arc<Database>>) -> ActixResult<HttpResponse> {
    let meetings = db::list_meetings(database.async_connection.clone(), 100)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(MeetingsResponse { meetings }))
}

pub async fn create_meeting(
    database: web::Data<Arc<Database>>,
    request: web::Json<CreateMeetingRequest>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();
    require_text("Meeting title", &request.title)?;

    let id = db::insert_meeting(database.async_connection.clone(), &request)
        .await
        .map_err(ApiError::from)?;
    let meeting = db::get_meeting(database.async_connection.clone(), id)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Created().json(meeting))
}

pub async fn get_meeting(
    database: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let meeting_id = path.into_inner();

    let meeting = db::get_meeting(database.async_connection.clone(), meeting_id)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(meeting))
}
