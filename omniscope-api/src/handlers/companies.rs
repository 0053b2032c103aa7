use actix_web::{web, HttpResponse, Result as ActixResult};
use record_ops::{find_duplicates_excluding, Candidate};
use shared_types::{
    CompaniesResponse, CompanyUpdateResponse, CreateCompanyRequest, DuplicatesResponse,
    UpdateCompanyRequest,
};
use std::sync::Arc;

use crate::database::companies as db;
use crate::database::Database;
use crate::handlers::{require_text, ApiError};

pub async fn list_companies(database: web::Data<Arc<Database>>) -> ActixResult<HttpResponse> {
    let companies = db::list_companies(database.async_connection.clone(), 100)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(CompaniesResponse { companies }))
}

pub async fn create_company(
    database: web::Data<Arc<Database>>,
    request: web::Json<CreateCompanyRequest>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();
    require_text("Company name", &request.name)?;

    let id = db::insert_company(database.async_connection.clone(), &request)
        .await
        .map_err(ApiError::from)?;
    let company = db::get_company(database.async_connection.clone(), id)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Created().json(company))
}

pub async fn get_company(
    database: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let company_id = path.into_inner();

    let company = db::get_company(database.async_connection.clone(), company_id)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(company))
}

pub async fn update_company(
    database: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    request: web::Json<UpdateCompanyRequest>,
) -> ActixResult<HttpResponse> {
    let company_id = path.into_inner();
    let update = request.into_inner();
    if let Some(name) = &update.name {
        require_text("Company name", name)?;
    }

    let (company, rename) = db::update_company(database.async_connection.clone(), company_id, &update)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(CompanyUpdateResponse { company, rename }))
}

pub async fn list_company_duplicates(
    database: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let company_id = path.into_inner();

    let company = db::get_company(database.async_connection.clone(), company_id)
        .await
        .map_err(ApiError::from)?;
    let candidates = db::list_candidate_companies(database.async_connection.clone())
        .await
        .map_err(ApiError::from)?;

    let matches = find_duplicates_excluding(&company.profile(), &candidates, company.id);

    Ok(HttpResponse::Ok().json(DuplicatesResponse { matches }))
}
