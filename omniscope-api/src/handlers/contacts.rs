use actix_web::{web, HttpResponse, Result as ActixResult};
use record_ops::{find_duplicates, find_duplicates_excluding, Candidate, NameProfile};
use shared_types::{
    ApprovalStatus, ContactUpdateResponse, ContactsResponse, CreateContactRequest,
    DuplicatesResponse, MergeContactsRequest, MergeContactsResponse, UpdateContactRequest,
};
use std::sync::Arc;

use crate::database::contacts as contacts_db;
use crate::database::Database;
use crate::handlers::{require_text, ApiError};

pub async fn list_contacts(db: web::Data<Arc<Database>>) -> ActixResult<HttpResponse> {
    let contacts = contacts_db::list_contacts(db.async_connection.clone(), 100)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(ContactsResponse { contacts }))
}

pub async fn create_contact(
    db: web::Data<Arc<Database>>,
    request: web::Json<CreateContactRequest>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();
    require_text("Contact name", &request.name)?;

    let id = contacts_db::insert_contact(db.async_connection.clone(), &request)
        .await
        .map_err(ApiError::from)?;
    let contact = contacts_db::get_contact(db.async_connection.clone(), id)
        .await
        .map_err(ApiError::from)?;

    tracing::info!("Created contact {} ({})", contact.id, contact.approval_status);
    Ok(HttpResponse::Created().json(contact))
}

pub async fn get_contact(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let contact_id = path.into_inner();

    let contact = contacts_db::get_contact(db.async_connection.clone(), contact_id)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(contact))
}

pub async fn update_contact(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    request: web::Json<UpdateContactRequest>,
) -> ActixResult<HttpResponse> {
    let contact_id = path.into_inner();
    let update = request.into_inner();
    if let Some(name) = &update.name {
        require_text("Contact name", name)?;
    }

    let (contact, rename) =
        contacts_db::update_contact(db.async_connection.clone(), contact_id, &update)
            .await
            .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(ContactUpdateResponse { contact, rename }))
}

pub async fn approve_contact(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let contact_id = path.into_inner();
    let update = UpdateContactRequest {
        approval_status: Some(ApprovalStatus::Approved),
        ..Default::default()
    };

    let (contact, _) = contacts_db::update_contact(db.async_connection.clone(), contact_id, &update)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(contact))
}

/// Approved contacts that look like the stored contact `{id}`.
pub async fn list_contact_duplicates(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    let contact_id = path.into_inner();

    let contact = contacts_db::get_contact(db.async_connection.clone(), contact_id)
        .await
        .map_err(ApiError::from)?;
    let candidates = contacts_db::list_candidate_contacts(db.async_connection.clone())
        .await
        .map_err(ApiError::from)?;

    let matches = find_duplicates_excluding(&contact.profile(), &candidates, contact.id);

    Ok(HttpResponse::Ok().json(DuplicatesResponse { matches }))
}

/// Approved contacts that look like a contact about to be created.
pub async fn check_contact_duplicates(
    db: web::Data<Arc<Database>>,
    request: web::Json<CreateContactRequest>,
) -> ActixResult<HttpResponse> {
    let candidates = contacts_db::list_candidate_contacts(db.async_connection.clone())
        .await
        .map_err(ApiError::from)?;

    let target = NameProfile::new(
        &request.name,
        request.email.as_deref(),
        request.organization.as_deref(),
    );
    let matches = find_duplicates(&target, &candidates);

    Ok(HttpResponse::Ok().json(DuplicatesResponse { matches }))
}

/// Folds the source contact into `{id}`, filling only fields the target lacks.
pub async fn merge_contacts(
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    request: web::Json<MergeContactsRequest>,
) -> ActixResult<HttpResponse> {
    let target_id = path.into_inner();
    let source_id = request.source_contact_id;

    let (contact, applied) =
        contacts_db::merge_contacts(db.async_connection.clone(), target_id, source_id)
            .await
            .map_err(ApiError::from)?;

    tracing::info!(
        "Merged contact {} into {}, filled fields: {:?}",
        source_id,
        target_id,
        applied.changed_fields()
    );

    Ok(HttpResponse::Ok().json(MergeContactsResponse {
        contact,
        applied,
        merged_contact_id: source_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_database;
    use actix_web::{test, App};
    use shared_types::Contact;

    macro_rules! contacts_app {
        ($db:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($db.clone()))
                    .route("/api/contacts", web::post().to(create_contact))
                    .route("/api/contacts/duplicates", web::post().to(check_contact_duplicates))
                    .route("/api/contacts/{id}", web::get().to(get_contact))
                    .route("/api/contacts/{id}", web::put().to(update_contact))
                    .route("/api/contacts/{id}/duplicates", web::get().to(list_contact_duplicates))
                    .route("/api/contacts/{id}/merge", web::post().to(merge_contacts)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_create_rejects_blank_name() {
        let (_dir, db) = test_database();
        let app = contacts_app!(db);

        let req = test::TestRequest::post()
            .uri("/api/contacts")
            .set_json(serde_json::json!({ "name": "   " }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_missing_contact_is_404() {
        let (_dir, db) = test_database();
        let app = contacts_app!(db);

        let req = test::TestRequest::get().uri("/api/contacts/42").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn test_duplicates_then_merge() {
        let (_dir, db) = test_database();
        let app = contacts_app!(db);

        let req = test::TestRequest::post()
            .uri("/api/contacts")
            .set_json(serde_json::json!({
                "name": "Jake Ryan",
                "organization": "OmniScope",
                "approval_status": "approved"
            }))
            .to_request();
        let target: Contact = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/api/contacts")
            .set_json(serde_json::json!({
                "name": "jake ryan",
                "email": "jake@omniscope.io",
                "approval_status": "approved"
            }))
            .to_request();
        let source: Contact = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/contacts/{}/duplicates", target.id))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["matches"][0]["record_id"], source.id);
        assert_eq!(body["matches"][0]["confidence"], 95);

        let req = test::TestRequest::post()
            .uri(&format!("/api/contacts/{}/merge", target.id))
            .set_json(serde_json::json!({ "source_contact_id": target.id }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);

        let req = test::TestRequest::post()
            .uri(&format!("/api/contacts/{}/merge", target.id))
            .set_json(serde_json::json!({ "source_contact_id": source.id }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["contact"]["email"], "jake@omniscope.io");
        assert_eq!(body["contact"]["organization"], "OmniScope");
        assert_eq!(body["applied"], serde_json::json!({ "email": "jake@omniscope.io" }));

        let req = test::TestRequest::post()
            .uri(&format!("/api/contacts/{}/merge", target.id))
            .set_json(serde_json::json!({ "source_contact_id": source.id }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 400);
    }

    #[actix_web::test]
    async fn test_rename_reports_summary() {
        let (_dir, db) = test_database();
        let app = contacts_app!(db);

        let req = test::TestRequest::post()
            .uri("/api/contacts")
            .set_json(serde_json::json!({ "name": "John Puls" }))
            .to_request();
        let contact: Contact = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/contacts/{}", contact.id))
            .set_json(serde_json::json!({ "name": "John P. Puls" }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["contact"]["name"], "John P. Puls");
        assert_eq!(body["rename"]["old_name"], "John Puls");
        assert_eq!(body["rename"]["new_name"], "John P. Puls");
    }
}
