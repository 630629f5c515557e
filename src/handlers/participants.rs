use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::UploadOutcome;
use crate::services::ListAdminService;

#[utoipa::path(
    get,
    path = "/participants",
    tag = "participants",
    responses(
        (status = 200, description = "Full participant list"),
        (status = 502, description = "Backend unreachable")
    )
)]
pub async fn list(list_service: web::Data<ListAdminService>) -> Result<HttpResponse> {
    match list_service.participants().await {
        Ok(participants) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": participants
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/participants",
    tag = "participants",
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "List replaced from CSV", body = UploadOutcome),
        (status = 400, description = "Empty or malformed CSV")
    )
)]
pub async fn upload(
    list_service: web::Data<ListAdminService>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    match list_service.upload_participants(body.to_vec()).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": outcome
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/participants",
    tag = "participants",
    responses(
        (status = 200, description = "Participant list wiped")
    )
)]
pub async fn wipe(list_service: web::Data<ListAdminService>) -> Result<HttpResponse> {
    match list_service.wipe_participants().await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": null
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn participants_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/participants")
            .route("", web::get().to(list))
            .route("", web::put().to(upload))
            .route("", web::delete().to(wipe)),
    );
}
