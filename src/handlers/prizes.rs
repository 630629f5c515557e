use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::UploadOutcome;
use crate::services::ListAdminService;

#[utoipa::path(
    get,
    path = "/prizes",
    tag = "prizes",
    responses(
        (status = 200, description = "Full prize list"),
        (status = 502, description = "Backend unreachable")
    )
)]
pub async fn list(list_service: web::Data<ListAdminService>) -> Result<HttpResponse> {
    match list_service.prizes().await {
        Ok(prizes) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": prizes
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/prizes",
    tag = "prizes",
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
    match list_service.upload_prizes(body.to_vec()).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": outcome
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/prizes",
    tag = "prizes",
    responses(
        (status = 200, description = "Prize list and mappings wiped")
    )
)]
pub async fn wipe(list_service: web::Data<ListAdminService>) -> Result<HttpResponse> {
    match list_service.wipe_prizes().await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": null
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn prizes_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/prizes")
            .route("", web::get().to(list))
            .route("", web::put().to(upload))
            .route("", web::delete().to(wipe)),
    );
}
