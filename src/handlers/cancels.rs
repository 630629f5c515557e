use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::{CancelsDraft, CancelsEditOutcome, CancelsEditRequest, ScanCancelRequest};
use crate::services::CancelsEditorService;

#[utoipa::path(
    get,
    path = "/cancels",
    tag = "cancels",
    responses(
        (status = 200, description = "Cancel flags joined with participant records"),
        (status = 502, description = "Backend unreachable")
    )
)]
pub async fn list(editor: web::Data<CancelsEditorService>) -> Result<HttpResponse> {
    match editor.list().await {
        Ok(rows) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": rows
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/cancels/edit",
    tag = "cancels",
    request_body = CancelsEditRequest,
    responses(
        (status = 200, description = "Per-ID outcome partition", body = CancelsEditOutcome),
        (status = 400, description = "Empty ID list")
    )
)]
pub async fn edit(
    editor: web::Data<CancelsEditorService>,
    request: web::Json<CancelsEditRequest>,
) -> Result<HttpResponse> {
    match editor.apply(request.action, &request.ids).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": outcome
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/cancels/draft",
    tag = "cancels",
    responses(
        (status = 200, description = "Scanned codes staged for the next batch edit", body = CancelsDraft)
    )
)]
pub async fn draft(editor: web::Data<CancelsEditorService>) -> Result<HttpResponse> {
    let draft = editor.draft().await;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": draft
    })))
}

#[utoipa::path(
    post,
    path = "/cancels/scan",
    tag = "cancels",
    request_body = ScanCancelRequest,
    responses(
        (status = 200, description = "Code staged or rejected", body = CancelsDraft),
        (status = 400, description = "Empty barcode")
    )
)]
pub async fn scan(
    editor: web::Data<CancelsEditorService>,
    request: web::Json<ScanCancelRequest>,
) -> Result<HttpResponse> {
    match editor.scan(&request.code).await {
        Ok(draft) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": draft
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/cancels/draft",
    tag = "cancels",
    responses(
        (status = 200, description = "Draft cleared", body = CancelsDraft)
    )
)]
pub async fn clear_draft(editor: web::Data<CancelsEditorService>) -> Result<HttpResponse> {
    let draft = editor.clear_draft().await;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": draft
    })))
}

#[derive(serde::Deserialize, utoipa::ToSchema)]
pub struct ApplyDraftRequest {
    pub action: crate::models::CancelsAction,
}

#[utoipa::path(
    post,
    path = "/cancels/draft/apply",
    tag = "cancels",
    request_body = ApplyDraftRequest,
    responses(
        (status = 200, description = "Staged codes submitted as one batch", body = CancelsEditOutcome),
        (status = 400, description = "Nothing staged")
    )
)]
pub async fn apply_draft(
    editor: web::Data<CancelsEditorService>,
    request: web::Json<ApplyDraftRequest>,
) -> Result<HttpResponse> {
    match editor.apply_draft(request.action).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": outcome
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/cancels",
    tag = "cancels",
    responses(
        (status = 200, description = "Every cancel flag removed")
    )
)]
pub async fn wipe(editor: web::Data<CancelsEditorService>) -> Result<HttpResponse> {
    match editor.wipe().await {
        Ok(rows) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": rows
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn cancels_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cancels")
            .route("", web::get().to(list))
            .route("", web::delete().to(wipe))
            .route("/edit", web::post().to(edit))
            .route("/scan", web::post().to(scan))
            .route("/draft", web::get().to(draft))
            .route("/draft", web::delete().to(clear_draft))
            .route("/draft/apply", web::post().to(apply_draft)),
    );
}
