use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::{BeginMappingEditRequest, ChooseWinnerRequest, MappingEditorStatus};
use crate::services::MappingEditorService;

#[utoipa::path(
    get,
    path = "/mappings",
    tag = "mappings",
    responses(
        (status = 200, description = "Mapping list joined with prizes and winners"),
        (status = 502, description = "Backend unreachable")
    )
)]
pub async fn list(editor: web::Data<MappingEditorService>) -> Result<HttpResponse> {
    match editor.list().await {
        Ok(rows) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": rows
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/mappings/editor",
    tag = "mappings",
    responses(
        (status = 200, description = "Editor state machine phase", body = MappingEditorStatus)
    )
)]
pub async fn editor_state(editor: web::Data<MappingEditorService>) -> Result<HttpResponse> {
    match editor.status().await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/mappings/editor/edit",
    tag = "mappings",
    request_body = BeginMappingEditRequest,
    responses(
        (status = 200, description = "Winner selection opened for the prize", body = MappingEditorStatus),
        (status = 400, description = "Another edit is in progress"),
        (status = 404, description = "Unknown prize")
    )
)]
pub async fn begin_edit(
    editor: web::Data<MappingEditorService>,
    request: web::Json<BeginMappingEditRequest>,
) -> Result<HttpResponse> {
    match editor.begin_edit(&request.prize_id).await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/mappings/editor/remove",
    tag = "mappings",
    request_body = BeginMappingEditRequest,
    responses(
        (status = 200, description = "Removal confirmation opened", body = MappingEditorStatus),
        (status = 400, description = "Prize has no winner")
    )
)]
pub async fn begin_remove(
    editor: web::Data<MappingEditorService>,
    request: web::Json<BeginMappingEditRequest>,
) -> Result<HttpResponse> {
    match editor.begin_remove(&request.prize_id).await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/mappings/editor/choose",
    tag = "mappings",
    request_body = ChooseWinnerRequest,
    responses(
        (status = 200, description = "Candidate staged, awaiting confirmation", body = MappingEditorStatus),
        (status = 400, description = "Unknown participant or already the winner")
    )
)]
pub async fn choose_winner(
    editor: web::Data<MappingEditorService>,
    request: web::Json<ChooseWinnerRequest>,
) -> Result<HttpResponse> {
    match editor.choose_winner(&request.registration_id).await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/mappings/editor/confirm",
    tag = "mappings",
    responses(
        (status = 200, description = "Edit written through to the backend", body = MappingEditorStatus),
        (status = 502, description = "Backend rejected the edit; confirmation step kept")
    )
)]
pub async fn confirm(editor: web::Data<MappingEditorService>) -> Result<HttpResponse> {
    match editor.confirm().await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/mappings/editor/cancel",
    tag = "mappings",
    responses(
        (status = 200, description = "Edit abandoned, back to the list", body = MappingEditorStatus)
    )
)]
pub async fn cancel(editor: web::Data<MappingEditorService>) -> Result<HttpResponse> {
    match editor.cancel().await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/mappings",
    tag = "mappings",
    responses(
        (status = 200, description = "Every winner cleared")
    )
)]
pub async fn wipe(editor: web::Data<MappingEditorService>) -> Result<HttpResponse> {
    match editor.wipe_all().await {
        Ok(rows) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": rows
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn mappings_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/mappings")
            .route("", web::get().to(list))
            .route("", web::delete().to(wipe))
            .route("/editor", web::get().to(editor_state))
            .route("/editor/edit", web::post().to(begin_edit))
            .route("/editor/remove", web::post().to(begin_remove))
            .route("/editor/choose", web::post().to(choose_winner))
            .route("/editor/confirm", web::post().to(confirm))
            .route("/editor/cancel", web::post().to(cancel)),
    );
}
