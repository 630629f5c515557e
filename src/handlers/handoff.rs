use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::{
    HandoffCompleteRequest, HandoffScanRequest, HandoffSelectRequest, HandoffStatus,
};
use crate::services::HandoffService;

#[utoipa::path(
    get,
    path = "/handoff/state",
    tag = "handoff",
    responses(
        (status = 200, description = "Current handoff step", body = HandoffStatus)
    )
)]
pub async fn get_state(handoff_service: web::Data<HandoffService>) -> Result<HttpResponse> {
    match handoff_service.status().await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/handoff/scan",
    tag = "handoff",
    request_body = HandoffScanRequest,
    responses(
        (status = 200, description = "Scan handled; unknown codes stay on step 1 with a warning", body = HandoffStatus),
        (status = 400, description = "A confirmation is already in progress")
    )
)]
pub async fn scan(
    handoff_service: web::Data<HandoffService>,
    request: web::Json<HandoffScanRequest>,
) -> Result<HttpResponse> {
    match handoff_service.scan(&request.code).await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/handoff/select",
    tag = "handoff",
    request_body = HandoffSelectRequest,
    responses(
        (status = 200, description = "Prize row selected", body = HandoffStatus),
        (status = 400, description = "Index out of range or not confirming")
    )
)]
pub async fn select(
    handoff_service: web::Data<HandoffService>,
    request: web::Json<HandoffSelectRequest>,
) -> Result<HttpResponse> {
    match handoff_service.select(request.index).await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/handoff/complete",
    tag = "handoff",
    request_body = HandoffCompleteRequest,
    responses(
        (status = 200, description = "Handoff recorded, back to the winner scan step", body = crate::models::HandoffReceipt),
        (status = 400, description = "Prize barcode does not match the selected prize")
    )
)]
pub async fn complete(
    handoff_service: web::Data<HandoffService>,
    request: web::Json<HandoffCompleteRequest>,
) -> Result<HttpResponse> {
    match handoff_service
        .complete(request.prize_barcode.as_deref())
        .await
    {
        Ok(receipt) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": receipt
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/handoff/reset",
    tag = "handoff",
    responses(
        (status = 200, description = "Returned to the winner scan step", body = HandoffStatus)
    )
)]
pub async fn reset(handoff_service: web::Data<HandoffService>) -> Result<HttpResponse> {
    match handoff_service.reset().await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn handoff_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/handoff")
            .route("/state", web::get().to(get_state))
            .route("/scan", web::post().to(scan))
            .route("/select", web::post().to(select))
            .route("/complete", web::post().to(complete))
            .route("/reset", web::post().to(reset)),
    );
}
