use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::RaffleStatus;
use crate::services::RaffleService;

#[utoipa::path(
    get,
    path = "/raffle/state",
    tag = "raffle",
    responses(
        (status = 200, description = "Current raffle phase and lists", body = RaffleStatus),
        (status = 502, description = "Backend unreachable")
    )
)]
pub async fn get_state(raffle_service: web::Data<RaffleService>) -> Result<HttpResponse> {
    match raffle_service.status().await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/raffle/advance",
    tag = "raffle",
    responses(
        (status = 200, description = "Moved from prize introduction to rolling", body = RaffleStatus),
        (status = 400, description = "Not on the prize introduction step")
    )
)]
pub async fn advance(raffle_service: web::Data<RaffleService>) -> Result<HttpResponse> {
    match raffle_service.advance().await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/raffle/back",
    tag = "raffle",
    responses(
        (status = 200, description = "Returned from rolling to prize introduction", body = RaffleStatus),
        (status = 400, description = "Not on the rolling step")
    )
)]
pub async fn back(raffle_service: web::Data<RaffleService>) -> Result<HttpResponse> {
    match raffle_service.back().await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/raffle/draw",
    tag = "raffle",
    responses(
        (status = 200, description = "Tentative winner chosen", body = RaffleStatus),
        (status = 400, description = "Not on the rolling step")
    )
)]
pub async fn draw(raffle_service: web::Data<RaffleService>) -> Result<HttpResponse> {
    match raffle_service.draw().await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/raffle/confirm",
    tag = "raffle",
    responses(
        (status = 200, description = "Winner committed, back on prize introduction", body = RaffleStatus),
        (status = 502, description = "Write retries exhausted, session reset")
    )
)]
pub async fn confirm(raffle_service: web::Data<RaffleService>) -> Result<HttpResponse> {
    match raffle_service.confirm().await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/raffle/discard",
    tag = "raffle",
    responses(
        (status = 200, description = "Tentative winner flagged cancelled, rolling resumed", body = RaffleStatus),
        (status = 502, description = "Write retries exhausted, session reset")
    )
)]
pub async fn discard(raffle_service: web::Data<RaffleService>) -> Result<HttpResponse> {
    match raffle_service.discard().await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/raffle/reset",
    tag = "raffle",
    responses(
        (status = 200, description = "Session dropped back to the initial phase", body = RaffleStatus)
    )
)]
pub async fn reset(raffle_service: web::Data<RaffleService>) -> Result<HttpResponse> {
    match raffle_service.reset().await {
        Ok(status) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": status
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn raffle_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/raffle")
            .route("/state", web::get().to(get_state))
            .route("/advance", web::post().to(advance))
            .route("/back", web::post().to(back))
            .route("/draw", web::post().to(draw))
            .route("/confirm", web::post().to(confirm))
            .route("/discard", web::post().to(discard))
            .route("/reset", web::post().to(reset)),
    );
}
