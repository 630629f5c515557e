use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;
use std::time::Duration;

use raffle_console::{
    config::Config,
    external::{BackendApi, HttpBackendApi},
    middlewares::create_cors,
    services::*,
    services::pool::ThreadRngDraw,
    swagger::swagger_config,
    utils::RetryPolicy,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().expect("Failed to load configuration file");

    let backend: Arc<dyn BackendApi> = Arc::new(HttpBackendApi::new(config.backend.clone()));
    let cache = Arc::new(DataCache::new(backend.clone()));

    let retry = RetryPolicy::new(
        config.backend.retry_max_attempts,
        Duration::from_millis(config.backend.retry_delay_ms),
    );

    let raffle_service = web::Data::new(RaffleService::new(
        backend.clone(),
        cache.clone(),
        retry,
        Box::new(ThreadRngDraw),
    ));
    let handoff_service = web::Data::new(HandoffService::new(cache.clone()));
    let mapping_editor = web::Data::new(MappingEditorService::new(backend.clone(), cache.clone()));
    let cancels_editor = web::Data::new(CancelsEditorService::new(backend.clone(), cache.clone()));
    let list_service = web::Data::new(ListAdminService::new(backend.clone(), cache.clone()));

    log::info!(
        "Starting HTTP server at {}:{} (backend {})",
        config.server.host,
        config.server.port,
        config.backend.base_url
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(raffle_service.clone())
            .app_data(handoff_service.clone())
            .app_data(mapping_editor.clone())
            .app_data(cancels_editor.clone())
            .app_data(list_service.clone())
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(raffle_console::handlers::raffle_config)
                    .configure(raffle_console::handlers::handoff_config)
                    .configure(raffle_console::handlers::mappings_config)
                    .configure(raffle_console::handlers::cancels_config)
                    .configure(raffle_console::handlers::participants_config)
                    .configure(raffle_console::handlers::prizes_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
