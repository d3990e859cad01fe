use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use contact_backend::{
    background_task::{start_limiter_sweep, start_purge_task},
    db::firestore::FirestoreRepo,
    email::sendgrid::SendGridNotifier,
    graceful_shutdown::shutdown_signal,
    limiter::rate_limiter::SlidingWindowLimiter,
    routes::configure_routes,
    settings::AppConfig,
    AppState,
};
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        }
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let limiter = Arc::new(SlidingWindowLimiter::new(
        config.rate_limit_window(),
        config.rate_limit_max_requests,
    ));
    let submission_repo = FirestoreRepo::new(&config);

    let app_state = web::Data::new(AppState::new(
        &config,
        limiter.clone(),
        submission_repo.clone(),
    ));

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "🚀 Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let cors_origins = config.cors_origins();

    let server = HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["POST", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION]);
        for origin in &cors_origins {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }

        App::new()
            .app_data(app_state.clone())
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .wrap(cors)
            .configure(configure_routes::<FirestoreRepo, SendGridNotifier>)
    })
    .workers(config.worker_count)
    .bind(server_addr)?
    .run();

    tokio::spawn(start_purge_task(submission_repo, config.retention_days));
    tokio::spawn(start_limiter_sweep(limiter, config.rate_limit_window()));

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    }
}
