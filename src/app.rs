/*
 * Responsibility
 * - tracing / panic hook setup
 * - Config -> Validator + claim rules -> Router
 * - axum::serve()
 */
use std::panic;

use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::{AppEnv, Config};
use crate::error::AppError;
use crate::middleware;
use crate::services::auth::build_validator;
use crate::state::AppState;

fn init_tracing(app_env: AppEnv) {
    // RUST_LOG wins; otherwise pick by environment.
    // Ex: RUST_LOG=info,bearer_guard=debug,tower_http=debug cargo run
    let default_filter = if app_env.is_production() {
        "info,tower_http=info"
    } else {
        "debug,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Surface panics through tracing too; stderr may not be collected.
        tracing::error!(%info, "panic");
        default_hook(info);
    }))
}

pub async fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing(AppEnv::from_env());
    init_panic_hook();

    let config = Config::from_env()?;

    tracing::info!(
        env = ?config.app_env,
        addr = %config.addr,
        algorithm = ?config.access_jwt_algorithm,
        issuer = ?config.auth_issuer,
        audience = ?config.auth_audience,
        revoked = config.revoked_token_ids.len(),
        "starting bearer-guard"
    );

    let state = build_state(&config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn build_state(config: &Config) -> Result<AppState, AppError> {
    let (validator, rules) = build_validator(config)?;

    Ok(AppState::new(validator, rules).with_cors_allow_origin(config.cors_allow_origin.clone()))
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    middleware::http::apply(router)
}
