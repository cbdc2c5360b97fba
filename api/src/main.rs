use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use ag_api::app::{configure_app, AppState};
use ag_core::services::{AuthService, TokenCodec, TokenConfig};
use ag_infra::{DatabasePool, MySqlRefreshTokenRepository, MySqlUserStore};
use ag_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Fails fast on missing or duplicate signing secrets.
    let config = AppConfig::from_env()?;

    let pool = DatabasePool::new(&config.database).await?;
    pool.run_migrations().await?;

    let users = MySqlUserStore::new(pool.pool().clone());
    let tokens = MySqlRefreshTokenRepository::new(pool.pool().clone());
    let codec = TokenCodec::new(&TokenConfig::from(&config.auth));
    let auth_service = AuthService::new(users, tokens, codec);
    let state = web::Data::new(AppState { auth_service });

    let bind_address = config.server.bind_address();
    info!(%bind_address, "starting AuthGate API server");

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(ag_api::middleware::cors::create_cors())
            .configure(|cfg| configure_app(cfg, state.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
