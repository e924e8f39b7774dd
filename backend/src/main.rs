//! Yatube entry-point: loads settings, prepares storage and runs the site.

mod server;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ortho_config::OrthoConfig;
use yatube::inbound::http::health::HealthState;
use yatube::inbound::http::session_config::{BuildMode, SessionToggles, session_settings};
use yatube::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use yatube::settings::AppSettings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let session = session_settings(
        &SessionToggles::from_settings(&settings),
        BuildMode::from_debug_assertions(),
    )
    .map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(session, bind_addr)
        .with_media(settings.media_root(), settings.media_url())
        .with_page_cache_ttl(settings.page_cache_ttl());

    match settings.database_url() {
        Some(url) => {
            run_pending_migrations(url)
                .await
                .map_err(std::io::Error::other)?;
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(std::io::Error::other)?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database configured; content is kept in memory"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "yatube listening");
    server.await
}
