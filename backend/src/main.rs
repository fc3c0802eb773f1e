//! Backend entry-point: loads settings, prepares the database, and serves the
//! REST API with health probes and OpenAPI docs.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{AppSettings, ServerConfig, create_server};
use tripshare::inbound::http::health::HealthState;
use tripshare::outbound::identity::TokenInfoOracle;
use tripshare::outbound::persistence::{DbPool, PoolConfig, migrate};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let database_url = settings.database_url()?.to_owned();

    if settings.run_migrations {
        let applied = migrate(database_url.clone())
            .await
            .wrap_err("failed to apply migrations")?;
        info!(applied, "database schema up to date");
    }

    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .wrap_err("failed to build database pool")?;

    let identity = TokenInfoOracle::new(
        settings.identity_tokeninfo_url()?,
        settings.identity_timeout(),
    )
    .wrap_err("failed to build identity client")?
    .with_audience(settings.identity_audience.clone());

    let config = ServerConfig::new(settings.bind_addr()?, pool, Arc::new(identity));
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::build_metrics()?));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await?;
    Ok(())
}
