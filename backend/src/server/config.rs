//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use tripshare::outbound::identity::TokenInfoOracle;
use tripshare::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) identity: Arc<TokenInfoOracle>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration from its required adapters.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, identity: Arc<TokenInfoOracle>) -> Self {
        Self {
            bind_addr,
            db_pool,
            identity,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
