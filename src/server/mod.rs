// HTTP server module
// Daemon mode serving the chat engine to multiple concurrent sessions

mod handlers;
mod session;

pub use handlers::{create_router, health_check, AppError};
pub use session::{SessionManager, SessionState};

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::engine::EngineProfile;
use crate::metrics::MetricsLogger;

/// Main server structure
pub struct SupportServer {
    profile: EngineProfile,
    /// Metrics logger (shared)
    metrics_logger: Arc<MetricsLogger>,
    /// Session manager
    session_manager: Arc<SessionManager>,
    bind_address: String,
}

impl SupportServer {
    /// Create a new server from application configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let engine_config = config.engine_config()?;
        let metrics_logger = MetricsLogger::new(config.metrics_dir.clone())?;
        let session_manager = SessionManager::new(
            engine_config,
            config.server.max_sessions,
            config.server.session_timeout_minutes,
        );

        Ok(Self {
            profile: config.profile,
            metrics_logger: Arc::new(metrics_logger),
            session_manager: Arc::new(session_manager),
            bind_address: config.server.bind_address.clone(),
        })
    }

    /// Start the HTTP server
    pub async fn serve(self) -> Result<()> {
        let addr: SocketAddr = self
            .bind_address
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.bind_address))?;

        let app_state = Arc::new(self);
        let app = create_router(app_state)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        tracing::info!("Starting safemind server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    pub fn profile(&self) -> EngineProfile {
        self.profile
    }

    /// Get reference to metrics logger
    pub fn metrics_logger(&self) -> &Arc<MetricsLogger> {
        &self.metrics_logger
    }

    /// Get reference to session manager
    pub fn session_manager(&self) -> &Arc<SessionManager> {
        &self.session_manager
    }
}
