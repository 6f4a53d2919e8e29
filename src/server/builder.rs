//! ServerBuilder for fluent API to build the HTTP server

use super::router::build_routes;
use crate::books::AppState;
use crate::config::ShelfConfig;
use crate::core::service::{ContentStore, CredentialStore};
use crate::core::TokenService;
use crate::storage::{InMemoryContentStore, InMemoryCredentialStore};
use anyhow::{Result, anyhow};
use axum::Router;
use chrono::Duration;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating the HTTP server
///
/// Anything not supplied explicitly is built from the configuration:
/// users become an [`InMemoryCredentialStore`], seed books an
/// [`InMemoryContentStore`], and `auth` a [`TokenService`].
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_config(ShelfConfig::load()?)
///     .serve()
///     .await?;
/// ```
pub struct ServerBuilder {
    config: ShelfConfig,
    credentials: Option<Arc<dyn CredentialStore>>,
    content: Option<Arc<dyn ContentStore>>,
    tokens: Option<TokenService>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration
    pub fn new() -> Self {
        Self {
            config: ShelfConfig::default_config(),
            credentials: None,
            content: None,
            tokens: None,
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: ShelfConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom credential store instead of the configured users
    pub fn with_credential_store(mut self, store: impl CredentialStore + 'static) -> Self {
        self.credentials = Some(Arc::new(store));
        self
    }

    /// Use a custom content store instead of the configured seed books
    pub fn with_content_store(mut self, store: impl ContentStore + 'static) -> Self {
        self.content = Some(Arc::new(store));
        self
    }

    /// Use a prebuilt token service instead of the configured secret
    pub fn with_token_service(mut self, tokens: TokenService) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Validate the configuration and assemble the handler state
    pub fn build_state(self) -> Result<AppState> {
        self.config.validate()?;

        let config = self.config;
        let credentials = self
            .credentials
            .unwrap_or_else(|| Arc::new(InMemoryCredentialStore::from_config(&config.users)));
        let content = self
            .content
            .unwrap_or_else(|| Arc::new(InMemoryContentStore::from_config(&config.books)));
        let tokens = match self.tokens {
            Some(tokens) => tokens,
            None => {
                let ttl = Duration::try_hours(config.auth.token_ttl_hours).ok_or_else(|| {
                    anyhow!(
                        "auth.token_ttl_hours out of range: {}",
                        config.auth.token_ttl_hours
                    )
                })?;
                TokenService::new(config.auth.secret.as_bytes(), ttl)
            }
        };

        Ok(AppState {
            credentials,
            content,
            tokens,
        })
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        Ok(build_routes(self.build_state()?))
    }

    /// Serve the application on `server.bind` with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.bind.clone();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
