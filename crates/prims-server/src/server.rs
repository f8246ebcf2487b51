use std::sync::Arc;

use prims_dispatch::OperationRegistry;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// The prims remote-procedure server.
pub struct PrimsServer {
    config: ServerConfig,
    registry: Arc<OperationRegistry>,
}

impl PrimsServer {
    /// A server exposing the standard operation set under `config`'s limits.
    pub fn new(config: ServerConfig) -> Self {
        let registry = Arc::new(OperationRegistry::standard(config.dispatch.clone()));
        Self { config, registry }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(Arc::clone(&self.registry), self.config.max_body_bytes)
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            operations = self.registry.len(),
            "prims server listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_construction() {
        let server = PrimsServer::new(ServerConfig::default());
        assert_eq!(server.config().bind_addr.port(), 50051);
        assert_eq!(server.registry.len(), 20);
    }

    #[test]
    fn registry_uses_configured_limits() {
        let mut config = ServerConfig::default();
        config.dispatch.max_leaves = 7;
        let server = PrimsServer::new(config);
        assert_eq!(server.registry.config().max_leaves, 7);
    }
}
