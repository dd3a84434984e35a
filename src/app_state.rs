//! Shared application state injected into all Axum handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::config::RelayConfig;
use crate::domain::RoomRegistry;
use crate::service::{RelayRouter, SessionSupervisor};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Relay router shared by every WebSocket connection.
    pub router: Arc<RelayRouter>,
    /// Room registry, read by the introspection endpoints.
    pub registry: Arc<RoomRegistry>,
    /// Idle timeout applied to each WebSocket connection.
    pub idle_timeout: Option<Duration>,
}

impl AppState {
    /// Wires a fresh, empty registry into a supervisor and router.
    #[must_use]
    pub fn new(config: &RelayConfig) -> Self {
        let registry = Arc::new(RoomRegistry::new());
        let supervisor = Arc::new(SessionSupervisor::new(
            Arc::clone(&registry),
            config.outbound_queue_capacity,
        ));
        let router = Arc::new(RelayRouter::new(supervisor, config.policy));
        Self {
            router,
            registry,
            idle_timeout: config.idle_timeout,
        }
    }
}
