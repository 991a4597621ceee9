use std::sync::Arc;

use geozone_core::auth::CredentialGate;
use geozone_core::parse::ParseOptions;
use geozone_db::StateStore;
use geozone_events::{EventProcessor, PresenceConfig};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Basic auth check built from the configured user/pass.
    pub gate: Arc<CredentialGate>,
    /// Applies accepted events in the background.
    pub processor: EventProcessor,
}

impl AppState {
    pub fn new(config: ServerConfig, store: Arc<dyn StateStore>) -> Self {
        let geofence = &config.geofence;
        let gate = CredentialGate::new(geofence.user.clone(), geofence.pass.clone());
        let processor = EventProcessor::new(
            store,
            PresenceConfig {
                home_name: geofence.at_home.clone(),
                ignore_leaving: geofence.ignore_leaving,
            },
        );

        Self {
            config: Arc::new(config),
            gate: Arc::new(gate),
            processor,
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            strict: self.config.geofence.strict_validation,
        }
    }
}
