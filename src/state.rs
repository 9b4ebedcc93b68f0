use std::{sync::Arc, time::Instant};

use crate::{ConfigStore, SensorSimulator};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; both owners sit behind `Arc` and are also handed to the
/// background update loop.
#[derive(Clone)]
pub struct AppState {
    /// Live simulated reading.
    pub simulator: Arc<SensorSimulator>,
    /// Persisted temperature thresholds.
    pub store: Arc<ConfigStore>,
    /// Process start, for `/api/status` uptime.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(simulator: Arc<SensorSimulator>, store: Arc<ConfigStore>) -> Self {
        Self {
            simulator,
            store,
            started_at: Instant::now(),
        }
    }
}
