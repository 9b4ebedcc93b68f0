//! Library half of the `weatherstation-sim` service.
//!
//! Follows the Explicit Module Boundary Pattern (EMBP): sibling modules reach
//! each other only through the re-exports below, and `main.rs` sees nothing
//! but `config`, `routes`, `scheduler` and the state owners.

pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod routes;
pub mod scheduler;
pub mod simulator;
pub mod state;
pub mod store;

pub use config::{Config, PersistPolicy};
pub use error::{ApiError, ApiResult, ConfigError};
pub use models::{HistoryPoint, SensorSnapshot, SensorState, ThresholdConfig, WeatherReport};
pub use simulator::SensorSimulator;
pub use state::AppState;
pub use store::{ConfigStore, LimitsUpdate};
