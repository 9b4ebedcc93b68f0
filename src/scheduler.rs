//! Periodic driver for [`SensorSimulator::advance`].
//!
//! Runs as a single spawned task on a `tokio::time::interval`, so advance
//! steps never overlap. The task exits when its [`CancellationToken`] fires.

use std::{sync::Arc, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::simulator::SensorSimulator;

// ---

/// Spawn the update loop. The first step happens one `period` after the call.
pub fn spawn(
    simulator: Arc<SensorSimulator>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(run(simulator, period, cancel))
}

/// Advance `simulator` every `period` until `cancel` is triggered.
pub async fn run(simulator: Arc<SensorSimulator>, period: Duration, cancel: CancellationToken) {
    // ---
    tracing::info!(period_ms = period.as_millis() as u64, "Sensor update loop started");

    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Sensor update loop stopping");
                break;
            }
            _ = interval.tick() => {
                simulator.advance();
            }
        }
    }
}
