//! Owner of the live sensor state.
//!
//! The state and its randomness source sit behind a single mutex, so an
//! advance step is never observed half-applied by a concurrent snapshot.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use rand::{rngs::StdRng, RngCore, SeedableRng};

use crate::models::{Perturbation, SensorSnapshot, SensorState};

// ---

struct Inner {
    state: SensorState,
    rng: Box<dyn RngCore + Send>,
}

/// Simulated temperature / humidity / pressure sensor.
pub struct SensorSimulator {
    inner: Mutex<Inner>,
}

impl SensorSimulator {
    /// Simulator seeded from the operating system's entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Simulator drawing its random walk from `rng`.
    pub fn with_rng<R>(rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        Self {
            inner: Mutex::new(Inner {
                state: SensorState::initial(Utc::now()),
                rng: Box::new(rng),
            }),
        }
    }

    /// Advance the state by one random-walk step.
    pub fn advance(&self) {
        // ---
        let mut inner = self.lock();
        let delta = Perturbation::sample(&mut inner.rng);
        inner.state.apply(delta, Utc::now());

        tracing::trace!(
            temperature = inner.state.temperature,
            humidity = inner.state.humidity,
            pressure = inner.state.pressure,
            altitude = inner.state.altitude,
            "Sensor state advanced"
        );
    }

    /// Rounded copy of the current state.
    pub fn snapshot(&self) -> SensorSnapshot {
        self.lock().state.to_snapshot()
    }

    /// Unrounded copy of the current state.
    pub fn raw_state(&self) -> SensorState {
        self.lock().state.clone()
    }

    // Every write to `Inner` completes before the guard is released, so a
    // poisoned lock still guards a consistent state.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SensorSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::barometric_altitude;
    use std::sync::Arc;

    fn seeded(seed: u64) -> SensorSimulator {
        SensorSimulator::with_rng(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_starts_from_seed_values() {
        // ---
        let sim = seeded(1);
        let snap = sim.snapshot();

        assert_eq!(snap.temperature, 25.5);
        assert_eq!(snap.humidity, 65.2);
        assert_eq!(snap.pressure, 1013.25);
        assert_eq!(snap.altitude, 850.0);
    }

    #[test]
    fn test_advance_keeps_invariants() {
        // ---
        let sim = seeded(99);
        for _ in 0..5_000 {
            sim.advance();
            let raw = sim.raw_state();
            assert!((15.0..=40.0).contains(&raw.temperature));
            assert!((30.0..=90.0).contains(&raw.humidity));
            assert!((950.0..=1050.0).contains(&raw.pressure));

            // Pressure only leaves its range by less than one step, so the
            // derived altitude stays close to the clamped pressure's.
            assert!((raw.altitude - barometric_altitude(raw.pressure)).abs() < 10.0);

            let snap = sim.snapshot();
            assert!((15.0..=40.0).contains(&snap.temperature));
            assert!((30.0..=90.0).contains(&snap.humidity));
            assert!((950.0..=1050.0).contains(&snap.pressure));
        }
    }

    #[test]
    fn test_advance_updates_timestamp() {
        // ---
        let sim = seeded(3);
        let before = sim.raw_state().last_update;
        sim.advance();
        assert!(sim.raw_state().last_update >= before);
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        // ---
        let sim = seeded(5);
        sim.advance();
        assert_eq!(sim.snapshot(), sim.snapshot());
        assert_eq!(sim.raw_state(), sim.raw_state());
    }

    #[test]
    fn test_same_seed_same_walk() {
        // ---
        let a = seeded(11);
        let b = seeded(11);
        for _ in 0..10 {
            a.advance();
            b.advance();
        }
        let (ra, rb) = (a.raw_state(), b.raw_state());
        assert_eq!(ra.temperature, rb.temperature);
        assert_eq!(ra.humidity, rb.humidity);
        assert_eq!(ra.pressure, rb.pressure);
    }

    #[test]
    fn test_concurrent_readers_see_consistent_state() {
        // ---
        let sim = Arc::new(seeded(8));
        let writer = {
            let sim = Arc::clone(&sim);
            std::thread::spawn(move || {
                for _ in 0..2_000 {
                    sim.advance();
                }
            })
        };

        for _ in 0..2_000 {
            let raw = sim.raw_state();
            assert!((950.0..=1050.0).contains(&raw.pressure));
            assert!((15.0..=40.0).contains(&raw.temperature));
        }
        writer.join().unwrap();
    }
}
