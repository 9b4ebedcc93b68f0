use std::{sync::Arc, time::Duration};

use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use weatherstation_sim::{routes, scheduler, AppState, ConfigStore, SensorSimulator};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Weather {
    temperature: f64,
    humidity: f64,
    pressure: f64,
    altitude: f64,
    min_temperature: f64,
    max_temperature: f64,
    temp_offset: f64,
    timestamp: DateTime<Utc>,
}

/// Serve the full app on an ephemeral port with a fast update loop.
async fn spawn_server(config_path: &std::path::Path) -> Result<(String, CancellationToken)> {
    // ---
    let simulator = Arc::new(SensorSimulator::new());
    let store = Arc::new(ConfigStore::load(config_path));
    let state = AppState::new(Arc::clone(&simulator), store);

    let cancel = CancellationToken::new();
    scheduler::spawn(simulator, Duration::from_millis(20), cancel.clone());

    let static_dir = config_path.parent().unwrap_or(config_path).to_path_buf();
    let app = routes::router(state, &static_dir);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let shutdown = cancel.clone().cancelled_owned();
    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    });

    Ok((format!("http://{}", addr), cancel))
}

#[tokio::test]
async fn weather_endpoint_evolves_within_bounds() -> Result<()> {
    // ---
    let dir = tempfile::tempdir()?;
    let (base, cancel) = spawn_server(&dir.path().join("config.json")).await?;
    let client = Client::new();
    let url = format!("{}/api/weather", base);

    let first: Weather = client.get(&url).send().await?.json().await?;
    tokio::time::sleep(Duration::from_millis(200)).await;
    let later: Weather = client.get(&url).send().await?.json().await?;

    assert!(later.timestamp > first.timestamp, "Sensor state did not advance");

    for w in [&first, &later] {
        // ---
        assert!((15.0..=40.0).contains(&w.temperature), "temperature {}", w.temperature);
        assert!((30.0..=90.0).contains(&w.humidity), "humidity {}", w.humidity);
        assert!((950.0..=1050.0).contains(&w.pressure), "pressure {}", w.pressure);
        assert_eq!(w.altitude, w.altitude.round(), "altitude must be whole meters");
        assert_eq!(w.temperature, (w.temperature * 10.0).round() / 10.0);

        assert_eq!(w.min_temperature, 10.0);
        assert_eq!(w.max_temperature, 70.0);
        assert_eq!(w.temp_offset, 0.0);
    }

    cancel.cancel();
    Ok(())
}

#[tokio::test]
async fn limits_survive_restart() -> Result<()> {
    // ---
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.json");
    let client = Client::new();

    let (base, cancel) = spawn_server(&path).await?;
    let response = client
        .post(format!("{}/api/limits", base))
        .json(&serde_json::json!({"min": 5, "max": 45, "offset": 3}))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    cancel.cancel();

    let (base, cancel) = spawn_server(&path).await?;
    let weather: Weather = client
        .get(format!("{}/api/weather", base))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(weather.min_temperature, 5.0);
    assert_eq!(weather.max_temperature, 45.0);
    assert_eq!(weather.temp_offset, 3.0);

    cancel.cancel();
    Ok(())
}
