#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use service_estimator::{AppConfig, EstimateInput, http_api, load_estimate_from_json, telemetry};

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let input = match std::env::args().nth(1) {
        Some(path) => load_estimate_from_json(&path)?,
        None => EstimateInput::default(),
    };

    println!("service-estimator HTTP API listening on http://{}", config.http_addr);
    http_api::serve(config.http_addr, input).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
