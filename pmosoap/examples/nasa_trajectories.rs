//! Example: List the objects known to NASA's heliocentric trajectories service
//!
//! Run with: cargo run -p pmosoap --example nasa_trajectories
//!
//! Pass `--cancel` to fire the cancellation token right after the call starts.

use pmosoap::{
    CancellationToken, Element, SoapClient, SoapError, SoapMessage, SoapVersion,
    fragment,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const ENDPOINT: &str = "https://sscweb.gsfc.nasa.gov/WS/helio/1/HeliocentricTrajectoriesService";
const HELIO_NS: &str = "http://helio.spdf.gsfc.nasa.gov/";

fn get_all_objects() -> pmosoap::Result<Element> {
    fragment(&format!(r#"<getAllObjects xmlns="{}"/>"#, HELIO_NS))
}

/// `RUST_LOG` wins, then `host.logger.min_level` from pmoconfig, then INFO
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured_level()))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(feature = "pmoconfig")]
fn configured_level() -> String {
    pmoconfig::get_config()
        .get_log_min_level()
        .map(|level| level.to_lowercase())
        .unwrap_or_else(|_| "info".to_string())
}

#[cfg(not(feature = "pmoconfig"))]
fn configured_level() -> String {
    "info".to_string()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();

    let cancel_early = std::env::args().any(|arg| arg == "--cancel");

    #[cfg(feature = "pmoconfig")]
    let client = SoapClient::from_config()?;
    #[cfg(not(feature = "pmoconfig"))]
    let client = SoapClient::new()?;

    let token = CancellationToken::new();
    if cancel_early {
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });
    }

    let message = SoapMessage::new(SoapVersion::Soap11).with_body(get_all_objects()?);

    println!("Calling {}...\n", ENDPOINT);

    match client
        .post_with_cancellation(ENDPOINT, message, &token)
        .await
    {
        Ok(response) => {
            println!("Status: {}", response.status());
            println!("{}", response.text());
        }
        Err(SoapError::Cancelled) => println!("Call cancelled"),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
