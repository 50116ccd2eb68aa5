#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Flood severity map server.
//!
//! Serves the prediction form and the geocoded result maps.

use clap::Parser;
use rescue_radar_server::config::FloodConfig;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = FloodConfig::parse();
    rescue_radar_server::flood::run_server(&config).await?;

    Ok(())
}
