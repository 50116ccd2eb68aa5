#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Tsunami vulnerability server with email alerts.

use clap::Parser;
use rescue_radar_server::config::TsunamiConfig;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = TsunamiConfig::parse();
    rescue_radar_server::tsunami::run_server(&config).await?;

    Ok(())
}
