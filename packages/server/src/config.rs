//! Command-line and environment configuration for the two servers.
//!
//! Every option can be given as a flag or through the environment
//! variable shown in `--help`; flags win.

use std::path::PathBuf;

use clap::Parser;

/// Settings for the flood map server.
#[derive(Debug, Clone, Parser)]
#[command(name = "rescue_radar_flood", about = "Flood severity map server")]
pub struct FloodConfig {
    /// Address to bind to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 5001)]
    pub port: u16,

    /// Flood model artifact (`linear_regression` JSON).
    #[arg(long, env = "FLOOD_MODEL_PATH", default_value = "data/models/flood_model.json")]
    pub model: PathBuf,
}

/// Settings for the tsunami map server.
#[derive(Debug, Clone, Parser)]
#[command(name = "rescue_radar_tsunami", about = "Tsunami vulnerability map server")]
pub struct TsunamiConfig {
    /// Address to bind to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 5002)]
    pub port: u16,

    /// Tsunami model artifact (`logistic_regression` JSON).
    #[arg(
        long,
        env = "TSUNAMI_MODEL_PATH",
        default_value = "data/models/tsunami_model.json"
    )]
    pub model: PathBuf,

    /// Feature scaler fitted alongside the model (`standard_scaler` JSON).
    #[arg(
        long,
        env = "TSUNAMI_SCALER_PATH",
        default_value = "data/models/tsunami_scaler.json"
    )]
    pub scaler: PathBuf,

    /// Send a test alert to the configured recipient before serving.
    #[arg(long)]
    pub startup_alert: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flood_defaults() {
        let config = FloodConfig::try_parse_from(["rescue_radar_flood"]).unwrap();
        assert_eq!(config.model, PathBuf::from("data/models/flood_model.json"));
    }

    #[test]
    fn tsunami_flags_override_defaults() {
        let config = TsunamiConfig::try_parse_from([
            "rescue_radar_tsunami",
            "--bind",
            "127.0.0.1",
            "--port",
            "8002",
            "--scaler",
            "/srv/scaler.json",
            "--startup-alert",
        ])
        .unwrap();
        assert_eq!(config.bind, "127.0.0.1");
        assert_eq!(config.port, 8002);
        assert_eq!(config.scaler, PathBuf::from("/srv/scaler.json"));
        assert_eq!(config.model, PathBuf::from("data/models/tsunami_model.json"));
        assert!(config.startup_alert);
    }

    #[test]
    fn rejects_bad_port() {
        assert!(FloodConfig::try_parse_from(["rescue_radar_flood", "--port", "http"]).is_err());
    }
}
