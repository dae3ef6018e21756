//! CLI argument definitions for the Concierge application.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Concierge - support chat assistant for the travel booking platform.
#[derive(Parser, Debug)]
#[command(name = "concierge", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Chat in the terminal instead of serving the API.
    #[arg(long = "chat")]
    pub chat: bool,

    /// Signed-in user id for the terminal chat.
    #[arg(short = 'u', long = "user", requires = "chat")]
    pub user: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > CONCIERGE_CONFIG env var > ~/.concierge/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("CONCIERGE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the API server port.
    ///
    /// Priority: --port flag > CONCIERGE_PORT env var > config file value.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        if let Some(p) = self.port {
            return p;
        }
        std::env::var("CONCIERGE_PORT")
            .ok()
            .and_then(|val| val.parse::<u16>().ok())
            .unwrap_or(config_port)
    }

    /// Resolve the log level. Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    let home = std::env::var("USERPROFILE");
    #[cfg(not(target_os = "windows"))]
    let home = std::env::var("HOME");
    home.ok().map(PathBuf::from)
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    match home_dir() {
        Some(home) => home.join(".concierge").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

/// Expand a leading `~/` in a configured directory.
pub fn expand_home(dir: &str) -> PathBuf {
    let rest = dir.strip_prefix("~/").or_else(|| dir.strip_prefix("~\\"));
    match (rest, home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(dir),
    }
}
