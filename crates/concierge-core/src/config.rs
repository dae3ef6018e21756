use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ConciergeError, Result};
use crate::types::QuickAction;

/// Top-level configuration for the Concierge application.
///
/// Loaded from `~/.concierge/config.toml` by default. Every section falls
/// back to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConciergeConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub support: SupportConfig,
}

impl ConciergeConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ConciergeConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ConciergeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// API server port (bound on localhost).
    pub port: u16,
    /// Directory holding the API token file.
    pub data_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            port: 3040,
            data_dir: "~/.concierge".to_string(),
        }
    }
}

/// Chat session behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Idle seconds before the watchdog ends the session.
    pub idle_timeout_secs: u64,
    /// Id of the quick action that answers with the help reply directly.
    pub help_action_id: String,
    /// Quick actions shown above the input field, in display order.
    pub quick_actions: Vec<QuickAction>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 300,
            help_action_id: "help-support".to_string(),
            quick_actions: vec![
                QuickAction::new("account-status", "Account Status"),
                QuickAction::new("credit-spend", "Credit Spend"),
                QuickAction::new("help-support", "Help & Support"),
            ],
        }
    }
}

/// Endpoints of the external collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Base URL of the profile document service.
    pub profile_base_url: String,
    /// URL of the free-text chat endpoint.
    pub responder_url: String,
    /// Bearer key sent to both services, if set.
    pub api_key: Option<String>,
    /// Transport timeout for outgoing requests, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            profile_base_url: "http://127.0.0.1:8080".to_string(),
            responder_url: "http://127.0.0.1:8080/api/chat".to_string(),
            api_key: None,
            request_timeout_secs: 30,
        }
    }
}

/// Template for the "compose support email" handoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportConfig {
    pub email: String,
    pub subject: String,
    pub body: String,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            email: "support@example.com".to_string(),
            subject: "Support Request".to_string(),
            body: "Hello Support Team,\n\nI need help with the following:\n\n".to_string(),
        }
    }
}
