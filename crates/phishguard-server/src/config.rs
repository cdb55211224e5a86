//! Server configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// XGBoost JSON model artifact
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Listen address
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Cross-origin policy
    #[serde(default)]
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        // A missing file means defaults
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::from_yaml_str(&content)?
        } else {
            Self::default()
        };

        if let Some(model) = &cli.model {
            config.model_path = PathBuf::from(model);
        }

        if let Some(listen) = &cli.listen {
            config.host = listen.clone();
        }

        if let Some(port) = cli.port {
            config.port = port;
        }

        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Socket address the listener binds to
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            host: default_host(),
            port: default_port(),
            cors: CorsConfig::default(),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Accept requests from any origin (browser extensions have no fixed origin)
    #[serde(default = "default_true")]
    pub allow_any_origin: bool,

    /// Origins allowed when `allow_any_origin` is off
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_any_origin: true,
            allowed_origins: Vec::new(),
        }
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from("phishing_model.json")
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_true() -> bool {
    true
}
