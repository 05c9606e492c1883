use std::net::SocketAddr;

use serde::Deserialize;

use crate::core::feed::{FeedSource, Passkey, HDC_PASSKEY_ENV_VAR, HDC_RSS_URL, PUTAO_RSS_URL};
use crate::core::naming::Site;
use crate::utils::Error;

pub const DEFAULT_LISTEN: &str = ":8080";

impl Config {
    pub fn init() -> Result<Self, Error> {
        // get config toml dir from env, with default
        let config_path =
            std::env::var("PTSYNC_CONFIG_PATH").unwrap_or_else(|_| String::from("./config.toml"));

        let config = config::Config::builder()
            .set_default("logs.level", "info")?
            .set_default("server.listen", DEFAULT_LISTEN)?
            .set_default("server.mode", "aggregate")?
            .set_default("feeds.request_timeout_secs", 30)?
            .set_default("feeds.hdchina.url", HDC_RSS_URL)?
            .set_default("feeds.hdchina.passkey_env", HDC_PASSKEY_ENV_VAR)?
            .set_default("feeds.putao.url", PUTAO_RSS_URL)?
            // Add in config toml, if any
            .add_source(config::File::with_name(&config_path).required(false))
            // Add in settings from the environment (with a prefix of PTSYNC)
            .add_source(config::Environment::with_prefix("PTSYNC").separator("__"))
            // Plain PORT wins, as on serverless hosts
            .set_override_option("server.listen", std::env::var("PORT").ok())?
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

// ================================================================================================
// Models
// ================================================================================================

#[derive(Debug, Clone, Deserialize)]
#[allow(unused)]
pub struct Config {
    pub logs: LogsConfig,
    pub server: ServerConfig,
    pub feeds: FeedsConfig,
}

// ===============================================================================
// Logs
// ===============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LogsConfig {
    pub level: String,
}

// ===============================================================================
// Server
// ===============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlerMode {
    /// Return every parsed item of both feeds as JSON.
    Aggregate,
    /// Poll the HDChina feed and hand the items to the store.
    Sync,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Go style listen address: ":8080", "127.0.0.1:8080" or "8080".
    pub listen: String,
    pub mode: HandlerMode,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        parse_listen_addr(&self.listen)
    }
}

pub fn parse_listen_addr(listen: &str) -> Result<SocketAddr, Error> {
    let listen = listen.trim();
    let full = if let Some(port) = listen.strip_prefix(':') {
        format!("0.0.0.0:{port}")
    } else if listen.chars().all(|c| c.is_ascii_digit()) {
        format!("0.0.0.0:{listen}")
    } else {
        listen.to_string()
    };
    full.parse()
        .map_err(|_| Error::InvalidListenAddr(listen.to_string()))
}

// ===============================================================================
// Feeds
// ===============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct FeedsConfig {
    pub request_timeout_secs: u64,
    pub hdchina: FeedConfig,
    pub putao: FeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub url: String,
    /// Passkey appended to `url`. Takes precedence over `passkey_env`.
    #[serde(default)]
    pub passkey: Option<String>,
    /// Environment variable holding the passkey appended to `url`.
    #[serde(default)]
    pub passkey_env: Option<String>,
}

impl FeedConfig {
    pub fn passkey(&self) -> Option<Passkey> {
        match (&self.passkey, &self.passkey_env) {
            (Some(value), _) => Some(Passkey::Value(value.clone())),
            (None, Some(var)) => Some(Passkey::Env(var.clone())),
            (None, None) => None,
        }
    }
}

impl FeedsConfig {
    pub fn hdchina_source(&self) -> FeedSource {
        FeedSource::new(Site::HdChina, &self.hdchina.url, self.hdchina.passkey())
    }

    pub fn putao_source(&self) -> FeedSource {
        FeedSource::new(Site::Putao, &self.putao.url, self.putao.passkey())
    }
}
