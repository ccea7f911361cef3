use crate::error::ConfigError;
use log::LevelFilter;
use std::{env, fmt, path::PathBuf, str::FromStr, time::Duration};

pub const DEFAULT_RPC_PORT: u16 = 9547;

/// Process-level settings read from the environment (and `.env`, if present).
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub log_level: Option<LevelFilter>,

    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is fine, the process environment still applies
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let log_level = match non_empty("LOG_LEVEL") {
            Some(v) => Some(LevelFilter::from_str(&v).map_err(|_| ConfigError::LogLevel(v))?),
            None => None,
        };

        Ok(Config {
            log_level,
            log_dir: non_empty("LOG_DIR").map(PathBuf::from),
        })
    }
}

/// Immutable monitor settings, resolved once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorConfig {
    pub node: String,
    pub port: u16,

    /// Target seconds between cycle starts
    pub interval: u64,

    /// Cycles the height may stay unchanged before alerting
    pub tolerance: u64,

    pub min_alert_height: u64,

    /// 0 runs forever
    pub stop: u64,
}

impl MonitorConfig {
    pub fn new(
        node: impl Into<String>,
        port: u16,
        interval: u64,
        tolerance: u64,
        min_alert_height: u64,
        stop: u64,
    ) -> Result<Self, ConfigError> {
        let node = node.into();
        if node.trim().is_empty() {
            return Err(ConfigError::EmptyNode);
        }
        if port == 0 {
            return Err(ConfigError::ZeroPort);
        }

        Ok(MonitorConfig {
            node,
            port,
            interval,
            tolerance,
            min_alert_height,
            stop,
        })
    }

    pub fn rpc_url(&self) -> String {
        format!("http://{}:{}", self.node, self.port)
    }

    pub fn interval_duration(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn runs_forever(&self) -> bool {
        self.stop == 0
    }
}

impl fmt::Display for MonitorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node={} port={} interval={} tolerance={} min={} stop={}",
            self.node, self.port, self.interval, self.tolerance, self.min_alert_height, self.stop
        )
    }
}
