use chaincheck_utils::config::{MonitorConfig, DEFAULT_RPC_PORT};
use chaincheck_utils::error::ConfigError;
use clap::Parser;
use log::LevelFilter;

/// Polls a node's block height and reports when block production stalls
#[derive(Debug, Parser)]
#[command(name = "chaincheckd", version, about)]
pub struct Args {
    /// Hostname of the RPC node to poll
    #[clap(short, long, default_value = "rpc-node")]
    pub node: String,

    /// JSON-RPC port of the node
    #[clap(long, default_value_t = DEFAULT_RPC_PORT)]
    pub port: u16,

    /// Seconds between checks
    #[clap(short, long, default_value_t = 5)]
    pub interval: u64,

    /// Number of times the node can be stalled before alerting
    #[clap(short, long, default_value_t = 1)]
    pub tolerance: u64,

    /// Minimum block number to start alerting
    #[clap(long, default_value_t = 0)]
    pub min: u64,

    /// Stop after this number of cycles, 0 to run forever
    #[clap(long, default_value_t = 5)]
    pub stop: u64,

    /// Log level, falls back to LOG_LEVEL then info
    #[clap(long, global = true)]
    pub log_level: Option<LevelFilter>,
}

impl Args {
    pub fn monitor_config(&self) -> Result<MonitorConfig, ConfigError> {
        MonitorConfig::new(
            self.node.clone(),
            self.port,
            self.interval,
            self.tolerance,
            self.min,
            self.stop,
        )
    }
}
