mod args;
mod monitor;

use args::Args;
use chaincheck_utils::config::Config;
use chaincheck_utils::rpc::RpcClient;
use chaincheck_utils::sdk::AntithesisReporter;
use clap::Parser;
use log::{info, LevelFilter};
use monitor::StallMonitor;

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let log_level = args
        .log_level
        .or(config.log_level)
        .unwrap_or(LevelFilter::Info);
    chaincheck_utils::log::init_logger(log_level, config.log_dir.as_deref())?;

    info!("Starting chain check");
    let monitor_config = args.monitor_config()?;
    info!("chain check args: {}", monitor_config);

    let reporter = AntithesisReporter::init();

    let rpc_client = RpcClient::new(monitor_config.rpc_url())?;
    info!("Polling {}", rpc_client.url());

    let mut monitor = StallMonitor::new(monitor_config, rpc_client, reporter);
    monitor.run().await;

    let state = monitor.state();
    info!(
        "Ran {} cycles, last block {:?}, {} consecutive stalls at exit",
        state.cycle, state.last_height, state.consecutive_stalls
    );

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("chaincheckd: {}", e);
        std::process::exit(1);
    }
}
