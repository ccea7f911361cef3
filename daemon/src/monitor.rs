use chaincheck_utils::config::MonitorConfig;
use chaincheck_utils::error::PollStatus;
use chaincheck_utils::rpc::{PollResult, RpcClient};
use chaincheck_utils::sdk::{Reporter, PROGRESS_MESSAGE};
use log::{error, info, warn};
use serde_json::json;
use std::time::Duration;
use tokio::time::{sleep, Instant};

pub const START_EVENT: &str = "chain_check_start";
pub const STOP_EVENT: &str = "chain_check_stop";
pub const FAILURE_EVENT: &str = "exception is not none";

const MIN_SLEEP: Duration = Duration::from_secs(1);

/// Anything that can produce one block height reading per cycle.
#[allow(async_fn_in_trait)]
pub trait BlockSource {
    async fn poll(&mut self) -> PollResult;
}

impl BlockSource for RpcClient {
    async fn poll(&mut self) -> PollResult {
        RpcClient::poll(self).await
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleState {
    pub last_height: Option<u64>,
    pub last_changed_cycle: u64,
    pub cycle: u64,
    pub consecutive_stalls: u64,
}

impl CycleState {
    fn begin_cycle(&mut self) -> u64 {
        self.cycle += 1;
        self.cycle
    }

    fn reset_to(&mut self, height: u64) {
        self.last_height = Some(height);
        self.last_changed_cycle = self.cycle;
        self.consecutive_stalls = 0;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StallCheck {
    WithinTolerance,
    BelowThreshold,
    Alert,
}

/// What one cycle saw, after state has been updated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Observation {
    Failed {
        reason: String,
        status: PollStatus,
    },
    Initialized {
        height: u64,
    },
    Progressed {
        height: u64,
        previous: u64,
    },
    /// Height went backwards. State still follows the node to the lower height.
    Regressed {
        height: u64,
        previous: u64,
    },
    Unchanged {
        height: u64,
        stall_duration: u64,
        check: StallCheck,
    },
}

impl Observation {
    /// `(current, last)` pair the progress assertions compare, `None` for failed polls.
    fn progress_pair(&self) -> Option<(u64, u64)> {
        match *self {
            Observation::Failed { .. } => None,
            Observation::Initialized { height } => Some((height, height)),
            Observation::Progressed { height, previous }
            | Observation::Regressed { height, previous } => Some((height, previous)),
            Observation::Unchanged { height, .. } => Some((height, height)),
        }
    }
}

/// Applies one poll result to the tracked state.
pub fn evaluate(state: &mut CycleState, config: &MonitorConfig, result: PollResult) -> Observation {
    let height = match result {
        PollResult::Success(height) => height,
        PollResult::Failure { reason, status } => return Observation::Failed { reason, status },
    };

    let Some(previous) = state.last_height else {
        state.reset_to(height);
        return Observation::Initialized { height };
    };

    if height > previous {
        state.reset_to(height);
        return Observation::Progressed { height, previous };
    }

    // TODO: confirm whether a regression should keep the higher baseline instead
    if height < previous {
        state.reset_to(height);
        return Observation::Regressed { height, previous };
    }

    let stall_duration = state.cycle - state.last_changed_cycle;
    let check = if stall_duration <= config.tolerance {
        StallCheck::WithinTolerance
    } else if height < config.min_alert_height {
        StallCheck::BelowThreshold
    } else {
        state.consecutive_stalls += 1;
        StallCheck::Alert
    };

    Observation::Unchanged {
        height,
        stall_duration,
        check,
    }
}

/// Sleep that keeps cycle starts `interval` apart, never shorter than one second.
pub fn next_delay(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed).max(MIN_SLEEP)
}

pub struct StallMonitor<S, R> {
    config: MonitorConfig,
    source: S,
    reporter: R,
    state: CycleState,
}

impl<S: BlockSource, R: Reporter> StallMonitor<S, R> {
    pub fn new(config: MonitorConfig, source: S, reporter: R) -> Self {
        StallMonitor {
            config,
            source,
            reporter,
            state: CycleState::default(),
        }
    }

    pub fn state(&self) -> &CycleState {
        &self.state
    }

    fn lifecycle_details(&self) -> serde_json::Value {
        json!({ "args": self.config.to_string() })
    }

    /// Runs cycles until the stop count is reached, forever if it is 0.
    pub async fn run(&mut self) {
        let details = self.lifecycle_details();
        self.reporter.send_event(START_EVENT, &details);
        info!("Monitoring RPC node: {}", self.config.node);

        loop {
            let started = Instant::now();
            self.step().await;

            info!("Healthcheck cycle {} completed", self.state.cycle);
            info!("{}", "-".repeat(50));

            if !self.config.runs_forever() && self.state.cycle == self.config.stop {
                let details = self.lifecycle_details();
                self.reporter.send_event(STOP_EVENT, &details);
                info!("Healthcheck exited normally");
                break;
            }

            sleep(next_delay(
                self.config.interval_duration(),
                started.elapsed(),
            ))
            .await;
        }
    }

    /// One poll, evaluation and report, without the trailing sleep.
    pub async fn step(&mut self) -> Observation {
        let cycle = self.state.begin_cycle();
        let result = self.source.poll().await;
        let observation = evaluate(&mut self.state, &self.config, result);
        self.report(cycle, &observation);
        observation
    }

    fn report(&mut self, cycle: u64, observation: &Observation) {
        match observation {
            Observation::Failed { reason, status } => {
                error!("Error connecting to {}: {}", self.config.node, reason);
                self.reporter.send_event(
                    FAILURE_EVENT,
                    &json!({ "exception": reason, "status": status.to_string() }),
                );
            }
            Observation::Initialized { height } => {
                info!("Block: {}", height);
                info!("Initial block recorded");
            }
            Observation::Progressed { height, .. } => {
                info!("Block: {}", height);
                info!("Block progressed - node healthy");
            }
            Observation::Regressed { height, previous } => {
                info!("Block: {}", height);
                warn!("Block went backwards from {} to {}", previous, height);
            }
            Observation::Unchanged {
                height,
                stall_duration,
                check,
            } => {
                info!("Block: {}", height);
                info!("Block unchanged for {} checks", stall_duration);
                match check {
                    StallCheck::WithinTolerance => {}
                    StallCheck::BelowThreshold => info!(
                        "Block {} below alert threshold ({})",
                        height, self.config.min_alert_height
                    ),
                    StallCheck::Alert => warn!(
                        "ALERT: RPC node {} STALLED - Block {} unchanged for {} checks",
                        self.config.node, height, stall_duration
                    ),
                }
            }
        }

        if let Some((current, last)) = observation.progress_pair() {
            let details = json!({
                "current_block": current,
                "last_block": last,
                "cycle": cycle,
            });
            self.reporter
                .always(current >= last, PROGRESS_MESSAGE, &details);
            self.reporter
                .sometimes(current >= last, PROGRESS_MESSAGE, &details);
        }
    }
}
