use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::rolling_file::{
        policy::compound::{
            roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy,
        },
        RollingFileAppender,
    },
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use std::path::Path;

const LOG_FILE_BASE: &str = "chaincheck";
const ROLL_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const ROLL_WINDOW: u32 = 5;

fn create_stdout_appender() -> ConsoleAppender {
    let pattern = "{d(%Y-%m-%d %H:%M:%S%.3f %Z)} [{h({l})}] - {m}{n}";
    ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build()
}

fn create_rolling_file_appender(
    base_path: &Path,
) -> Result<RollingFileAppender, Box<dyn std::error::Error>> {
    let pattern = "{d(%Y-%m-%d %H:%M:%S%.3f %Z)} - {l} - {m} (({f}:{L})){n}";
    let log_file_path = base_path.with_extension("log");
    let roll_pattern = format!("{}.{{}}.log", base_path.to_string_lossy());

    let roller = FixedWindowRoller::builder()
        .base(1)
        .build(&roll_pattern, ROLL_WINDOW)?;

    let trigger = SizeTrigger::new(ROLL_SIZE_BYTES);
    let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));

    RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build(log_file_path, Box::new(policy))
        .map_err(|e| e.into())
}

/// Console logging always; a rolling file under `log_dir` when one is given.
pub fn init_logger(
    level: LevelFilter,
    log_dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(create_stdout_appender())));
    let mut root = Root::builder().appender("stdout");

    if let Some(log_dir) = log_dir {
        std::fs::create_dir_all(log_dir)?;
        let rolling_file = create_rolling_file_appender(&log_dir.join(LOG_FILE_BASE))?;
        builder = builder.appender(Appender::builder().build("file", Box::new(rolling_file)));
        root = root.appender("file");
    }

    let config = builder.build(root.build(level))?;
    log4rs::init_config(config)?;

    Ok(())
}
