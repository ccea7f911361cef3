use strum_macros::{Display, EnumString};
use thiserror::Error;

/// Coarse classification of a failed poll, carried as `status` in failure events.
#[derive(Clone, Copy, Debug, Display, EnumString, PartialEq, Eq)]
pub enum PollStatus {
    #[strum(serialize = "node not running")]
    NodeNotRunning,

    #[strum(serialize = "exception")]
    Exception,
}

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("connection to {url} failed: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP Error {status}: {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("node returned error {code}: {message}")]
    Node { code: i64, message: String },

    #[error("response has no result")]
    MissingResult,

    #[error("invalid block number {value:?}: {source}")]
    InvalidHex {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

impl RpcError {
    pub fn status(&self) -> PollStatus {
        match self {
            RpcError::Timeout { .. } | RpcError::Connect { .. } | RpcError::Status { .. } => {
                PollStatus::NodeNotRunning
            }
            _ => PollStatus::Exception,
        }
    }

    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RpcError::Timeout {
                url: url.to_string(),
            }
        } else if err.is_connect() {
            RpcError::Connect {
                url: url.to_string(),
                source: err,
            }
        } else if let Some(status) = err.status() {
            RpcError::Status {
                url: url.to_string(),
                status,
            }
        } else if err.is_decode() {
            RpcError::Decode(err.to_string())
        } else {
            RpcError::Transport(err)
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("node host must not be empty")]
    EmptyNode,

    #[error("RPC port must be non-zero")]
    ZeroPort,

    #[error("invalid LOG_LEVEL {0:?}")]
    LogLevel(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn poll_status_renders_event_strings() {
        assert_eq!(PollStatus::NodeNotRunning.to_string(), "node not running");
        assert_eq!(PollStatus::Exception.to_string(), "exception");
        assert_eq!(
            PollStatus::from_str("node not running").unwrap(),
            PollStatus::NodeNotRunning
        );
    }

    #[test]
    fn decode_failures_are_exceptions() {
        assert_eq!(RpcError::MissingResult.status(), PollStatus::Exception);
        assert_eq!(
            RpcError::Decode("eof".to_string()).status(),
            PollStatus::Exception
        );
        assert_eq!(
            RpcError::Timeout {
                url: "http://rpc-node:9547".to_string()
            }
            .status(),
            PollStatus::NodeNotRunning
        );
    }
}
