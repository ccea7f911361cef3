//! Lifecycle events and assertions for the external verification harness.
//!
//! `AntithesisReporter` hands every record to the harness SDK, which talks to the harness
//! when running under it and writes JSON lines to `ANTITHESIS_SDK_LOCAL_OUTPUT` otherwise.

use antithesis_sdk::{antithesis_init, assert_always, assert_sometimes, lifecycle};
use log::{debug, warn};
use serde_json::Value;

pub const PROGRESS_MESSAGE: &str = "Blockchain is progressing";

/// Narrow interface the monitor reports through.
pub trait Reporter {
    /// `condition` must hold every time this is evaluated.
    fn always(&mut self, condition: bool, message: &str, details: &Value);

    /// `condition` must hold at least once over the run.
    fn sometimes(&mut self, condition: bool, message: &str, details: &Value);

    fn send_event(&mut self, name: &str, details: &Value);
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn always(&mut self, condition: bool, message: &str, details: &Value) {
        (**self).always(condition, message, details)
    }

    fn sometimes(&mut self, condition: bool, message: &str, details: &Value) {
        (**self).sometimes(condition, message, details)
    }

    fn send_event(&mut self, name: &str, details: &Value) {
        (**self).send_event(name, details)
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn always(&mut self, condition: bool, message: &str, details: &Value) {
        (**self).always(condition, message, details)
    }

    fn sometimes(&mut self, condition: bool, message: &str, details: &Value) {
        (**self).sometimes(condition, message, details)
    }

    fn send_event(&mut self, name: &str, details: &Value) {
        (**self).send_event(name, details)
    }
}

/// Reports through the harness SDK.
///
/// The SDK catalogs assertions by literal message at link time, so only messages with a
/// registered call site below can be asserted. Anything else is logged and dropped.
pub struct AntithesisReporter {
    _private: (),
}

impl AntithesisReporter {
    pub fn init() -> Self {
        antithesis_init();
        AntithesisReporter { _private: () }
    }
}

impl Reporter for AntithesisReporter {
    fn always(&mut self, condition: bool, message: &str, details: &Value) {
        debug!("always({}) {:?}: {}", condition, message, details);
        match message {
            PROGRESS_MESSAGE => {
                assert_always!(condition, "Blockchain is progressing", details)
            }
            other => warn!("No registered always assertion for {:?}", other),
        }
    }

    fn sometimes(&mut self, condition: bool, message: &str, details: &Value) {
        debug!("sometimes({}) {:?}: {}", condition, message, details);
        match message {
            PROGRESS_MESSAGE => {
                assert_sometimes!(condition, "Blockchain is progressing", details)
            }
            other => warn!("No registered sometimes assertion for {:?}", other),
        }
    }

    fn send_event(&mut self, name: &str, details: &Value) {
        debug!("event {:?}: {}", name, details);
        lifecycle::send_event(name, details);
    }
}
