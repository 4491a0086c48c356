//! Error type for the test battery.

use serde::Serialize;

/// Why a single estimator produced no measurement.
///
/// Battery errors never abort a run: each one is recorded as a failed entry
/// in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BatteryError {
    #[error("degenerate input to {test}: {reason}")]
    DegenerateInput { test: &'static str, reason: String },

    #[error("invalid width {width}: must be a multiple of 8 in 8..=64")]
    InvalidWidth { width: u32 },

    #[error("invalid lag {lag} for a stream of {len} values")]
    InvalidLag { lag: usize, len: usize },

    #[error("{test} panicked")]
    Panicked { test: String },
}

impl BatteryError {
    pub(crate) fn degenerate(test: &'static str, reason: impl Into<String>) -> Self {
        Self::DegenerateInput {
            test,
            reason: reason.into(),
        }
    }
}
