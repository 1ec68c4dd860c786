//! Issuance outcome recording.

use std::time::Duration;

use crate::domain::coupons::{errors::CouponsServiceError, models::Coupon};

/// Result of a single issuance attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueOutcome {
    Issued,
    NotFound,
    NotStarted,
    Exhausted,
    Failed,
}

impl IssueOutcome {
    #[must_use]
    pub fn from_result(result: &Result<Coupon, CouponsServiceError>) -> Self {
        match result {
            Ok(_) => Self::Issued,
            Err(CouponsServiceError::NotFound) => Self::NotFound,
            Err(CouponsServiceError::NotStarted) => Self::NotStarted,
            Err(CouponsServiceError::Exhausted) => Self::Exhausted,
            Err(_) => Self::Failed,
        }
    }

    /// Stable label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issued => "issued",
            Self::NotFound => "not_found",
            Self::NotStarted => "not_started",
            Self::Exhausted => "exhausted",
            Self::Failed => "failed",
        }
    }
}

/// Receives the outcome and latency of every issuance attempt.
pub trait IssuanceRecorder: std::fmt::Debug + Send + Sync {
    fn record(&self, outcome: IssueOutcome, elapsed: Duration);
}

/// Discards every observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl IssuanceRecorder for NoopRecorder {
    fn record(&self, _outcome: IssueOutcome, _elapsed: Duration) {}
}
