//! Error types for plan resolution
//!
//! Resolution has exactly one failure: an active, paying subscription whose
//! plan identifier cannot be mapped to a canonical plan. The engine refuses
//! to guess a plan in that case and callers branch on the reason code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of reasons a resolution can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanResolutionErrorReason {
    /// Subscription is `ACTIVE` but its plan id names no known plan
    ActiveWithInvalidPlanId,
}

impl PlanResolutionErrorReason {
    /// Get the reason code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActiveWithInvalidPlanId => "ACTIVE_WITH_INVALID_PLAN_ID",
        }
    }
}

/// Plan resolution error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanResolutionError {
    /// Active subscription with an unrecognized (or missing) plan id
    #[error(
        "Active subscription has unrecognized plan id: {}",
        .plan_id.as_deref().unwrap_or("<missing>")
    )]
    ActiveWithInvalidPlanId {
        /// The plan id as received, if any
        plan_id: Option<String>,
    },
}

/// Result type for plan resolution.
pub type PlanResult<T> = Result<T, PlanResolutionError>;

impl PlanResolutionError {
    /// Get the structured reason for this error.
    pub fn reason(&self) -> PlanResolutionErrorReason {
        match self {
            Self::ActiveWithInvalidPlanId { .. } => PlanResolutionErrorReason::ActiveWithInvalidPlanId,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        self.reason().as_str()
    }

    /// Get HTTP status code for this error.
    ///
    /// The account exists and is paying, but cannot be granted anything
    /// until billing data is repaired.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ActiveWithInvalidPlanId { .. } => 403,
        }
    }

    /// The offending plan id, if one was supplied.
    pub fn plan_id(&self) -> Option<&str> {
        match self {
            Self::ActiveWithInvalidPlanId { plan_id } => plan_id.as_deref(),
        }
    }
}
