//! Domain errors returned by case operations.
//!
//! These are reportable conditions, not crashes: the session layer turns each
//! one into an error envelope and the driver may retry after fixing the cause.
use thiserror::Error;

use crate::schema::CaseState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaseError {
    #[error("case_id {case_id} not found; create the case first")]
    NotFound { case_id: String },

    #[error("no narrative available for case_id {case_id}")]
    NoDataAvailable { case_id: String },

    /// Only raised when the strict transition policy is enabled.
    #[error("case_id {case_id}: illegal state transition {from} -> {to}")]
    IllegalTransition {
        case_id: String,
        from: CaseState,
        to: CaseState,
    },
}

impl CaseError {
    /// Stable identifier used in JSON error envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            CaseError::NotFound { .. } => "not_found",
            CaseError::NoDataAvailable { .. } => "no_data_available",
            CaseError::IllegalTransition { .. } => "illegal_transition",
        }
    }

    pub fn case_id(&self) -> &str {
        match self {
            CaseError::NotFound { case_id }
            | CaseError::NoDataAvailable { case_id }
            | CaseError::IllegalTransition { case_id, .. } => case_id,
        }
    }
}
