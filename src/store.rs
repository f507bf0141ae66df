//! In-memory case store.
//!
//! Records live only as long as the store; membership is the sole way to
//! reach one. Keys are normalized case ids.
use std::collections::BTreeMap;

use crate::error::CaseError;
use crate::schema::{CaseRecord, CaseState};

/// Upper-case (and trim) a caller-supplied case id.
pub fn normalize_case_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[derive(Debug, Default)]
pub struct CaseStore {
    cases: BTreeMap<String, CaseRecord>,
}

impl CaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn get(&self, case_id: &str) -> Result<&CaseRecord, CaseError> {
        self.cases.get(case_id).ok_or_else(|| CaseError::NotFound {
            case_id: case_id.to_string(),
        })
    }

    pub fn get_mut(&mut self, case_id: &str) -> Result<&mut CaseRecord, CaseError> {
        self.cases
            .get_mut(case_id)
            .ok_or_else(|| CaseError::NotFound {
                case_id: case_id.to_string(),
            })
    }

    /// Fetch a record, creating it in `RECEIVED` when absent.
    pub fn get_or_create(&mut self, case_id: &str, now_epoch_ms: u64) -> &mut CaseRecord {
        self.cases.entry(case_id.to_string()).or_insert_with(|| {
            tracing::info!(case_id, "case created");
            CaseRecord::new(case_id.to_string(), now_epoch_ms)
        })
    }

    /// Case ids and states, sorted by id.
    pub fn summaries(&self) -> Vec<(String, CaseState)> {
        self.cases
            .values()
            .map(|record| (record.case_id.clone(), record.state))
            .collect()
    }
}
