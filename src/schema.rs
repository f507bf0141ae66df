//! Schema types for case records, checklists, and transition history.
//!
//! Everything here is plain data: operations live in `intake`, rendering in
//! `render`. Field names are stable because snapshots are emitted as JSON.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::util::present;

/// Base documents requested for every case, in presentation order.
pub const BASE_DOCUMENTS: [&str; 10] = [
    "Contrato (si existe)",
    "Constancia salarial / colillas / transferencias",
    "Carta de despido (si existe)",
    "Afiliación AFP/ISSS (si aplica)",
    "Comprobantes de pago",
    "Planillas / boletas / transferencias",
    "Comunicación con empleador (WhatsApp/email) si existe",
    "Constancia médica (si aplica)",
    "Incapacidad (si existe)",
    "Reportes (si existen)",
];

/// Lifecycle states of a case, in workflow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseState {
    Received,
    DetailsCaptured,
    DocsRequested,
    DocsReceived,
    Validated,
    PreClassified,
    ExpedienteGenerated,
    HandoffToHuman,
}

impl CaseState {
    pub const ALL: [CaseState; 8] = [
        CaseState::Received,
        CaseState::DetailsCaptured,
        CaseState::DocsRequested,
        CaseState::DocsReceived,
        CaseState::Validated,
        CaseState::PreClassified,
        CaseState::ExpedienteGenerated,
        CaseState::HandoffToHuman,
    ];

    /// Return the stable string identifier used in JSON results.
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseState::Received => "RECEIVED",
            CaseState::DetailsCaptured => "DETAILS_CAPTURED",
            CaseState::DocsRequested => "DOCS_REQUESTED",
            CaseState::DocsReceived => "DOCS_RECEIVED",
            CaseState::Validated => "VALIDATED",
            CaseState::PreClassified => "PRE_CLASSIFIED",
            CaseState::ExpedienteGenerated => "EXPEDIENTE_GENERATED",
            CaseState::HandoffToHuman => "HANDOFF_TO_HUMAN",
        }
    }

    /// Zero-based position in the workflow.
    pub fn position(self) -> usize {
        self as usize
    }

    /// The state that follows this one in the nominal workflow.
    pub fn successor(self) -> Option<CaseState> {
        CaseState::ALL.get(self.position() + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, CaseState::HandoffToHuman)
    }
}

impl fmt::Display for CaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the operator captures about a case.
///
/// `None` (or an empty string) means "not yet captured"; validation turns
/// those gaps into flags instead of rejecting input up front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseData {
    pub name: Option<String>,
    /// National identity document (DUI).
    pub dui: Option<String>,
    pub contact: Option<String>,

    pub employer_name: Option<String>,
    pub role: Option<String>,
    pub wage_amount: Option<String>,
    pub wage_period: Option<String>,

    pub start_date: Option<String>,
    pub termination_date: Option<String>,

    /// Narrative pulled from the upstream source.
    pub narrative: Option<String>,
    /// Operator-typed supplement to the base narrative.
    pub narrative_extra: Option<String>,

    /// What the person is seeking (reinstatement, payment, certificate...).
    pub claim: Option<String>,

    pub routing_label: Option<String>,
    #[serde(default)]
    pub flags: Vec<String>,
}

impl CaseData {
    /// Base narrative plus the supplement on its own line, when present.
    pub fn combined_narrative(&self) -> String {
        let mut text = self.narrative.clone().unwrap_or_default();
        if let Some(extra) = present(&self.narrative_extra) {
            text.push('\n');
            text.push_str(extra);
        }
        text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChecklistItem {
    pub doc: String,
    /// Documents are requested, never mandatory.
    pub required: bool,
    pub received: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DocumentChecklistItem {
    pub fn pending(doc: &str) -> Self {
        Self {
            doc: doc.to_string(),
            required: false,
            received: false,
            note: None,
        }
    }
}

/// Fresh checklist covering every base document, none received.
pub fn base_checklist() -> BTreeMap<String, DocumentChecklistItem> {
    BASE_DOCUMENTS
        .iter()
        .map(|doc| (doc.to_string(), DocumentChecklistItem::pending(doc)))
        .collect()
}

/// A single recorded state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: CaseState,
    pub to: CaseState,
    pub operation: String,
    pub at_epoch_ms: u64,
}

/// Aggregate root for one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub case_id: String,
    pub state: CaseState,
    pub created_at_epoch_ms: u64,
    pub updated_at_epoch_ms: u64,
    pub data: CaseData,
    #[serde(default)]
    pub checklist: BTreeMap<String, DocumentChecklistItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expediente: Option<String>,
    #[serde(default)]
    pub transitions: Vec<TransitionRecord>,
}

impl CaseRecord {
    pub fn new(case_id: String, now_epoch_ms: u64) -> Self {
        Self {
            case_id,
            state: CaseState::Received,
            created_at_epoch_ms: now_epoch_ms,
            updated_at_epoch_ms: now_epoch_ms,
            data: CaseData::default(),
            checklist: BTreeMap::new(),
            expediente: None,
            transitions: Vec::new(),
        }
    }

    /// Refresh the update timestamp; it never moves backwards.
    pub fn touch(&mut self, now_epoch_ms: u64) {
        self.updated_at_epoch_ms = self.updated_at_epoch_ms.max(now_epoch_ms);
    }

    /// Move to `to`, logging the change and refreshing the update timestamp.
    pub fn enter(&mut self, to: CaseState, operation: &str, now_epoch_ms: u64) {
        let from = self.state;
        self.transitions.push(TransitionRecord {
            from,
            to,
            operation: operation.to_string(),
            at_epoch_ms: now_epoch_ms,
        });
        self.state = to;
        self.touch(now_epoch_ms);
        tracing::debug!(
            case_id = %self.case_id,
            from = %from,
            to = %to,
            operation,
            "case state transition"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_serialize_as_screaming_snake_case() {
        let json = serde_json::to_string(&CaseState::HandoffToHuman).expect("serialize state");
        assert_eq!(json, "\"HANDOFF_TO_HUMAN\"");
        for state in CaseState::ALL {
            let json = serde_json::to_string(&state).expect("serialize state");
            assert_eq!(json, format!("\"{}\"", state.as_str()));
        }
    }

    #[test]
    fn successor_follows_workflow_order() {
        assert_eq!(
            CaseState::Received.successor(),
            Some(CaseState::DetailsCaptured)
        );
        assert_eq!(
            CaseState::PreClassified.successor(),
            Some(CaseState::ExpedienteGenerated)
        );
        assert_eq!(CaseState::HandoffToHuman.successor(), None);
        assert!(CaseState::Validated < CaseState::PreClassified);
    }

    #[test]
    fn combined_narrative_skips_empty_supplement() {
        let mut data = CaseData {
            narrative: Some("base".to_string()),
            ..CaseData::default()
        };
        assert_eq!(data.combined_narrative(), "base");
        data.narrative_extra = Some(String::new());
        assert_eq!(data.combined_narrative(), "base");
        data.narrative_extra = Some("more".to_string());
        assert_eq!(data.combined_narrative(), "base\nmore");
        data.narrative = None;
        assert_eq!(data.combined_narrative(), "\nmore");
    }

    #[test]
    fn enter_logs_transition_and_keeps_timestamps_monotonic() {
        let mut record = CaseRecord::new("LAB-0001".to_string(), 100);
        record.enter(CaseState::DetailsCaptured, "capture_identity", 90);
        assert_eq!(record.state, CaseState::DetailsCaptured);
        assert_eq!(record.updated_at_epoch_ms, 100);
        record.enter(CaseState::DocsRequested, "request_documents", 250);
        assert_eq!(record.updated_at_epoch_ms, 250);
        assert_eq!(record.created_at_epoch_ms, 100);
        assert_eq!(record.transitions.len(), 2);
        assert_eq!(record.transitions[0].from, CaseState::Received);
        assert_eq!(record.transitions[1].operation, "request_documents");
    }

    #[test]
    fn base_checklist_covers_every_document_unreceived() {
        let checklist = base_checklist();
        assert_eq!(checklist.len(), BASE_DOCUMENTS.len());
        assert!(checklist.values().all(|item| !item.received && !item.required));
    }
}
