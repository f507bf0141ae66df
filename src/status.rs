//! Next-step suggestions derived from a case's state.
//!
//! Suggestions follow the driver's nominal sequence. They are advice for the
//! operator; nothing enforces them.
use serde::{Serialize, Serializer};
use std::fmt;

use crate::schema::{CaseRecord, CaseState};
use crate::validate::employment_fields_missing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    PullNarrative,
    CaptureRequiredFields,
    RequestDocuments,
    MarkDocuments,
    Validate,
    GenerateExpediente,
    Handoff,
}

impl NextStep {
    /// Tool name the driver should call next.
    pub fn tool(&self) -> &'static str {
        match self {
            NextStep::PullNarrative => "pull_story_from_general",
            NextStep::CaptureRequiredFields => "capture_required_fields",
            NextStep::RequestDocuments => "request_documents",
            NextStep::MarkDocuments => "mark_document",
            NextStep::Validate => "validate_and_recheck",
            NextStep::GenerateExpediente => "generate_expediente",
            NextStep::Handoff => "handoff_to_human",
        }
    }
}

/// Serialized as the tool name so drivers can call it directly.
impl Serialize for NextStep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tool())
    }
}

impl fmt::Display for NextStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool())
    }
}

pub fn next_step(record: &CaseRecord) -> Option<NextStep> {
    match record.state {
        CaseState::Received => Some(NextStep::PullNarrative),
        CaseState::DetailsCaptured if employment_fields_missing(&record.data) => {
            Some(NextStep::CaptureRequiredFields)
        }
        CaseState::DetailsCaptured => Some(NextStep::RequestDocuments),
        CaseState::DocsRequested => Some(NextStep::MarkDocuments),
        // Documents are optional, so one mark is enough to move on.
        CaseState::DocsReceived => Some(NextStep::Validate),
        CaseState::Validated | CaseState::PreClassified => Some(NextStep::GenerateExpediente),
        CaseState::ExpedienteGenerated => Some(NextStep::Handoff),
        CaseState::HandoffToHuman => None,
    }
}
