//! Case operations driven by the operator's conversational client.
//!
//! Every operation normalizes the case id, touches exactly one record, and
//! returns a small serializable outcome. Preconditions are about record
//! existence only; the transition policy decides whether state order matters.
use serde::{Deserialize, Serialize};

use crate::classify::{self, Routing};
use crate::error::CaseError;
use crate::narrative::{NarrativeSource, SampleNarratives};
use crate::render::render_expediente;
use crate::schema::{base_checklist, CaseRecord, CaseState, DocumentChecklistItem, BASE_DOCUMENTS};
use crate::status::{next_step, NextStep};
use crate::store::{normalize_case_id, CaseStore};
use crate::transitions::TransitionPolicy;
use crate::util::{now_epoch_ms, or_nd, present};
use crate::validate::validation_flags;

/// Case id used when `create_case` is called without one.
pub const DEFAULT_CASE_ID: &str = "LAB-0001";

pub const DOCUMENTS_OPTIONAL_NOTE: &str =
    "Documents are not mandatory, but request them if they exist.";

/// Identity data dictated by the person and typed by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
    #[serde(default)]
    pub dui: Option<String>,
    #[serde(default, alias = "contacto")]
    pub contact: Option<String>,
}

/// Employment facts and the claim sought.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredFields {
    #[serde(default, alias = "empleador_nombre")]
    pub employer_name: Option<String>,
    #[serde(default, alias = "cargo")]
    pub role: Option<String>,
    #[serde(default, alias = "salario_monto")]
    pub wage_amount: Option<String>,
    #[serde(default, alias = "salario_periodicidad")]
    pub wage_period: Option<String>,
    #[serde(default, alias = "fecha_inicio")]
    pub start_date: Option<String>,
    #[serde(default, alias = "fecha_despido_ultimo_pago")]
    pub termination_date: Option<String>,
    #[serde(default, alias = "pretension")]
    pub claim: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseStatus {
    pub case_id: String,
    pub state: CaseState,
}

/// Name, ID, and narrative as the operator shows them on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestedFormat {
    pub name: String,
    pub dui: String,
    pub narrative: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrativePulled {
    pub case_id: String,
    pub state: CaseState,
    pub format: RequestedFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentStatus {
    pub doc: String,
    pub received: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentsRequested {
    pub case_id: String,
    pub state: CaseState,
    pub documents: Vec<DocumentStatus>,
    pub note: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentMarked {
    pub case_id: String,
    pub state: CaseState,
    pub doc: String,
    pub received: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub case_id: String,
    pub state: CaseState,
    pub flags: Vec<String>,
    pub routing: Routing,
    pub routing_label: String,
    pub labor_relevant: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpedienteOutcome {
    pub case_id: String,
    pub state: CaseState,
    pub expediente: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandoffOutcome {
    pub case_id: String,
    pub state: CaseState,
    pub note: String,
}

/// Full record plus the suggested next tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseSnapshot {
    #[serde(flatten)]
    pub record: CaseRecord,
    pub next_step: Option<NextStep>,
}

/// Owns the case store and the collaborators operations depend on.
pub struct Intake {
    store: CaseStore,
    narratives: Box<dyn NarrativeSource>,
    policy: TransitionPolicy,
    default_case_id: String,
}

impl Default for Intake {
    fn default() -> Self {
        Self::new(SampleNarratives)
    }
}

fn ensure_transition(
    policy: TransitionPolicy,
    record: &CaseRecord,
    to: CaseState,
) -> Result<(), CaseError> {
    if policy.allows(record.state, to) {
        return Ok(());
    }
    tracing::info!(
        case_id = %record.case_id,
        from = %record.state,
        to = %to,
        "transition rejected by strict policy"
    );
    Err(CaseError::IllegalTransition {
        case_id: record.case_id.clone(),
        from: record.state,
        to,
    })
}

fn status_of(record: &CaseRecord) -> CaseStatus {
    CaseStatus {
        case_id: record.case_id.clone(),
        state: record.state,
    }
}

impl Intake {
    pub fn new(narratives: impl NarrativeSource + 'static) -> Self {
        Self {
            store: CaseStore::new(),
            narratives: Box::new(narratives),
            policy: TransitionPolicy::default(),
            default_case_id: DEFAULT_CASE_ID.to_string(),
        }
    }

    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_default_case_id(mut self, case_id: &str) -> Self {
        self.default_case_id = normalize_case_id(case_id);
        self
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    pub fn store(&self) -> &CaseStore {
        &self.store
    }

    /// Create a case if absent. Calling it again leaves the record untouched.
    pub fn create_case(&mut self, case_id: Option<&str>) -> CaseStatus {
        let case_id = case_id
            .map(normalize_case_id)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.default_case_id.clone());
        let record = self.store.get_or_create(&case_id, now_epoch_ms());
        status_of(record)
    }

    /// Store name, DUI, and contact. Creates the case when absent.
    pub fn capture_identity(
        &mut self,
        case_id: &str,
        identity: Identity,
    ) -> Result<CaseStatus, CaseError> {
        let case_id = normalize_case_id(case_id);
        let now = now_epoch_ms();
        let record = self.store.get_or_create(&case_id, now);
        ensure_transition(self.policy, record, CaseState::DetailsCaptured)?;

        record.data.name = identity.name;
        record.data.dui = identity.dui;
        record.data.contact = identity.contact;
        record.enter(CaseState::DetailsCaptured, "capture_identity", now);
        tracing::info!(case_id = %record.case_id, "identity captured");
        Ok(status_of(record))
    }

    /// Copy the upstream narrative into the case. Creates the case when absent.
    ///
    /// A missing narrative is reported as `NoDataAvailable` and leaves the
    /// case state as it was.
    pub fn pull_narrative(&mut self, case_id: &str) -> Result<NarrativePulled, CaseError> {
        let case_id = normalize_case_id(case_id);
        let now = now_epoch_ms();
        let narrative = self.narratives.narrative(&case_id);
        let record = self.store.get_or_create(&case_id, now);
        let Some(narrative) = narrative else {
            tracing::info!(case_id = %record.case_id, "no narrative available");
            return Err(CaseError::NoDataAvailable { case_id });
        };
        ensure_transition(self.policy, record, CaseState::DetailsCaptured)?;

        tracing::debug!(
            case_id = %record.case_id,
            preview = %narrative.chars().take(60).collect::<String>(),
            "narrative pulled"
        );
        record.data.narrative = Some(narrative);
        record.enter(CaseState::DetailsCaptured, "pull_story_from_general", now);

        let data = &record.data;
        Ok(NarrativePulled {
            case_id: record.case_id.clone(),
            state: record.state,
            format: RequestedFormat {
                name: or_nd(&data.name).to_string(),
                dui: or_nd(&data.dui).to_string(),
                narrative: data.combined_narrative(),
            },
        })
    }

    /// Record the operator-typed supplement to the narrative.
    pub fn append_narrative(
        &mut self,
        case_id: &str,
        info: String,
    ) -> Result<CaseStatus, CaseError> {
        let case_id = normalize_case_id(case_id);
        let record = self.store.get_mut(&case_id)?;
        ensure_transition(self.policy, record, CaseState::DetailsCaptured)?;

        record.data.narrative_extra = Some(info);
        record.enter(CaseState::DetailsCaptured, "add_more_info", now_epoch_ms());
        Ok(status_of(record))
    }

    pub fn capture_required_fields(
        &mut self,
        case_id: &str,
        fields: RequiredFields,
    ) -> Result<CaseStatus, CaseError> {
        let case_id = normalize_case_id(case_id);
        let record = self.store.get_mut(&case_id)?;
        ensure_transition(self.policy, record, CaseState::DetailsCaptured)?;

        let data = &mut record.data;
        data.employer_name = fields.employer_name;
        data.role = fields.role;
        data.wage_amount = fields.wage_amount;
        data.wage_period = fields.wage_period;
        data.start_date = fields.start_date;
        data.termination_date = fields.termination_date;
        data.claim = fields.claim;
        record.enter(
            CaseState::DetailsCaptured,
            "capture_required_fields",
            now_epoch_ms(),
        );
        tracing::info!(case_id = %record.case_id, "required fields captured");
        Ok(status_of(record))
    }

    /// Reset the checklist to every base document, none received.
    pub fn request_documents(&mut self, case_id: &str) -> Result<DocumentsRequested, CaseError> {
        let case_id = normalize_case_id(case_id);
        let record = self.store.get_mut(&case_id)?;
        ensure_transition(self.policy, record, CaseState::DocsRequested)?;

        record.checklist = base_checklist();
        record.enter(CaseState::DocsRequested, "request_documents", now_epoch_ms());

        let documents = BASE_DOCUMENTS
            .iter()
            .map(|doc| DocumentStatus {
                doc: doc.to_string(),
                received: record
                    .checklist
                    .get(*doc)
                    .is_some_and(|item| item.received),
            })
            .collect();
        Ok(DocumentsRequested {
            case_id: record.case_id.clone(),
            state: record.state,
            documents,
            note: DOCUMENTS_OPTIONAL_NOTE,
        })
    }

    /// Mark one document as present or absent, with an optional note.
    ///
    /// An empty checklist is first rebuilt from the base list. Unknown
    /// document names become extra entries. Omitting the note keeps any
    /// earlier one.
    pub fn mark_document(
        &mut self,
        case_id: &str,
        doc_name: &str,
        received: bool,
        note: Option<String>,
    ) -> Result<DocumentMarked, CaseError> {
        let case_id = normalize_case_id(case_id);
        let record = self.store.get_mut(&case_id)?;
        ensure_transition(self.policy, record, CaseState::DocsReceived)?;

        if record.checklist.is_empty() {
            record.checklist = base_checklist();
        }
        let item = record
            .checklist
            .entry(doc_name.to_string())
            .or_insert_with(|| DocumentChecklistItem::pending(doc_name));
        item.received = received;
        if let Some(note) = note.filter(|note| !note.is_empty()) {
            item.note = Some(note);
        }
        record.enter(CaseState::DocsReceived, "mark_document", now_epoch_ms());
        tracing::debug!(case_id = %record.case_id, doc = doc_name, received, "document marked");

        Ok(DocumentMarked {
            case_id: record.case_id.clone(),
            state: record.state,
            doc: doc_name.to_string(),
            received,
        })
    }

    /// Recompute flags and routing. Passes through `VALIDATED` and lands on
    /// `PRE_CLASSIFIED` in the same call.
    pub fn validate(&mut self, case_id: &str) -> Result<ValidationOutcome, CaseError> {
        let case_id = normalize_case_id(case_id);
        let record = self.store.get_mut(&case_id)?;
        ensure_transition(self.policy, record, CaseState::Validated)?;

        let now = now_epoch_ms();
        let flags = validation_flags(&record.data);
        record.data.flags = flags.clone();
        record.enter(CaseState::Validated, "validate_and_recheck", now);

        let classification = classify::classify(&record.data.combined_narrative());
        let routing_label = classification.routing.label().to_string();
        record.data.routing_label = Some(routing_label.clone());
        record.enter(CaseState::PreClassified, "validate_and_recheck", now);

        tracing::info!(
            case_id = %record.case_id,
            routing = %classification.routing,
            flags = flags.len(),
            "case pre-classified"
        );
        Ok(ValidationOutcome {
            case_id: record.case_id.clone(),
            state: record.state,
            flags,
            routing: classification.routing,
            routing_label,
            labor_relevant: classification.labor_relevant,
        })
    }

    /// Render the expediente from the current record and store it.
    pub fn generate_expediente(&mut self, case_id: &str) -> Result<ExpedienteOutcome, CaseError> {
        let case_id = normalize_case_id(case_id);
        let record = self.store.get_mut(&case_id)?;
        ensure_transition(self.policy, record, CaseState::ExpedienteGenerated)?;

        let expediente = render_expediente(record);
        record.expediente = Some(expediente.clone());
        record.enter(
            CaseState::ExpedienteGenerated,
            "generate_expediente",
            now_epoch_ms(),
        );
        tracing::info!(
            case_id = %record.case_id,
            bytes = expediente.len(),
            "expediente generated"
        );
        Ok(ExpedienteOutcome {
            case_id: record.case_id.clone(),
            state: record.state,
            expediente,
        })
    }

    pub fn handoff(
        &mut self,
        case_id: &str,
        note: Option<String>,
    ) -> Result<HandoffOutcome, CaseError> {
        let case_id = normalize_case_id(case_id);
        let record = self.store.get_mut(&case_id)?;
        ensure_transition(self.policy, record, CaseState::HandoffToHuman)?;

        record.enter(CaseState::HandoffToHuman, "handoff_to_human", now_epoch_ms());
        tracing::info!(case_id = %record.case_id, "case handed off for human review");
        Ok(HandoffOutcome {
            case_id: record.case_id.clone(),
            state: record.state,
            note: present(&note).unwrap_or_default().to_string(),
        })
    }

    pub fn get_case(&self, case_id: &str) -> Result<CaseSnapshot, CaseError> {
        let case_id = normalize_case_id(case_id);
        let record = self.store.get(&case_id)?;
        Ok(CaseSnapshot {
            record: record.clone(),
            next_step: next_step(record),
        })
    }

    pub fn list_cases(&self) -> Vec<CaseStatus> {
        self.store
            .summaries()
            .into_iter()
            .map(|(case_id, state)| CaseStatus { case_id, state })
            .collect()
    }
}

#[cfg(test)]
#[path = "intake_tests.rs"]
mod tests;
