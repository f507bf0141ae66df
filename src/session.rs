//! JSON-lines tool session.
//!
//! An external language-model runtime drives the intake by writing one tool
//! call per line (`{"tool": "create_case", "case_id": "LAB-0001"}`) and reading
//! one result envelope per line. Argument names accept the original Spanish
//! spellings (`nombre`, `existe`, `nota`, ...) as aliases.
use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::io::{BufRead, Write};

use crate::error::CaseError;
use crate::intake::{CaseStatus, Identity, Intake, RequiredFields};

pub const TOOL_NAMES: [&str; 12] = [
    "create_case",
    "capture_identity",
    "pull_story_from_general",
    "add_more_info",
    "capture_required_fields",
    "request_documents",
    "mark_document",
    "validate_and_recheck",
    "generate_expediente",
    "handoff_to_human",
    "get_case",
    "list_cases",
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCaseArgs {
    #[serde(default)]
    pub case_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaseArgs {
    pub case_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureIdentityArgs {
    pub case_id: String,
    #[serde(flatten)]
    pub identity: Identity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddMoreInfoArgs {
    pub case_id: String,
    #[serde(alias = "info_adicional")]
    pub info: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureRequiredFieldsArgs {
    pub case_id: String,
    #[serde(flatten)]
    pub fields: RequiredFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkDocumentArgs {
    pub case_id: String,
    pub doc_name: String,
    #[serde(alias = "existe")]
    pub received: bool,
    #[serde(default, alias = "nota")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HandoffArgs {
    pub case_id: String,
    #[serde(default, alias = "nota")]
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
struct CaseList {
    cases: Vec<CaseStatus>,
}

/// One decoded tool invocation.
#[derive(Debug, Clone)]
pub enum ToolCall {
    CreateCase(CreateCaseArgs),
    CaptureIdentity(CaptureIdentityArgs),
    PullStoryFromGeneral(CaseArgs),
    AddMoreInfo(AddMoreInfoArgs),
    CaptureRequiredFields(CaptureRequiredFieldsArgs),
    RequestDocuments(CaseArgs),
    MarkDocument(MarkDocumentArgs),
    ValidateAndRecheck(CaseArgs),
    GenerateExpediente(CaseArgs),
    HandoffToHuman(HandoffArgs),
    GetCase(CaseArgs),
    ListCases,
}

impl ToolCall {
    pub fn tool(&self) -> &'static str {
        match self {
            ToolCall::CreateCase(_) => "create_case",
            ToolCall::CaptureIdentity(_) => "capture_identity",
            ToolCall::PullStoryFromGeneral(_) => "pull_story_from_general",
            ToolCall::AddMoreInfo(_) => "add_more_info",
            ToolCall::CaptureRequiredFields(_) => "capture_required_fields",
            ToolCall::RequestDocuments(_) => "request_documents",
            ToolCall::MarkDocument(_) => "mark_document",
            ToolCall::ValidateAndRecheck(_) => "validate_and_recheck",
            ToolCall::GenerateExpediente(_) => "generate_expediente",
            ToolCall::HandoffToHuman(_) => "handoff_to_human",
            ToolCall::GetCase(_) => "get_case",
            ToolCall::ListCases => "list_cases",
        }
    }
}

fn args<T: DeserializeOwned>(tool: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).with_context(|| format!("invalid arguments for {tool}"))
}

/// Decode one JSON object into a tool call.
pub fn parse_tool_call(value: Value) -> Result<ToolCall> {
    let tool = value
        .get("tool")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("tool call must be an object with a string \"tool\" field"))?
        .to_string();
    let call = match tool.as_str() {
        "create_case" => ToolCall::CreateCase(args(&tool, value)?),
        "capture_identity" => ToolCall::CaptureIdentity(args(&tool, value)?),
        "pull_story_from_general" => ToolCall::PullStoryFromGeneral(args(&tool, value)?),
        "add_more_info" => ToolCall::AddMoreInfo(args(&tool, value)?),
        "capture_required_fields" => ToolCall::CaptureRequiredFields(args(&tool, value)?),
        "request_documents" => ToolCall::RequestDocuments(args(&tool, value)?),
        "mark_document" => ToolCall::MarkDocument(args(&tool, value)?),
        "validate_and_recheck" => ToolCall::ValidateAndRecheck(args(&tool, value)?),
        "generate_expediente" => ToolCall::GenerateExpediente(args(&tool, value)?),
        "handoff_to_human" => ToolCall::HandoffToHuman(args(&tool, value)?),
        "get_case" => ToolCall::GetCase(args(&tool, value)?),
        "list_cases" => ToolCall::ListCases,
        other => {
            return Err(anyhow!(
                "unknown tool {other:?}; expected one of {}",
                TOOL_NAMES.join(", ")
            ))
        }
    };
    Ok(call)
}

fn ok_envelope<T: Serialize>(outcome: &T) -> Value {
    match serde_json::to_value(outcome) {
        Ok(Value::Object(fields)) => {
            let mut envelope = Map::new();
            envelope.insert("status".to_string(), Value::from("ok"));
            envelope.extend(fields);
            Value::Object(envelope)
        }
        Ok(other) => json!({ "status": "ok", "result": other }),
        Err(err) => json!({
            "status": "error",
            "error_kind": "internal",
            "error_message": format!("serialize result: {err}"),
        }),
    }
}

fn error_envelope(err: &CaseError) -> Value {
    json!({
        "status": "error",
        "case_id": err.case_id(),
        "error_kind": err.kind(),
        "error_message": err.to_string(),
    })
}

/// Envelope for input that never reached an operation.
pub fn invalid_call_envelope(err: &anyhow::Error) -> Value {
    json!({
        "status": "error",
        "error_kind": "invalid_call",
        "error_message": format!("{err:#}"),
    })
}

fn respond<T: Serialize>(result: Result<T, CaseError>) -> Value {
    match result {
        Ok(outcome) => ok_envelope(&outcome),
        Err(err) => error_envelope(&err),
    }
}

/// Run one call against the intake and build its result envelope.
pub fn dispatch(intake: &mut Intake, call: ToolCall) -> Value {
    tracing::debug!(tool = call.tool(), "dispatch tool call");
    match call {
        ToolCall::CreateCase(a) => ok_envelope(&intake.create_case(a.case_id.as_deref())),
        ToolCall::CaptureIdentity(a) => respond(intake.capture_identity(&a.case_id, a.identity)),
        ToolCall::PullStoryFromGeneral(a) => respond(intake.pull_narrative(&a.case_id)),
        ToolCall::AddMoreInfo(a) => respond(intake.append_narrative(&a.case_id, a.info)),
        ToolCall::CaptureRequiredFields(a) => {
            respond(intake.capture_required_fields(&a.case_id, a.fields))
        }
        ToolCall::RequestDocuments(a) => respond(intake.request_documents(&a.case_id)),
        ToolCall::MarkDocument(a) => respond(intake.mark_document(
            &a.case_id,
            &a.doc_name,
            a.received,
            a.note,
        )),
        ToolCall::ValidateAndRecheck(a) => respond(intake.validate(&a.case_id)),
        ToolCall::GenerateExpediente(a) => respond(intake.generate_expediente(&a.case_id)),
        ToolCall::HandoffToHuman(a) => respond(intake.handoff(&a.case_id, a.note)),
        ToolCall::GetCase(a) => respond(intake.get_case(&a.case_id)),
        ToolCall::ListCases => ok_envelope(&CaseList {
            cases: intake.list_cases(),
        }),
    }
}

/// Parse and dispatch a single input line.
pub fn handle_line(intake: &mut Intake, line: &str) -> Value {
    let parsed = serde_json::from_str::<Value>(line)
        .context("parse tool call JSON")
        .and_then(parse_tool_call);
    match parsed {
        Ok(call) => dispatch(intake, call),
        Err(err) => {
            tracing::info!(error = %format!("{err:#}"), "rejected tool call");
            invalid_call_envelope(&err)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub calls: usize,
    pub errors: usize,
}

/// Read tool calls line by line and write one envelope per call.
///
/// Blank lines are skipped. Bad input produces an error envelope and the
/// session keeps going; only I/O failures end it early.
pub fn run_session<R: BufRead, W: Write>(
    intake: &mut Intake,
    input: R,
    mut output: W,
) -> Result<SessionSummary> {
    let mut summary = SessionSummary::default();
    for line in input.lines() {
        let line = line.context("read tool call line")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let envelope = handle_line(intake, trimmed);
        summary.calls += 1;
        if envelope.get("status").and_then(Value::as_str) != Some("ok") {
            summary.errors += 1;
        }
        let text = serde_json::to_string(&envelope).context("serialize result envelope")?;
        writeln!(output, "{text}").context("write result envelope")?;
        output.flush().context("flush result envelope")?;
    }
    tracing::info!(calls = summary.calls, errors = summary.errors, "session finished");
    Ok(summary)
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
