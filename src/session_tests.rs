use super::*;
use crate::classify::LABOR_LABEL;
use crate::transitions::TransitionPolicy;
use serde_json::json;

fn call(intake: &mut Intake, value: Value) -> Value {
    handle_line(intake, &value.to_string())
}

#[test]
fn create_case_envelope_carries_status_and_state() {
    let mut intake = Intake::default();
    let result = call(&mut intake, json!({"tool": "create_case", "case_id": "lab-0001"}));
    assert_eq!(result["status"], "ok");
    assert_eq!(result["case_id"], "LAB-0001");
    assert_eq!(result["state"], "RECEIVED");
}

#[test]
fn spanish_argument_names_are_accepted() {
    let mut intake = Intake::default();
    let result = call(
        &mut intake,
        json!({
            "tool": "capture_identity",
            "case_id": "LAB-0001",
            "nombre": "Ana",
            "dui": "00000000-0",
            "contacto": "ana@x.com"
        }),
    );
    assert_eq!(result["state"], "DETAILS_CAPTURED");

    let result = call(
        &mut intake,
        json!({
            "tool": "capture_required_fields",
            "case_id": "LAB-0001",
            "empleador_nombre": "Distribuidora El Sol",
            "salario_monto": "90",
            "salario_periodicidad": "semanal"
        }),
    );
    assert_eq!(result["status"], "ok");

    let result = call(
        &mut intake,
        json!({
            "tool": "mark_document",
            "case_id": "LAB-0001",
            "doc_name": "Comprobantes de pago",
            "existe": true,
            "nota": "colillas"
        }),
    );
    assert_eq!(result["received"], true);

    let snapshot = intake.get_case("LAB-0001").expect("case");
    assert_eq!(snapshot.record.data.name.as_deref(), Some("Ana"));
    assert_eq!(snapshot.record.data.wage_period.as_deref(), Some("semanal"));
    assert_eq!(
        snapshot.record.checklist["Comprobantes de pago"].note.as_deref(),
        Some("colillas")
    );
}

#[test]
fn missing_case_becomes_not_found_envelope() {
    let mut intake = Intake::default();
    let result = call(&mut intake, json!({"tool": "request_documents", "case_id": "LAB-0404"}));
    assert_eq!(result["status"], "error");
    assert_eq!(result["error_kind"], "not_found");
    assert_eq!(result["case_id"], "LAB-0404");
}

#[test]
fn missing_narrative_becomes_no_data_envelope() {
    let mut intake = Intake::default();
    let result = call(
        &mut intake,
        json!({"tool": "pull_story_from_general", "case_id": "LAB-9999"}),
    );
    assert_eq!(result["error_kind"], "no_data_available");
}

#[test]
fn malformed_lines_are_invalid_calls() {
    let mut intake = Intake::default();
    for line in [
        "not json",
        r#"{"case_id": "LAB-0001"}"#,
        r#"{"tool": "delete_case", "case_id": "LAB-0001"}"#,
        r#"{"tool": "mark_document", "case_id": "LAB-0001"}"#,
    ] {
        let result = handle_line(&mut intake, line);
        assert_eq!(result["status"], "error", "line {line}");
        assert_eq!(result["error_kind"], "invalid_call", "line {line}");
    }
    assert!(intake.store().is_empty());
}

#[test]
fn strict_policy_surfaces_illegal_transition() {
    let mut intake = Intake::default().with_policy(TransitionPolicy::Strict);
    call(&mut intake, json!({"tool": "create_case", "case_id": "LAB-0001"}));
    let result = call(&mut intake, json!({"tool": "handoff_to_human", "case_id": "LAB-0001"}));
    assert_eq!(result["error_kind"], "illegal_transition");
}

#[test]
fn run_session_streams_one_envelope_per_call() {
    let mut intake = Intake::default();
    let input = [
        json!({"tool": "create_case", "case_id": "LAB-0001"}).to_string(),
        String::new(),
        json!({"tool": "pull_story_from_general", "case_id": "LAB-0001"}).to_string(),
        json!({"tool": "validate_and_recheck", "case_id": "LAB-0001"}).to_string(),
        json!({"tool": "get_case", "case_id": "LAB-0001"}).to_string(),
        json!({"tool": "list_cases"}).to_string(),
        "{broken".to_string(),
    ]
    .join("\n");
    let mut output = Vec::new();
    let summary = run_session(&mut intake, input.as_bytes(), &mut output).expect("run session");
    assert_eq!(summary, SessionSummary { calls: 6, errors: 1 });

    let text = String::from_utf8(output).expect("utf8 output");
    let envelopes: Vec<Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).expect("envelope JSON"))
        .collect();
    assert_eq!(envelopes.len(), 6);
    assert_eq!(envelopes[2]["routing_label"], LABOR_LABEL);
    assert_eq!(envelopes[2]["state"], "PRE_CLASSIFIED");
    assert_eq!(envelopes[3]["next_step"], "generate_expediente");
    assert_eq!(envelopes[4]["cases"][0]["case_id"], "LAB-0001");
    assert_eq!(envelopes[5]["error_kind"], "invalid_call");
}

#[test]
fn every_tool_name_parses() {
    for tool in TOOL_NAMES {
        let value = json!({
            "tool": tool,
            "case_id": "LAB-0001",
            "info": "x",
            "doc_name": "Contrato (si existe)",
            "received": true
        });
        let parsed = parse_tool_call(value).expect("parse tool call");
        assert_eq!(parsed.tool(), tool);
    }
}
