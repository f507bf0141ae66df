//! Scripted walk-through of the full intake sequence.
//!
//! Replays what a driver would do for one case, with fixed operator answers,
//! through the same dispatcher the tool session uses.
use serde_json::Value;

use crate::intake::{Identity, Intake, RequiredFields};
use crate::schema::BASE_DOCUMENTS;
use crate::session::{
    dispatch, CaptureIdentityArgs, CaptureRequiredFieldsArgs, CaseArgs, CreateCaseArgs,
    HandoffArgs, MarkDocumentArgs, ToolCall,
};

/// Documents the scripted person says they have.
const DEMO_RECEIVED_DOCUMENTS: [&str; 2] = ["Comprobantes de pago", "Carta de despido (si existe)"];

fn case_args(case_id: &str) -> CaseArgs {
    CaseArgs {
        case_id: case_id.to_string(),
    }
}

/// Tool calls for the nominal driver sequence on `case_id`.
pub fn demo_script(case_id: &str) -> Vec<ToolCall> {
    let mut calls = vec![
        ToolCall::CreateCase(CreateCaseArgs {
            case_id: Some(case_id.to_string()),
        }),
        ToolCall::PullStoryFromGeneral(case_args(case_id)),
        ToolCall::CaptureIdentity(CaptureIdentityArgs {
            case_id: case_id.to_string(),
            identity: Identity {
                name: Some("Ana".to_string()),
                dui: Some("00000000-0".to_string()),
                contact: Some("ana@x.com".to_string()),
            },
        }),
        ToolCall::CaptureRequiredFields(CaptureRequiredFieldsArgs {
            case_id: case_id.to_string(),
            fields: RequiredFields {
                employer_name: Some("Distribuidora El Sol".to_string()),
                role: Some("Auxiliar de bodega".to_string()),
                wage_amount: Some("90.00".to_string()),
                wage_period: Some("semanal".to_string()),
                start_date: Some("2023-01-09".to_string()),
                termination_date: Some("2024-05-31".to_string()),
                claim: Some("Pago de la última semana y constancia laboral".to_string()),
            },
        }),
        ToolCall::RequestDocuments(case_args(case_id)),
    ];
    calls.extend(BASE_DOCUMENTS.iter().map(|doc| {
        ToolCall::MarkDocument(MarkDocumentArgs {
            case_id: case_id.to_string(),
            doc_name: doc.to_string(),
            received: DEMO_RECEIVED_DOCUMENTS.contains(doc),
            note: None,
        })
    }));
    calls.push(ToolCall::ValidateAndRecheck(case_args(case_id)));
    calls.push(ToolCall::GenerateExpediente(case_args(case_id)));
    calls.push(ToolCall::HandoffToHuman(HandoffArgs {
        case_id: case_id.to_string(),
        note: Some("Ready for final human review".to_string()),
    }));
    calls
}

/// Run the script and return every result envelope, in order.
pub fn run_demo(intake: &mut Intake, case_id: &str) -> Vec<Value> {
    demo_script(case_id)
        .into_iter()
        .map(|call| dispatch(intake, call))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::LABOR_LABEL;

    #[test]
    fn sample_case_ends_in_handoff() {
        let mut intake = Intake::default();
        let results = run_demo(&mut intake, "lab-0001");
        assert!(results.iter().all(|result| result["status"] == "ok"));
        let last = results.last().expect("handoff result");
        assert_eq!(last["state"], "HANDOFF_TO_HUMAN");

        let validation = results
            .iter()
            .find(|result| result.get("routing_label").is_some())
            .expect("validation result");
        assert_eq!(validation["routing_label"], LABOR_LABEL);
        assert_eq!(validation["flags"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn unknown_case_reports_missing_narrative_but_continues() {
        let mut intake = Intake::default();
        let results = run_demo(&mut intake, "LAB-9999");
        assert_eq!(results[1]["error_kind"], "no_data_available");
        let last = results.last().expect("handoff result");
        assert_eq!(last["state"], "HANDOFF_TO_HUMAN");
    }
}
