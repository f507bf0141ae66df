//! Expediente rendering.
//!
//! The layout is fixed and consumers may diff it byte for byte: lines are
//! joined with `\n` and there is no trailing newline. Output depends only on
//! the record, never on the clock.
use crate::schema::{CaseRecord, BASE_DOCUMENTS};
use crate::util::{or_nd, present};

pub const EXPEDIENTE_HEADER: &str = "=== EXPEDIENTE (DRAFT) ===";
pub const NO_FLAGS_LINE: &str = "- (No flags)";
pub const CLOSING_NOTE: &str = "Note: final human review is mandatory.";

pub fn render_expediente(record: &CaseRecord) -> String {
    let data = &record.data;
    let narrative = data.combined_narrative();
    let mut lines: Vec<String> = Vec::new();

    lines.push(EXPEDIENTE_HEADER.to_string());
    lines.push(format!("Case ID: {}", record.case_id));
    lines.push(String::new());

    lines.push("Requested format:".to_string());
    lines.push(format!("Name: {}", or_nd(&data.name)));
    lines.push(format!("ID (DUI): {}", or_nd(&data.dui)));
    lines.push("Narrative of facts:".to_string());
    lines.push(if narrative.is_empty() {
        "N/D".to_string()
    } else {
        narrative
    });
    lines.push(String::new());

    lines.push("Required fields captured (entered by operator):".to_string());
    lines.push(format!("- Contact: {}", or_nd(&data.contact)));
    lines.push(format!("- Employer: {}", or_nd(&data.employer_name)));
    lines.push(format!("- Role: {}", or_nd(&data.role)));
    lines.push(format!(
        "- Wage: {} ({})",
        or_nd(&data.wage_amount),
        or_nd(&data.wage_period)
    ));
    lines.push(format!(
        "- Dates: start={} | termination/last payment={}",
        or_nd(&data.start_date),
        or_nd(&data.termination_date)
    ));
    lines.push(format!("- Claim: {}", or_nd(&data.claim)));
    lines.push(String::new());

    lines.push("Base documents (if available):".to_string());
    // Only base documents are listed; ad-hoc entries stay in the checklist.
    for doc in BASE_DOCUMENTS {
        let item = record.checklist.get(doc);
        let mark = if item.is_some_and(|item| item.received) {
            "[x]"
        } else {
            "[ ]"
        };
        let note = item
            .and_then(|item| present(&item.note))
            .map(|note| format!(" ({note})"))
            .unwrap_or_default();
        lines.push(format!("- {mark} {doc}{note}"));
    }
    lines.push(String::new());

    lines.push("Operational pre-classification (NOT a legal opinion):".to_string());
    lines.push(format!(
        "- Probable route/jurisdiction: {}",
        or_nd(&data.routing_label)
    ));
    lines.push(String::new());

    lines.push("Flags / missing items:".to_string());
    if data.flags.is_empty() {
        lines.push(NO_FLAGS_LINE.to_string());
    } else {
        lines.extend(data.flags.iter().map(|flag| format!("- {flag}")));
    }
    lines.push(String::new());

    lines.push(CLOSING_NOTE.to_string());
    lines.join("\n")
}
