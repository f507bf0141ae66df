//! Operator script handed to the conversational driver.
use crate::narrative::SampleNarratives;
use crate::schema::BASE_DOCUMENTS;

pub const OPERATOR_INSTRUCTIONS_MD: &str = include_str!("../prompts/operator_instructions.md");

/// What the operator must ask for during required capture.
pub const REQUIRED_CAPTURE: [&str; 6] = [
    "Basic identity (name, DUI, contact)",
    "Employer (name, company or person)",
    "Role and wage (agreed amount and pay period)",
    "Key dates (start of employment, dismissal/last payment date)",
    "Facts (free narrative)",
    "Claim (what they seek: reinstatement, payment, certificate, etc.)",
];

fn bullet_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    items
        .into_iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Instruction text with the capture list, document list, and sample ids filled in.
pub fn render_operator_instructions() -> String {
    let sample_ids = SampleNarratives::case_ids().collect::<Vec<_>>().join(" or ");
    OPERATOR_INSTRUCTIONS_MD
        .replace("{sample_case_ids}", &sample_ids)
        .replace("{required_capture}", &bullet_list(REQUIRED_CAPTURE))
        .replace("{base_documents}", &bullet_list(BASE_DOCUMENTS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_have_no_unfilled_placeholders() {
        let text = render_operator_instructions();
        assert!(!text.contains('{'), "unfilled placeholder in:\n{text}");
        assert!(text.contains("LAB-0001 or LAB-0002"));
        assert!(text.contains("- Carta de despido (si existe)"));
        assert!(text.contains("- Facts (free narrative)"));
    }

    #[test]
    fn instructions_name_every_workflow_tool() {
        let text = render_operator_instructions();
        for tool in [
            "create_case",
            "pull_story_from_general",
            "capture_identity",
            "add_more_info",
            "capture_required_fields",
            "request_documents",
            "mark_document",
            "validate_and_recheck",
            "generate_expediente",
            "handoff_to_human",
        ] {
            assert!(text.contains(tool), "missing {tool}");
        }
    }
}
