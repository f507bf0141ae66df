//! Keyword routing for case narratives.
//!
//! Matching is plain substring search over whitespace-normalized, lower-cased
//! text. There is no tokenization, stemming, or negation handling: "arma"
//! matches inside "farmacia" and "trabaj" matches "trabajoso". Routing
//! outcomes depend on exactly this behavior, so keep it literal.
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Phrases that suggest a criminal matter. Checked before labor keywords.
pub const CRIMINAL_SIGNALS: &[&str] = &[
    "amenaza de muerte",
    "arma",
    "secuestro",
    "extorsión",
    "agresión sexual",
    "death threat",
    "weapon",
    "kidnapping",
    "extortion",
    "sexual assault",
];

pub const LABOR_KEYWORDS: &[&str] = &[
    "empleador",
    "salario",
    "pago",
    "despido",
    "jornada",
    "prestaciones",
    "contrato",
    "trabaj",
    "incapacidad",
    "accidente",
    "employer",
    "salary",
    "payment",
    "dismissal",
    "workday",
    "benefits",
    "contract",
    "work",
    "disability",
    "accident",
];

pub const CRIMINAL_LABEL: &str =
    "criminal (likely) — escalation suggested, mandatory human review";
pub const LABOR_LABEL: &str =
    "labor (likely) — operational pre-classification, final human review";
pub const REVIEW_LABEL: &str =
    "needs human review — insufficient information for operational routing";

/// Heuristic routing outcome. Never a legal determination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Routing {
    Criminal,
    Labor,
    NeedsHumanReview,
}

impl Routing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Routing::Criminal => "criminal",
            Routing::Labor => "labor",
            Routing::NeedsHumanReview => "needs_human_review",
        }
    }

    /// Human-readable routing line stored on the case.
    pub fn label(&self) -> &'static str {
        match self {
            Routing::Criminal => CRIMINAL_LABEL,
            Routing::Labor => LABOR_LABEL,
            Routing::NeedsHumanReview => REVIEW_LABEL,
        }
    }
}

impl fmt::Display for Routing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub routing: Routing,
    pub labor_relevant: bool,
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("regex for whitespace runs"))
}

/// Collapse whitespace runs to one space, trim, and lower-case.
pub fn normalize(text: &str) -> String {
    whitespace_runs()
        .replace_all(text.trim(), " ")
        .to_lowercase()
}

fn contains_any(normalized: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| normalized.contains(needle))
}

pub fn has_criminal_signal(text: &str) -> bool {
    contains_any(&normalize(text), CRIMINAL_SIGNALS)
}

pub fn route(text: &str) -> Routing {
    let normalized = normalize(text);
    if contains_any(&normalized, CRIMINAL_SIGNALS) {
        Routing::Criminal
    } else if contains_any(&normalized, LABOR_KEYWORDS) {
        Routing::Labor
    } else {
        Routing::NeedsHumanReview
    }
}

/// Route the narrative. It counts as labor-relevant only when routed to
/// labor, so criminal signals veto.
pub fn classify(text: &str) -> Classification {
    let routing = route(text);
    Classification {
        routing,
        labor_relevant: matches!(routing, Routing::Labor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace_and_lowercases() {
        assert_eq!(
            normalize("  El  EMPLEADOR\n\tno\r\nPAGÓ  "),
            "el empleador no pagó"
        );
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn criminal_signal_wins_over_labor_keywords() {
        let text = "El empleador no pagó el salario y luego hubo extorsión.";
        let result = classify(text);
        assert_eq!(result.routing, Routing::Criminal);
        assert!(!result.labor_relevant);
        assert_eq!(result.routing.label(), CRIMINAL_LABEL);
    }

    #[test]
    fn salary_alone_routes_to_labor() {
        let result = classify("Me deben el salario");
        assert_eq!(result.routing, Routing::Labor);
        assert!(result.labor_relevant);
        assert_eq!(result.routing.label(), LABOR_LABEL);
    }

    #[test]
    fn no_keywords_routes_to_human_review() {
        let result = classify("Quiero hablar con alguien, por favor.");
        assert_eq!(result.routing, Routing::NeedsHumanReview);
        assert!(!result.labor_relevant);
        assert_eq!(result.routing.label(), REVIEW_LABEL);
    }

    #[test]
    fn matching_ignores_case_and_line_breaks() {
        assert_eq!(route("AMENAZA\n  DE   MUERTE"), Routing::Criminal);
        assert_eq!(route("Sexual\tAssault at the office"), Routing::Criminal);
        assert!(has_criminal_signal("EXTORSIÓN"));
    }

    #[test]
    fn substring_matching_keeps_known_collisions() {
        // "farmacia" contains "arma"; the heuristic does not tokenize.
        assert_eq!(route("Trabajo en una farmacia"), Routing::Criminal);
        assert_eq!(route("un asunto trabajoso"), Routing::Labor);
        assert!(classify("homework").labor_relevant);
    }

    #[test]
    fn sample_narratives_route_to_labor() {
        let lab_0001 = "Trabajé como auxiliar de bodega. Me pagaban semanalmente. \
            El empleador me dijo que ya no llegara y no me entregó carta de despido.";
        assert_eq!(route(lab_0001), Routing::Labor);
    }
}
