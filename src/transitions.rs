//! Transition policy for case states.
//!
//! States are advisory by default: operators revisit earlier steps freely and
//! no operation is refused because of the current state. The strict policy is
//! opt-in and consults the table below.
//!
//! ```text
//! any non-terminal    -> itself
//! any non-terminal    -> its workflow successor
//! any non-terminal    -> DETAILS_CAPTURED | DOCS_REQUESTED | DOCS_RECEIVED
//!                        (revisit, backwards only)
//! DOCS_REQUESTED      -> VALIDATED (documents are optional)
//! PRE_CLASSIFIED      -> VALIDATED (re-validate)
//! EXPEDIENTE_GENERATED -> VALIDATED (re-validate)
//! HANDOFF_TO_HUMAN    -> nothing
//! ```
use serde::{Deserialize, Serialize};

use crate::schema::CaseState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    #[default]
    Permissive,
    Strict,
}

impl TransitionPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            TransitionPolicy::Strict
        } else {
            TransitionPolicy::Permissive
        }
    }

    pub fn allows(self, from: CaseState, to: CaseState) -> bool {
        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::Strict => is_legal_transition(from, to),
        }
    }
}

fn is_legal_transition(from: CaseState, to: CaseState) -> bool {
    use CaseState::*;

    if from.is_terminal() {
        return false;
    }
    if to == from || from.successor() == Some(to) {
        return true;
    }
    let revisit = matches!(to, DetailsCaptured | DocsRequested | DocsReceived) && to < from;
    revisit
        || matches!(
            (from, to),
            (DocsRequested, Validated)
                | (PreClassified, Validated)
                | (ExpedienteGenerated, Validated)
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use CaseState::*;

    #[test]
    fn permissive_allows_everything() {
        for from in CaseState::ALL {
            for to in CaseState::ALL {
                assert!(TransitionPolicy::Permissive.allows(from, to));
            }
        }
    }

    #[test]
    fn strict_walks_the_nominal_workflow() {
        let strict = TransitionPolicy::Strict;
        for pair in CaseState::ALL.windows(2) {
            assert!(strict.allows(pair[0], pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn strict_rejects_skips_and_terminal_exits() {
        let strict = TransitionPolicy::Strict;
        assert!(!strict.allows(Received, HandoffToHuman));
        assert!(!strict.allows(Received, DocsReceived));
        assert!(!strict.allows(DetailsCaptured, ExpedienteGenerated));
        assert!(!strict.allows(HandoffToHuman, HandoffToHuman));
        assert!(!strict.allows(HandoffToHuman, DetailsCaptured));
    }

    #[test]
    fn strict_allows_operator_revisits() {
        let strict = TransitionPolicy::Strict;
        assert!(strict.allows(PreClassified, DetailsCaptured));
        assert!(strict.allows(ExpedienteGenerated, DocsReceived));
        assert!(strict.allows(DocsRequested, Validated));
        assert!(strict.allows(ExpedienteGenerated, Validated));
        assert!(strict.allows(DetailsCaptured, DetailsCaptured));
        assert!(!strict.allows(Received, DocsRequested));
    }
}
