//! Operator-driven intake and triage for labor-dispute cases.
//!
//! An operator collects identity data, employment facts, narrative, and
//! documents on behalf of a person with no direct system access. The crate
//! keeps the case records, pre-classifies the narrative with a keyword
//! heuristic, and renders a draft expediente for mandatory human review. It
//! never renders a legal judgment.
pub mod classify;
pub mod config;
pub mod demo;
pub mod error;
pub mod intake;
pub mod narrative;
pub mod render;
pub mod schema;
pub mod session;
pub mod status;
pub mod store;
pub mod templates;
pub mod transitions;
pub mod util;
pub mod validate;

pub use error::CaseError;
pub use intake::{Identity, Intake, RequiredFields};
pub use schema::{CaseRecord, CaseState};
