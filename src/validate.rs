//! Missing-field validation for captured case data.
//!
//! Every check runs independently and contributes at most one flag, so the
//! flag list always comes out in checklist order.
use crate::classify;
use crate::schema::CaseData;
use crate::util::present;

/// Appended after the missing-field flags when the narrative carries a
/// criminal signal.
pub const CRIMINAL_SIGNAL_FLAG: &str =
    "Possible criminal-matter signals (suggested referral only).";

type FieldCheck = fn(&CaseData) -> bool;

/// Required-field checks in report order. Each returns true when satisfied.
const REQUIRED_FIELD_CHECKS: [(FieldCheck, &str); 10] = [
    (|d| present(&d.name).is_some(), "Missing name."),
    (|d| present(&d.dui).is_some(), "Missing ID (DUI)."),
    (|d| present(&d.contact).is_some(), "Missing contact."),
    (
        |d| present(&d.employer_name).is_some(),
        "Missing employer (name).",
    ),
    (|d| present(&d.role).is_some(), "Missing role."),
    (
        |d| present(&d.wage_amount).is_some() && present(&d.wage_period).is_some(),
        "Missing wage (amount/period).",
    ),
    (
        |d| present(&d.start_date).is_some(),
        "Missing employment start date.",
    ),
    (
        |d| present(&d.termination_date).is_some(),
        "Missing termination/last payment date.",
    ),
    (
        |d| present(&d.narrative).is_some(),
        "Missing base narrative (from general agent).",
    ),
    (|d| present(&d.claim).is_some(), "Missing claim sought."),
];

/// Number of required-field checks; an empty record yields this many flags.
pub const REQUIRED_FIELD_CHECK_COUNT: usize = REQUIRED_FIELD_CHECKS.len();

pub fn missing_field_flags(data: &CaseData) -> Vec<String> {
    REQUIRED_FIELD_CHECKS
        .iter()
        .filter(|(satisfied, _)| !satisfied(data))
        .map(|(_, flag)| flag.to_string())
        .collect()
}

/// Full flag set for a validation pass: missing fields, then risk signals.
pub fn validation_flags(data: &CaseData) -> Vec<String> {
    let mut flags = missing_field_flags(data);
    if classify::has_criminal_signal(&data.combined_narrative()) {
        flags.push(CRIMINAL_SIGNAL_FLAG.to_string());
    }
    flags
}

/// True when any employment-side field is still missing.
pub fn employment_fields_missing(data: &CaseData) -> bool {
    [
        &data.employer_name,
        &data.role,
        &data.wage_amount,
        &data.wage_period,
        &data.start_date,
        &data.termination_date,
        &data.claim,
    ]
    .into_iter()
    .any(|value| present(value).is_none())
}
