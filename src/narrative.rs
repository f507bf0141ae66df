//! Narrative sources keyed by case id.
//!
//! The upstream conversational agent is out of process; this trait is the seam
//! a real integration plugs into. Absence of a narrative is a normal answer.
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::store::normalize_case_id;

pub trait NarrativeSource {
    /// Narrative for an already-normalized case id, if one is registered.
    fn narrative(&self, case_id: &str) -> Option<String>;
}

/// Built-in sample narratives standing in for the upstream agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleNarratives;

const SAMPLES: [(&str, &str); 2] = [
    (
        "LAB-0001",
        "Trabajé como auxiliar de bodega. Me pagaban semanalmente. \
         El empleador me dijo que ya no llegara y no me entregó carta de despido. \
         Quedó pendiente el pago de la última semana.",
    ),
    (
        "LAB-0002",
        "Tuve un accidente en el trabajo y me dieron incapacidad. \
         El empleador no quiso reconocer el incidente y me presionó para renunciar.",
    ),
];

impl SampleNarratives {
    pub fn case_ids() -> impl Iterator<Item = &'static str> {
        SAMPLES.iter().map(|(case_id, _)| *case_id)
    }
}

impl NarrativeSource for SampleNarratives {
    fn narrative(&self, case_id: &str) -> Option<String> {
        SAMPLES
            .iter()
            .find(|(id, _)| *id == case_id)
            .map(|(_, text)| text.to_string())
    }
}

impl NarrativeSource for BTreeMap<String, String> {
    fn narrative(&self, case_id: &str) -> Option<String> {
        self.get(case_id).cloned()
    }
}

/// Sources consulted in order; the first one with an answer wins.
#[derive(Default)]
pub struct LayeredNarratives {
    layers: Vec<Box<dyn NarrativeSource>>,
}

impl LayeredNarratives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, source: impl NarrativeSource + 'static) -> Self {
        self.layers.push(Box::new(source));
        self
    }
}

impl NarrativeSource for LayeredNarratives {
    fn narrative(&self, case_id: &str) -> Option<String> {
        self.layers
            .iter()
            .find_map(|source| source.narrative(case_id))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NarrativeEntry {
    Text(String),
    Record {
        #[serde(alias = "relato")]
        narrative: String,
    },
}

/// Load `{"CASE-ID": "text"}` or `{"CASE-ID": {"narrative": "text"}}` from disk.
///
/// Keys are normalized the same way operations normalize case ids.
pub fn load_narratives(path: &Path) -> Result<BTreeMap<String, String>> {
    let bytes = fs::read(path).with_context(|| format!("read narratives {}", path.display()))?;
    let raw: BTreeMap<String, NarrativeEntry> =
        serde_json::from_slice(&bytes).context("parse narratives JSON")?;
    let narratives: BTreeMap<String, String> = raw
        .into_iter()
        .map(|(case_id, entry)| {
            let text = match entry {
                NarrativeEntry::Text(text) => text,
                NarrativeEntry::Record { narrative } => narrative,
            };
            (normalize_case_id(&case_id), text)
        })
        .collect();
    tracing::info!(
        path = %path.display(),
        count = narratives.len(),
        "loaded narratives"
    );
    Ok(narratives)
}
