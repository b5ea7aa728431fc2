//! Buyer persona facts the analyzer reads.

use serde::{Deserialize, Serialize};

/// The subset of a buyer persona that drives heuristics.
///
/// Generated persona descriptions carry much more prose; only these lists
/// influence analysis. All matching is case-insensitive substring matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaProfile {
    /// Display name of the simulated buyer.
    #[serde(default = "default_name")]
    pub name: String,

    /// Problems the buyer has; surfaced as detected needs.
    #[serde(default)]
    pub pain_points: Vec<String>,

    /// Concerns the buyer may raise.
    #[serde(default)]
    pub objections: Vec<String>,

    /// Personal interests that build rapport when the seller finds them.
    #[serde(default)]
    pub passions: Vec<String>,
}

fn default_name() -> String {
    "Buyer".to_string()
}

impl Default for PersonaProfile {
    fn default() -> Self {
        Self {
            name: default_name(),
            pain_points: Vec::new(),
            objections: Vec::new(),
            passions: Vec::new(),
        }
    }
}

impl PersonaProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_pain_points<S: Into<String>>(mut self, items: impl IntoIterator<Item = S>) -> Self {
        self.pain_points = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_objections<S: Into<String>>(mut self, items: impl IntoIterator<Item = S>) -> Self {
        self.objections = items.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_passions<S: Into<String>>(mut self, items: impl IntoIterator<Item = S>) -> Self {
        self.passions = items.into_iter().map(Into::into).collect();
        self
    }

    /// True if `text` mentions any passion.
    pub fn mentions_passion(&self, text: &str) -> bool {
        !mentioned(&self.passions, text).is_empty()
    }

    /// Pain points mentioned in `text`, in persona order.
    pub fn pain_points_in(&self, text: &str) -> Vec<String> {
        mentioned(&self.pain_points, text)
    }

    /// Objections mentioned in `text`, in persona order.
    pub fn objections_in(&self, text: &str) -> Vec<String> {
        mentioned(&self.objections, text)
    }
}

fn mentioned(items: &[String], text: &str) -> Vec<String> {
    let haystack = text.to_lowercase();
    items
        .iter()
        .filter(|item| {
            let needle = item.trim().to_lowercase();
            !needle.is_empty() && haystack.contains(&needle)
        })
        .cloned()
        .collect()
}
