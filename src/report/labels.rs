use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::ActivityKind;
use crate::error::ModelError;

/// Display labels for activity kinds, handed to renderers explicitly.
///
/// Kinds without an entry are shown under their canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct KindLabels {
    labels: BTreeMap<ActivityKind, String>,
}

impl Default for KindLabels {
    fn default() -> Self {
        let labels = [
            (ActivityKind::StartEvent, "Start event"),
            (ActivityKind::Task, "Task/sub-process"),
            (ActivityKind::IntermediateEvent, "Intermediate event"),
            (ActivityKind::Gateway, "Gateway"),
            (ActivityKind::EndEvent, "End event"),
        ];
        Self {
            labels: labels.into_iter().map(|(k, v)| (k, v.to_string())).collect(),
        }
    }
}

impl KindLabels {
    /// No labels at all; every kind renders as its canonical name
    pub fn canonical() -> Self {
        Self {
            labels: BTreeMap::new(),
        }
    }

    pub fn with(mut self, kind: ActivityKind, label: impl Into<String>) -> Self {
        self.labels.insert(kind, label.into());
        self
    }

    pub fn label(&self, kind: ActivityKind) -> &str {
        self.labels.get(&kind).map_or(kind.as_str(), String::as_str)
    }
}

impl TryFrom<BTreeMap<String, String>> for KindLabels {
    type Error = ModelError;

    /// Keys may be canonical kind names or XPDL element names
    fn try_from(raw: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut labels = KindLabels::default();
        for (key, label) in raw {
            labels.labels.insert(key.parse()?, label);
        }
        Ok(labels)
    }
}

impl From<KindLabels> for BTreeMap<String, String> {
    fn from(labels: KindLabels) -> Self {
        labels
            .labels
            .into_iter()
            .map(|(kind, label)| (kind.as_str().to_string(), label))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_canonical_name() {
        let labels = KindLabels::canonical().with(ActivityKind::Task, "Job");
        assert_eq!(labels.label(ActivityKind::Task), "Job");
        assert_eq!(labels.label(ActivityKind::Gateway), "Gateway");
    }

    #[test]
    fn deserializes_over_defaults() {
        let labels: KindLabels = toml::from_str("Route = \"Branch\"\nTask = \"Step\"").unwrap();
        assert_eq!(labels.label(ActivityKind::Gateway), "Branch");
        assert_eq!(labels.label(ActivityKind::Task), "Step");
        assert_eq!(labels.label(ActivityKind::EndEvent), "End event");
    }

    #[test]
    fn rejects_unknown_kind_keys() {
        let result: Result<KindLabels, _> = toml::from_str("Lane = \"Swimlane\"");
        assert!(result.is_err());
    }
}
