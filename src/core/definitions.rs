use serde::{Deserialize, Serialize};

use super::activity::{Activity, ActivityKind, Transition};

/// Root of an ingested process document (an XPDL package)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Definitions {
    /// Source document the definitions were read from
    pub document: String,
    pub name: Option<String>,
    pub processes: Vec<Process>,
    /// Processes present in the document but not analyzable
    pub skipped: Vec<SkippedProcess>,
}

/// A process that ingestion dropped before analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedProcess {
    pub id: String,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Process {
    pub id: String,
    pub name: String,
    /// Order is fixed at ingestion and defines matrix indices
    pub activities: Vec<Activity>,
    pub transitions: Vec<Transition>,
}

impl Process {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            activities: Vec::new(),
            transitions: Vec::new(),
        }
    }

    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn activity_by_id(&self, id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    /// Positional index of an activity, which is also its matrix row/column
    pub fn activity_index(&self, id: &str) -> Option<usize> {
        self.activities.iter().position(|a| a.id == id)
    }

    /// Activities of one kind together with their positional index
    pub fn activities_of(&self, kind: ActivityKind) -> impl Iterator<Item = (usize, &Activity)> {
        self.activities
            .iter()
            .enumerate()
            .filter(move |(_, a)| a.kind == kind)
    }

    pub fn count_of(&self, kind: ActivityKind) -> usize {
        self.activities_of(kind).count()
    }

    /// First activity id that appears more than once, if any
    pub fn duplicate_activity_id(&self) -> Option<&str> {
        let mut seen = std::collections::HashSet::with_capacity(self.activities.len());
        self.activities
            .iter()
            .map(|a| a.id.as_str())
            .find(|id| !seen.insert(*id))
    }
}
