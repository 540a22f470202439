use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Kind of a process graph vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActivityKind {
    StartEvent,
    Task,
    IntermediateEvent,
    Gateway,
    EndEvent,
}

/// XPDL element names that decide an activity's kind.
///
/// Any element with one of these local names nested under an `Activity`
/// determines that activity's kind. Everything else under an activity
/// (performers, graphics info, descriptions) is ignored.
const XPDL_KIND_TABLE: &[(&str, ActivityKind)] = &[
    ("StartEvent", ActivityKind::StartEvent),
    ("Implementation", ActivityKind::Task),
    ("Task", ActivityKind::Task),
    ("SubFlow", ActivityKind::Task),
    ("IntermediateEvent", ActivityKind::IntermediateEvent),
    ("Route", ActivityKind::Gateway),
    ("EndEvent", ActivityKind::EndEvent),
];

impl ActivityKind {
    pub const ALL: [ActivityKind; 5] = [
        ActivityKind::StartEvent,
        ActivityKind::Task,
        ActivityKind::IntermediateEvent,
        ActivityKind::Gateway,
        ActivityKind::EndEvent,
    ];

    /// Canonical name, used as the fallback label in exports
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::StartEvent => "StartEvent",
            ActivityKind::Task => "Task",
            ActivityKind::IntermediateEvent => "IntermediateEvent",
            ActivityKind::Gateway => "Gateway",
            ActivityKind::EndEvent => "EndEvent",
        }
    }

    /// Map an XPDL element local name to a kind, if it names one
    pub fn from_xpdl(element: &str) -> Option<Self> {
        XPDL_KIND_TABLE
            .iter()
            .find(|(name, _)| *name == element)
            .map(|(_, kind)| *kind)
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityKind {
    type Err = ModelError;

    /// Accepts canonical names as well as the XPDL vocabulary
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .or_else(|| ActivityKind::from_xpdl(s))
            .ok_or_else(|| ModelError::UnknownKind { raw: s.to_string() })
    }
}

/// A single workflow step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub kind: ActivityKind,
}

impl Activity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ActivityKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    /// Name for display, falling back to the kind name when empty
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.kind.as_str()
        } else {
            &self.name
        }
    }
}

/// Directed edge between two activities, referenced by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub id: String,
    pub from_id: String,
    pub to_id: String,
}

impl Transition {
    pub fn new(id: impl Into<String>, from_id: impl Into<String>, to_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from_id: from_id.into(),
            to_id: to_id.into(),
        }
    }
}
