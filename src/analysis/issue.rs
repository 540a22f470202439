use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{Activity, ActivityKind};

/// Category of a structural finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    MissingStartEvent,
    MissingEndEvent,
    IsolatedIntermediateEvent,
    BranchWithoutGateway,
    TaskWithoutOutgoing,
    TaskWithoutIncoming,
}

impl IssueKind {
    /// Stable identifier, safe to match on in scripts
    pub fn code(self) -> &'static str {
        match self {
            IssueKind::MissingStartEvent => "missing-start-event",
            IssueKind::MissingEndEvent => "missing-end-event",
            IssueKind::IsolatedIntermediateEvent => "isolated-intermediate-event",
            IssueKind::BranchWithoutGateway => "branch-without-gateway",
            IssueKind::TaskWithoutOutgoing => "task-without-outgoing",
            IssueKind::TaskWithoutIncoming => "task-without-incoming",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// What an issue is attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum IssueSubject {
    /// A real activity of the process
    Activity(Activity),
    /// No activity of this kind exists at all
    Missing { kind: ActivityKind },
}

impl IssueSubject {
    pub fn kind(&self) -> ActivityKind {
        match self {
            IssueSubject::Activity(activity) => activity.kind,
            IssueSubject::Missing { kind } => *kind,
        }
    }

    pub fn activity(&self) -> Option<&Activity> {
        match self {
            IssueSubject::Activity(activity) => Some(activity),
            IssueSubject::Missing { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub subject: IssueSubject,
    pub kind: IssueKind,
    /// Human-readable message with process and activity names filled in
    pub message: String,
}

impl Issue {
    pub(crate) fn missing(kind: ActivityKind, issue: IssueKind, process_name: &str) -> Self {
        Self {
            subject: IssueSubject::Missing { kind },
            kind: issue,
            message: render_message(issue, process_name, None),
        }
    }

    pub(crate) fn on_activity(activity: &Activity, issue: IssueKind, process_name: &str) -> Self {
        Self {
            subject: IssueSubject::Activity(activity.clone()),
            kind: issue,
            message: render_message(issue, process_name, Some(activity.display_name())),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            IssueSubject::Activity(a) => write!(f, "{} <{}> : {}", a.display_name(), a.kind, self.message),
            IssueSubject::Missing { kind } => write!(f, "(none) <{}> : {}", kind, self.message),
        }
    }
}

fn render_message(issue: IssueKind, process: &str, activity: Option<&str>) -> String {
    let activity = activity.unwrap_or_default();
    match issue {
        IssueKind::MissingStartEvent => format!("No start event is defined for process '{process}'"),
        IssueKind::MissingEndEvent => format!("No end event is defined for process '{process}'"),
        IssueKind::IsolatedIntermediateEvent => {
            format!("Intermediate event '{activity}' is excluded from the flow of process '{process}'")
        }
        IssueKind::BranchWithoutGateway => {
            format!("Process '{process}' splits its flow into several routes without a gateway")
        }
        IssueKind::TaskWithoutOutgoing => {
            format!("Task '{activity}' does not lead toward completion of process '{process}'")
        }
        IssueKind::TaskWithoutIncoming => {
            format!("Task '{activity}' is disconnected from the rest of process '{process}'")
        }
    }
}
