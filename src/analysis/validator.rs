//! Local, degree-based structural checks.
//!
//! Five checks run in a fixed order and each appends to one issue list:
//! start-event presence, end-event presence, intermediate-event connectivity,
//! branching without a gateway, and task connectivity. None of them look
//! further than a node's own row and column of the adjacency matrix.

use serde::{Deserialize, Serialize};

use super::issue::{Issue, IssueKind};
use super::matrix::AdjacencyMatrix;
use crate::core::{ActivityKind, Process};

/// Number of activities per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ActivityCounts {
    pub tasks: usize,
    pub gateways: usize,
    pub start_events: usize,
    pub end_events: usize,
    pub intermediate_events: usize,
}

impl ActivityCounts {
    pub fn total(&self) -> usize {
        self.tasks + self.gateways + self.start_events + self.end_events + self.intermediate_events
    }

    pub fn get(&self, kind: ActivityKind) -> usize {
        match kind {
            ActivityKind::StartEvent => self.start_events,
            ActivityKind::Task => self.tasks,
            ActivityKind::IntermediateEvent => self.intermediate_events,
            ActivityKind::Gateway => self.gateways,
            ActivityKind::EndEvent => self.end_events,
        }
    }
}

/// Output of the structural checks
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Validation {
    pub counts: ActivityCounts,
    pub issues: Vec<Issue>,
}

/// Run all five checks against `process` and its already-built matrix
pub fn validate(process: &Process, matrix: &AdjacencyMatrix) -> Validation {
    debug_assert_eq!(matrix.size(), process.activities.len());

    let mut validation = Validation::default();
    validation.counts.start_events = check_start_events(process, &mut validation.issues);
    validation.counts.end_events = check_end_events(process, &mut validation.issues);
    validation.counts.intermediate_events =
        check_intermediate_events(process, matrix, &mut validation.issues);
    validation.counts.gateways = check_process_flow(process, matrix, &mut validation.issues);
    validation.counts.tasks = check_tasks(process, matrix, &mut validation.issues);
    validation
}

fn check_presence(
    process: &Process,
    kind: ActivityKind,
    issue: IssueKind,
    issues: &mut Vec<Issue>,
) -> usize {
    let count = process.count_of(kind);
    if count == 0 {
        issues.push(Issue::missing(kind, issue, &process.name));
    }
    count
}

/// Returns the number of start events. Several start events are fine.
pub fn check_start_events(process: &Process, issues: &mut Vec<Issue>) -> usize {
    check_presence(process, ActivityKind::StartEvent, IssueKind::MissingStartEvent, issues)
}

/// Returns the number of end events.
pub fn check_end_events(process: &Process, issues: &mut Vec<Issue>) -> usize {
    check_presence(process, ActivityKind::EndEvent, IssueKind::MissingEndEvent, issues)
}

/// An intermediate event needs at least one incoming and one outgoing transition.
///
/// Returns the number of intermediate events.
pub fn check_intermediate_events(
    process: &Process,
    matrix: &AdjacencyMatrix,
    issues: &mut Vec<Issue>,
) -> usize {
    let mut count = 0;
    for (index, activity) in process.activities_of(ActivityKind::IntermediateEvent) {
        count += 1;
        if matrix.row_sum(index) == 0 || matrix.column_sum(index) == 0 {
            issues.push(Issue::on_activity(
                activity,
                IssueKind::IsolatedIntermediateEvent,
                &process.name,
            ));
        }
    }
    count
}

/// A task with more than one outgoing transition branches without a gateway.
///
/// Gateways themselves are only counted; the return value is their number.
pub fn check_process_flow(
    process: &Process,
    matrix: &AdjacencyMatrix,
    issues: &mut Vec<Issue>,
) -> usize {
    for (index, activity) in process.activities_of(ActivityKind::Task) {
        if matrix.row_sum(index) > 1 {
            issues.push(Issue::on_activity(activity, IssueKind::BranchWithoutGateway, &process.name));
        }
    }
    process.count_of(ActivityKind::Gateway)
}

/// Every task needs an outgoing and an incoming transition; both issues may fire.
///
/// Returns the number of tasks.
pub fn check_tasks(process: &Process, matrix: &AdjacencyMatrix, issues: &mut Vec<Issue>) -> usize {
    let mut count = 0;
    for (index, activity) in process.activities_of(ActivityKind::Task) {
        count += 1;
        if matrix.row_sum(index) == 0 {
            issues.push(Issue::on_activity(activity, IssueKind::TaskWithoutOutgoing, &process.name));
        }
        if matrix.column_sum(index) == 0 {
            issues.push(Issue::on_activity(activity, IssueKind::TaskWithoutIncoming, &process.name));
        }
    }
    count
}
