//! Control-structure complexity score (CSC).
//!
//! ```text
//! CSC = (S - 1) + (E - 1) + target_term + source_term + task_source_term - task_out_penalty
//! ```
//!
//! `S`/`E` are 1 when at least one start/end event exists. The intermediate
//! terms average `(has_edge - 1)` over all intermediate events, the task source
//! term does the same over tasks, and the penalty counts tasks whose outgoing
//! degree is anything other than exactly one.
//!
//! NOTE: `task_out_penalty` tests `row_sum != 1`, so a task with no outgoing
//! transition and a task that branches are penalized the same way even though
//! the validator reports them as different issues. Historical scores depend on
//! this, so it stays as is.

use serde::{Deserialize, Serialize};

use super::matrix::AdjacencyMatrix;
use crate::core::{ActivityKind, Process};

/// The individual terms of the score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ComplexityBreakdown {
    pub start_term: f64,
    pub end_term: f64,
    pub target_term: f64,
    pub source_term: f64,
    pub task_source_term: f64,
    pub task_out_penalty: f64,
}

impl ComplexityBreakdown {
    pub fn score(&self) -> f64 {
        self.start_term
            + self.end_term
            + self.target_term
            + self.source_term
            + self.task_source_term
            - self.task_out_penalty
    }
}

fn indicator(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

/// `(has_edges - 1) / count`, or 0 when there is nothing to average over
fn averaged_gap(degree: u32, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = count as f64;
    (indicator(degree > 0) - 1.0) / count
}

pub fn complexity_breakdown(process: &Process, matrix: &AdjacencyMatrix) -> ComplexityBreakdown {
    let mut breakdown = ComplexityBreakdown {
        start_term: indicator(process.count_of(ActivityKind::StartEvent) > 0) - 1.0,
        end_term: indicator(process.count_of(ActivityKind::EndEvent) > 0) - 1.0,
        ..ComplexityBreakdown::default()
    };

    let intermediate_count = process.count_of(ActivityKind::IntermediateEvent);
    for (index, _) in process.activities_of(ActivityKind::IntermediateEvent) {
        breakdown.target_term += averaged_gap(matrix.row_sum(index), intermediate_count);
        breakdown.source_term += averaged_gap(matrix.column_sum(index), intermediate_count);
    }

    let task_count = process.count_of(ActivityKind::Task);
    for (index, _) in process.activities_of(ActivityKind::Task) {
        breakdown.task_out_penalty += indicator(matrix.row_sum(index) != 1);
        breakdown.task_source_term += averaged_gap(matrix.column_sum(index), task_count);
    }

    breakdown
}

pub fn complexity_score(process: &Process, matrix: &AdjacencyMatrix) -> f64 {
    complexity_breakdown(process, matrix).score()
}
