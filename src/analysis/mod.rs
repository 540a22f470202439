//! Process analysis: adjacency matrix, structural checks and complexity score.
//!
//! [`analyze`] is the entry point. It builds a fresh matrix on every call, runs
//! the checks in their fixed order and scores the process, so analyzing the
//! same process twice gives identical results.

mod issue;
mod matrix;
mod scorer;
mod validator;

pub use issue::{Issue, IssueKind, IssueSubject};
pub use matrix::{build_matrix, AdjacencyMatrix, MatrixBuild, UnresolvedPolicy, UnresolvedTransition};
pub use scorer::{complexity_breakdown, complexity_score, ComplexityBreakdown};
pub use validator::{
    check_end_events, check_intermediate_events, check_process_flow, check_start_events, check_tasks,
    validate, ActivityCounts, Validation,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::Process;
use crate::error::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    pub unresolved_transitions: UnresolvedPolicy,
}

/// Everything the analysis derived for one process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub process_id: String,
    pub process_name: String,
    pub counts: ActivityCounts,
    /// In check execution order
    pub issues: Vec<Issue>,
    pub complexity_score: f64,
    pub breakdown: ComplexityBreakdown,
    /// Transitions the skip policy left out of the matrix
    pub unresolved: Vec<UnresolvedTransition>,
    #[serde(skip)]
    pub matrix: AdjacencyMatrix,
}

impl AnalysisResult {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// All issue messages, each followed by `;`
    pub fn issues_to_string(&self) -> String {
        self.issues.iter().map(|i| format!("{};", i.message)).collect()
    }
}

/// Analyze one process.
///
/// Fails before any check runs when activity ids are not unique, or when the
/// fail-fast policy meets a transition with an unresolved endpoint.
pub fn analyze(process: &Process, config: &AnalysisConfig) -> Result<AnalysisResult, ModelError> {
    if let Some(id) = process.duplicate_activity_id() {
        return Err(ModelError::Precondition {
            process: process.id.clone(),
            reason: format!("activity id '{id}' is used more than once"),
        });
    }

    let MatrixBuild { matrix, unresolved } = build_matrix(process, config.unresolved_transitions)?;
    let Validation { counts, issues } = validate(process, &matrix);
    let breakdown = complexity_breakdown(process, &matrix);

    debug!(
        process = %process.id,
        activities = process.activities.len(),
        transitions = process.transitions.len(),
        issues = issues.len(),
        csc = breakdown.score(),
        "analyzed process"
    );

    Ok(AnalysisResult {
        process_id: process.id.clone(),
        process_name: process.name.clone(),
        counts,
        issues,
        complexity_score: breakdown.score(),
        breakdown,
        unresolved,
        matrix,
    })
}
