//! Dense transition-count matrix over a process's activities.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::Process;
use crate::error::ModelError;

/// What to do with a transition whose endpoint does not resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UnresolvedPolicy {
    /// Leave the transition out of the matrix and record a diagnostic
    #[default]
    Skip,
    /// Reject the whole process
    FailFast,
}

/// A transition left out of the matrix because an endpoint did not resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedTransition {
    pub transition: String,
    pub from: String,
    pub to: String,
    pub from_resolved: bool,
    pub to_resolved: bool,
}

/// Square matrix where cell `(i, j)` counts transitions from activity `i` to `j`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AdjacencyMatrix {
    size: usize,
    /// Row-major, `size * size` cells
    cells: Vec<u32>,
}

impl AdjacencyMatrix {
    /// All-zero matrix of side `size`
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, column: usize) -> Option<u32> {
        if row < self.size && column < self.size {
            Some(self.cells[row * self.size + column])
        } else {
            None
        }
    }

    /// Count one more transition from `row` to `column`.
    ///
    /// Both indices must be below `size`; callers resolve them first.
    fn increment(&mut self, row: usize, column: usize) {
        debug_assert!(row < self.size && column < self.size);
        self.cells[row * self.size + column] += 1;
    }

    /// Cells of `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= size`.
    pub fn row(&self, row: usize) -> &[u32] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    /// Outgoing transition count of the activity at `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= size`.
    pub fn row_sum(&self, row: usize) -> u32 {
        self.row(row).iter().sum()
    }

    /// Incoming transition count of the activity at `column`.
    ///
    /// # Panics
    ///
    /// Panics if `column >= size`.
    pub fn column_sum(&self, column: usize) -> u32 {
        assert!(column < self.size, "column {column} out of range for size {}", self.size);
        (0..self.size)
            .map(|row| self.cells[row * self.size + column])
            .sum()
    }

    /// Sum over all cells
    pub fn total(&self) -> u64 {
        self.cells.iter().map(|&c| u64::from(c)).sum()
    }
}

/// A built matrix plus whatever the skip policy left out
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatrixBuild {
    pub matrix: AdjacencyMatrix,
    pub unresolved: Vec<UnresolvedTransition>,
}

/// Build the adjacency matrix of `process`.
///
/// Runs in O(A + T): activity ids are indexed once, then each transition is
/// resolved through the index. A repeated id resolves to its first activity,
/// the same one [`Process::activity_index`] returns.
pub fn build_matrix(process: &Process, policy: UnresolvedPolicy) -> Result<MatrixBuild, ModelError> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(process.activities.len());
    for (i, activity) in process.activities.iter().enumerate() {
        index.entry(activity.id.as_str()).or_insert(i);
    }

    let mut build = MatrixBuild {
        matrix: AdjacencyMatrix::new(process.activities.len()),
        unresolved: Vec::new(),
    };

    for transition in &process.transitions {
        let from = index.get(transition.from_id.as_str()).copied();
        let to = index.get(transition.to_id.as_str()).copied();

        match (from, to) {
            (Some(row), Some(column)) => build.matrix.increment(row, column),
            _ => {
                if policy == UnresolvedPolicy::FailFast {
                    return Err(ModelError::ModelIntegrity {
                        process: process.id.clone(),
                        transition: transition.id.clone(),
                        from: transition.from_id.clone(),
                        to: transition.to_id.clone(),
                    });
                }
                warn!(
                    process = %process.id,
                    transition = %transition.id,
                    from = %transition.from_id,
                    to = %transition.to_id,
                    "skipping transition with unresolved endpoint"
                );
                build.unresolved.push(UnresolvedTransition {
                    transition: transition.id.clone(),
                    from: transition.from_id.clone(),
                    to: transition.to_id.clone(),
                    from_resolved: from.is_some(),
                    to_resolved: to.is_some(),
                });
            }
        }
    }

    Ok(build)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Activity, ActivityKind, Transition};

    fn diamond() -> Process {
        Process::new("p", "Diamond")
            .with_activity(Activity::new("a", "A", ActivityKind::StartEvent))
            .with_activity(Activity::new("b", "B", ActivityKind::Task))
            .with_activity(Activity::new("c", "C", ActivityKind::EndEvent))
            .with_transition(Transition::new("t1", "a", "b"))
            .with_transition(Transition::new("t2", "b", "c"))
            .with_transition(Transition::new("t3", "b", "c"))
    }

    #[test]
    fn empty_process_gives_empty_matrix() {
        let build = build_matrix(&Process::new("p", "Empty"), UnresolvedPolicy::Skip).unwrap();
        assert_eq!(build.matrix.size(), 0);
        assert_eq!(build.matrix.total(), 0);
        assert!(build.unresolved.is_empty());
    }

    #[test]
    fn multi_edges_increment_the_cell() {
        let build = build_matrix(&diamond(), UnresolvedPolicy::Skip).unwrap();
        let m = &build.matrix;
        assert_eq!(m.size(), 3);
        assert_eq!(m.get(0, 1), Some(1));
        assert_eq!(m.get(1, 2), Some(2));
        assert_eq!(m.get(2, 0), Some(0));
        assert_eq!(m.get(3, 0), None);
        assert_eq!(m.total(), 3);
    }

    #[test]
    fn row_and_column_sums() {
        let build = build_matrix(&diamond(), UnresolvedPolicy::Skip).unwrap();
        let m = &build.matrix;
        assert_eq!(m.row_sum(1), 2);
        assert_eq!(m.column_sum(1), 1);
        assert_eq!(m.column_sum(2), 2);
        assert_eq!(m.row_sum(2), 0);
        assert_eq!(m.row(1), &[0, 0, 2]);
    }

    #[test]
    fn repeated_id_resolves_to_first_activity() {
        let process = Process::new("p", "Twice")
            .with_activity(Activity::new("a", "First", ActivityKind::StartEvent))
            .with_activity(Activity::new("b", "", ActivityKind::Task))
            .with_activity(Activity::new("a", "Second", ActivityKind::EndEvent))
            .with_transition(Transition::new("t1", "a", "b"))
            .with_transition(Transition::new("t2", "b", "a"));
        let build = build_matrix(&process, UnresolvedPolicy::Skip).unwrap();
        assert_eq!(process.activity_index("a"), Some(0));
        assert_eq!(build.matrix.get(0, 1), Some(1));
        assert_eq!(build.matrix.get(1, 0), Some(1));
        assert_eq!(build.matrix.row_sum(2), 0);
        assert_eq!(build.matrix.column_sum(2), 0);
    }

    #[test]
    #[should_panic]
    fn column_sum_out_of_range_panics() {
        let build = build_matrix(&diamond(), UnresolvedPolicy::Skip).unwrap();
        build.matrix.column_sum(3);
    }

    #[test]
    fn skip_policy_records_unresolved() {
        let process = diamond().with_transition(Transition::new("t4", "c", "ghost"));
        let build = build_matrix(&process, UnresolvedPolicy::Skip).unwrap();
        assert_eq!(build.matrix.total(), 3);
        assert_eq!(build.unresolved.len(), 1);
        let skipped = &build.unresolved[0];
        assert_eq!(skipped.transition, "t4");
        assert!(skipped.from_resolved);
        assert!(!skipped.to_resolved);
    }

    #[test]
    fn fail_fast_policy_rejects() {
        let process = diamond().with_transition(Transition::new("t4", "ghost", "a"));
        let err = build_matrix(&process, UnresolvedPolicy::FailFast).unwrap_err();
        assert_eq!(
            err,
            ModelError::ModelIntegrity {
                process: "p".into(),
                transition: "t4".into(),
                from: "ghost".into(),
                to: "a".into(),
            }
        );
    }

    #[test]
    fn policy_deserializes_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: UnresolvedPolicy,
        }
        let w: Wrapper = toml::from_str("policy = \"fail-fast\"").unwrap();
        assert_eq!(w.policy, UnresolvedPolicy::FailFast);
    }
}
