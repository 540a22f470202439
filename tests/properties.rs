// tests/properties.rs
//! Property tests over randomly generated process graphs.

use bpmn_analysis::analysis::{analyze, build_matrix, AnalysisConfig, UnresolvedPolicy};
use bpmn_analysis::{Activity, ActivityKind, Process, Transition};
use proptest::prelude::*;

fn arb_kind() -> impl Strategy<Value = ActivityKind> {
    prop_oneof![
        Just(ActivityKind::StartEvent),
        Just(ActivityKind::Task),
        Just(ActivityKind::IntermediateEvent),
        Just(ActivityKind::Gateway),
        Just(ActivityKind::EndEvent),
    ]
}

/// Activities `a0..aN`; transition endpoints may point one past the end,
/// which yields an id no activity has.
fn arb_process() -> impl Strategy<Value = Process> {
    prop::collection::vec(arb_kind(), 0..12).prop_flat_map(|kinds| {
        let n = kinds.len();
        let endpoint = 0..=n;
        let edges = prop::collection::vec((endpoint.clone(), endpoint), 0..30);
        (Just(kinds), edges).prop_map(|(kinds, edges)| {
            let mut process = Process::new("p", "Generated");
            for (i, kind) in kinds.into_iter().enumerate() {
                process = process.with_activity(Activity::new(format!("a{i}"), "", kind));
            }
            for (i, (from, to)) in edges.into_iter().enumerate() {
                process = process.with_transition(Transition::new(
                    format!("t{i}"),
                    format!("a{from}"),
                    format!("a{to}"),
                ));
            }
            process
        })
    })
}

fn resolved_transitions(process: &Process) -> usize {
    process
        .transitions
        .iter()
        .filter(|t| process.activity_index(&t.from_id).is_some() && process.activity_index(&t.to_id).is_some())
        .count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn counters_cover_every_activity_once(process in arb_process()) {
        let result = analyze(&process, &AnalysisConfig::default()).unwrap();
        prop_assert_eq!(result.counts.total(), process.activities.len());
        for kind in ActivityKind::ALL {
            prop_assert_eq!(result.counts.get(kind), process.count_of(kind));
        }
    }

    #[test]
    fn matrix_counts_every_resolved_transition(process in arb_process()) {
        let build = build_matrix(&process, UnresolvedPolicy::Skip).unwrap();
        prop_assert_eq!(build.matrix.size(), process.activities.len());
        prop_assert_eq!(build.matrix.total() as usize, resolved_transitions(&process));
        prop_assert_eq!(
            build.unresolved.len(),
            process.transitions.len() - resolved_transitions(&process)
        );
    }

    #[test]
    fn fail_fast_succeeds_only_when_everything_resolves(process in arb_process()) {
        let all_resolved = resolved_transitions(&process) == process.transitions.len();
        let outcome = build_matrix(&process, UnresolvedPolicy::FailFast);
        prop_assert_eq!(outcome.is_ok(), all_resolved);
    }

    #[test]
    fn analysis_is_idempotent(process in arb_process()) {
        let config = AnalysisConfig::default();
        let first = analyze(&process, &config).unwrap();
        let second = analyze(&process, &config).unwrap();
        prop_assert_eq!(first.complexity_score.to_bits(), second.complexity_score.to_bits());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn score_is_finite_and_bounded(process in arb_process()) {
        let result = analyze(&process, &AnalysisConfig::default()).unwrap();
        let score = result.complexity_score;
        prop_assert!(score.is_finite());
        // every term is at most zero; the penalty is at most one per task
        let floor = -5.0 - result.counts.tasks as f64 - 1e-9;
        prop_assert!(score <= 1e-9 && score >= floor, "score {} out of range", score);
    }
}
