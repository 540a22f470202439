use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use bpmn_analysis::analysis::{analyze, build_matrix, AnalysisConfig, UnresolvedPolicy};
use bpmn_analysis::{Activity, ActivityKind, Process, Transition};

/// A chain of `tasks` tasks between one start and one end event, with an
/// intermediate event hanging off every tenth task.
fn chain(tasks: usize) -> Process {
    let mut process = Process::new("bench", "Chain")
        .with_activity(Activity::new("start", "", ActivityKind::StartEvent))
        .with_activity(Activity::new("end", "", ActivityKind::EndEvent));

    let mut previous = "start".to_string();
    for i in 0..tasks {
        let id = format!("task{i}");
        process = process
            .with_activity(Activity::new(id.clone(), format!("Task {i}"), ActivityKind::Task))
            .with_transition(Transition::new(format!("f{i}"), previous, id.clone()));
        if i % 10 == 0 {
            let event = format!("event{i}");
            process = process
                .with_activity(Activity::new(event.clone(), "", ActivityKind::IntermediateEvent))
                .with_transition(Transition::new(format!("e{i}"), id.clone(), event));
        }
        previous = id;
    }
    process.with_transition(Transition::new("last", previous, "end"))
}

fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    for size in [50, 200, 800] {
        let process = chain(size);
        group.bench_with_input(BenchmarkId::new("build_matrix", size), &process, |b, p| {
            b.iter(|| build_matrix(black_box(p), UnresolvedPolicy::Skip))
        });
        group.bench_with_input(BenchmarkId::new("analyze", size), &process, |b, p| {
            b.iter(|| analyze(black_box(p), &AnalysisConfig::default()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_analysis);
criterion_main!(benches);
