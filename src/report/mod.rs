//! Rendering analysis results: summary lines, text tables and JSON

mod labels;

pub use labels::KindLabels;

use std::fmt::Write as _;

use anyhow::Result;

use crate::analysis::{AnalysisResult, IssueSubject};
use crate::batch::{BatchReport, DocumentReport, ProcessOutcome};

/// `tasks;gateways;start_events;intermediate_events;end_events;issue_count;CSC;messages`.
///
/// Messages are joined with `;` as they are; a `;` inside a message is not
/// escaped and will read as an extra field.
pub fn summary_line(result: &AnalysisResult) -> String {
    let c = &result.counts;
    let mut line = format!(
        "{};{};{};{};{};{};{}",
        c.tasks,
        c.gateways,
        c.start_events,
        c.intermediate_events,
        c.end_events,
        result.issues.len(),
        result.complexity_score
    );
    for issue in &result.issues {
        line.push(';');
        line.push_str(&issue.message);
    }
    line
}

/// Summary output for one document, one tab-separated line per process:
/// `document`, process id, then the [`summary_line`]. A rejected process gets
/// `rejected: <reason>` in place of the summary.
pub fn render_summary(report: &DocumentReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        match outcome {
            ProcessOutcome::Analyzed(result) => {
                let _ = writeln!(out, "{}\t{}\t{}", report.document, result.process_id, summary_line(result));
            }
            ProcessOutcome::Rejected { process_id, reason, .. } => {
                let _ = writeln!(out, "{}\t{}\trejected: {}", report.document, process_id, reason);
            }
        }
    }
    out
}

/// Human-readable report of one document
pub fn render_text(report: &DocumentReport, labels: &KindLabels) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", report.document);

    for outcome in &report.outcomes {
        match outcome {
            ProcessOutcome::Analyzed(result) => render_result(&mut out, result, labels),
            ProcessOutcome::Rejected { process_name, reason, .. } => {
                let _ = writeln!(out, "  {process_name}: not analyzed ({reason})");
            }
        }
    }
    for skipped in &report.skipped {
        let _ = writeln!(out, "  {}: skipped ({})", skipped.name, skipped.reason);
    }
    out
}

fn render_result(out: &mut String, result: &AnalysisResult, labels: &KindLabels) {
    let _ = writeln!(out, "  {} (CSC {})", result.process_name, result.complexity_score);
    if result.is_clean() {
        let _ = writeln!(out, "    no structural issues found");
    }

    for issue in &result.issues {
        let element = match &issue.subject {
            IssueSubject::Activity(activity) => activity.display_name().to_string(),
            IssueSubject::Missing { .. } => "(not specified)".to_string(),
        };
        let _ = writeln!(
            out,
            "    {:<24} {:<20} {}",
            element,
            labels.label(issue.subject.kind()),
            issue.message
        );
    }
    for skipped in &result.unresolved {
        let _ = writeln!(
            out,
            "    transition '{}' ({} -> {}) ignored: unknown endpoint",
            skipped.transition, skipped.from, skipped.to
        );
    }
}

pub fn render_json(report: &BatchReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
