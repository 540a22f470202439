//! `analyze` command

use std::path::PathBuf;

use anyhow::{Context, Result};

use bpmn_analysis::batch::run_batch;
use bpmn_analysis::config::Config;
use bpmn_analysis::core::Definitions;
use bpmn_analysis::ingest;
use bpmn_analysis::report::{render_json, render_summary, render_text};

pub fn run(files: &[PathBuf], format: &str, fail_on_issues: bool, config: &Config) -> Result<i32> {
    let documents = files
        .iter()
        .map(|path| ingest::read_file(path).with_context(|| format!("failed to read {}", path.display())))
        .collect::<Result<Vec<Definitions>>>()?;

    let report = run_batch(&documents, &config.analysis, config.batch.workers)?;

    match format {
        "json" => println!("{}", render_json(&report)?),
        "summary" => {
            for document in &report.documents {
                print!("{}", render_summary(document));
            }
        }
        _ => {
            for document in &report.documents {
                print!("{}", render_text(document, &config.labels));
            }
        }
    }

    let failed = report.issue_count() > 0 || report.rejected_count() > 0;
    Ok(if fail_on_issues && failed { 1 } else { 0 })
}
