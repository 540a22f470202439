//! `export` command

use std::path::Path;

use anyhow::{Context, Result};

use bpmn_analysis::config::Config;
use bpmn_analysis::export::export_to_files;
use bpmn_analysis::ingest;

pub fn run(file: &Path, output_dir: Option<&Path>, split: bool, config: &Config) -> Result<i32> {
    let definitions =
        ingest::read_file(file).with_context(|| format!("failed to read {}", file.display()))?;

    let written = export_to_files(
        &definitions,
        file,
        output_dir,
        split,
        config.analysis.unresolved_transitions,
        &config.export,
    )
        .with_context(|| format!("failed to export {}", file.display()))?;

    for path in written {
        println!("{}", path.display());
    }
    Ok(0)
}
