//! N-Triples export of process structure.
//!
//! Each activity yields `<process> <bpmn:Orchestration> <activity>` and each
//! transition `<from> <bpmn:Transition> <to>`. Names have spaces replaced by
//! underscores; an unnamed activity is written under its kind name.
//!
//! Transitions with an unknown endpoint follow the same [`UnresolvedPolicy`]
//! as the analysis: skipped with a warning, or failing the process.

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::UnresolvedPolicy;
use crate::core::{Activity, Definitions, Process};
use crate::error::{ExportError, ModelError};

pub const DEFAULT_BPMN_BASE_URI: &str = "http://process-model.org/bpmn/";
pub const DEFAULT_DOMAIN_BASE_URI: &str = "http://process-model.org/domain/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub bpmn_base_uri: String,
    pub domain_base_uri: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            bpmn_base_uri: DEFAULT_BPMN_BASE_URI.to_string(),
            domain_base_uri: DEFAULT_DOMAIN_BASE_URI.to_string(),
        }
    }
}

impl ExportConfig {
    fn domain(&self, local: &str) -> String {
        format!("{}{}", self.domain_base_uri, local)
    }

    fn bpmn(&self, local: &str) -> String {
        format!("{}{}", self.bpmn_base_uri, local)
    }
}

/// One subject-predicate-object statement, all three as IRIs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> <{}> <{}> .", self.subject, self.predicate, self.object)
    }
}

fn local_name(name: &str) -> String {
    name.replace(' ', "_")
}

fn activity_local_name(activity: &Activity) -> String {
    local_name(activity.display_name())
}

fn process_local_name(process: &Process) -> String {
    if process.name.is_empty() {
        local_name(&process.id)
    } else {
        local_name(&process.name)
    }
}

/// Triples for one process: activities first, then transitions, in model order.
///
/// A transition whose endpoint does not resolve is left out under
/// [`UnresolvedPolicy::Skip`] and fails the whole process under
/// [`UnresolvedPolicy::FailFast`]. No line is ever written for it.
pub fn process_triples(
    process: &Process,
    policy: UnresolvedPolicy,
    config: &ExportConfig,
) -> Result<Vec<Triple>, ModelError> {
    let subject = config.domain(&process_local_name(process));
    let orchestration = config.bpmn("Orchestration");
    let transition_predicate = config.bpmn("Transition");

    let mut triples = Vec::with_capacity(process.activities.len() + process.transitions.len());

    for activity in &process.activities {
        triples.push(Triple {
            subject: subject.clone(),
            predicate: orchestration.clone(),
            object: config.domain(&activity_local_name(activity)),
        });
    }

    for transition in &process.transitions {
        let endpoints = (
            process.activity_by_id(&transition.from_id),
            process.activity_by_id(&transition.to_id),
        );
        let (Some(from), Some(to)) = endpoints else {
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
                "leaving transition with unresolved endpoint out of the export"
            );
            continue;
        };
        triples.push(Triple {
            subject: config.domain(&activity_local_name(from)),
            predicate: transition_predicate.clone(),
            object: config.domain(&activity_local_name(to)),
        });
    }

    Ok(triples)
}

/// Write one process as N-Triples; returns the number of lines written
pub fn write_process<W: Write>(
    process: &Process,
    writer: &mut W,
    policy: UnresolvedPolicy,
    config: &ExportConfig,
) -> Result<usize, ExportError> {
    let triples = process_triples(process, policy, config)?;
    write_triples(&triples, writer)
}

/// Write every analyzable process of a document.
///
/// All processes are converted before the first line is written, so a
/// rejected process leaves the writer untouched.
pub fn write_document<W: Write>(
    definitions: &Definitions,
    writer: &mut W,
    policy: UnresolvedPolicy,
    config: &ExportConfig,
) -> Result<usize, ExportError> {
    let triples = document_triples(definitions, policy, config)?;
    let mut lines = 0;
    for block in &triples {
        lines += write_triples(block, writer)?;
    }
    Ok(lines)
}

fn document_triples(
    definitions: &Definitions,
    policy: UnresolvedPolicy,
    config: &ExportConfig,
) -> Result<Vec<Vec<Triple>>, ModelError> {
    definitions
        .processes
        .iter()
        .map(|process| process_triples(process, policy, config))
        .collect()
}

fn write_triples<W: Write>(triples: &[Triple], writer: &mut W) -> Result<usize, ExportError> {
    for triple in triples {
        writeln!(writer, "{triple}")?;
    }
    Ok(triples.len())
}

/// `<stem>.nt`, or `<stem>_<Process_Name>.nt` when a process is given.
///
/// The file lands in `output_dir` when set, otherwise next to the source.
pub fn output_path(source: &Path, process_name: Option<&str>, output_dir: Option<&Path>) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "export".to_string());
    let file_name = match process_name {
        Some(name) => format!("{stem}_{}.nt", local_name(name)),
        None => format!("{stem}.nt"),
    };
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| source.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(file_name)
}

/// One path per process for `--split`.
///
/// A name already taken by an earlier process gets the process id appended
/// (`<stem>_<Name>_<id>.nt`); if that is taken too the export fails.
fn split_paths(
    definitions: &Definitions,
    source: &Path,
    output_dir: Option<&Path>,
) -> Result<Vec<PathBuf>, ExportError> {
    let mut taken = HashSet::new();
    let mut paths = Vec::with_capacity(definitions.processes.len());

    for process in &definitions.processes {
        let name = process_local_name(process);
        let mut path = output_path(source, Some(&name), output_dir);
        if taken.contains(&path) {
            path = output_path(source, Some(&format!("{name}_{}", process.id)), output_dir);
        }
        if !taken.insert(path.clone()) {
            return Err(ExportError::PathCollision {
                process: process.id.clone(),
                path,
            });
        }
        paths.push(path);
    }
    Ok(paths)
}

fn write_file<'a>(path: &Path, triples: impl IntoIterator<Item = &'a Triple>) -> Result<usize, ExportError> {
    let io_error = |source: std::io::Error| ExportError::Io {
        source,
        path: path.to_path_buf(),
    };

    let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
    let mut lines = 0;
    for triple in triples {
        writeln!(writer, "{triple}").map_err(io_error)?;
        lines += 1;
    }
    writer.flush().map_err(io_error)?;
    info!(path = %path.display(), lines, "wrote triples");
    Ok(lines)
}

/// Export a document to disk, one file per document or one per process.
///
/// Every process is converted and every file name chosen before any file is
/// created; a rejected process or a name clash leaves the output directory
/// as it was. Returns the paths written.
pub fn export_to_files(
    definitions: &Definitions,
    source: &Path,
    output_dir: Option<&Path>,
    split: bool,
    policy: UnresolvedPolicy,
    config: &ExportConfig,
) -> Result<Vec<PathBuf>, ExportError> {
    let triples = document_triples(definitions, policy, config)?;

    if !split {
        let path = output_path(source, None, output_dir);
        write_file(&path, triples.iter().flatten())?;
        return Ok(vec![path]);
    }

    let paths = split_paths(definitions, source, output_dir)?;
    for (path, block) in paths.iter().zip(&triples) {
        write_file(path, block)?;
    }
    Ok(paths)
}
