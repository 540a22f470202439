//! Parallel analysis of many processes.
//!
//! Processes share no state, so each one is analyzed on its own rayon task.
//! Output keeps document and process order. A process the analysis rejects
//! becomes a [`ProcessOutcome::Rejected`] entry instead of failing the batch.

use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::{analyze, AnalysisConfig, AnalysisResult};
use crate::core::{Definitions, Process, SkippedProcess};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ProcessOutcome {
    Analyzed(AnalysisResult),
    Rejected {
        process_id: String,
        process_name: String,
        reason: String,
    },
}

impl ProcessOutcome {
    pub fn process_name(&self) -> &str {
        match self {
            ProcessOutcome::Analyzed(result) => &result.process_name,
            ProcessOutcome::Rejected { process_name, .. } => process_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub document: String,
    pub outcomes: Vec<ProcessOutcome>,
    pub skipped: Vec<SkippedProcess>,
}

impl DocumentReport {
    pub fn analyzed(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.outcomes.iter().filter_map(|o| match o {
            ProcessOutcome::Analyzed(result) => Some(result),
            ProcessOutcome::Rejected { .. } => None,
        })
    }

    pub fn issue_count(&self) -> usize {
        self.analyzed().map(|r| r.issues.len()).sum()
    }

    pub fn rejected_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ProcessOutcome::Rejected { .. }))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub documents: Vec<DocumentReport>,
}

impl BatchReport {
    pub fn issue_count(&self) -> usize {
        self.documents.iter().map(DocumentReport::issue_count).sum()
    }

    pub fn rejected_count(&self) -> usize {
        self.documents.iter().map(DocumentReport::rejected_count).sum()
    }
}

fn analyze_one(process: &Process, config: &AnalysisConfig) -> ProcessOutcome {
    match analyze(process, config) {
        Ok(result) => ProcessOutcome::Analyzed(result),
        Err(err) => {
            warn!(process = %process.id, error = %err, "process rejected");
            ProcessOutcome::Rejected {
                process_id: process.id.clone(),
                process_name: process.name.clone(),
                reason: err.to_string(),
            }
        }
    }
}

/// Analyze every process of one document on the current rayon pool
pub fn analyze_definitions(definitions: &Definitions, config: &AnalysisConfig) -> DocumentReport {
    DocumentReport {
        document: definitions.document.clone(),
        outcomes: definitions
            .processes
            .par_iter()
            .map(|process| analyze_one(process, config))
            .collect(),
        skipped: definitions.skipped.clone(),
    }
}

/// Analyze several documents on a dedicated pool of `workers` threads (0 = rayon default)
pub fn run_batch(documents: &[Definitions], config: &AnalysisConfig, workers: usize) -> Result<BatchReport> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("failed to start analysis worker pool")?;

    let started = Instant::now();
    let reports: Vec<DocumentReport> = pool.install(|| {
        documents
            .par_iter()
            .map(|definitions| analyze_definitions(definitions, config))
            .collect()
    });

    let report = BatchReport {
        run_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        documents: reports,
    };
    info!(
        documents = report.documents.len(),
        issues = report.issue_count(),
        rejected = report.rejected_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "batch analysis finished"
    );
    Ok(report)
}
