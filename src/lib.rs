//! Structural validation and complexity scoring for BPMN process models.
//!
//! An XPDL document is read into [`core::Definitions`], each process is run
//! through [`analysis::analyze`] (adjacency matrix, five structural checks,
//! CSC score), and the model can be exported as N-Triples.

pub mod analysis;
pub mod batch;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod ingest;
pub mod report;

pub use analysis::{analyze, AnalysisConfig, AnalysisResult, Issue, IssueKind, UnresolvedPolicy};
pub use crate::core::{Activity, ActivityKind, Definitions, Process, Transition};
pub use error::{ConfigError, ExportError, IngestError, ModelError};
