use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or analyzing a process model
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A transition endpoint does not name an activity of the process
    #[error(
        "transition '{transition}' in process '{process}' references unknown activity \
         (from '{from}', to '{to}')"
    )]
    ModelIntegrity {
        process: String,
        transition: String,
        from: String,
        to: String,
    },

    /// The process is not in a shape the analysis can accept
    #[error("process '{process}' cannot be analyzed: {reason}")]
    Precondition { process: String, reason: String },

    #[error("unknown activity kind '{raw}'")]
    UnknownKind { raw: String },
}

/// Errors raised while reading an XPDL document
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("malformed XML at byte {position}: {source}")]
    Xml {
        source: quick_xml::Error,
        position: usize,
    },

    #[error("<{element}> found outside of a <WorkflowProcess>")]
    Orphan { element: &'static str },

    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// No element under the activity names a known kind
    #[error("activity '{activity}' in process '{process}' has no element naming a known activity kind")]
    UnknownKind { process: String, activity: String },
}

/// Errors raised while writing triples
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    /// Two processes map to the same per-process file
    #[error("process '{process}' would overwrite {path}")]
    PathCollision { process: String, path: PathBuf },
}

// `?` on a bare io::Error, e.g. when writing to an in-memory sink
impl From<std::io::Error> for ExportError {
    fn from(source: std::io::Error) -> Self {
        ExportError::Io {
            source,
            path: PathBuf::from("<stream>"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        source: toml::de::Error,
        path: PathBuf,
    },
}
