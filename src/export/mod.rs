//! Exporting the process model as RDF triples

pub mod triples;

pub use triples::{
    export_to_files, output_path, process_triples, write_document, write_process, ExportConfig, Triple,
};
