//! Reading process documents into the in-memory model

pub mod xpdl;

pub use xpdl::{parse_bytes, parse_str, read_file};
