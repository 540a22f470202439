//! Process model: activities, transitions and the documents holding them

mod activity;
mod definitions;

pub use activity::{Activity, ActivityKind, Transition};
pub use definitions::{Definitions, Process, SkippedProcess};
