#![warn(clippy::uninlined_format_args)]

pub mod json_snapshot;

pub use json_snapshot::{JsonSnapshotSource, parse_snapshot};
