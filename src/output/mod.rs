//! Output module for persisting and presenting search reports
//!
//! This module handles:
//! - Writing reports to JSON files through the `ReportSink` seam
//! - Summarizing reports for the console

mod json_output;
mod summary;
mod traits;

pub use json_output::JsonFileSink;
pub use summary::{format_summary, print_summary};
pub use traits::{OutputError, OutputResult, ReportSink, ReportSummary};
