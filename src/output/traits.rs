//! Report sink trait and summary types
//!
//! This module defines the trait interface for persisting search reports and
//! the condensed view of a report used for console output.

use crate::model::{Category, Role, SearchReport};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for finished search reports
pub trait ReportSink {
    /// Persists a report
    ///
    /// # Arguments
    ///
    /// * `report` - The report to store, complete or partial
    ///
    /// # Returns
    ///
    /// The location the report was written to
    fn write_report(&self, report: &SearchReport) -> OutputResult<PathBuf>;
}

/// Counts derived from a search report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub total_found: usize,
    pub searched_streams: u64,
    pub gifter_matches: usize,
    pub viewer_matches: usize,

    /// Distinct target accounts with at least one match
    pub unique_targets: usize,

    /// Distinct streams with at least one match
    pub unique_streams: usize,

    // Category -> match count
    pub matches_by_category: BTreeMap<Category, usize>,

    pub categories_searched: Vec<Category>,
}

impl ReportSummary {
    pub fn from_report(report: &SearchReport) -> Self {
        let mut summary = Self {
            total_found: report.total_found,
            searched_streams: report.searched_streams_count,
            categories_searched: report.categories_searched.clone(),
            ..Self::default()
        };

        let mut targets = BTreeSet::new();
        let mut streams = BTreeSet::new();

        for record in &report.matches {
            match record.role {
                Role::Gifter => summary.gifter_matches += 1,
                Role::Viewer => summary.viewer_matches += 1,
            }
            *summary.matches_by_category.entry(record.category).or_insert(0) += 1;
            targets.insert(record.target_account_id.as_str());
            streams.insert(record.stream_link.as_str());
        }

        summary.unique_targets = targets.len();
        summary.unique_streams = streams.len();
        summary
    }

    /// Returns the share of searched streams that held a target, as a percentage
    pub fn hit_rate(&self) -> f64 {
        if self.searched_streams == 0 {
            return 0.0;
        }
        (self.unique_streams as f64 / self.searched_streams as f64) * 100.0
    }
}
