//! JSON report files
//!
//! Each report is written as indented JSON into the results directory, named
//! after the minute the search started in local time, e.g.
//! `search_results_01.05.2024_14.30.json`.

use crate::model::SearchReport;
use crate::output::traits::{OutputError, OutputResult, ReportSink};
use chrono::{DateTime, Local, Utc};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Writes reports as JSON files into a directory
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the path a report started at `started_at` is written to
    pub fn path_for(&self, started_at: DateTime<Utc>) -> PathBuf {
        self.dir.join(report_file_name(started_at))
    }
}

impl ReportSink for JsonFileSink {
    fn write_report(&self, report: &SearchReport) -> OutputResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(report.started_at);
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, report)?;
        writer.write_all(b"\n")?;
        writer
            .flush()
            .map_err(|e| OutputError::Write(format!("{}: {}", path.display(), e)))?;

        tracing::info!(
            "Saved {} matches to {}",
            report.total_found,
            path.display()
        );
        Ok(path)
    }
}

fn report_file_name(started_at: DateTime<Utc>) -> String {
    format!(
        "search_results_{}.json",
        started_at.with_timezone(&Local).format("%d.%m.%Y_%H.%M")
    )
}
