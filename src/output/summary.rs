//! Console summary of a search
//!
//! Distinguishes a search that finished without finding anyone from one that
//! stopped early, since an empty partial report says nothing about absence.

use crate::model::SearchReport;
use crate::output::traits::ReportSummary;
use crate::AbortReason;

/// Number of individual matches listed before the summary is cut short
const LISTED_MATCHES: usize = 10;

/// Prints a search summary to stdout
///
/// # Arguments
///
/// * `report` - The complete or partial report
/// * `aborted` - Why the search stopped early, if it did
pub fn print_summary(report: &SearchReport, aborted: Option<&AbortReason>) {
    print!("{}", format_summary(report, aborted));
}

/// Formats a search summary as plain text
pub fn format_summary(report: &SearchReport, aborted: Option<&AbortReason>) -> String {
    let summary = ReportSummary::from_report(report);
    let mut out = String::new();

    out.push_str("=== Search Summary ===\n");
    out.push_str(&format!(
        "Started:           {}\n",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    let categories: Vec<&str> = summary
        .categories_searched
        .iter()
        .map(|c| c.name())
        .collect();
    out.push_str(&format!("Categories:        {}\n", categories.join(", ")));
    out.push_str(&format!("Streams searched:  {}\n", summary.searched_streams));
    out.push_str(&format!(
        "Matches:           {} ({} as gifter, {} as viewer)\n",
        summary.total_found, summary.gifter_matches, summary.viewer_matches
    ));
    out.push_str(&format!(
        "Hit rate:          {:.1}% of streams\n",
        summary.hit_rate()
    ));

    if !summary.matches_by_category.is_empty() {
        out.push_str("\nBy category:\n");
        for (category, count) in &summary.matches_by_category {
            out.push_str(&format!("  {:<12} {}\n", category.name(), count));
        }
    }

    if !report.matches.is_empty() {
        out.push_str("\nMatches:\n");
        for record in report.matches.iter().take(LISTED_MATCHES) {
            out.push_str(&format!(
                "  {}. {} ({}) as {} in {}'s stream: {}\n",
                record.ordinal,
                record.target_display_name.as_deref().unwrap_or("-"),
                record.target_account_id,
                record.role,
                record.streamer_name.as_deref().unwrap_or("-"),
                record.stream_link
            ));
        }
        if report.matches.len() > LISTED_MATCHES {
            out.push_str(&format!(
                "  ... and {} more\n",
                report.matches.len() - LISTED_MATCHES
            ));
        }
    }

    out.push('\n');
    match aborted {
        Some(reason) => out.push_str(&format!(
            "Search could not complete ({}); results above are partial.\n",
            reason
        )),
        None if report.is_empty() => {
            out.push_str("No matches: none of the targets were seen in the searched streams.\n")
        }
        None => out.push_str(&format!(
            "Found {} distinct targets in {} streams.\n",
            summary.unique_targets, summary.unique_streams
        )),
    }

    out
}
