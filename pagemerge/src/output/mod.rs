//! User-facing output for pagemerge.
//!
//! Status messages, merge summaries and dry-run plans. Diagnostics for
//! developers go through `tracing` instead.
//!
//! # Examples
//!
//! ```no_run
//! use pagemerge::output::OutputFormatter;
//! use pagemerge::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Starting merge operation");
//! formatter.success("Merge completed successfully");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter, Target};

use crate::io::{SaveOutput, format_file_size};
use crate::merge::{MergePlan, MergeStatistics};
use std::fmt::Write;

/// Render a merge plan as human-readable text.
pub fn format_plan(plan: &MergePlan) -> String {
    let mut text = String::new();

    let _ = writeln!(text, "Merge plan ({} source(s))", plan.sources.len());
    for (index, source) in plan.sources.iter().enumerate() {
        let orientation = source
            .orientation
            .map(|orientation| orientation.to_string())
            .unwrap_or_else(|| "auto".to_string());
        let _ = writeln!(
            text,
            "  {}. {} ({} of {} page(s), {}) -> output page {}",
            index + 1,
            source.path.display(),
            source.pages.len(),
            source.page_count,
            orientation,
            source.first_output_page
        );
        let _ = writeln!(text, "     pages: {}", join_pages(&source.pages));
        if source.blank_pages_after > 0 {
            let _ = writeln!(text, "     + {} blank page", source.blank_pages_after);
        }
    }

    let _ = write!(
        text,
        "Total: {} page(s) ({} imported, {} blank){}",
        plan.total_pages,
        plan.imported_pages,
        plan.blank_pages,
        if plan.duplex { ", duplex" } else { "" }
    );
    text
}

fn join_pages(pages: &[u32]) -> String {
    pages
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Display a dry-run plan, as text or JSON.
pub fn display_plan(
    formatter: &OutputFormatter,
    plan: &MergePlan,
    json: bool,
) -> crate::Result<()> {
    if json {
        formatter.raw(&plan.to_json()?);
    } else {
        formatter.raw(&format_plan(plan));
    }
    Ok(())
}

/// Display merge statistics to the user.
pub fn display_merge_statistics(formatter: &OutputFormatter, stats: &MergeStatistics) {
    formatter.info(&format!(
        "Merged {} file(s) in {:.2}s: {} page(s)",
        stats.files_merged,
        stats.merge_time.as_secs_f64(),
        stats.total_pages
    ));

    if stats.blank_pages_added > 0 {
        formatter.detail(
            "Blank pages",
            &format!("{} (duplex padding)", stats.blank_pages_added),
        );
    }
    formatter.detail("Imported pages", &stats.pages_imported.to_string());
}

/// Describe where the merged document went.
pub fn describe_save_output(output: &SaveOutput) -> String {
    match output {
        SaveOutput::Bytes(bytes) => {
            format!("Rendered {} in memory", format_file_size(bytes.len() as u64))
        }
        SaveOutput::Written { path, size } => {
            format!("Wrote {} ({})", path.display(), format_file_size(*size))
        }
        SaveOutput::Streamed { disposition, size } => {
            format!("Streamed {} ({disposition})", format_file_size(*size))
        }
    }
}
