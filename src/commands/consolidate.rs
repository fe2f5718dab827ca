//! Consolidate command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::commands::read_inputs;
use crate::consolidate::{consolidate_with_report, ConsolidationReport};
use crate::loader::write_range_file;
use crate::lock::LockGuard;
use crate::utils::{format_count, format_reduction};

/// JSON document printed with `--json`
#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    ranges: &'a [String],
    report: &'a ConsolidationReport,
}

/// Run the consolidate command
pub fn run(inputs: &[PathBuf], output: Option<&Path>, json: bool) -> Result<()> {
    let ranges = read_inputs(inputs).context("Refusing to consolidate")?;

    let (merged, report) = consolidate_with_report(ranges);
    let lines: Vec<String> = merged.iter().map(ToString::to_string).collect();

    if let Some(path) = output {
        let _lock = LockGuard::acquire(path)?;
        write_range_file(path, &lines)?;
        info!("Wrote {} ranges to {:?}", lines.len(), path);
    }

    if json {
        let doc = JsonOutput {
            ranges: &lines,
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else if output.is_none() {
        for line in &lines {
            println!("{}", line);
        }
    }

    info!(
        "Consolidated {} ranges, {} addresses covered",
        format_reduction(report.input_count, report.output_count),
        format_count(report.addresses)
    );

    Ok(())
}
