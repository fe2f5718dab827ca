//! Validate command implementation.

use anyhow::Result;
use std::path::PathBuf;
use tracing::{error, info};

use crate::commands::read_inputs;

/// Run the validate command
///
/// Every input is checked, so one run reports all broken files. A file that
/// cannot be read counts as broken.
pub fn run(inputs: &[PathBuf]) -> Result<()> {
    let mut failures = 0;

    for input in inputs {
        match read_inputs(std::slice::from_ref(input)) {
            Ok(ranges) => info!("{:?}: {} valid ranges", input, ranges.len()),
            Err(e) => {
                error!("{:?}: {:#}", input, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} range lists are invalid", failures, inputs.len());
    }

    Ok(())
}
