//! CLI command implementations.

pub mod consolidate;
pub mod init;
pub mod update;
pub mod validate;

use anyhow::{Context, Result};
use std::io::{self, Read};
use std::path::PathBuf;

use crate::loader::{load_range_file, parse_entries, parse_range_list};
use crate::range::CidrRange;

/// Read and parse every input list in order; `-` means stdin.
pub(crate) fn read_inputs(inputs: &[PathBuf]) -> Result<Vec<CidrRange>> {
    let mut ranges = Vec::new();
    for input in inputs {
        if input.as_os_str() == "-" {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read ranges from stdin")?;
            ranges.extend(parse_entries(&parse_range_list(&content), "<stdin>")?);
        } else {
            ranges.extend(load_range_file(input)?);
        }
    }
    Ok(ranges)
}
