//! Reading and writing range list files.
//!
//! A range list is plain text with one entry per line. Blank lines and `#`
//! comments are skipped. Entries are handed to the parser as written (apart
//! from trimming), so a malformed line fails the whole load instead of
//! quietly disappearing, and the error points at the file and line.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::net::Ipv4Addr;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::range::CidrRange;

/// One non-comment line of a range list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeEntry {
    /// 1-based line number in the source text.
    pub line: usize,
    pub text: String,
}

/// Split range list content into entries.
///
/// A bare address without a prefix length is read as a single host (`/32`).
/// Anything else is kept verbatim.
pub fn parse_range_list(content: &str) -> Vec<RangeEntry> {
    content
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let entry = line.split('#').next().unwrap_or_default().trim();
            if entry.is_empty() {
                return None;
            }
            let text = if entry.parse::<Ipv4Addr>().is_ok() {
                format!("{}/32", entry)
            } else {
                entry.to_string()
            };
            Some(RangeEntry { line: i + 1, text })
        })
        .collect()
}

/// Parse entries, stopping at the first bad one. `origin` names the list in
/// the error (`bans.txt:4`).
pub fn parse_entries(entries: &[RangeEntry], origin: &str) -> Result<Vec<CidrRange>> {
    entries
        .iter()
        .map(|entry| {
            entry
                .text
                .parse::<CidrRange>()
                .with_context(|| format!("{}:{}: rejected '{}'", origin, entry.line, entry.text))
        })
        .collect()
}

/// Read one range list file.
pub fn read_range_file<P: AsRef<Path>>(path: P) -> Result<Vec<RangeEntry>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read range list: {:?}", path))?;
    let entries = parse_range_list(&content);
    debug!("Read {} entries from {:?}", entries.len(), path);
    Ok(entries)
}

/// Read and parse one range list file.
pub fn load_range_file<P: AsRef<Path>>(path: P) -> Result<Vec<CidrRange>> {
    let path = path.as_ref();
    let entries = read_range_file(path)?;
    parse_entries(&entries, &path.display().to_string())
}

/// Write ranges one per line, atomically.
///
/// Uses tempfile + rename so readers never see a half-written list.
pub fn write_range_file<P: AsRef<Path>, S: AsRef<str>>(path: P, ranges: &[S]) -> Result<()> {
    let path = path.as_ref();
    let parent_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", parent_dir))?;
    for range in ranges {
        writeln!(temp_file, "{}", range.as_ref())?;
    }
    temp_file.as_file().sync_all()?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist range list: {:?}", path))?;

    Ok(())
}
