//! CIDR consolidation for ban lists.
//!
//! Reduces a list of ranges to the minimal set of non-overlapping blocks that
//! covers the same addresses. For example:
//! [10.0.0.0/26, 10.0.0.64/26, 10.0.0.128/25] -> [10.0.0.0/24]

use serde::Serialize;
use tracing::debug;

use crate::error::ConsolidateError;
use crate::merge::try_merge;
use crate::range::CidrRange;

/// Summary of one consolidation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsolidationReport {
    pub input_count: usize,
    pub output_count: usize,
    /// Full passes over the working list, including the final no-op pass.
    pub passes: usize,
    pub merges: usize,
    /// Addresses covered by the result.
    pub addresses: u64,
}

/// Consolidate CIDR strings into the minimal covering set, in ascending order.
///
/// Fails on the first entry that is not an aligned `A.B.C.D/N` range; nothing
/// is returned in that case, since dropping it would shrink the coverage.
pub fn consolidate<I, S>(ranges: I) -> Result<Vec<String>, ConsolidateError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parsed = parse_ranges(ranges)?;
    Ok(consolidate_ranges(parsed)
        .iter()
        .map(CidrRange::to_string)
        .collect())
}

/// Parse every entry, stopping at the first failure.
pub fn parse_ranges<I, S>(ranges: I) -> Result<Vec<CidrRange>, ConsolidateError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ranges
        .into_iter()
        .enumerate()
        .map(|(index, s)| {
            s.as_ref()
                .parse()
                .map_err(|source| ConsolidateError { index, source })
        })
        .collect()
}

/// Consolidate already-parsed ranges.
pub fn consolidate_ranges(ranges: Vec<CidrRange>) -> Vec<CidrRange> {
    consolidate_with_report(ranges).0
}

/// Consolidate already-parsed ranges and report what happened.
///
/// Ranges are stable-sorted by base address, then merged in repeated passes
/// until a pass performs no merge at all.
pub fn consolidate_with_report(mut ranges: Vec<CidrRange>) -> (Vec<CidrRange>, ConsolidationReport) {
    let input_count = ranges.len();
    ranges.sort_by_key(|r| r.base());

    let mut passes = 0;
    let mut total_merges = 0;
    loop {
        passes += 1;
        let (merged, merges) = merge_pass(ranges);
        ranges = merged;
        total_merges += merges;
        debug!(
            "Pass {}: {} merges, {} ranges left",
            passes,
            merges,
            ranges.len()
        );
        if merges == 0 {
            break;
        }
    }

    let report = ConsolidationReport {
        input_count,
        output_count: ranges.len(),
        passes,
        merges: total_merges,
        addresses: count_addresses(&ranges),
    };
    (ranges, report)
}

/// One left-to-right sweep. Returns the new list and how many merges happened.
fn merge_pass(ranges: Vec<CidrRange>) -> (Vec<CidrRange>, usize) {
    let mut acc: Vec<CidrRange> = Vec::with_capacity(ranges.len());
    let mut merges = 0;

    for range in ranges {
        let merged = acc
            .last()
            .and_then(|last| try_merge(*last, range).merged());

        match merged {
            Some(merged) => {
                acc.pop();
                acc.push(merged);
                merges += 1 + cascade(&mut acc);
            }
            None => acc.push(range),
        }
    }

    (acc, merges)
}

/// Merge the top two accumulator entries while they keep merging.
fn cascade(acc: &mut Vec<CidrRange>) -> usize {
    let mut merges = 0;

    while let Some(upper) = acc.pop() {
        let Some(lower) = acc.last_mut() else {
            acc.push(upper);
            break;
        };
        match try_merge(*lower, upper).merged() {
            Some(merged) => {
                *lower = merged;
                merges += 1;
            }
            None => {
                acc.push(upper);
                break;
            }
        }
    }

    merges
}

/// Total number of addresses covered by a list of ranges.
///
/// Overlapping ranges are counted twice; consolidate first for an exact figure.
/// Saturates rather than overflowing on pathological input.
pub fn count_addresses(ranges: &[CidrRange]) -> u64 {
    ranges
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.block_size()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_containment() {
        let out = consolidate(["10.0.0.0/24", "10.0.0.0/8"]).unwrap();
        assert_eq!(out, strings(&["10.0.0.0/8"]));
    }

    #[test]
    fn test_buddy_merge() {
        let out = consolidate(["192.168.0.0/25", "192.168.0.128/25"]).unwrap();
        assert_eq!(out, strings(&["192.168.0.0/24"]));
    }

    #[test]
    fn test_cascading_merge() {
        let out = consolidate(["10.0.0.0/26", "10.0.0.64/26", "10.0.0.128/25"]).unwrap();
        assert_eq!(out, strings(&["10.0.0.0/24"]));
    }

    #[test]
    fn test_disjoint_unchanged() {
        let out = consolidate(["10.0.2.0/24", "10.0.0.0/24"]).unwrap();
        assert_eq!(out, strings(&["10.0.0.0/24", "10.0.2.0/24"]));
    }

    #[test]
    fn test_misaligned_neighbours_unchanged() {
        let out = consolidate(["10.0.1.0/24", "10.0.2.0/24"]).unwrap();
        assert_eq!(out, strings(&["10.0.1.0/24", "10.0.2.0/24"]));
    }

    #[test]
    fn test_alignment_failure_aborts() {
        let err = consolidate(["10.0.0.1/24"]).unwrap_err();
        assert_eq!(err.index, 0);
        assert!(err.source.is_alignment());
        assert_eq!(err.input(), "10.0.0.1/24");
    }

    #[test]
    fn test_first_bad_entry_is_reported() {
        let err = consolidate(["10.0.0.0/8", "bogus", "10.0.0.1/24"]).unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.input(), "bogus");
        assert!(!err.source.is_alignment());
    }

    #[test]
    fn test_empty_input() {
        let out = consolidate(Vec::<String>::new()).unwrap();
        assert!(out.is_empty());

        let (ranges, report) = consolidate_with_report(Vec::new());
        assert!(ranges.is_empty());
        assert_eq!(report.passes, 1);
        assert_eq!(report.merges, 0);
    }

    #[test]
    fn test_duplicates_collapse() {
        let out = consolidate(["8.8.8.8/32", "8.8.8.8/32", "8.8.8.8/32"]).unwrap();
        assert_eq!(out, strings(&["8.8.8.8/32"]));
    }

    #[test]
    fn test_long_buddy_chain() {
        // 256 consecutive /32s collapse into a single /24
        let input: Vec<String> = (0..256).rev().map(|i| format!("10.1.2.{}/32", i)).collect();
        let (ranges, report) = consolidate_with_report(parse_ranges(&input).unwrap());
        assert_eq!(ranges, vec!["10.1.2.0/24".parse().unwrap()]);
        assert_eq!(report.input_count, 256);
        assert_eq!(report.output_count, 1);
        assert_eq!(report.merges, 255);
        assert_eq!(report.addresses, 256);
    }

    #[test]
    fn test_cascade_across_earlier_merge() {
        let out = consolidate([
            "10.0.0.0/25",
            "10.0.0.128/26",
            "10.0.0.192/27",
            "10.0.0.224/28",
            "10.0.0.240/29",
            "10.0.0.248/30",
            "10.0.0.252/31",
            "10.0.0.254/32",
            "10.0.0.255/32",
        ])
        .unwrap();
        assert_eq!(out, strings(&["10.0.0.0/24"]));
    }

    #[test]
    fn test_mixed_containment_and_buddies() {
        let out = consolidate([
            "10.0.0.0/8",
            "10.1.0.0/16",
            "11.0.0.0/8",
            "12.0.0.0/8",
            "12.0.0.0/24",
            "192.168.1.0/24",
            "192.168.0.0/24",
            "192.168.3.0/24",
        ])
        .unwrap();
        assert_eq!(
            out,
            strings(&["10.0.0.0/7", "12.0.0.0/8", "192.168.0.0/23", "192.168.3.0/24"])
        );
    }

    #[test]
    fn test_whole_address_space() {
        let out = consolidate(["128.0.0.0/1", "0.0.0.0/1", "10.0.0.0/8"]).unwrap();
        assert_eq!(out, strings(&["0.0.0.0/0"]));
    }

    #[test]
    fn test_count_addresses() {
        let ranges = parse_ranges(["192.168.0.0/24", "10.0.0.0/8"]).unwrap();
        assert_eq!(count_addresses(&ranges), 256 + 16_777_216);

        let all = parse_ranges(["0.0.0.0/0"]).unwrap();
        assert_eq!(count_addresses(&all), 1u64 << 32);
    }

    #[test]
    fn test_report_counts() {
        let ranges =
            parse_ranges(["10.0.0.0/26", "10.0.0.64/26", "10.0.0.128/25", "10.0.5.0/24"]).unwrap();
        let (_, report) = consolidate_with_report(ranges);
        assert_eq!(
            report,
            ConsolidationReport {
                input_count: 4,
                output_count: 2,
                passes: 2,
                merges: 2,
                addresses: 512,
            }
        );
    }
}
