//! Pairwise merge operator for CIDR ranges.
//!
//! Two ranges merge into one when the result covers exactly their union:
//! they share a base (the larger wins), one contains the other, or they are
//! same-size neighbours whose parent block is aligned. Anything else leaves
//! both ranges as they are, which is an ordinary outcome rather than an error.

use crate::range::CidrRange;

/// Which relationship allowed two ranges to merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRule {
    /// Both ranges start at the same address; the shorter prefix wins.
    SameBase,
    /// The lower range covers the upper one entirely.
    Contains,
    /// Same-size, address-contiguous halves of an aligned parent block.
    Buddy,
}

/// Result of [`try_merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Merged { range: CidrRange, rule: MergeRule },
    /// No merge relationship; both ranges stay separate entries.
    Separate,
}

impl MergeOutcome {
    pub fn merged(self) -> Option<CidrRange> {
        match self {
            Self::Merged { range, .. } => Some(range),
            Self::Separate => None,
        }
    }

    pub fn is_merged(&self) -> bool {
        matches!(self, Self::Merged { .. })
    }
}

/// Try to combine two ranges into a single range covering both.
///
/// Arguments are ordered by base address first. The consolidation driver
/// always passes them in ascending order, so the swap never fires there.
pub fn try_merge(a: CidrRange, b: CidrRange) -> MergeOutcome {
    let (a, b) = if a.base() > b.base() { (b, a) } else { (a, b) };

    if a.base() == b.base() {
        let range = if a.prefix_len() <= b.prefix_len() { a } else { b };
        return MergeOutcome::Merged {
            range,
            rule: MergeRule::SameBase,
        };
    }

    if a.next_base() >= b.next_base() {
        return MergeOutcome::Merged {
            range: a,
            rule: MergeRule::Contains,
        };
    }

    if a.next_base() == u64::from(b.base()) && a.prefix_len() == b.prefix_len() {
        // 10.0.1.0/24 and 10.0.2.0/24 touch, but 10.0.1.0/23 is not a network.
        if let Some(parent) = a.parent() {
            return MergeOutcome::Merged {
                range: parent,
                rule: MergeRule::Buddy,
            };
        }
    }

    MergeOutcome::Separate
}
