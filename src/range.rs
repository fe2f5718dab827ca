//! IPv4 CIDR range value type.
//!
//! A [`CidrRange`] is a `(base, prefix_len)` pair whose base address is aligned
//! to its own block size. Ranges are parsed from and formatted to the usual
//! `A.B.C.D/N` notation, and the two conversions are exact inverses.

use ipnet::Ipv4Net;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::RangeError;

/// Longest IPv4 prefix.
pub const MAX_PREFIX_LEN: u8 = 32;

/// One aligned IPv4 network block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CidrRange {
    base: u32,
    prefix_len: u8,
}

impl CidrRange {
    /// Build a range from its numeric parts, rejecting prefixes above /32 and
    /// bases with host bits set.
    pub fn new(base: u32, prefix_len: u8) -> Result<Self, RangeError> {
        let range = Self { base, prefix_len };
        range.check(|| format!("{}/{}", Ipv4Addr::from(base), prefix_len))?;
        Ok(range)
    }

    fn check(&self, input: impl FnOnce() -> String) -> Result<(), RangeError> {
        if self.prefix_len > MAX_PREFIX_LEN {
            return Err(RangeError::format(
                input(),
                format!("prefix length {} exceeds /32", self.prefix_len),
            ));
        }
        if u64::from(self.base) % self.block_size() != 0 {
            return Err(RangeError::Alignment {
                input: input(),
                prefix_len: self.prefix_len,
            });
        }
        Ok(())
    }

    /// Network address as a 32-bit integer (the sort key).
    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.base)
    }

    /// Number of addresses in the block: `2^(32 - prefix_len)`.
    ///
    /// Returned as `u64` because a /0 spans 2^32 addresses.
    pub fn block_size(&self) -> u64 {
        1u64 << (MAX_PREFIX_LEN - self.prefix_len)
    }

    /// Exclusive upper bound of the block.
    pub fn next_base(&self) -> u64 {
        u64::from(self.base) + self.block_size()
    }

    /// Last address covered by the block.
    pub fn broadcast(&self) -> Ipv4Addr {
        // next_base >= 1, and next_base - 1 always fits in 32 bits.
        Ipv4Addr::from((self.next_base() - 1) as u32)
    }

    /// The enclosing block one bit shorter, if that block is aligned.
    ///
    /// `None` for /0, and for blocks that are the upper half of their
    /// would-be parent.
    pub fn parent(&self) -> Option<Self> {
        let prefix_len = self.prefix_len.checked_sub(1)?;
        let parent = Self {
            base: self.base,
            prefix_len,
        };
        (u64::from(parent.base) % parent.block_size() == 0).then_some(parent)
    }

    /// Whether `other` lies entirely within this block.
    pub fn contains(&self, other: &CidrRange) -> bool {
        self.base <= other.base && self.next_base() >= other.next_base()
    }

    pub fn contains_addr(&self, addr: Ipv4Addr) -> bool {
        let addr = u64::from(u32::from(addr));
        u64::from(self.base) <= addr && addr < self.next_base()
    }

    pub fn overlaps(&self, other: &CidrRange) -> bool {
        u64::from(self.base) < other.next_base() && u64::from(other.base) < self.next_base()
    }
}

impl FromStr for CidrRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parts: Vec<&str> = trimmed.split('/').collect();
        if parts.len() != 2 {
            return Err(RangeError::format(s, "expected exactly one '/'"));
        }

        let base = parse_address(parts[0]).map_err(|reason| RangeError::format(s, reason))?;
        let prefix_len = parse_decimal(parts[1])
            .filter(|len| *len <= MAX_PREFIX_LEN)
            .ok_or_else(|| {
                RangeError::format(
                    s,
                    format!("prefix length '{}' is not an integer in 0..=32", parts[1]),
                )
            })?;

        let range = Self { base, prefix_len };
        range.check(|| s.to_string())?;
        Ok(range)
    }
}

/// Parse a dotted quad into its 32-bit form.
fn parse_address(addr: &str) -> Result<u32, String> {
    let octets: Vec<&str> = addr.split('.').collect();
    if octets.len() != 4 {
        return Err(format!("address '{}' does not have four octets", addr));
    }

    octets.iter().try_fold(0u32, |acc, octet| {
        parse_decimal(octet)
            .map(|value| (acc << 8) | u32::from(value))
            .ok_or_else(|| format!("octet '{}' is not an integer in 0..=255", octet))
    })
}

/// Plain decimal digits only: no sign, no whitespace, no empty string.
fn parse_decimal(s: &str) -> Option<u8> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for CidrRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix_len)
    }
}

impl Serialize for CidrRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CidrRange {
    fn deserialize<D>(deserializer: D) -> Result<CidrRange, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

impl From<CidrRange> for Ipv4Net {
    fn from(range: CidrRange) -> Self {
        Ipv4Net::new(range.network(), range.prefix_len)
            .unwrap_or_else(|_| unreachable!("prefix length validated on construction"))
    }
}

impl TryFrom<Ipv4Net> for CidrRange {
    type Error = RangeError;

    /// Fails when the network carries host bits (`10.0.0.1/24`).
    fn try_from(net: Ipv4Net) -> Result<Self, Self::Error> {
        Self::new(u32::from(net.addr()), net.prefix_len())
    }
}
