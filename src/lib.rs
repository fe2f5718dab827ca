//! # rangehammer - IPv4 Ban Range Consolidator
//!
//! Collapses lists of IPv4 CIDR ranges (the kind a wiki farm keeps for
//! IP-block and ban lists) into the smallest set of blocks covering exactly
//! the same addresses.
//!
//! ## Features
//!
//! - **Strict Parsing** - Malformed or misaligned ranges are rejected, never guessed at
//! - **Fail-Fast** - One bad entry fails the run and names the offending input
//! - **Deterministic** - Output is sorted and independent of input order
//! - **Safe Writes** - Output replaced atomically, guarded by an advisory lock
//! - **Per-Type Jobs** - Background reloads serialized per job kind
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       rangehammer                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: consolidate, validate, update, init        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml)                                        │
//! │    └── Range sources, output path, job policy               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Loader + Jobs (std threads)                                │
//! │    └── Range list files, one reload job per source          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Consolidator                                               │
//! │    ├── CidrRange: strict parse, alignment check             │
//! │    ├── try_merge: same base, containment, buddy blocks      │
//! │    └── Fixed-point merge passes over sorted ranges          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```
//! use rangehammer::consolidate;
//!
//! let merged = consolidate(["10.0.0.0/25", "10.0.0.128/25", "10.0.1.0/24"]).unwrap();
//! assert_eq!(merged, vec!["10.0.0.0/23"]);
//!
//! let err = consolidate(["10.0.0.0/8", "10.0.0.1/24"]).unwrap_err();
//! assert_eq!(err.index, 1);
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`consolidate`] - Fixed-point consolidation driver
//! - [`error`] - Typed range, consolidation and job errors
//! - [`jobs`] - Per-type job serialization
//! - [`loader`] - Range list files
//! - [`lock`] - File locking for concurrent writers
//! - [`merge`] - Pairwise merge rules
//! - [`range`] - The CIDR range value type
//! - [`utils`] - Formatting helpers

pub mod cli;
pub mod commands;
pub mod config;
pub mod consolidate;
pub mod error;
pub mod jobs;
pub mod loader;
pub mod lock;
pub mod merge;
pub mod range;
pub mod utils;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use consolidate::{
    consolidate, consolidate_ranges, consolidate_with_report, parse_ranges, ConsolidationReport,
};
pub use error::{ConsolidateError, JobError, RangeError};
pub use jobs::{JobHandle, JobManager};
pub use merge::{try_merge, MergeOutcome, MergeRule};
pub use range::CidrRange;
