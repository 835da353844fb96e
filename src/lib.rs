//! # jvm-finder
//!
//! Locates installed JVMs, caches their metadata, and selects the best
//! match for version, vendor, and tooling constraints.
//!
//! ## Architecture
//!
//! - **cli**: command-line flags and validation
//! - **config**: configuration file loading, merging, and defaults
//! - **paths**: environment-variable and home expansion of lookup paths
//! - **scan**: discovery of `java` launchers under the lookup paths
//! - **extract**: subprocess-based system property extraction
//! - **jvm**: the JVM record and its derived metadata fields
//! - **cache**: persistent metadata registry with staleness tracking and
//!   eviction
//! - **rules**: hard and preferred selection constraints
//! - **select**: two-tier filtering and deterministic ranking
//! - **version**: specification version parsing and ranges
//! - **log**: leveled logging with an injected writer

pub mod cache;
pub mod cli;
pub mod config;
pub mod extract;
pub mod jvm;
pub mod log;
pub mod paths;
pub mod rules;
pub mod scan;
pub mod select;
pub mod version;
