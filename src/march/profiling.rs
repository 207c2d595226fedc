//! Performance profiling utilities
//!
//! Timing code is only compiled when the `perf_stats` feature is enabled.

// Re-export the profile macro
pub use march_macros::profile;
