pub mod march;

// ============================================================================
// Profiling Macros
// ============================================================================

/// Log a message every 60 frames when the `perf_stats` feature is enabled.
///
/// With the feature disabled this expands to an empty block and the arguments
/// are never evaluated.
///
/// # Example
/// ```ignore
/// profile_log!(frame, "Frame {} had {} hits", frame.0, fb.hit_count());
/// ```
#[macro_export]
#[cfg(feature = "perf_stats")]
macro_rules! profile_log {
    ($frame:expr, $($arg:tt)*) => {
        if $frame.0 % 60 == 0 {
            bevy::prelude::info!($($arg)*);
        }
    };
}

#[macro_export]
#[cfg(not(feature = "perf_stats"))]
macro_rules! profile_log {
    ($frame:expr, $($arg:tt)*) => {};
}
