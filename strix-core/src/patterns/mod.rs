//! Pattern storage and compilation.
//!
//! `registry` holds the process-wide active patterns and the `PatternSource`
//! seam validators read through. `compiler` turns pattern text into compiled
//! `fancy_regex` programs and caches them by pattern text, so a replaced
//! pattern takes effect on the next call without any invalidation step.

pub mod compiler;
pub mod registry;
