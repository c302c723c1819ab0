//! Property-based tests.
//!
//! Verify the invariants the gateway is built around rather than specific
//! cases. Proptest generates random inputs, shrinks failures, and stores
//! regressions for future runs.
//!
//! - `apply_props`: splicing never panics on arbitrary spans, applies every
//!   valid non-overlapping edit, and leaves untouched text intact
//! - `classify_props`: every classified issue satisfies
//!   `0 <= start <= end <= len(text)` with confidence in 0-100, for any
//!   combination of text and stale remote offsets

mod apply_props;
mod classify_props;
