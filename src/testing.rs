//! Testing utilities for word-count pipelines.
//!
//! - **Assertions**: compare a [`CountResult`](crate::CountResult) against expected
//!   counts and check rankings.
//! - **Fixtures**: small texts with known counts, and a deterministic large-text
//!   generator for parallel/sequential comparisons.
//!
//! # Quick Start
//!
//! ```
//! use wordfreq::count_words;
//! use wordfreq::testing::*;
//!
//! let counts = count_words(CAT_TEXT, None).unwrap();
//! assert_counts_equal(&counts, &[("the", 3), ("cat", 2), ("sat", 1), ("on", 1), ("mat", 1), ("ran", 1)]);
//! assert_ranked_descending(&counts.top_n(3));
//! ```

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
