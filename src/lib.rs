//! # wordfreq
//!
//! A **concurrent group-count pipeline** for word frequencies. Text is tokenized,
//! mapped to `(token, 1)` pairs on a bounded worker pool, shuffled into per-key
//! groups at a barrier, reduced to totals on the pool again, and returned as a
//! complete [`CountResult`]. A [`top_n`] selector ranks the result for display.
//!
//! ## Key Features
//!
//! - **Two parallel phases, one barrier each** - map and reduce fan out with Rayon;
//!   the shuffle and the final result wait for every work unit
//! - **Lock-free parallel phases** - workers build local maps that are merged at
//!   the barriers
//! - **Pluggable stages** - swap the [`Tokenizer`], [`MapFn`] or [`ReduceFn`]
//! - **Typed errors** - an [`Error`] or a complete result, never a partial one
//! - **Cooperative cancellation** - [`CancelToken`] and per-pipeline timeouts
//! - **Deterministic ranking** - ties broken by token, ascending
//!
//! ## Quick Start
//!
//! ```
//! use wordfreq::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let counts = count_words("the cat sat on the mat the cat ran", None)?;
//! assert_eq!(counts.get("the"), Some(3));
//! assert_eq!(counts.get("cat"), Some(2));
//!
//! let top = top_n(&counts, 2);
//! assert_eq!(top[0], (Token::from("the"), 3));
//! assert_eq!(top[1], (Token::from("cat"), 2));
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuring a Pipeline
//!
//! ```
//! use wordfreq::*;
//! use std::time::Duration;
//!
//! # fn main() -> anyhow::Result<()> {
//! let p = Pipeline::builder()
//!     .parallel(Some(4), Some(16))
//!     .timeout(Duration::from_secs(30))
//!     .build()?;
//!
//! let only_cats = p.filter_from_words(["Cat"]);
//! let counts = p.run("the cat sat on the mat the cat ran", Some(&only_cats))?;
//! assert_eq!(counts.len(), 1);
//! assert_eq!(counts.get("cat"), Some(2));
//! # Ok(())
//! # }
//! ```
//!
//! ## Execution Modes
//!
//! - [`ExecMode::Sequential`] - every work unit on the calling thread
//! - [`ExecMode::Parallel`] - a dedicated pool of `threads` workers, or Rayon's
//!   global pool when `threads` is `None`
//!
//! Both modes produce identical results.
//!
//! ## Module Overview
//!
//! - [`tokenizer`] - text → tokens
//! - [`mapper`] - tokens → pairs, filter sets
//! - [`shuffle`] - pairs → groups
//! - [`reducer`] - groups → totals
//! - [`pipeline`] - the orchestrator and its builder
//! - [`topn`] - ranking
//! - [`config`] - serializable configuration
//! - [`metrics`] - per-run counters and stage timings
//! - [`render`] - text table and bar chart
//! - [`testing`] - assertions and fixtures for tests

pub mod cancel;
pub mod config;
pub mod error;
pub mod mapper;
pub mod metrics;
pub mod pipeline;
pub mod reducer;
pub mod render;
pub mod result;
pub mod runner;
pub mod shuffle;
pub mod testing;
pub mod token;
pub mod tokenizer;
pub mod topn;

pub use cancel::CancelToken;
pub use config::{ModeKind, PipelineConfig, TokenizerConfig};
pub use error::{Error, Result, Stage};
pub use mapper::{MapFn, TokenFilter, UnitMapper, filter_from_words, map};
pub use metrics::MetricsCollector;
pub use pipeline::{Pipeline, PipelineBuilder, count_words};
pub use reducer::{ReduceFn, SumReducer, reduce, reduce_all};
pub use render::BarChart;
pub use result::CountResult;
pub use runner::{ExecMode, default_partitions};
pub use shuffle::{Groups, group_local, merge_groups, shuffle};
pub use token::{Group, Pair, Token};
pub use tokenizer::{PunctuationTokenizer, RegexTokenizer, Tokenizer};
pub use topn::top_n;

/// Tokenize `text` with the default [`PunctuationTokenizer`].
///
/// # Errors
/// Never fails for the default tokenizer; the signature matches [`Tokenizer`].
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    PunctuationTokenizer.tokenize(text)
}
