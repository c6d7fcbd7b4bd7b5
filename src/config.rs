//! Serializable pipeline configuration.
//!
//! Every field has a default, so a config file only needs the values it changes:
//!
//! ```json
//! { "mode": "parallel", "threads": 4, "tokenizer": { "regex": "[a-z]+" }, "top_n": 20 }
//! ```

use crate::error::{Error, Result};
use crate::runner::ExecMode;
use crate::tokenizer::{PunctuationTokenizer, RegexTokenizer, Tokenizer};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Scheduling mode as written in config files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    Sequential,
    #[default]
    Parallel,
}

/// Which tokenizer to use.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerConfig {
    #[default]
    Punctuation,
    Regex(String),
}

impl TokenizerConfig {
    /// Instantiate the configured tokenizer.
    ///
    /// # Errors
    /// Fails if a regex pattern does not compile.
    pub fn build(&self) -> Result<Arc<dyn Tokenizer>> {
        let tokenizer: Arc<dyn Tokenizer> = match self {
            TokenizerConfig::Punctuation => Arc::new(PunctuationTokenizer),
            TokenizerConfig::Regex(pattern) => Arc::new(RegexTokenizer::new(pattern)?),
        };
        Ok(tokenizer)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub mode: ModeKind,
    /// Worker threads; `None` means one per core.
    pub threads: Option<usize>,
    /// Chunks the tokens and groups are split into.
    pub partitions: Option<usize>,
    pub tokenizer: TokenizerConfig,
    /// Only these words are counted (normalized by the tokenizer).
    pub filter: Option<Vec<String>>,
    pub top_n: usize,
    /// Cancel a run that takes longer than this.
    pub timeout_ms: Option<u64>,
    /// Width of the longest bar in the rendered chart.
    pub bar_width: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: ModeKind::Parallel,
            threads: None,
            partitions: None,
            tokenizer: TokenizerConfig::Punctuation,
            filter: None,
            top_n: 10,
            timeout_ms: None,
            bar_width: 40,
        }
    }
}

impl PipelineConfig {
    /// Load a config from a JSON file.
    ///
    /// # Errors
    /// Fails if the file cannot be read or is not a valid config.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the pipeline cannot run with.
    ///
    /// # Errors
    /// Returns [`Error::Config`] describing the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.threads == Some(0) {
            return Err(Error::Config("threads must be at least 1".into()));
        }
        if self.partitions == Some(0) {
            return Err(Error::Config("partitions must be at least 1".into()));
        }
        if self.bar_width == 0 {
            return Err(Error::Config("bar_width must be at least 1".into()));
        }
        Ok(())
    }

    #[must_use]
    pub fn exec_mode(&self) -> ExecMode {
        match self.mode {
            ModeKind::Sequential => ExecMode::Sequential,
            ModeKind::Parallel => ExecMode::Parallel {
                threads: self.threads,
                partitions: self.partitions,
            },
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
