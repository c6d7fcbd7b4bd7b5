//! The pipeline orchestrator: tokenize → map → shuffle → reduce.
//!
//! Map and reduce fan out over the worker pool; each is followed by a full
//! barrier. The shuffle runs only once every map work unit has finished, and
//! the result is returned only once every reduce work unit has finished.

use crate::cancel::CancelToken;
use crate::config::PipelineConfig;
use crate::error::{Error, Result, Stage};
use crate::mapper::{
    MapFn, MappedPartition, TokenFilter, UnitMapper, filter_from_words, map_partition,
};
use crate::metrics::{MetricsCollector, names};
use crate::reducer::{ReduceFn, SumReducer, merge_counts, reduce_partition};
use crate::result::CountResult;
use crate::runner::{ExecMode, WorkerPool};
use crate::shuffle::{Groups, group_local, merge_groups, value_count};
use crate::token::Group;
use crate::tokenizer::{PunctuationTokenizer, Tokenizer};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// A configured group-count pipeline.
///
/// A `Pipeline` holds no per-run state: every call to [`run`](Self::run) builds
/// its intermediate structures from scratch, and one pipeline may be shared
/// across threads. An attached [`MetricsCollector`] is the exception: it holds
/// the numbers of whichever run wrote last.
#[derive(Clone)]
pub struct Pipeline {
    tokenizer: Arc<dyn Tokenizer>,
    mapper: Arc<dyn MapFn>,
    reducer: Arc<dyn ReduceFn>,
    pool: WorkerPool,
    timeout: Option<Duration>,
    metrics: Option<MetricsCollector>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            tokenizer: Arc::new(PunctuationTokenizer),
            mapper: Arc::new(UnitMapper),
            reducer: Arc::new(SumReducer),
            pool: WorkerPool::global(),
            timeout: None,
            metrics: None,
        }
    }
}

impl Pipeline {
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Build a pipeline from a [`PipelineConfig`].
    ///
    /// # Errors
    /// Fails on invalid config values, a bad token pattern, or if the worker pool
    /// cannot be created.
    pub fn from_config(cfg: &PipelineConfig) -> Result<Self> {
        cfg.validate()?;
        let mut b = Pipeline::builder()
            .mode(cfg.exec_mode())
            .tokenizer_arc(cfg.tokenizer.build()?);
        if let Some(t) = cfg.timeout() {
            b = b.timeout(t);
        }
        b.build()
    }

    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }

    #[must_use]
    pub fn mode(&self) -> ExecMode {
        self.pool.mode()
    }

    pub fn metrics(&self) -> Option<&MetricsCollector> {
        self.metrics.as_ref()
    }

    /// Normalize `words` with this pipeline's tokenizer into a filter set.
    pub fn filter_from_words<I, S>(&self, words: I) -> TokenFilter
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        filter_from_words(self.tokenizer.as_ref(), words)
    }

    /// Count tokens in `text`, optionally restricted to `filter`.
    ///
    /// # Errors
    /// - [`Error::Input`] if the text is empty or yields no tokens.
    /// - [`Error::Pipeline`] if a map or reduce work unit panics.
    /// - [`Error::Cancelled`] if the configured timeout elapses.
    pub fn run(&self, text: &str, filter: Option<&TokenFilter>) -> Result<CountResult> {
        self.run_with_cancel(text, filter, &CancelToken::new())
    }

    /// Like [`run`](Self::run), but aborts once `cancel` trips.
    ///
    /// # Errors
    /// As [`run`](Self::run); cancellation yields [`Error::Cancelled`].
    pub fn run_with_cancel(
        &self,
        text: &str,
        filter: Option<&TokenFilter>,
        cancel: &CancelToken,
    ) -> Result<CountResult> {
        let cancel = match self.timeout {
            Some(t) => cancel.and_timeout(t),
            None => cancel.clone(),
        };
        if let Some(m) = &self.metrics {
            m.record_start();
        }
        let out = self.execute(text, filter, &cancel);
        if let Some(m) = &self.metrics {
            m.record_end();
        }
        out
    }

    fn execute(
        &self,
        text: &str,
        filter: Option<&TokenFilter>,
        cancel: &CancelToken,
    ) -> Result<CountResult> {
        if text.trim().is_empty() {
            return Err(Error::input("input text is empty"));
        }
        let started = Instant::now();
        let tokens = self.tokenizer.tokenize(text)?;
        if tokens.is_empty() {
            return Err(Error::input("input text contains no tokens"));
        }
        self.record_stage(Stage::Tokenize, started);
        info!(tokens = tokens.len(), "starting map/reduce");

        // Map: fan out, then barrier.
        cancel.check(Stage::Map)?;
        let started = Instant::now();
        let mapped: Vec<MappedPartition> = self
            .pool
            .map_chunks(&tokens, |chunk| {
                map_partition(chunk, filter, self.mapper.as_ref(), cancel)
            })
            .into_iter()
            .collect::<Result<Vec<_>>>()?;
        let map_partitions = mapped.len();
        let dropped: usize = mapped.iter().map(|m| m.dropped).sum();
        let pair_count: usize = mapped.iter().map(|m| m.pairs.len()).sum();
        self.record_stage(Stage::Map, started);
        debug!(
            partitions = map_partitions,
            pairs = pair_count,
            filtered_out = dropped,
            "map stage complete"
        );

        // Shuffle: merge per-partition groupings.
        cancel.check(Stage::Shuffle)?;
        let started = Instant::now();
        let groups: Groups = merge_groups(mapped.into_iter().map(|m| group_local(m.pairs)));
        if value_count(&groups) != pair_count {
            return Err(Error::Pipeline {
                stage: Stage::Shuffle,
                key: String::new(),
                message: "shuffle lost or duplicated pairs".into(),
            });
        }
        self.record_stage(Stage::Shuffle, started);
        debug!(keys = groups.len(), "shuffle stage complete");

        // Reduce: fan out over keys, then barrier.
        cancel.check(Stage::Reduce)?;
        let started = Instant::now();
        let groups: Vec<Group> = groups.into_values().collect();
        let locals = self
            .pool
            .map_chunks(&groups, |chunk| {
                reduce_partition(chunk, self.reducer.as_ref(), cancel)
            })
            .into_iter()
            .collect::<Result<Vec<_>>>()?;
        let reduce_partitions = locals.len();
        let result = merge_counts(locals)?;
        if result.len() != groups.len() {
            return Err(Error::Pipeline {
                stage: Stage::Reduce,
                key: String::new(),
                message: "reduce dropped keys".into(),
            });
        }
        self.record_stage(Stage::Reduce, started);
        trace!(partitions = reduce_partitions, "reduce stage complete");
        info!(
            distinct = result.len(),
            total = result.total(),
            "map/reduce finished"
        );

        if let Some(m) = &self.metrics {
            m.set_counter(names::TOKENS, tokens.len() as u64);
            m.set_counter(names::FILTERED_OUT, dropped as u64);
            m.set_counter(names::PAIRS, pair_count as u64);
            m.set_counter(names::DISTINCT_KEYS, result.len() as u64);
            m.set_counter(names::MAP_PARTITIONS, map_partitions as u64);
            m.set_counter(names::REDUCE_PARTITIONS, reduce_partitions as u64);
        }
        Ok(result)
    }

    fn record_stage(&self, stage: Stage, started: Instant) {
        if let Some(m) = &self.metrics {
            m.record_stage(&stage.to_string(), started.elapsed());
        }
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    tokenizer: Option<Arc<dyn Tokenizer>>,
    mapper: Option<Arc<dyn MapFn>>,
    reducer: Option<Arc<dyn ReduceFn>>,
    mode: ExecMode,
    timeout: Option<Duration>,
    metrics: Option<MetricsCollector>,
}

impl PipelineBuilder {
    #[must_use]
    pub fn tokenizer<T: Tokenizer + 'static>(self, tokenizer: T) -> Self {
        self.tokenizer_arc(Arc::new(tokenizer))
    }

    #[must_use]
    pub fn tokenizer_arc(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    #[must_use]
    pub fn mapper<M: MapFn + 'static>(mut self, mapper: M) -> Self {
        self.mapper = Some(Arc::new(mapper));
        self
    }

    #[must_use]
    pub fn reducer<R: ReduceFn + 'static>(mut self, reducer: R) -> Self {
        self.reducer = Some(Arc::new(reducer));
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: ExecMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn sequential(self) -> Self {
        self.mode(ExecMode::Sequential)
    }

    #[must_use]
    pub fn parallel(self, threads: Option<usize>, partitions: Option<usize>) -> Self {
        self.mode(ExecMode::Parallel {
            threads,
            partitions,
        })
    }

    /// Cancel runs that take longer than `timeout`.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// # Errors
    /// Fails if the worker pool cannot be built or the mode has zero
    /// threads/partitions.
    pub fn build(self) -> Result<Pipeline> {
        Ok(Pipeline {
            tokenizer: self
                .tokenizer
                .unwrap_or_else(|| Arc::new(PunctuationTokenizer)),
            mapper: self.mapper.unwrap_or_else(|| Arc::new(UnitMapper)),
            reducer: self.reducer.unwrap_or_else(|| Arc::new(SumReducer)),
            pool: WorkerPool::new(self.mode)?,
            timeout: self.timeout,
            metrics: self.metrics,
        })
    }
}

/// Count words in `text` with a default parallel pipeline.
///
/// # Errors
/// See [`Pipeline::run`].
pub fn count_words(text: &str, filter: Option<&TokenFilter>) -> Result<CountResult> {
    Pipeline::default().run(text, filter)
}
