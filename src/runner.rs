use crate::error::{Error, Result, Stage};
use crate::token::Token;
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// How work units are scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecMode {
    /// Every work unit runs on the calling thread.
    Sequential,
    /// Work units run on a bounded rayon pool.
    ///
    /// `threads: None` uses rayon's global pool (sized to the available cores);
    /// `partitions: None` uses [`default_partitions`].
    Parallel {
        threads: Option<usize>,
        partitions: Option<usize>,
    },
}

impl Default for ExecMode {
    fn default() -> Self {
        ExecMode::Parallel {
            threads: None,
            partitions: None,
        }
    }
}

/// Partition count used when none is configured.
#[must_use]
pub fn default_partitions() -> usize {
    2 * num_cpus::get().max(2)
}

/// Bounded executor for map and reduce phases.
///
/// Each call to [`WorkerPool::map_chunks`] is a full barrier: it returns only after
/// every chunk has been processed.
#[derive(Clone)]
pub(crate) struct WorkerPool {
    mode: ExecMode,
    pool: Option<Arc<rayon::ThreadPool>>,
    partitions: usize,
}

impl WorkerPool {
    pub(crate) fn new(mode: ExecMode) -> Result<Self> {
        match mode {
            ExecMode::Sequential => Ok(Self {
                mode,
                pool: None,
                partitions: 1,
            }),
            ExecMode::Parallel {
                threads,
                partitions,
            } => {
                if threads == Some(0) || partitions == Some(0) {
                    return Err(Error::Config(
                        "threads and partitions must be at least 1".into(),
                    ));
                }
                let pool = match threads {
                    Some(t) => Some(Arc::new(
                        rayon::ThreadPoolBuilder::new()
                            .num_threads(t)
                            .thread_name(|i| format!("wordfreq-worker-{i}"))
                            .build()?,
                    )),
                    None => None,
                };
                Ok(Self {
                    mode,
                    pool,
                    partitions: partitions.unwrap_or_else(default_partitions),
                })
            }
        }
    }

    /// Parallel mode on rayon's global pool with default partitioning.
    pub(crate) fn global() -> Self {
        Self {
            mode: ExecMode::default(),
            pool: None,
            partitions: default_partitions(),
        }
    }

    pub(crate) fn mode(&self) -> ExecMode {
        self.mode
    }

    /// Number of chunks `len` items are split into (never more than `len`).
    pub(crate) fn partitions_for(&self, len: usize) -> usize {
        self.partitions.max(1).min(len.max(1))
    }

    /// Apply `f` to disjoint chunks of `items` and collect one output per chunk.
    pub(crate) fn map_chunks<T, O, F>(&self, items: &[T], f: F) -> Vec<O>
    where
        T: Sync,
        O: Send,
        F: Fn(&[T]) -> O + Send + Sync,
    {
        let parts = self.partitions_for(items.len());
        let chunk = chunk_len(items.len(), parts);
        match (&self.mode, &self.pool) {
            (ExecMode::Sequential, _) => items.chunks(chunk).map(f).collect(),
            (ExecMode::Parallel { .. }, Some(pool)) => {
                pool.install(|| items.par_chunks(chunk).map(&f).collect())
            }
            (ExecMode::Parallel { .. }, None) => items.par_chunks(chunk).map(f).collect(),
        }
    }
}

/// Chunk length that splits `len` items into at most `parts` chunks.
fn chunk_len(len: usize, parts: usize) -> usize {
    if parts <= 1 || len <= 1 {
        return len.max(1);
    }
    len.div_ceil(parts)
}

/// Run one work unit, turning a panic into [`Error::Pipeline`] naming `key`.
pub(crate) fn run_unit<R>(stage: Stage, key: &Token, f: impl FnOnce() -> R) -> Result<R> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| Error::Pipeline {
        stage,
        key: key.to_string(),
        message: panic_message(payload.as_ref()),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "work unit panicked".to_string()
    }
}
