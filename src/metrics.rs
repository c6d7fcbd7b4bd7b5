//! Run statistics for pipeline executions.
//!
//! Attach a [`MetricsCollector`] to a [`Pipeline`](crate::Pipeline) and every run
//! records token and key counts plus per-stage timings. The collector is cheap to
//! clone; clones share the same storage.
//!
//! A collector describes one run at a time. Each run overwrites the counters and
//! timings of the previous one, so runs executing concurrently on the same
//! collector leave a mix of their values behind. Give each concurrent run its
//! own pipeline and collector when per-run numbers matter.
//!
//! # Example
//!
//! ```
//! use wordfreq::Pipeline;
//! use wordfreq::metrics::MetricsCollector;
//!
//! # fn main() -> anyhow::Result<()> {
//! let metrics = MetricsCollector::new();
//! let p = Pipeline::builder().metrics(metrics.clone()).build()?;
//! p.run("to be or not to be", None)?;
//!
//! assert_eq!(metrics.counter("tokens"), Some(6));
//! assert_eq!(metrics.counter("distinct_keys"), Some(4));
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Counter names recorded by the pipeline.
pub mod names {
    pub const TOKENS: &str = "tokens";
    pub const FILTERED_OUT: &str = "filtered_out";
    pub const PAIRS: &str = "pairs";
    pub const DISTINCT_KEYS: &str = "distinct_keys";
    pub const MAP_PARTITIONS: &str = "map_partitions";
    pub const REDUCE_PARTITIONS: &str = "reduce_partitions";
}

/// A named metric value.
pub trait Metric: Send + Sync {
    fn name(&self) -> &str;

    fn value(&self) -> Value;

    fn description(&self) -> Option<&str> {
        None
    }
}

/// Thread-safe container for run metrics.
#[derive(Clone, Default)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsInner>>,
}

#[derive(Default)]
struct MetricsInner {
    counters: HashMap<String, u64>,
    stages: HashMap<String, Duration>,
    custom: HashMap<String, Box<dyn Metric>>,
    start_time: Option<Instant>,
    end_time: Option<Instant>,
}

impl MetricsCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // A panicking work unit must not disable metrics for later runs.
    fn lock(&self) -> MutexGuard<'_, MetricsInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a custom metric, replacing any metric with the same name.
    pub fn register(&self, metric: Box<dyn Metric>) {
        self.lock().custom.insert(metric.name().to_string(), metric);
    }

    pub fn record_start(&self) {
        let mut inner = self.lock();
        inner.start_time = Some(Instant::now());
        inner.end_time = None;
    }

    pub fn record_end(&self) {
        self.lock().end_time = Some(Instant::now());
    }

    /// Elapsed time between [`record_start`](Self::record_start) and
    /// [`record_end`](Self::record_end), if both happened.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        let inner = self.lock();
        match (inner.start_time, inner.end_time) {
            (Some(start), Some(end)) => Some(end.duration_since(start)),
            _ => None,
        }
    }

    /// Add `value` to the named counter, creating it at zero if absent.
    pub fn increment_counter(&self, name: &str, value: u64) {
        *self.lock().counters.entry(name.to_string()).or_insert(0) += value;
    }

    pub fn set_counter(&self, name: &str, value: u64) {
        self.lock().counters.insert(name.to_string(), value);
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> Option<u64> {
        self.lock().counters.get(name).copied()
    }

    /// Record how long a stage took.
    pub fn record_stage(&self, stage: &str, took: Duration) {
        self.lock().stages.insert(stage.to_string(), took);
    }

    #[must_use]
    pub fn stage_duration(&self, stage: &str) -> Option<Duration> {
        self.lock().stages.get(stage).copied()
    }

    /// All metrics as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let inner = self.lock();
        let mut out = serde_json::Map::new();
        for (name, count) in &inner.counters {
            out.insert(name.clone(), json!({ "value": count }));
        }
        for (stage, took) in &inner.stages {
            out.insert(
                format!("{stage}_ms"),
                json!({
                    "value": took.as_secs_f64() * 1000.0,
                    "description": format!("Time spent in the {stage} stage in milliseconds"),
                }),
            );
        }
        for (name, metric) in &inner.custom {
            let mut obj = serde_json::Map::new();
            obj.insert("value".into(), metric.value());
            if let Some(desc) = metric.description() {
                obj.insert("description".into(), json!(desc));
            }
            out.insert(name.clone(), Value::Object(obj));
        }
        if let (Some(start), Some(end)) = (inner.start_time, inner.end_time) {
            out.insert(
                "execution_time_ms".into(),
                json!({
                    "value": end.duration_since(start).as_millis(),
                    "description": "Total pipeline execution time in milliseconds",
                }),
            );
        }
        Value::Object(out)
    }

    /// Print all metrics to stdout, sorted by name.
    pub fn print(&self) {
        println!("\n========== Pipeline Metrics ==========");
        if let Some(elapsed) = self.elapsed() {
            println!(
                "Execution Time: {:.3}s ({} ms)",
                elapsed.as_secs_f64(),
                elapsed.as_millis()
            );
            println!("--------------------------------------");
        }
        let json = self.to_json();
        if let Value::Object(map) = json {
            let mut entries: Vec<_> = map
                .into_iter()
                .filter(|(name, _)| name != "execution_time_ms")
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (name, obj) in entries {
                let value = &obj["value"];
                match obj.get("description").and_then(Value::as_str) {
                    Some(desc) => println!("{name}: {value} ({desc})"),
                    None => println!("{name}: {value}"),
                }
            }
        }
        println!("======================================\n");
    }

    /// Write [`to_json`](Self::to_json) to `path`, pretty-printed.
    ///
    /// # Errors
    /// Fails if the file cannot be created or written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let formatted = serde_json::to_string_pretty(&self.to_json())?;
        let mut file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        file.write_all(formatted.as_bytes())
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Counter values by name.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.lock().counters.clone()
    }
}

/// A fixed numeric value with an optional description.
pub struct GaugeMetric {
    name: String,
    value: f64,
    description: Option<String>,
}

impl GaugeMetric {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Metric for GaugeMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Value {
        json!(self.value)
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
