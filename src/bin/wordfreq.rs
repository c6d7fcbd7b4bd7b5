//! Count word frequencies in a text and show the most frequent words.

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde_json::json;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, error, info, trace};
use wordfreq::{BarChart, MetricsCollector, ModeKind, Pipeline, PipelineConfig, TokenizerConfig};

#[derive(Parser, Debug)]
#[command(name = "wordfreq", version, about = "Map/reduce word frequency counter")]
struct Cli {
    /// Read the text from a file
    #[arg(short, long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Download the text from a URL
    #[arg(short, long)]
    url: Option<String>,

    /// Count only these words (repeatable)
    #[arg(short, long = "word")]
    words: Vec<String>,

    /// Number of words to show
    #[arg(short = 'n', long = "top")]
    top: Option<usize>,

    /// Worker threads (default: one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Partitions the work is split into
    #[arg(long)]
    partitions: Option<usize>,

    /// Run every work unit on the main thread
    #[arg(long)]
    sequential: bool,

    /// Cancel the count after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Tokenize with a regex instead of stripping punctuation
    #[arg(long)]
    regex: Option<String>,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Print run metrics after the result
    #[arg(long)]
    metrics: bool,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied.
    fn config(&self) -> Result<PipelineConfig> {
        let mut cfg = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };
        if self.sequential {
            cfg.mode = ModeKind::Sequential;
        }
        if self.threads.is_some() {
            cfg.threads = self.threads;
        }
        if self.partitions.is_some() {
            cfg.partitions = self.partitions;
        }
        if let Some(pattern) = &self.regex {
            cfg.tokenizer = TokenizerConfig::Regex(pattern.clone());
        }
        if !self.words.is_empty() {
            cfg.filter = Some(self.words.clone());
        }
        if let Some(n) = self.top {
            cfg.top_n = n;
        }
        if self.timeout_ms.is_some() {
            cfg.timeout_ms = self.timeout_ms;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2)
        .with_thread_ids(cli.verbose >= 3)
        .with_line_number(cli.verbose >= 3)
        .init();

    debug!("wordfreq started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(&cli) {
        error!("Fatal error: {e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let cfg = cli.config()?;
    let text = read_text(cli)?;

    let metrics = MetricsCollector::new();
    let pipeline = Pipeline::builder()
        .mode(cfg.exec_mode())
        .tokenizer_arc(cfg.tokenizer.build()?)
        .metrics(metrics.clone());
    let pipeline = match cfg.timeout() {
        Some(t) => pipeline.timeout(t),
        None => pipeline,
    }
    .build()?;

    let filter = cfg.filter.as_ref().map(|w| pipeline.filter_from_words(w));
    if let Some(f) = &filter {
        if f.is_empty() {
            bail!("none of the requested words survive normalization");
        }
        info!(words = f.len(), "counting only the requested words");
    }

    let counts = pipeline
        .run(&text, filter.as_ref())
        .context("counting words")?;
    let top = counts.top_n(cfg.top_n);

    if cli.json {
        let body = json!({
            "total": counts.total(),
            "distinct": counts.len(),
            "top": top
                .iter()
                .map(|(w, c)| json!({ "word": w, "count": c }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", BarChart::with_width(cfg.bar_width).render(cfg.top_n, &top));
    }
    if cli.metrics {
        metrics.print();
    }
    Ok(())
}

fn read_text(cli: &Cli) -> Result<String> {
    if let Some(path) = &cli.file {
        info!(path = %path.display(), "reading text");
        return std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()));
    }
    if let Some(url) = &cli.url {
        info!(%url, "downloading text");
        return fetch(url);
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("reading stdin")?;
    Ok(buf)
}

#[cfg(feature = "fetch")]
fn fetch(url: &str) -> Result<String> {
    let response = reqwest::blocking::get(url)
        .with_context(|| format!("requesting {url}"))?
        .error_for_status()
        .with_context(|| format!("fetching {url}"))?;
    response
        .text()
        .with_context(|| format!("reading response body from {url}"))
}

#[cfg(not(feature = "fetch"))]
fn fetch(url: &str) -> Result<String> {
    bail!("cannot fetch {url}: built without the `fetch` feature")
}
