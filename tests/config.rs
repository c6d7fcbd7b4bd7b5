use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;
use wordfreq::testing::*;
use wordfreq::{Error, ExecMode, ModeKind, Pipeline, PipelineConfig, TokenizerConfig};

fn write_config(body: &str) -> Result<NamedTempFile> {
    let mut f = NamedTempFile::new()?;
    f.write_all(body.as_bytes())?;
    f.flush()?;
    Ok(f)
}

#[test]
fn loads_json_file_with_defaults() -> Result<()> {
    let f = write_config(r#"{ "mode": "sequential", "top_n": 3, "filter": ["Cat"] }"#)?;
    let cfg = PipelineConfig::from_json_file(f.path())?;
    assert_eq!(cfg.mode, ModeKind::Sequential);
    assert_eq!(cfg.top_n, 3);
    assert_eq!(cfg.bar_width, 40);
    assert_eq!(cfg.tokenizer, TokenizerConfig::Punctuation);
    assert_eq!(cfg.filter.as_deref(), Some(&["Cat".to_string()][..]));
    Ok(())
}

#[test]
fn invalid_values_are_rejected_on_load() -> Result<()> {
    let f = write_config(r#"{ "threads": 0 }"#)?;
    let err = PipelineConfig::from_json_file(f.path()).unwrap_err();
    assert!(err.to_string().contains("threads must be at least 1"));
    Ok(())
}

#[test]
fn malformed_json_names_the_file() -> Result<()> {
    let f = write_config("{ not json")?;
    let err = PipelineConfig::from_json_file(f.path()).unwrap_err();
    assert!(format!("{err:#}").contains("parsing config"));
    Ok(())
}

#[test]
fn missing_file_is_an_error() {
    assert!(PipelineConfig::from_json_file("/definitely/not/here.json").is_err());
}

#[test]
fn pipeline_from_config_uses_mode_and_tokenizer() -> Result<()> {
    let cfg = PipelineConfig {
        mode: ModeKind::Parallel,
        threads: Some(2),
        partitions: Some(3),
        tokenizer: TokenizerConfig::Regex("[a-z]+".into()),
        ..Default::default()
    };
    let p = Pipeline::from_config(&cfg)?;
    assert_eq!(
        p.mode(),
        ExecMode::Parallel {
            threads: Some(2),
            partitions: Some(3)
        }
    );
    // The regex splits "don't" into "don" and "t".
    let counts = p.run("Don't stop, don't!", None)?;
    assert_counts_equal(&counts, &[("don", 2), ("t", 2), ("stop", 1)]);
    Ok(())
}

#[test]
fn bad_pattern_in_config_fails_to_build() {
    let cfg = PipelineConfig {
        tokenizer: TokenizerConfig::Regex("(".into()),
        ..Default::default()
    };
    assert!(matches!(
        Pipeline::from_config(&cfg),
        Err(Error::InvalidPattern(_))
    ));
}

#[test]
fn config_round_trips_through_json() -> Result<()> {
    let cfg = PipelineConfig {
        timeout_ms: Some(250),
        filter: Some(vec!["a".into()]),
        ..Default::default()
    };
    let back: PipelineConfig = serde_json::from_str(&serde_json::to_string(&cfg)?)?;
    assert_eq!(back, cfg);
    assert_eq!(back.timeout(), Some(std::time::Duration::from_millis(250)));
    Ok(())
}
