use anyhow::Result;
use std::collections::HashMap;
use wordfreq::testing::*;
use wordfreq::{
    CountResult, ExecMode, Pair, Pipeline, Token, map, reduce_all, shuffle, tokenize,
};

fn naive_counts(tokens: &[Token]) -> HashMap<Token, u64> {
    let mut m = HashMap::new();
    for t in tokens {
        *m.entry(t.clone()).or_insert(0) += 1;
    }
    m
}

fn modes() -> Vec<ExecMode> {
    vec![
        ExecMode::Sequential,
        ExecMode::Parallel {
            threads: None,
            partitions: None,
        },
        ExecMode::Parallel {
            threads: Some(1),
            partitions: Some(1),
        },
        ExecMode::Parallel {
            threads: Some(4),
            partitions: Some(13),
        },
    ]
}

#[test]
fn totals_match_token_count_in_every_mode() -> Result<()> {
    let text = generated_text(5_000);
    let tokens = tokenize(&text)?;
    for mode in modes() {
        let p = Pipeline::builder().mode(mode).build()?;
        let counts = p.run(&text, None)?;
        assert_eq!(counts.total(), tokens.len() as u64, "mode {mode:?}");
    }
    Ok(())
}

#[test]
fn each_key_counts_its_occurrences() -> Result<()> {
    let text = generated_text(3_000);
    let expected = naive_counts(&tokenize(&text)?);
    let p = Pipeline::builder().parallel(Some(3), Some(7)).build()?;
    let counts = p.run(&text, None)?;
    assert_eq!(counts.len(), expected.len());
    for (k, v) in &expected {
        assert_eq!(counts.get(k), Some(*v), "key {k}");
    }
    Ok(())
}

#[test]
fn repeated_runs_are_identical() -> Result<()> {
    let text = generated_text(2_000);
    let p = Pipeline::builder().parallel(Some(4), Some(8)).build()?;
    let a = p.run(&text, None)?;
    let b = p.run(&text, None)?;
    assert_eq!(a, b);
    Ok(())
}

#[test]
fn sequential_and_parallel_agree() -> Result<()> {
    let text = generated_text(10_000);
    let seq = Pipeline::builder().sequential().build()?.run(&text, None)?;
    let par = Pipeline::builder()
        .parallel(Some(8), Some(32))
        .build()?
        .run(&text, None)?;
    assert_kv_collections_equal(seq.to_sorted_vec(), par.to_sorted_vec());
    Ok(())
}

#[test]
fn pair_order_does_not_change_the_result() -> Result<()> {
    let tokens = tokenize(&generated_text(1_000))?;
    let pairs: Vec<Pair> = map(&tokens, None);
    let baseline = reduce_all(shuffle(pairs.clone()));

    let mut reversed = pairs.clone();
    reversed.reverse();
    assert_eq!(reduce_all(shuffle(reversed)), baseline);

    // Interleave from both ends, as if map partitions finished out of order.
    let (front, back) = pairs.split_at(pairs.len() / 2);
    let mut interleaved = Vec::with_capacity(pairs.len());
    for i in 0..front.len().max(back.len()) {
        if let Some(p) = back.get(back.len().wrapping_sub(i + 1)) {
            interleaved.push(p.clone());
        }
        if let Some(p) = front.get(i) {
            interleaved.push(p.clone());
        }
    }
    assert_eq!(interleaved.len(), pairs.len());
    assert_eq!(reduce_all(shuffle(interleaved)), baseline);
    Ok(())
}

#[test]
fn filtered_keys_are_a_subset_of_the_filter() -> Result<()> {
    let text = generated_text(4_000);
    let p = Pipeline::builder().parallel(Some(2), Some(5)).build()?;
    let filter = p.filter_from_words(["w0", "w3", "w7", "missing"]);
    let counts = p.run(&text, Some(&filter))?;
    assert!(counts.keys().all(|k| filter.contains(k)));

    let expected = naive_counts(&tokenize(&text)?);
    let kept: u64 = filter.iter().filter_map(|t| expected.get(t)).sum();
    assert_eq!(counts.total(), kept);
    Ok(())
}

#[test]
fn stages_compose_like_the_pipeline() -> Result<()> {
    let tokens = tokenize(CAT_TEXT)?;
    let groups = shuffle(map(&tokens, None));
    assert_eq!(groups["the"].values, vec![1, 1, 1]);
    let composed: CountResult = reduce_all(groups);
    assert_eq!(composed, Pipeline::default().run(CAT_TEXT, None)?);
    Ok(())
}

#[test]
fn pipeline_is_shareable_across_threads() -> Result<()> {
    let p = Pipeline::builder().parallel(Some(2), None).build()?;
    let results: Vec<CountResult> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| p.run(CAT_TEXT, None)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .collect::<wordfreq::Result<_>>()
    })?;
    for r in &results {
        assert_counts_equal(
            r,
            &[
                ("the", 3),
                ("cat", 2),
                ("sat", 1),
                ("on", 1),
                ("mat", 1),
                ("ran", 1),
            ],
        );
    }
    Ok(())
}
