use anyhow::Result;
use wordfreq::testing::*;
use wordfreq::{CountResult, Token, count_words, top_n};

fn result(entries: &[(&str, u64)]) -> CountResult {
    entries.iter().map(|(k, v)| (Token::from(*k), *v)).collect()
}

#[test]
fn length_is_min_of_n_and_result_size() -> Result<()> {
    let counts = count_words(CAT_TEXT, None)?;
    for n in 0..10 {
        assert_eq!(top_n(&counts, n).len(), n.min(counts.len()));
    }
    Ok(())
}

#[test]
fn ranking_is_descending_and_a_subset() -> Result<()> {
    let counts = count_words(&generated_text(8_000), None)?;
    let top = top_n(&counts, 25);
    assert_ranked_descending(&top);
    assert_subset_of(&top, &counts);
    Ok(())
}

#[test]
fn ties_are_broken_by_token() {
    let r = result(&[("sat", 1), ("on", 1), ("mat", 1), ("ran", 1), ("cat", 2)]);
    let words: Vec<String> = top_n(&r, 4).into_iter().map(|(t, _)| t.to_string()).collect();
    assert_eq!(words, ["cat", "mat", "on", "ran"]);
}

#[test]
fn top_n_matches_full_sort() -> Result<()> {
    let counts = count_words(&generated_text(3_000), None)?;
    let mut full: Vec<(Token, u64)> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    full.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    full.truncate(10);
    assert_eq!(counts.top_n(10), full);
    Ok(())
}

#[test]
fn ranking_is_reproducible() -> Result<()> {
    let text = generated_text(2_000);
    let a = top_n(&count_words(&text, None)?, 15);
    let b = top_n(&count_words(&text, None)?, 15);
    assert_eq!(a, b);
    Ok(())
}
