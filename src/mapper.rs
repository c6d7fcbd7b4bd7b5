//! Map stage: tokens → `(token, 1)` pairs.
//!
//! Each surviving token is an independent work unit. Partitions of the token
//! sequence are mapped concurrently and share no mutable state.

use crate::cancel::CancelToken;
use crate::error::{Result, Stage};
use crate::runner::run_unit;
use crate::token::{Pair, Token};
use crate::tokenizer::Tokenizer;
use std::collections::HashSet;
use tracing::warn;

/// Optional set of tokens allowed into the map stage.
pub type TokenFilter = HashSet<Token>;

/// Build a filter by normalizing each word through `tokenizer`.
///
/// Words that normalize to nothing (e.g. `"?!"`) or to several tokens
/// (e.g. `"ice cream"`) are skipped with a warning.
pub fn filter_from_words<I, S>(tokenizer: &dyn Tokenizer, words: I) -> TokenFilter
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .filter_map(|w| {
            let word = w.as_ref();
            let token = tokenizer.normalize(word);
            if token.is_none() {
                warn!(word, "filter word is not a single token, ignoring it");
            }
            token
        })
        .collect()
}

/// Converts one token occurrence into a pair.
pub trait MapFn: Send + Sync {
    fn map(&self, token: &Token) -> Pair;
}

/// The word-count mapper: every token maps to `(token, 1)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnitMapper;

impl MapFn for UnitMapper {
    fn map(&self, token: &Token) -> Pair {
        Pair::new(token.clone(), 1)
    }
}

impl<F> MapFn for F
where
    F: Fn(&Token) -> Pair + Send + Sync,
{
    fn map(&self, token: &Token) -> Pair {
        self(token)
    }
}

/// Output of mapping one partition.
#[derive(Debug, Default)]
pub(crate) struct MappedPartition {
    pub pairs: Vec<Pair>,
    pub dropped: usize,
}

/// Map one partition of tokens, dropping those outside `filter`.
pub(crate) fn map_partition(
    tokens: &[Token],
    filter: Option<&TokenFilter>,
    mapper: &dyn MapFn,
    cancel: &CancelToken,
) -> Result<MappedPartition> {
    let mut out = MappedPartition {
        pairs: Vec::with_capacity(tokens.len()),
        dropped: 0,
    };
    for token in tokens {
        cancel.check(Stage::Map)?;
        if filter.is_some_and(|f| !f.contains(token)) {
            out.dropped += 1;
            continue;
        }
        out.pairs.push(run_unit(Stage::Map, token, || mapper.map(token))?);
    }
    Ok(out)
}

/// Sequential word-count map over a token sequence.
///
/// Tokens outside `filter` are silently dropped.
pub fn map(tokens: &[Token], filter: Option<&TokenFilter>) -> Vec<Pair> {
    tokens
        .iter()
        .filter(|t| filter.is_none_or(|f| f.contains(*t)))
        .map(|t| UnitMapper.map(t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::PunctuationTokenizer;

    fn toks(words: &[&str]) -> Vec<Token> {
        words.iter().map(|w| Token::from(*w)).collect()
    }

    #[test]
    fn one_pair_per_token() {
        let pairs = map(&toks(&["a", "b", "a"]), None);
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|p| p.value == 1));
    }

    #[test]
    fn filter_drops_and_counts() {
        let filter: TokenFilter = toks(&["cat"]).into_iter().collect();
        let out = map_partition(
            &toks(&["the", "cat", "sat", "cat"]),
            Some(&filter),
            &UnitMapper,
            &CancelToken::new(),
        )
        .unwrap();
        assert_eq!(out.pairs.len(), 2);
        assert_eq!(out.dropped, 2);
    }

    #[test]
    fn filter_words_are_normalized() {
        let f = filter_from_words(&PunctuationTokenizer, ["Cat!", "DOG", "--"]);
        assert_eq!(f.len(), 2);
        assert!(f.contains("cat"));
        assert!(f.contains("dog"));
    }

    #[test]
    fn multi_word_filter_entry_is_skipped() {
        let f = filter_from_words(&PunctuationTokenizer, ["ice cream", "cake"]);
        assert_eq!(f.len(), 1);
        assert!(f.contains("cake"));
        assert!(!f.contains("ice"));
    }

    #[test]
    fn closures_are_mappers() {
        let doubled = |t: &Token| Pair::new(t.clone(), 2);
        let out =
            map_partition(&toks(&["x"]), None, &doubled, &CancelToken::new()).unwrap();
        assert_eq!(out.pairs, vec![Pair::new(Token::from("x"), 2)]);
    }
}
