//! Text normalization into [`Token`] sequences.
//!
//! The pipeline consumes any [`Tokenizer`]. Two are provided:
//!
//! - [`PunctuationTokenizer`] (the default) removes ASCII punctuation, lower-cases,
//!   and splits on whitespace.
//! - [`RegexTokenizer`] lower-cases and keeps every match of a pattern.
//!
//! ```
//! use wordfreq::tokenizer::{PunctuationTokenizer, Tokenizer};
//!
//! let tokens = PunctuationTokenizer.tokenize("A a a. B! b b b?").unwrap();
//! let words: Vec<&str> = tokens.iter().map(|t| t.as_str()).collect();
//! assert_eq!(words, ["a", "a", "a", "b", "b", "b", "b"]);
//! ```

use crate::error::Result;
use crate::token::Token;
use regex::Regex;

/// Turns raw text into an ordered sequence of normalized tokens.
///
/// Implementations must be pure and deterministic.
pub trait Tokenizer: Send + Sync {
    /// Tokenize a whole text.
    ///
    /// # Errors
    /// Returns [`Error::Input`](crate::Error::Input) when the text cannot be tokenized.
    fn tokenize(&self, text: &str) -> Result<Vec<Token>>;

    /// The token a single word normalizes to.
    ///
    /// `None` if nothing survives or the word splits into several tokens.
    /// Used to build filter sets from user-supplied words.
    fn normalize(&self, word: &str) -> Option<Token> {
        let mut tokens = self.tokenize(word).ok()?.into_iter();
        let token = tokens.next()?;
        match tokens.next() {
            Some(_) => None,
            None => Some(token),
        }
    }
}

/// Strip ASCII punctuation, lower-case, split on whitespace.
///
/// Punctuation characters are removed rather than replaced, so `don't` becomes
/// `dont` and `well-known` becomes `wellknown`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PunctuationTokenizer;

impl Tokenizer for PunctuationTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        let cleaned: String = text
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect::<String>()
            .to_lowercase();
        Ok(cleaned.split_whitespace().map(Token::from).collect())
    }
}

/// Lower-case the text and emit every non-empty match of `pattern`.
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    pattern: Regex,
}

impl RegexTokenizer {
    /// Compile a tokenizer from a pattern such as `[\p{L}\p{N}]+`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidPattern`](crate::Error::InvalidPattern) if the pattern
    /// does not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        let lowered = text.to_lowercase();
        Ok(self
            .pattern
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .map(Token::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(Token::as_str).collect()
    }

    #[test]
    fn strips_punctuation_and_lowercases() {
        let t = PunctuationTokenizer
            .tokenize("Hello, World! It's\tthe  END.")
            .unwrap();
        assert_eq!(words(&t), ["hello", "world", "its", "the", "end"]);
    }

    #[test]
    fn punctuation_only_words_vanish() {
        let t = PunctuationTokenizer.tokenize("-- ... !!! word").unwrap();
        assert_eq!(words(&t), ["word"]);
    }

    #[test]
    fn non_ascii_letters_are_kept() {
        let t = PunctuationTokenizer.tokenize("Привіт, СВІТ café").unwrap();
        assert_eq!(words(&t), ["привіт", "світ", "café"]);
    }

    #[test]
    fn normalize_single_word() {
        assert_eq!(
            PunctuationTokenizer.normalize("Cat,"),
            Some(Token::from("cat"))
        );
        assert_eq!(PunctuationTokenizer.normalize("?!"), None);
    }

    #[test]
    fn normalize_rejects_several_words() {
        assert_eq!(PunctuationTokenizer.normalize("ice cream"), None);
        assert_eq!(
            PunctuationTokenizer.normalize("  Ice!  "),
            Some(Token::from("ice"))
        );
    }

    #[test]
    fn regex_tokenizer_keeps_matches() {
        let t = RegexTokenizer::new(r"[a-z]+").unwrap();
        let out = t.tokenize("Don't STOP-me now").unwrap();
        assert_eq!(words(&out), ["don", "t", "stop", "me", "now"]);
    }

    #[test]
    fn regex_tokenizer_rejects_bad_pattern() {
        assert!(RegexTokenizer::new("(unclosed").is_err());
    }
}
