//! Texts with known counts for tests and examples.

/// Nine-word sentence with `the` ×3 and `cat` ×2.
pub const CAT_TEXT: &str = "the cat sat on the mat the cat ran";

/// Mixed case with punctuation; counts to `a` ×3 and `b` ×4.
pub const PUNCTUATED_TEXT: &str = "A a a. B! b b b?";

/// A short passage with punctuation, apostrophes and mixed case.
pub const PASSAGE: &str = "It was the best of times, it was the worst of times; \
it was the age of wisdom, it was the age of foolishness. \"Don't panic!\" said the guide.";

/// A deterministic text of `words` tokens over a skewed 64-word vocabulary.
///
/// Low-numbered words (`w0`, `w1`, ...) are the most frequent, so the text has
/// a clear head and many ties in the tail.
///
/// # Example
///
/// ```
/// use wordfreq::testing::generated_text;
///
/// let text = generated_text(100);
/// assert_eq!(text.split_whitespace().count(), 100);
/// ```
#[must_use]
pub fn generated_text(words: usize) -> String {
    let mut out = String::with_capacity(words * 4);
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    for n in 0..words {
        // xorshift64
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let rank = (state % 64) * (state % 64) / 64;
        if n > 0 {
            out.push(if n % 12 == 0 { '\n' } else { ' ' });
        }
        out.push('w');
        out.push_str(&rank.to_string());
    }
    out
}
