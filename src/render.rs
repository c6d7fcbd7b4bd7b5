//! Plain-text rendering of a top-N ranking.
//!
//! Produces a `word : count` table followed by a horizontal bar chart whose
//! longest bar is `width` columns wide. Rows keep the ranking order (most
//! frequent first).

use crate::token::Token;
use std::fmt::Write;

const EMPTY_MESSAGE: &str = "No data to visualize";

#[derive(Clone, Debug)]
pub struct BarChart {
    /// Columns used by the longest bar.
    pub width: usize,
    pub bar_char: char,
}

impl Default for BarChart {
    fn default() -> Self {
        Self {
            width: 40,
            bar_char: '█',
        }
    }
}

impl BarChart {
    #[must_use]
    pub fn with_width(width: usize) -> Self {
        Self {
            width: width.max(1),
            ..Self::default()
        }
    }

    /// Render the table and chart for `ranked`, the result of asking for the
    /// `top_n` most frequent words. The header names `top_n` even when fewer
    /// distinct words exist.
    #[must_use]
    pub fn render(&self, top_n: usize, ranked: &[(Token, u64)]) -> String {
        if ranked.is_empty() {
            return format!("{EMPTY_MESSAGE}\n");
        }
        let label_width = ranked
            .iter()
            .map(|(t, _)| t.chars().count())
            .max()
            .unwrap_or(0)
            .max(15);
        let max_count = ranked.iter().map(|(_, c)| *c).max().unwrap_or(0);
        let count_width = max_count.to_string().len();

        let mut out = String::new();
        let _ = writeln!(out, "--- Top {top_n} most frequent words ---");
        for (token, count) in ranked {
            let _ = writeln!(out, "{:<label_width$} : {count}", token.as_str());
        }
        let _ = writeln!(out, "{}", "-".repeat(40));
        out.push('\n');
        for (token, count) in ranked {
            let bar: String = std::iter::repeat_n(self.bar_char, self.bar_len(*count, max_count))
                .collect();
            let _ = writeln!(
                out,
                "{:<label_width$} | {bar} {count:>count_width$}",
                token.as_str()
            );
        }
        out
    }

    /// Bar length scaled to `width`; any non-zero count gets at least one cell.
    fn bar_len(&self, count: u64, max_count: u64) -> usize {
        if count == 0 || max_count == 0 {
            return 0;
        }
        let scaled = (u128::from(count) * self.width as u128) / u128::from(max_count);
        (scaled as usize).max(1)
    }
}
