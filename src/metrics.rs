//! Text metrics derived from OCR output
//!
//! `character_count` counts every Unicode scalar value, whitespace included,
//! so `"The cat sat."` has 12 characters. Word characters (whitespace
//! excluded) only feed `average_word_length`.

use serde::{Deserialize, Serialize};

/// Decimal places kept for `average_word_length`
const AVERAGE_PRECISION: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacterMetrics {
    pub character_count: usize,
    pub word_count: usize,
    pub line_count: usize,
    pub average_word_length: f64,
}

pub fn compute_metrics(text: &str) -> CharacterMetrics {
    if text.is_empty() {
        return CharacterMetrics::default();
    }

    let character_count = text.chars().count();
    let (word_count, word_chars) = text
        .split_whitespace()
        .fold((0usize, 0usize), |(words, chars), word| {
            (words + 1, chars + word.chars().count())
        });
    let line_count = text.matches('\n').count() + 1;

    let average_word_length = if word_count == 0 {
        0.0
    } else {
        round_to(word_chars as f64 / word_count as f64, AVERAGE_PRECISION)
    };

    CharacterMetrics {
        character_count,
        word_count,
        line_count,
        average_word_length,
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_all_zero() {
        let metrics = compute_metrics("");
        assert_eq!(metrics, CharacterMetrics::default());
        assert_eq!(metrics.average_word_length, 0.0);
    }

    #[test]
    fn test_simple_sentence() {
        let metrics = compute_metrics("The cat sat.");
        assert_eq!(metrics.word_count, 3);
        assert_eq!(metrics.character_count, 12);
        assert_eq!(metrics.line_count, 1);
        // "The" + "cat" + "sat." = 10 word characters
        assert_eq!(metrics.average_word_length, 3.33);
    }

    #[test]
    fn test_whitespace_only_text() {
        let metrics = compute_metrics("  \n ");
        assert_eq!(metrics.word_count, 0);
        assert_eq!(metrics.character_count, 4);
        assert_eq!(metrics.line_count, 2);
        assert_eq!(metrics.average_word_length, 0.0);
    }

    #[test]
    fn test_multiline_and_unicode() {
        let metrics = compute_metrics("héllo wörld\nzweite\tZeile\n");
        assert_eq!(metrics.word_count, 4);
        assert_eq!(metrics.line_count, 3);
        assert_eq!(metrics.character_count, 25);
        assert_eq!(metrics.average_word_length, 5.25);
    }
}
