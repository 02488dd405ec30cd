// Formula validator: a cheap syntactic gate run before evaluation.
//
// Passing validation does not guarantee a formula evaluates; the parser
// rejects unknown identifiers independently.

use serde::Serialize;

use crate::formula::lexer::is_word_char;
use crate::stat::Stat;

pub const EMPTY_FORMULA: &str = "Formula cannot be empty";
pub const UNBALANCED_PARENS: &str = "Unbalanced parentheses in formula";
pub const INVALID_CHARACTERS: &str = "Formula contains invalid characters";

/// Outcome of [`validate`]. `used_stats` is kept on the parenthesis and
/// character failures so callers can still show what was recognized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaValidation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub used_stats: Vec<Stat>,
}

impl FormulaValidation {
    fn valid(used_stats: Vec<Stat>) -> Self {
        FormulaValidation {
            is_valid: true,
            error: None,
            used_stats,
        }
    }

    fn invalid(error: impl Into<String>, used_stats: Vec<Stat>) -> Self {
        FormulaValidation {
            is_valid: false,
            error: Some(error.into()),
            used_stats,
        }
    }
}

/// Message listing every valid symbol, returned when a formula names none.
pub fn no_stats_message() -> String {
    format!(
        "Formula must contain at least one valid NBA stat: {}",
        Stat::abbreviation_list()
    )
}

/// Check a formula. Rules apply in order and the first failure wins:
/// empty input, no recognized stat, unbalanced parentheses, characters
/// outside the whitelist.
pub fn validate(formula: &str) -> FormulaValidation {
    if formula.trim().is_empty() {
        return FormulaValidation::invalid(EMPTY_FORMULA, Vec::new());
    }

    let upper = formula.to_ascii_uppercase();
    let used_stats = find_stats(&upper);
    if used_stats.is_empty() {
        return FormulaValidation::invalid(no_stats_message(), Vec::new());
    }

    let open = formula.matches('(').count();
    let close = formula.matches(')').count();
    if open != close {
        return FormulaValidation::invalid(UNBALANCED_PARENS, used_stats);
    }

    if !formula.chars().all(is_allowed_char) {
        return FormulaValidation::invalid(INVALID_CHARACTERS, used_stats);
    }

    FormulaValidation::valid(used_stats)
}

/// Stats appearing in `upper` as whole words, in table order.
fn find_stats(upper: &str) -> Vec<Stat> {
    Stat::ALL
        .into_iter()
        .filter(|stat| stat.spellings().any(|s| contains_word(upper, s)))
        .collect()
}

/// Whether `word` occurs in `haystack` bounded by non-word characters or
/// the ends of the string.
fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(start, _)| {
        let end = start + word.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !is_word_char(c));
        let after_ok = haystack[end..].chars().next().map_or(true, |c| !is_word_char(c));
        before_ok && after_ok
    })
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || c.is_whitespace()
        || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.' | ',')
}
