//! Approximate string matching for user-typed titles and actor names
//!
//! Scores range over `0.0..=100.0`. The matcher combines a plain similarity
//! ratio with token-sorted, token-set and partial (substring) variants, and
//! weights them by how different the two strings are in length, so that a
//! short query can still match a longer reference name. Component scores stay
//! fractional; only the reported score is rounded, half to even.

use std::collections::BTreeSet;

const UNBASE_SCALE: f64 = 0.95;
const PARTIAL_SCALE: f64 = 0.90;
const LONG_PARTIAL_SCALE: f64 = 0.60;

/// Best choice returned by [`extract_one`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch<'a> {
    pub choice: &'a str,
    pub score: u8,
    pub index: usize,
}

/// Lowercases, replaces every non-alphanumeric character with a space and trims
pub fn preprocess(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else {
            out.push(' ');
        }
    }
    out.trim().to_string()
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn char_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    // insertions and deletions needed to turn `a` into `b`
    let distance = total - 2 * lcs_len(a, b);
    100.0 * (1.0 - distance as f64 / total as f64)
}

fn char_partial_ratio(a: &[char], b: &[char]) -> f64 {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }

    // full-length windows, then the windows clipped at either end of `long`
    let full = long.windows(short.len());
    let prefixes = (1..short.len()).map(|k| &long[..k]);
    let suffixes = (1..short.len()).map(|k| &long[long.len() - k..]);

    let mut best: f64 = 0.0;
    for window in full.chain(prefixes).chain(suffixes) {
        best = best.max(char_ratio(short, window));
        if best == 100.0 {
            break;
        }
    }
    best
}

/// Similarity of two strings, based on their longest common subsequence
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    char_ratio(&a, &b)
}

/// Best [`ratio`] of the shorter string against each slice of the longer one
///
/// Slices are every same-length window plus the shorter windows that hang off
/// either end, so a query overlapping only the start or the end still scores.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    char_partial_ratio(&a, &b)
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_sort(a: &str, b: &str, partial: bool) -> f64 {
    let (a, b) = (sorted_tokens(a), sorted_tokens(b));
    if partial {
        partial_ratio(&a, &b)
    } else {
        ratio(&a, &b)
    }
}

fn token_set(a: &str, b: &str, partial: bool) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    let join = |tokens: Vec<&str>| tokens.join(" ");
    let sect = join(tokens_a.intersection(&tokens_b).copied().collect());
    let diff_ab = join(tokens_a.difference(&tokens_b).copied().collect());
    let diff_ba = join(tokens_b.difference(&tokens_a).copied().collect());

    let combined_ab = format!("{} {}", sect, diff_ab).trim().to_string();
    let combined_ba = format!("{} {}", sect, diff_ba).trim().to_string();

    let score = |x: &str, y: &str| {
        if partial {
            partial_ratio(x, y)
        } else {
            ratio(x, y)
        }
    };

    score(&sect, &combined_ab)
        .max(score(&sect, &combined_ba))
        .max(score(&combined_ab, &combined_ba))
}

/// [`ratio`] after sorting the whitespace-separated tokens of both strings
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    token_sort(a, b, false)
}

/// Compares the shared tokens of both strings against each side's full token set
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    token_set(a, b, false)
}

/// [`partial_ratio`] after sorting the tokens of both strings
pub fn partial_token_sort_ratio(a: &str, b: &str) -> f64 {
    token_sort(a, b, true)
}

/// [`token_set_ratio`] scored with [`partial_ratio`]; any shared token gives 100
pub fn partial_token_set_ratio(a: &str, b: &str) -> f64 {
    token_set(a, b, true)
}

fn weighted_score(p1: &str, p2: &str) -> f64 {
    let len1 = p1.chars().count();
    let len2 = p2.chars().count();
    if len1 == 0 || len2 == 0 {
        return 0.0;
    }

    let base = ratio(p1, p2);
    let len_ratio = len1.max(len2) as f64 / len1.min(len2) as f64;

    if len_ratio < 1.5 {
        let tsor = token_sort_ratio(p1, p2) * UNBASE_SCALE;
        let tser = token_set_ratio(p1, p2) * UNBASE_SCALE;
        return base.max(tsor).max(tser);
    }

    let scale = if len_ratio > 8.0 {
        LONG_PARTIAL_SCALE
    } else {
        PARTIAL_SCALE
    };
    let partial = partial_ratio(p1, p2) * scale;
    let ptsor = partial_token_sort_ratio(p1, p2) * UNBASE_SCALE * scale;
    let ptser = partial_token_set_ratio(p1, p2) * UNBASE_SCALE * scale;
    base.max(partial).max(ptsor).max(ptser)
}

fn rounded(score: f64) -> u8 {
    score.round_ties_even().clamp(0.0, 100.0) as u8
}

/// Weighted combination of all the ratios above, applied to preprocessed input
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    rounded(weighted_score(&preprocess(a), &preprocess(b)))
}

/// Returns the choice scoring highest against `query`, if it reaches `cutoff`
///
/// The cutoff applies to the unrounded score. Ties keep the earliest choice.
pub fn extract_one<'a, S: AsRef<str>>(
    query: &str,
    choices: &'a [S],
    cutoff: u8,
) -> Option<FuzzyMatch<'a>> {
    let query = preprocess(query);
    if query.is_empty() {
        return None;
    }

    let cutoff = f64::from(cutoff);
    let mut best: Option<(usize, &'a str, f64)> = None;
    for (index, choice) in choices.iter().enumerate() {
        let choice = choice.as_ref();
        let score = weighted_score(&query, &preprocess(choice));
        if score < cutoff {
            continue;
        }
        if best.map_or(true, |(_, _, top)| score > top) {
            best = Some((index, choice, score));
            if score == 100.0 {
                break;
            }
        }
    }

    best.map(|(index, choice, score)| FuzzyMatch {
        choice,
        score: rounded(score),
        index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    #[test]
    fn test_preprocess_strips_punctuation_and_case() {
        assert_eq!(preprocess("  Spider-Man: Homecoming! "), "spider man  homecoming");
        assert_eq!(preprocess("!!!"), "");
    }

    #[test]
    fn test_preprocess_keeps_multi_char_lowercase() {
        // U+0130 lowercases to 'i' followed by a combining dot
        assert_eq!(preprocess("İstanbul"), "i\u{307}stanbul");
    }

    #[test]
    fn test_ratio() {
        assert_close(ratio("this is a test", "this is a test"), 100.0);
        assert_close(ratio("this is a test", "this is a test!"), 2800.0 / 29.0);
        assert_close(ratio("abc", "xyz"), 0.0);
        assert_close(ratio("", ""), 100.0);
    }

    #[test]
    fn test_partial_ratio_finds_substring() {
        assert_close(partial_ratio("this is a test", "this is a test!"), 100.0);
        assert_close(partial_ratio("knight", "the dark knight rises"), 100.0);
        assert_close(partial_ratio("", "abc"), 0.0);
    }

    #[test]
    fn test_partial_ratio_scores_window_clipped_at_end() {
        // "abc" hangs off the end: 2 * 3 / 7
        assert_close(partial_ratio("abcd", "xxxxxxabc"), 600.0 / 7.0);
        assert_close(partial_ratio("xxxxxxabc", "abcd"), 600.0 / 7.0);
    }

    #[test]
    fn test_partial_ratio_scores_window_clipped_at_start() {
        assert_close(partial_ratio("abcd", "bcdxxxxxx"), 600.0 / 7.0);
    }

    #[test]
    fn test_token_sort_ratio_ignores_order() {
        assert_close(
            token_sort_ratio("fuzzy wuzzy was a bear", "wuzzy fuzzy was a bear"),
            100.0,
        );
    }

    #[test]
    fn test_token_set_ratio_ignores_duplicates() {
        assert_close(token_set_ratio("fuzzy was a bear", "fuzzy fuzzy was a bear"), 100.0);
    }

    #[test]
    fn test_partial_token_ratios() {
        assert_close(partial_token_sort_ratio("knight dark", "the dark knight rises"), 100.0);
        assert_close(partial_token_set_ratio("heat", "heat of the night"), 100.0);
    }

    #[test]
    fn test_weighted_ratio_exact_after_preprocessing() {
        assert_eq!(weighted_ratio("The Dark Knight", "the dark knight"), 100);
        assert_eq!(weighted_ratio("", "the dark knight"), 0);
    }

    #[test]
    fn test_weighted_ratio_reordered_name() {
        // token sort is 100, scaled by 0.95
        assert_eq!(weighted_ratio("Hanks Tom", "Tom Hanks"), 95);
    }

    #[test]
    fn test_weighted_ratio_rounds_half_to_even() {
        // 2 * 5 / 16 = 62.5
        assert_eq!(weighted_ratio("abcdefgh", "abcdexyz"), 62);
    }

    #[test]
    fn test_extract_one_prefers_closest_title() {
        let titles = ["The Dark Knight Rises", "The Dark Knight", "Heat"];
        let best = extract_one("the dark knigt", &titles, 75).unwrap();
        assert_eq!(best.choice, "The Dark Knight");
        assert_eq!(best.index, 1);
        assert!(best.score >= 90);
    }

    #[test]
    fn test_extract_one_respects_cutoff() {
        let titles = ["Heat", "Ronin", "Collateral"];
        assert!(extract_one("zzzzzz", &titles, 75).is_none());
    }

    #[test]
    fn test_extract_one_matches_choice_overlapping_at_end() {
        // partial 600/7 scaled by 0.9 is 77.1
        let best = extract_one("abcd", &["xxxxxxabc"], 75).unwrap();
        assert_eq!(best.score, 77);
    }

    #[test]
    fn test_extract_one_cutoff_uses_unrounded_score() {
        // token set 2 * 26 / 66 scaled by 0.95 is 74.85, which displays as 75
        let choices = ["the pacino father knight"];
        assert!(extract_one("pacino knight of two", &choices, 75).is_none());

        let best = extract_one("pacino knight of two", &choices, 74).unwrap();
        assert_eq!(best.score, 75);
    }

    #[test]
    fn test_extract_one_keeps_first_on_tie() {
        let titles = ["Heat", "HEAT"];
        let best = extract_one("heat", &titles, 75).unwrap();
        assert_eq!(best.index, 0);
        assert_eq!(best.score, 100);
    }

    #[test]
    fn test_extract_one_empty_query() {
        let titles = ["Heat"];
        assert!(extract_one("  ?? ", &titles, 0).is_none());
    }

    #[test]
    fn test_extract_one_with_owned_choices() {
        let names = vec!["Al Pacino".to_string(), "Robert De Niro".to_string()];
        let best = extract_one("robert deniro", &names, 80).unwrap();
        assert_eq!(best.choice, "Robert De Niro");
    }
}
