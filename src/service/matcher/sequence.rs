//! Longest-matching-block similarity between two strings.
//!
//! The score is `2 * M / T`, where `T` is the combined length of both strings and `M`
//! is the total size of the matching blocks found by taking the longest common block,
//! then recursing into the unmatched text on either side of it. Among equally long
//! blocks the one that starts earliest in `a` (then earliest in `b`) wins.
//!
//! When `b` has at least 200 characters, characters that make up more than 1% of it
//! are "popular": they never seed a match, but a match may still extend across them.
//! Scores therefore agree with the classic `SequenceMatcher.ratio()` for long text.
//! Lengths are counted in Unicode scalar values.

use std::collections::HashMap;

/// Length at which the popular-character heuristic kicks in.
const AUTOJUNK_MIN_LEN: usize = 200;

/// A matching block: `a[a..a + size] == b[b..b + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Match {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Compares `a` against `b`; `b` is the side that gets indexed.
pub struct SequenceMatcher<'s> {
    a: &'s [char],
    b: &'s [char],
    b2j: HashMap<char, Vec<usize>>,
}

impl<'s> SequenceMatcher<'s> {
    pub fn new(a: &'s [char], b: &'s [char]) -> Self {
        Self::with_autojunk(a, b, true)
    }

    pub fn with_autojunk(a: &'s [char], b: &'s [char], autojunk: bool) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();

        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }

        if autojunk && b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }

        Self { a, b, b2j }
    }

    /// Longest block matching within `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// A block of size zero at `(alo, blo)` means nothing matched.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let (a, b) = (self.a, self.b);
        let mut best = Match { a: alo, b: blo, size: 0 };

        // Length of the match ending at a[i - 1], b[j], keyed by j.
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_j2len = HashMap::new();

            if let Some(positions) = self.b2j.get(&a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }

                    let k = j.checked_sub(1).and_then(|prev| j2len.get(&prev)).copied().unwrap_or(0) + 1;
                    next_j2len.insert(j, k);

                    if k > best.size {
                        best = Match { a: i + 1 - k, b: j + 1 - k, size: k };
                    }
                }
            }

            j2len = next_j2len;
        }

        // Popular characters could not seed the block, but they may still border it.

        while best.a > alo && best.b > blo && a[best.a - 1] == b[best.b - 1] {
            best.a -= 1;
            best.b -= 1;
            best.size += 1;
        }

        while best.a + best.size < ahi && best.b + best.size < bhi && a[best.a + best.size] == b[best.b + best.size] {
            best.size += 1;
        }

        best
    }

    /// All matching blocks, sorted, with adjacent blocks merged.
    pub fn matching_blocks(&self) -> Vec<Match> {
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);

            if m.size == 0 {
                continue;
            }

            if alo < m.a && blo < m.b {
                pending.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                pending.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }

            blocks.push(m);
        }

        blocks.sort();

        let mut merged: Vec<Match> = Vec::with_capacity(blocks.len());
        for m in blocks {
            match merged.last_mut() {
                Some(last) if last.a + last.size == m.a && last.b + last.size == m.b => last.size += m.size,
                _ => merged.push(m),
            }
        }

        merged
    }

    /// Similarity in `[0, 1]`; 1.0 for identical input (including two empty strings).
    pub fn ratio(&self) -> f64 {
        let matches: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        let total = self.a.len() + self.b.len();

        if total == 0 { 1.0 } else { 2.0 * matches as f64 / total as f64 }
    }
}

/// Similarity ratio between two strings.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    SequenceMatcher::new(&a, &b).ratio()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(ratio("I like yummy cake", "I like yummy cake"), 1.0);
        assert_eq!(ratio("", ""), 1.0);
    }

    #[test]
    fn empty_against_text_scores_zero() {
        assert_eq!(ratio("", "I like yummy cake"), 0.0);
        assert_eq!(ratio("abc", ""), 0.0);
    }

    #[test]
    fn known_ratios() {
        assert_eq!(ratio("abcd", "bcde"), 0.75);
        assert_eq!(ratio("yummy pie", "I like yummy cake"), 14.0 / 26.0);
        assert_eq!(ratio("yummy pie", "I like scary cake"), 6.0 / 26.0);
        assert_eq!(ratio("blabla", "I like yummy cake"), 4.0 / 23.0);
        assert_eq!(ratio("blabla", "I like scary cake"), 6.0 / 23.0);
        assert_eq!(ratio("abxcd", "abcd"), 8.0 / 9.0);
    }

    #[test]
    fn ratio_is_not_symmetric() {
        // "tide"/"diet": the first longest block differs by direction.
        assert_eq!(ratio("tide", "diet"), 0.25);
        assert_eq!(ratio("diet", "tide"), 0.5);
    }

    #[test]
    fn longest_match_prefers_earliest_block() {
        let a = chars(" abcd");
        let b = chars("abcd abcd");
        let matcher = SequenceMatcher::new(&a, &b);

        assert_eq!(matcher.find_longest_match(0, 5, 0, 9), Match { a: 0, b: 4, size: 5 });
    }

    #[test]
    fn matching_blocks_are_merged_and_sorted() {
        let a = chars("abxcd");
        let b = chars("abcd");
        let matcher = SequenceMatcher::new(&a, &b);

        assert_eq!(matcher.matching_blocks(), vec![Match { a: 0, b: 0, size: 2 }, Match { a: 3, b: 2, size: 2 }]);
    }

    #[test]
    fn popular_characters_do_not_seed_matches() {
        let b = format!("{}hello{}", "x".repeat(10), "y".repeat(200));

        assert_eq!(ratio("yyy", &b), 0.0);
        assert_eq!(ratio("hello yyy", &b), 10.0 / 224.0);

        let a = chars("yyy");
        let b = chars(&b);
        assert_eq!(SequenceMatcher::with_autojunk(&a, &b, false).ratio(), 6.0 / 218.0);
    }

    #[test]
    fn popular_characters_still_extend_matches() {
        let b = format!("{}z", "y".repeat(199));

        assert_eq!(ratio("yyy", &b), 6.0 / 203.0);
    }

    #[test]
    fn counts_unicode_scalars() {
        assert_eq!(ratio("héllo", "héllo"), 1.0);
        assert_eq!(ratio("日本語", "日本"), 0.8);
    }
}
