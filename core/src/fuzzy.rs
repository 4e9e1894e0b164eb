//! Character-level similarity from longest matching blocks.
//!
//! The ratio is `2·M / T`: `T` is the total length of both strings and `M` the
//! number of characters covered by matching blocks, found by taking the longest
//! common block (earliest in the first string, then in the second), and
//! recursing on what lies left and right of it. When the second string is long,
//! characters that are very frequent in it do not seed blocks but can still
//! extend one. Fixtures compare literal ratio values, so this must stay exactly
//! this algorithm.

use crate::config::FUZZY_AUTOJUNK_MIN_LEN;
use std::collections::{HashMap, HashSet};

/// Similarity of `a` and `b` in `[0, 1]`, after lowercasing and collapsing
/// whitespace. Symmetric: the shorter string is always matched against the
/// longer one.
pub fn fuzzy_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = normalize_for_fuzzy(a).chars().collect();
    let b: Vec<char> = normalize_for_fuzzy(b).chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let (first, second) = if (a.len(), &a) <= (b.len(), &b) { (&a, &b) } else { (&b, &a) };
    let matched = BlockMatcher::new(first, second).matched_chars();
    2.0 * matched as f64 / total as f64
}

/// Best [`fuzzy_ratio`] between any query word and any title word, `0.0` when
/// either side has no words. Unlike the whole-title ratio it does not shrink as
/// the title gets longer, so a single misspelled word still scores high.
pub fn closest_word_ratio<Q, T>(query_words: Q, title_words: T) -> f64
where
    Q: IntoIterator,
    Q::Item: AsRef<str>,
    T: IntoIterator + Clone,
    T::Item: AsRef<str>,
{
    query_words
        .into_iter()
        .flat_map(|q| {
            title_words.clone().into_iter().map(move |t| fuzzy_ratio(q.as_ref(), t.as_ref()))
        })
        .fold(0.0, f64::max)
}

fn normalize_for_fuzzy(s: &str) -> String {
    s.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each non-popular character in `b`, ascending.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }
        if b.len() >= FUZZY_AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            let popular: HashSet<char> = b2j
                .iter()
                .filter(|(_, js)| js.len() > ntest)
                .map(|(&c, _)| c)
                .collect();
            b2j.retain(|c, _| !popular.contains(c));
        }
        Self { a, b, b2j }
    }

    /// Longest block `(i, j, size)` with `a[i..i+size] == b[j..j+size]` inside
    /// the given ranges.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        // j2len[j] = length of the block ending at a[i-1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j > 0 { j2len.get(&(j - 1)).copied().unwrap_or(0) } else { 0 };
                    let k = prev + 1;
                    next_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        // Popular characters never seed a block but may extend one.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }
        (best_i, best_j, best_size)
    }

    /// Total size of all matching blocks.
    fn matched_chars(&self) -> usize {
        let mut total = 0;
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
        }
        total
    }
}
