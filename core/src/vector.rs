//! Sparse TF-IDF vectors.

use crate::vocabulary::Vocabulary;
use crate::TermId;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Sparse vector keyed by term id, entries sorted by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(TermId, f64)>,
}

impl SparseVector {
    pub fn entries(&self) -> &[(TermId, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn weight(&self, id: TermId) -> f64 {
        self.entries
            .binary_search_by_key(&id, |&(tid, _)| tid)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product over shared term ids (merge of the two sorted entry lists).
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_id, a_w) = self.entries[i];
            let (b_id, b_w) = other.entries[j];
            match a_id.cmp(&b_id) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Cosine similarity of two unit (or zero) vectors, kept inside `[0, 1]`.
    pub fn cosine(&self, other: &SparseVector) -> f64 {
        self.dot(other).clamp(0.0, 1.0)
    }
}

/// Term-frequency × idf vector of `tokens`, L2-normalized.
///
/// Tokens missing from the vocabulary are skipped. If nothing is left the zero
/// vector is returned, meaning "no lexical overlap".
pub fn vectorize<S: AsRef<str>>(tokens: &[S], vocabulary: &Vocabulary) -> SparseVector {
    let mut tf: BTreeMap<TermId, u32> = BTreeMap::new();
    for token in tokens {
        if let Some(tid) = vocabulary.term_id(token.as_ref()) {
            *tf.entry(tid).or_insert(0) += 1;
        }
    }

    let mut entries: Vec<(TermId, f64)> = tf
        .into_iter()
        .map(|(tid, count)| (tid, count as f64 * vocabulary.idf(tid)))
        .collect();

    let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm == 0.0 {
        return SparseVector::default();
    }
    for (_, w) in entries.iter_mut() {
        *w /= norm;
    }
    SparseVector { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(raw: &[&[&str]]) -> Vocabulary {
        let docs: Vec<Vec<String>> =
            raw.iter().map(|d| d.iter().map(|t| t.to_string()).collect()).collect();
        Vocabulary::build(&docs).unwrap()
    }

    #[test]
    fn vectors_have_unit_norm() {
        let v = vocab(&[&["rouge", "nike"], &["noire"]]);
        let vec = vectorize(&["rouge", "rouge", "nike"], &v);
        assert!((vec.norm() - 1.0).abs() < 1e-12);
        assert!(vec.weight(0) > vec.weight(1));
    }

    #[test]
    fn unknown_tokens_give_the_zero_vector() {
        let v = vocab(&[&["rouge"]]);
        let vec = vectorize(&["xyzabc123"], &v);
        assert!(vec.is_zero());
        assert_eq!(vec.norm(), 0.0);
        assert_eq!(vec.cosine(&vectorize(&["rouge"], &v)), 0.0);
    }

    #[test]
    fn self_similarity_is_one() {
        let v = vocab(&[&["chaussure", "course", "rouge"], &["chaussure", "noire"]]);
        let doc = vectorize(&["chaussure", "course", "rouge"], &v);
        assert!((doc.cosine(&doc) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn dot_only_counts_shared_ids() {
        let v = vocab(&[&["a1", "b1", "c1"]]);
        let left = vectorize(&["a1", "b1"], &v);
        let right = vectorize(&["b1", "c1"], &v);
        let expected = left.weight(1) * right.weight(1);
        assert!((left.dot(&right) - expected).abs() < 1e-12);
    }
}
