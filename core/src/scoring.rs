//! Category/brand bonuses and the linear score combiner.

use crate::config::{
    BRAND_BONUS, CATEGORY_BONUS, FUZZY_RELEVANCE_FLOOR, FUZZY_WEIGHT, FUZZY_WORD_RELEVANCE_FLOOR,
    TFIDF_WEIGHT, WHY_MAX_TOKENS,
};
use std::collections::BTreeSet;

/// Which exact-overlap bonuses fired for an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bonus {
    pub category: bool,
    pub brand: bool,
}

impl Bonus {
    pub fn value(&self) -> f64 {
        let mut total = 0.0;
        if self.category {
            total += CATEGORY_BONUS;
        }
        if self.brand {
            total += BRAND_BONUS;
        }
        total
    }

    pub fn any(&self) -> bool {
        self.category || self.brand
    }
}

/// Bonus for a query against an item's category and brand tokens. Pure set
/// intersection, no partial credit.
pub fn bonus(
    query_tokens: &BTreeSet<String>,
    category_tokens: &BTreeSet<String>,
    brand_tokens: &BTreeSet<String>,
) -> Bonus {
    Bonus {
        category: !query_tokens.is_disjoint(category_tokens),
        brand: !query_tokens.is_disjoint(brand_tokens),
    }
}

/// The three raw signals for one item, plus the word-level fuzzy ratio that
/// only takes part in the relevance decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreParts {
    pub tfidf: f64,
    pub fuzzy: f64,
    pub bonus: Bonus,
    pub closest_word: f64,
}

impl ScoreParts {
    /// `0.72·tfidf + 0.22·fuzzy + bonus`. Not clamped: bonuses may push it past 1.
    pub fn final_score(&self) -> f64 {
        TFIDF_WEIGHT * self.tfidf + FUZZY_WEIGHT * self.fuzzy + self.bonus.value()
    }

    fn fuzzy_counts(&self) -> bool {
        self.fuzzy >= FUZZY_RELEVANCE_FLOOR || self.closest_word >= FUZZY_WORD_RELEVANCE_FLOOR
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub parts: ScoreParts,
    pub final_score: f64,
    pub why: String,
}

/// Combine the signals of an item whose query/item token overlap is `matched`
/// (sorted). Returns `None` for items with no overlap, no meaningful fuzzy
/// similarity and no bonus.
pub fn combine(parts: ScoreParts, matched: &[&str]) -> Option<Scored> {
    if matched.is_empty() && !parts.fuzzy_counts() && !parts.bonus.any() {
        return None;
    }
    Some(Scored { parts, final_score: parts.final_score(), why: explain(&parts, matched) })
}

fn explain(parts: &ScoreParts, matched: &[&str]) -> String {
    let mut sections = Vec::with_capacity(3);
    if matched.is_empty() {
        sections.push("no token overlap".to_string());
        if parts.fuzzy_counts() {
            sections.push("fuzzy title match".to_string());
        }
    } else {
        let shown: Vec<&str> = matched.iter().take(WHY_MAX_TOKENS).copied().collect();
        sections.push(format!("matched: {}", shown.join(", ")));
    }
    if parts.bonus.category {
        sections.push("category match".to_string());
    }
    if parts.bonus.brand {
        sections.push("brand match".to_string());
    }
    sections.join(" | ")
}
