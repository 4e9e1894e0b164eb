//! Scoring constants.
//!
//! These are process-wide and deliberately not exposed through request parameters.

/// Weight of the TF-IDF cosine similarity in the final score.
pub const TFIDF_WEIGHT: f64 = 0.72;

/// Weight of the fuzzy title ratio in the final score.
pub const FUZZY_WEIGHT: f64 = 0.22;

/// Added when a query token appears in the item's category.
pub const CATEGORY_BONUS: f64 = 0.12;

/// Added when a query token appears in the item's brand.
pub const BRAND_BONUS: f64 = 0.08;

/// Fuzzy ratios below this value do not make an item relevant on their own.
///
/// Unrelated strings routinely share a couple of characters, which yields ratios
/// around 0.1–0.3; they still add to the score of items that are relevant for
/// another reason.
pub const FUZZY_RELEVANCE_FLOOR: f64 = 0.4;

/// Closest query-word/title-word ratio from which a misspelled word makes an
/// item relevant on its own.
pub const FUZZY_WORD_RELEVANCE_FLOOR: f64 = 0.75;

/// Default and maximum number of results per query.
pub const MAX_RESULTS: usize = 30;

/// Decimal places kept for scores in responses.
pub const SCORE_DECIMALS: i32 = 4;

/// Decimal places kept for timings in diagnostics.
pub const TIMING_DECIMALS: i32 = 2;

/// Number of matched tokens listed in the explanation string.
pub const WHY_MAX_TOKENS: usize = 5;

/// Number of final scores reported in debug diagnostics.
pub const DEBUG_TOP_SCORES: usize = 5;

/// Second-string length from which frequent characters stop seeding fuzzy blocks.
pub const FUZZY_AUTOJUNK_MIN_LEN: usize = 200;

/// Round `value` to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
