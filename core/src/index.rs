use crate::config::{round_to, DEBUG_TOP_SCORES, MAX_RESULTS, SCORE_DECIMALS, TIMING_DECIMALS};
use crate::error::BuildError;
use crate::filter::Filters;
use crate::fuzzy::{closest_word_ratio, fuzzy_ratio};
use crate::item::{CatalogRecord, Item};
use crate::request::{DebugScores, Diagnostics, SearchHit, SearchResponse};
use crate::scoring::{bonus, combine, ScoreParts, Scored};
use crate::tokenizer::Tokenizer;
use crate::vector::{vectorize, SparseVector};
use crate::vocabulary::Vocabulary;
use crate::DocId;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Attach raw component scores to every hit and top scores to diagnostics.
    pub debug: bool,
    /// Maximum number of hits, at most [`MAX_RESULTS`].
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { debug: false, limit: MAX_RESULTS }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    item: Item,
    vector: SparseVector,
    tokens: BTreeSet<String>,
    title_tokens: BTreeSet<String>,
    category_tokens: BTreeSet<String>,
    brand_tokens: BTreeSet<String>,
}

/// Frozen TF-IDF index over a corpus snapshot.
///
/// Built once by [`Index::build`]; every query after that is a pure read, so an
/// `Index` can be shared across threads behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct Index {
    tokenizer: Tokenizer,
    vocabulary: Vocabulary,
    entries: Vec<Entry>,
    categories: Vec<String>,
    build_time: Duration,
}

impl Index {
    /// Tokenize the corpus, build the vocabulary and cache one unit vector per item.
    ///
    /// Records without a title are skipped; the build fails if no record has
    /// a title at all or nothing usable is left.
    pub fn build(records: Vec<CatalogRecord>, tokenizer: Tokenizer) -> Result<Self, BuildError> {
        let start = Instant::now();
        if records.is_empty() {
            return Err(BuildError::EmptyCorpus);
        }
        if records.iter().all(|r| r.title.as_deref().map_or(true, |t| t.trim().is_empty())) {
            return Err(BuildError::MissingTitle);
        }

        let total_records = records.len();
        let mut items: Vec<Item> = Vec::with_capacity(total_records);
        for record in records {
            if let Some(item) = Item::from_record(items.len() as DocId, record) {
                items.push(item);
            }
        }
        if items.len() < total_records {
            tracing::warn!(skipped = total_records - items.len(), "skipped records without a title");
        }

        let documents: Vec<Vec<String>> =
            items.iter().map(|item| tokenizer.tokenize(&item.searchable_text())).collect();
        let vocabulary = Vocabulary::build(&documents)?;

        let categories: Vec<String> = items
            .iter()
            .filter(|item| !item.category.is_empty())
            .map(|item| item.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let entries: Vec<Entry> = items
            .into_iter()
            .zip(documents)
            .map(|(item, tokens)| Entry {
                vector: vectorize(&tokens, &vocabulary),
                tokens: tokens.into_iter().collect(),
                title_tokens: tokenizer.token_set(&item.title),
                category_tokens: tokenizer.token_set(&item.category),
                brand_tokens: tokenizer.token_set(&item.brand),
                item,
            })
            .collect();

        let build_time = start.elapsed();
        tracing::info!(
            num_items = entries.len(),
            num_terms = vocabulary.len(),
            build_ms = build_time.as_secs_f64() * 1000.0,
            "index built"
        );
        Ok(Self { tokenizer, vocabulary, entries, categories, build_time })
    }

    /// Score every item passing `filters` against `query`.
    ///
    /// Hits are ordered by final score, ties keeping corpus order, and cut to
    /// `options.limit`. A query without tokens yields no hits.
    pub fn search(&self, query: &str, filters: &Filters, options: SearchOptions) -> SearchResponse {
        let start = Instant::now();
        let query = query.trim();
        let query_tokens = self.tokenizer.tokenize(query);

        let mut scored: Vec<(&Entry, Scored)> = Vec::new();
        if !query_tokens.is_empty() {
            let query_vector = vectorize(&query_tokens, &self.vocabulary);
            let query_set: BTreeSet<String> = query_tokens.iter().cloned().collect();
            scored = filters
                .apply(self.entries.iter().map(|entry| &entry.item))
                .map(|item| &self.entries[item.doc_id as usize])
                .filter_map(|entry| {
                    let parts = ScoreParts {
                        tfidf: query_vector.cosine(&entry.vector),
                        fuzzy: fuzzy_ratio(query, &entry.item.title),
                        bonus: bonus(&query_set, &entry.category_tokens, &entry.brand_tokens),
                        closest_word: closest_word_ratio(&query_set, &entry.title_tokens),
                    };
                    let matched: Vec<&str> =
                        query_set.intersection(&entry.tokens).map(String::as_str).collect();
                    combine(parts, &matched).map(|s| (entry, s))
                })
                .collect();
            // stable: equal scores keep corpus order
            scored.sort_by(|a, b| b.1.final_score.total_cmp(&a.1.final_score));
            scored.truncate(options.limit.min(MAX_RESULTS));
        }

        let top_scores: Option<Vec<f64>> = options.debug.then(|| {
            scored
                .iter()
                .take(DEBUG_TOP_SCORES)
                .map(|(_, s)| round_to(s.final_score, SCORE_DECIMALS))
                .collect()
        });
        let results: Vec<SearchHit> = scored
            .into_iter()
            .map(|(entry, s)| SearchHit {
                item: entry.item.clone(),
                score: round_to(s.final_score, SCORE_DECIMALS),
                debug_scores: options.debug.then(|| DebugScores {
                    tfidf: round_to(s.parts.tfidf, SCORE_DECIMALS),
                    fuzzy: round_to(s.parts.fuzzy, SCORE_DECIMALS),
                    bonus: round_to(s.parts.bonus.value(), SCORE_DECIMALS),
                    final_score: round_to(s.final_score, SCORE_DECIMALS),
                }),
                why: s.why,
            })
            .collect();

        let query_time = start.elapsed();
        tracing::debug!(
            tokens = query_tokens.len(),
            hits = results.len(),
            query_ms = query_time.as_secs_f64() * 1000.0,
            "query scored"
        );
        SearchResponse {
            results,
            diagnostics: Diagnostics {
                query_tokens,
                index_build_ms: round_to(self.build_time.as_secs_f64() * 1000.0, TIMING_DECIMALS),
                query_time_ms: round_to(query_time.as_secs_f64() * 1000.0, TIMING_DECIMALS),
                total_products: self.entries.len(),
                top_scores,
            },
        }
    }

    /// Unit TF-IDF vector of arbitrary text against the frozen vocabulary.
    pub fn vectorize_text(&self, text: &str) -> SparseVector {
        vectorize(&self.tokenizer.tokenize(text), &self.vocabulary)
    }

    pub fn document_vector(&self, doc_id: DocId) -> Option<&SparseVector> {
        self.entries.get(doc_id as usize).map(|entry| &entry.vector)
    }

    pub fn item(&self, doc_id: DocId) -> Option<&Item> {
        self.entries.get(doc_id as usize).map(|entry| &entry.item)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.entries.iter().map(|entry| &entry.item)
    }

    /// Distinct non-empty categories, sorted.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn build_time(&self) -> Duration {
        self.build_time
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shoes() -> Vec<CatalogRecord> {
        vec![
            CatalogRecord::titled("Chaussure de course rouge Nike").with_category("Chaussures").with_brand("Nike"),
            CatalogRecord::titled("Basket noire Adidas").with_category("Chaussures").with_brand("Adidas"),
            CatalogRecord::titled("Telephone Samsung Galaxy").with_category("Telephone").with_brand("Samsung"),
        ]
    }

    #[test]
    fn build_rejects_empty_and_titleless_corpora() {
        assert_eq!(Index::build(vec![], Tokenizer::default()).unwrap_err(), BuildError::EmptyCorpus);
        let untitled = vec![CatalogRecord { brand: Some("Nike".into()), ..CatalogRecord::default() }];
        assert_eq!(Index::build(untitled, Tokenizer::default()).unwrap_err(), BuildError::MissingTitle);
        let blank = vec![CatalogRecord::titled("  ")];
        assert_eq!(Index::build(blank, Tokenizer::default()).unwrap_err(), BuildError::MissingTitle);
    }

    #[test]
    fn titleless_records_are_skipped() {
        let mut records = shoes();
        records.insert(1, CatalogRecord::default());
        let index = Index::build(records, Tokenizer::default()).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.item(1).unwrap().title, "Basket noire Adidas");
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        let index = Index::build(shoes(), Tokenizer::default()).unwrap();
        assert_eq!(index.categories(), &["Chaussures".to_string(), "Telephone".to_string()]);
    }

    #[test]
    fn stopword_query_has_no_hits() {
        let index = Index::build(shoes(), Tokenizer::default()).unwrap();
        let response = index.search("de la pour", &Filters::default(), SearchOptions::default());
        assert!(response.results.is_empty());
        assert!(response.diagnostics.query_tokens.is_empty());
        assert_eq!(response.diagnostics.total_products, 3);
    }

    #[test]
    fn debug_adds_component_scores() {
        let index = Index::build(shoes(), Tokenizer::default()).unwrap();
        let options = SearchOptions { debug: true, ..SearchOptions::default() };
        let response = index.search("nike", &Filters::default(), options);
        let hit = &response.results[0];
        let scores = hit.debug_scores.as_ref().unwrap();
        assert_eq!(scores.final_score, hit.score);
        assert_eq!(scores.bonus, 0.08);
        assert_eq!(response.diagnostics.top_scores.as_deref(), Some(&[hit.score][..]));

        let plain = index.search("nike", &Filters::default(), SearchOptions::default());
        assert!(plain.results[0].debug_scores.is_none());
        assert!(plain.diagnostics.top_scores.is_none());
    }

    #[test]
    fn filters_apply_before_scoring() {
        let records = vec![
            CatalogRecord::titled("Mug rouge").with_price(9.0),
            CatalogRecord::titled("Mug bleu").with_price(15.0),
            CatalogRecord::titled("Mug vert"),
        ];
        let index = Index::build(records, Tokenizer::default()).unwrap();
        let filters = Filters { max_price: Some(10.0), ..Filters::default() };
        let response = index.search("mug", &filters, SearchOptions::default());
        let titles: Vec<&str> = response.results.iter().map(|h| h.item.title.as_str()).collect();
        assert_eq!(titles, vec!["Mug rouge"]);
    }

    #[test]
    fn ties_keep_corpus_order() {
        let records = vec![
            CatalogRecord::titled("Mug cadeau"),
            CatalogRecord::titled("Mug cadeau"),
            CatalogRecord::titled("Mug cadeau"),
        ];
        let index = Index::build(records, Tokenizer::default()).unwrap();
        let response = index.search("cadeau", &Filters::default(), SearchOptions::default());
        let ids: Vec<DocId> = response.results.iter().map(|h| h.item.doc_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn limit_truncates() {
        let records = (0..40).map(|i| CatalogRecord::titled(format!("Mug modele {i}"))).collect();
        let index = Index::build(records, Tokenizer::default()).unwrap();
        let response = index.search("mug", &Filters::default(), SearchOptions::default());
        assert_eq!(response.results.len(), MAX_RESULTS);
        let two = index.search("mug", &Filters::default(), SearchOptions { debug: false, limit: 2 });
        assert_eq!(two.results.len(), 2);
    }
}
