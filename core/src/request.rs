//! Request and response shapes exchanged with the transport layer.

use crate::config::MAX_RESULTS;
use crate::error::ValidationError;
use crate::filter::Filters;
use crate::index::SearchOptions;
use crate::item::Item;
use serde::{Deserialize, Serialize};

/// A numeric filter value as it arrives over the wire: a JSON number or a
/// numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericParam {
    Number(f64),
    Text(String),
}

impl NumericParam {
    /// `Ok(None)` for a blank string, an error for anything non-numeric.
    fn resolve(&self, field: &'static str) -> Result<Option<f64>, ValidationError> {
        match self {
            NumericParam::Number(n) => Ok(Some(*n)),
            NumericParam::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| ValidationError::InvalidNumber { field, value: s.clone() })
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub query: String,
    pub min_price: Option<NumericParam>,
    pub max_price: Option<NumericParam>,
    pub min_rating: Option<NumericParam>,
    pub category: Option<String>,
    pub debug: bool,
    pub limit: Option<usize>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRequest {
    pub query: String,
    pub filters: Filters,
    pub options: SearchOptions,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), ..Self::default() }
    }

    pub fn parse(&self) -> Result<ParsedRequest, ValidationError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }

        let resolve = |param: &Option<NumericParam>, field| match param {
            Some(p) => p.resolve(field),
            None => Ok(None),
        };
        let filters = Filters {
            min_price: resolve(&self.min_price, "min_price")?,
            max_price: resolve(&self.max_price, "max_price")?,
            min_rating: resolve(&self.min_rating, "min_rating")?,
            category: self
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        };
        filters.validate()?;

        let limit = match self.limit {
            Some(0) => return Err(ValidationError::ZeroLimit),
            Some(n) => n.min(MAX_RESULTS),
            None => MAX_RESULTS,
        };

        Ok(ParsedRequest {
            query: query.to_string(),
            filters,
            options: SearchOptions { debug: self.debug, limit },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugScores {
    pub tfidf: f64,
    pub fuzzy: f64,
    pub bonus: f64,
    #[serde(rename = "final")]
    pub final_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub item: Item,
    pub score: f64,
    pub why: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_scores: Option<DebugScores>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub query_tokens: Vec<String>,
    pub index_build_ms: f64,
    pub query_time_ms: f64,
    pub total_products: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_scores: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    pub diagnostics: Diagnostics,
}
