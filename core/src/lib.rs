//! Lexical scoring engine for product catalogs.
//!
//! Items are tokenized once into a frozen TF-IDF [`Index`]; queries are scored by
//! cosine similarity, a character-level fuzzy ratio against the title, and
//! category/brand bonuses.

pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod fuzzy;
pub mod index;
pub mod item;
pub mod language;
pub mod request;
pub mod scoring;
pub mod tokenizer;
pub mod vector;
pub mod vocabulary;

pub type TermId = u32;
pub type DocId = u32;

pub use engine::{EngineStatus, SearchEngine};
pub use error::{BuildError, LanguagePackError, SearchError, ValidationError};
pub use filter::Filters;
pub use index::{Index, SearchOptions};
pub use item::{CatalogRecord, Item};
pub use language::LanguagePack;
pub use request::{DebugScores, Diagnostics, SearchHit, SearchRequest, SearchResponse};
pub use tokenizer::Tokenizer;
