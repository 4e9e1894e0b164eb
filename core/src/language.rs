//! Stopword and synonym tables.
//!
//! A [`LanguagePack`] is plain configuration data handed to the
//! [`Tokenizer`](crate::Tokenizer). Every entry goes through the same text
//! normalization as the documents it applies to, and synonym folding is a
//! single step: a target may not itself be folded into something else.

use crate::error::LanguagePackError;
use crate::tokenizer::normalize_text;
use lazy_static::lazy_static;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

lazy_static! {
    static ref FRENCH_ENGLISH: LanguagePack = {
        let stopwords: &[&str] = &[
            "a", "an", "and", "au", "aux", "avec", "ce", "ces", "dans", "de", "des", "du",
            "elle", "en", "et", "for", "il", "ils", "in", "is", "la", "le", "les", "mais",
            "of", "on", "or", "ou", "par", "pas", "pour", "que", "qui", "sur", "the", "to",
            "un", "une", "with",
        ];
        let synonyms: &[(&str, &str)] = &[
            ("basket", "chaussure"),
            ("baskets", "chaussure"),
            ("sneaker", "chaussure"),
            ("sneakers", "chaussure"),
            ("chaussures", "chaussure"),
            ("chaussur", "chaussure"),
            ("tel", "telephone"),
            ("mobile", "telephone"),
            ("smartphone", "telephone"),
            ("telephones", "telephone"),
            ("ordi", "ordinateur"),
            ("laptop", "ordinateur"),
            ("notebook", "ordinateur"),
            ("ordinateurs", "ordinateur"),
            ("cadeaux", "cadeau"),
            ("anniv", "anniversaire"),
            ("runing", "running"),
        ];
        LanguagePack::new(stopwords.iter().copied(), synonyms.iter().copied())
            .expect("built-in language pack is valid")
    };
}

#[derive(Debug, Clone, Default)]
pub struct LanguagePack {
    stopwords: HashSet<String>,
    synonyms: HashMap<String, String>,
}

/// On-disk shape of a language pack.
#[derive(Deserialize)]
struct RawPack {
    #[serde(default)]
    stopwords: Vec<String>,
    #[serde(default)]
    synonyms: HashMap<String, String>,
}

impl LanguagePack {
    /// Build a pack, normalizing every word and rejecting chained synonyms.
    pub fn new<S, T, I, J>(stopwords: I, synonyms: J) -> Result<Self, LanguagePackError>
    where
        S: AsRef<str>,
        T: AsRef<str>,
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = (T, T)>,
    {
        let stopwords: HashSet<String> = stopwords
            .into_iter()
            .map(|w| normalize_text(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();

        let mut folded: Vec<(String, String)> = synonyms
            .into_iter()
            .map(|(from, to)| (normalize_text(from.as_ref()), normalize_text(to.as_ref())))
            .filter(|(from, to)| !from.is_empty() && !to.is_empty() && from != to)
            .collect();
        folded.sort();

        let synonyms: HashMap<String, String> = folded.iter().cloned().collect();
        for (from, to) in &folded {
            if let Some(next) = synonyms.get(to) {
                return Err(LanguagePackError::ChainedSynonym {
                    source_word: from.clone(),
                    target: to.clone(),
                    next: next.clone(),
                });
            }
        }

        Ok(Self { stopwords, synonyms })
    }

    /// The built-in bilingual French/English product pack.
    pub fn french_english() -> Self {
        FRENCH_ENGLISH.clone()
    }

    /// Parse `{"stopwords": [...], "synonyms": {"from": "to"}}`.
    pub fn from_json_str(json: &str) -> Result<Self, LanguagePackError> {
        let raw: RawPack = serde_json::from_str(json)?;
        Self::new(raw.stopwords, raw.synonyms)
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Canonical form of `token`: its synonym target, or itself.
    pub fn canonical<'a>(&'a self, token: &'a str) -> &'a str {
        self.synonyms.get(token).map(String::as_str).unwrap_or(token)
    }

    pub fn stopword_count(&self) -> usize {
        self.stopwords.len()
    }

    pub fn synonym_count(&self) -> usize {
        self.synonyms.len()
    }
}
