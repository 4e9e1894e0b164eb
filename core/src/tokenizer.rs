use crate::language::LanguagePack;
use std::collections::BTreeSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercase, strip diacritics, turn everything outside `[a-z0-9]` into a single
/// space and trim.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;
    for c in lowered.nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Splits text into canonical tokens using an injected [`LanguagePack`].
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pack: LanguagePack,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(LanguagePack::french_english())
    }
}

impl Tokenizer {
    pub fn new(pack: LanguagePack) -> Self {
        Self { pack }
    }

    pub fn pack(&self) -> &LanguagePack {
        &self.pack
    }

    /// Tokenize text into canonical tokens, keeping order and duplicates.
    ///
    /// Each word is folded through the synonym table first; the folded token is
    /// dropped if it is a stopword or a single character.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = normalize_text(text);
        normalized
            .split_whitespace()
            .map(|word| self.pack.canonical(word))
            .filter(|token| token.len() > 1 && !self.pack.is_stopword(token))
            .map(str::to_string)
            .collect()
    }

    /// Distinct tokens of `text`, ordered for stable output.
    pub fn token_set(&self, text: &str) -> BTreeSet<String> {
        self.tokenize(text).into_iter().collect()
    }
}
