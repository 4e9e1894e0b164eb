use crate::error::BuildError;
use crate::TermId;
use std::collections::{HashMap, HashSet};

/// Token dictionary with smoothed inverse document frequencies.
///
/// Ids are assigned in first-seen order across the corpus and never change
/// after [`Vocabulary::build`].
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    dictionary: HashMap<String, TermId>,
    terms: Vec<String>,
    df: Vec<u32>,
    idf: Vec<f64>,
    num_docs: usize,
}

impl Vocabulary {
    /// Build the vocabulary from one token sequence per document.
    ///
    /// `idf(t) = ln((1 + N) / (1 + df(t))) + 1`, which stays strictly positive
    /// even for tokens present in every document.
    pub fn build<D: AsRef<[String]>>(documents: &[D]) -> Result<Self, BuildError> {
        if documents.is_empty() {
            return Err(BuildError::EmptyCorpus);
        }

        let mut dictionary: HashMap<String, TermId> = HashMap::new();
        let mut terms: Vec<String> = Vec::new();
        let mut df: Vec<u32> = Vec::new();
        for tokens in documents {
            let mut seen_in_doc: HashSet<TermId> = HashSet::new();
            for token in tokens.as_ref() {
                let tid = match dictionary.get(token) {
                    Some(&tid) => tid,
                    None => {
                        let tid = terms.len() as TermId;
                        dictionary.insert(token.clone(), tid);
                        terms.push(token.clone());
                        df.push(0);
                        tid
                    }
                };
                if seen_in_doc.insert(tid) {
                    df[tid as usize] += 1;
                }
            }
        }

        let n = documents.len() as f64;
        let idf = df
            .iter()
            .map(|&df_t| ((1.0 + n) / (1.0 + df_t as f64)).ln() + 1.0)
            .collect();

        Ok(Self { dictionary, terms, df, idf, num_docs: documents.len() })
    }

    pub fn term_id(&self, token: &str) -> Option<TermId> {
        self.dictionary.get(token).copied()
    }

    pub fn term(&self, id: TermId) -> Option<&str> {
        self.terms.get(id as usize).map(String::as_str)
    }

    pub fn idf(&self, id: TermId) -> f64 {
        self.idf.get(id as usize).copied().unwrap_or(0.0)
    }

    pub fn document_frequency(&self, id: TermId) -> u32 {
        self.df.get(id as usize).copied().unwrap_or(0)
    }

    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
