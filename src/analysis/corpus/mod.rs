use ahash::RandomState;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// keep document count and the number of documents containing each term
///
/// Built once from a corpus snapshot, then only read.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Corpus {
    /// number of documents added
    pub doc_num: u64,
    /// documents containing each term
    #[serde(with = "indexmap::map::serde_seq")]
    pub term_counts: IndexMap<Box<str>, u64, RandomState>,
}

impl Corpus {
    /// Create a new instance
    pub fn new() -> Self {
        Self {
            doc_num: 0,
            term_counts: IndexMap::with_hasher(RandomState::new()),
        }
    }

    /// Add a document's distinct terms to the corpus
    ///
    /// The caller passes each term once per document.
    pub fn add_set<T>(&mut self, terms: &[T])
    where
        T: AsRef<str>,
    {
        self.doc_num += 1;
        for term in terms {
            if let Some(count) = self.term_counts.get_mut(term.as_ref()) {
                *count += 1;
            } else {
                self.term_counts.insert(term.as_ref().into(), 1);
            }
        }
    }

    /// Get the number of documents in the corpus
    #[inline]
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Get the number of documents containing the term
    #[inline]
    pub fn get_term_count(&self, term: &str) -> u64 {
        self.term_counts.get(term).copied().unwrap_or(0)
    }

    /// Get the current vocabulary size (number of unique terms)
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_counts.len()
    }

    /// Terms present in every document
    pub fn ubiquitous_terms(&self) -> Vec<&str> {
        self.term_counts
            .iter()
            .filter(|&(_, &count)| count == self.doc_num)
            .map(|(term, _)| &**term)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_frequency() {
        let mut corpus = Corpus::new();
        corpus.add_set(&["cat", "dog"]);
        corpus.add_set(&["cat"]);
        assert_eq!(corpus.get_doc_num(), 2);
        assert_eq!(corpus.get_term_count("cat"), 2);
        assert_eq!(corpus.get_term_count("dog"), 1);
        assert_eq!(corpus.get_term_count("bird"), 0);
        assert_eq!(corpus.vocab_size(), 2);
        assert_eq!(corpus.ubiquitous_terms(), vec!["cat"]);
    }
}
