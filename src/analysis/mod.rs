pub mod config;
pub mod cooccur;
pub mod corpus;
pub mod counter;
pub mod lexicon;
pub mod section;
pub mod snapshot;
pub mod term;
pub mod tfidf;
pub mod token;

use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    analysis::{
        config::AnalysisConfig,
        cooccur::{Cooccurrence, Correlation, TermIncidence},
        counter::{StopWords, TermCounts},
        section::Sectioner,
        tfidf::TfIdfTable,
        token::{RawDocument, Tokenizer},
    },
    error::Result,
};

/// Text analyzer
/// Runs raw text -> tokens -> term counts -> {tf-idf, co-occurrence, correlation}.
///
/// Holds no corpus state between runs: each call to `analyze` works on the
/// documents it is given and nothing else.
#[derive(Debug, Clone)]
pub struct TextAnalyzer {
    config: AnalysisConfig,
    tokenizer: Tokenizer,
    sectioner: Sectioner,
    stop_words: StopWords,
}

/// Derived records of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport<K>
where
    K: Hash + Eq,
{
    /// per-document counts, stop words removed
    pub term_counts: TermCounts<K>,
    /// one document per input document
    pub tf_idf: TfIdfTable<K>,
    /// pairs sharing a section
    pub cooccurrences: Vec<Cooccurrence>,
    /// phi over sections, terms below `min_term_frequency` excluded
    pub correlations: Vec<Correlation>,
}

impl<K> AnalysisReport<K>
where
    K: Hash + Eq + Serialize,
{
    /// CBOR bytes of the whole report
    pub fn to_snapshot(&self) -> Result<Vec<u8>> {
        snapshot::to_snapshot(self)
    }
}

impl TextAnalyzer {
    /// Create a new analyzer
    ///
    /// # Errors
    /// `InvalidConfiguration` if the config does not validate
    pub fn new(config: AnalysisConfig, stop_words: StopWords) -> Result<Self> {
        config.validate()?;
        let tokenizer = Tokenizer::new(config.tokenizer.clone())?;
        let sectioner = Sectioner::new(config.section_size)?;
        Ok(Self {
            config,
            tokenizer,
            sectioner,
            stop_words,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Term counts per document
    pub fn count<K, T, I>(&self, documents: I) -> TermCounts<K>
    where
        I: IntoIterator,
        I::Item: Into<RawDocument<K, T>>,
        K: Clone + Hash + Eq,
        T: AsRef<str>,
    {
        let tokens = self.tokenizer.tokenize(documents);
        TermCounts::from_tokens(tokens, Some(&self.stop_words), self.config.stop_word_match)
    }

    /// Term incidence over fixed-size line sections
    pub fn section_incidence<K, T, I>(&self, documents: I) -> TermIncidence<section::SectionKey<K>>
    where
        I: IntoIterator,
        I::Item: Into<RawDocument<K, T>>,
        K: Clone + Hash + Eq,
        T: AsRef<str>,
    {
        let sectioner = self.sectioner;
        let sections = documents
            .into_iter()
            .map(Into::into)
            .filter_map(|doc: RawDocument<K, T>| doc.id.map(|id| (id, doc.text)))
            .flat_map(move |(id, text)| sectioner.split(id, text.as_ref()));
        let tokens = self
            .stop_words
            .retain_tokens(self.tokenizer.tokenize(sections), self.config.stop_word_match);
        TermIncidence::from_tokens(tokens).with_min_frequency(self.config.min_term_frequency)
    }

    /// Run the full pipeline
    ///
    /// # Errors
    /// `DegenerateInput` from the correlation step under
    /// [`cooccur::DegeneratePolicy::Fail`]
    pub fn analyze<K, T, I>(&self, documents: I) -> Result<AnalysisReport<K>>
    where
        I: IntoIterator,
        I::Item: Into<RawDocument<K, T>>,
        K: Clone + Hash + Eq,
        T: AsRef<str>,
    {
        let documents: Vec<RawDocument<K, T>> = documents.into_iter().map(Into::into).collect();
        let borrowed = || {
            documents
                .iter()
                .map(|doc| RawDocument::new(doc.id.clone(), doc.text.as_ref()))
        };

        let term_counts = self.count(borrowed());
        let tf_idf = TfIdfTable::from_counts(&term_counts);

        let incidence = self.section_incidence(borrowed());
        let cooccurrences = incidence.pairwise_count();
        let correlations = incidence.pairwise_correlation(self.config.degenerate)?;

        debug!(
            documents = term_counts.group_num(),
            tf_idf = tf_idf.len(),
            sections = incidence.group_num(),
            pairs = cooccurrences.len(),
            correlations = correlations.len(),
            "analysis finished"
        );
        Ok(AnalysisReport {
            term_counts,
            tf_idf,
            cooccurrences,
            correlations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::cooccur::DegeneratePolicy;

    #[test]
    fn test_analyze_small_corpus() {
        let config = AnalysisConfig {
            section_size: 1,
            degenerate: DegeneratePolicy::Nan,
            ..AnalysisConfig::default()
        };
        let stop: StopWords = ["the"].into_iter().collect();
        let analyzer = TextAnalyzer::new(config, stop).unwrap();
        let report = analyzer
            .analyze(vec![("a", "the cat\nthe dog"), ("b", "the cat")])
            .unwrap();

        assert_eq!(report.term_counts.count(&"a", "the"), 0);
        assert_eq!(report.term_counts.group_total(&"a"), 2);
        assert_eq!(report.tf_idf.idf("cat"), Some(0.0));
        // sections: a/0 {cat}, a/1 {dog}, b/0 {cat}
        assert!(report.cooccurrences.is_empty());
        assert_eq!(report.correlations.len(), 1);
        assert!((report.correlations[0].phi_coefficient + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnalysisConfig { section_size: 0, ..AnalysisConfig::default() };
        assert!(TextAnalyzer::new(config, StopWords::new()).is_err());
    }
}
