use std::hash::{BuildHasher, Hash};

use ahash::{AHashMap, AHashSet, RandomState};
use indexmap::IndexMap;
use num::{Float, NumCast};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{analysis::counter::{TermCount, TermCounts}, error::{Result, TextStatsError}, utils::order::desc_nan_last};

pub trait TfIdfEngine<N>
where
    N: Float,
{
    /// TFの計算
    /// # Arguments
    /// * `count` - occurrences of the term in the document
    /// * `document_total` - number of terms in the document
    fn tf(count: u64, document_total: u64) -> N;

    /// IDFの計算
    /// # Arguments
    /// * `total_documents` - number of documents in the corpus
    /// * `documents_containing` - number of documents containing the term
    fn idf(total_documents: u64, documents_containing: u64) -> N;

    #[inline]
    fn tf_idf(tf: N, idf: N) -> N {
        tf * idf
    }
}

/// デフォルトのTF-IDFエンジン
/// tf = count / total, idf = ln(N / df)
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTfIdfEngine;

impl<N> TfIdfEngine<N> for DefaultTfIdfEngine
where
    N: Float,
{
    #[inline]
    fn tf(count: u64, document_total: u64) -> N {
        if document_total == 0 {
            return N::zero();
        }
        cast::<N>(count) / cast::<N>(document_total)
    }

    #[inline]
    fn idf(total_documents: u64, documents_containing: u64) -> N {
        // 全文書に出現する term は ln(1) = 0
        if documents_containing == 0 || documents_containing >= total_documents {
            return N::zero();
        }
        (cast::<N>(total_documents) / cast::<N>(documents_containing)).ln()
    }
}

#[inline]
fn cast<N: Float>(value: u64) -> N {
    <N as NumCast>::from(value).unwrap_or_else(N::nan)
}

/// TF-IDF record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfRecord<K, N = f64> {
    pub document: K,
    pub term: String,
    pub term_frequency: N,
    pub inverse_document_frequency: N,
    pub tf_idf: N,
}

/// TF-IDF values for every (document, term) of a corpus snapshot
///
/// Derived and read-only: rebuild it whenever the counts change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfIdfTable<K, N = f64> {
    pub records: Vec<TfIdfRecord<K, N>>,
    pub doc_num: u64,
}

impl<K, N> TfIdfTable<K, N>
where
    K: Clone + Hash + Eq,
    N: Float,
{
    /// TF-IDF from counted groups, one document per group
    pub fn from_counts(counts: &TermCounts<K>) -> Self {
        Self::from_counts_with::<DefaultTfIdfEngine>(counts)
    }

    pub fn from_counts_with<E>(counts: &TermCounts<K>) -> Self
    where
        E: TfIdfEngine<N>,
    {
        let corpus = counts.document_frequency();
        let doc_num = corpus.get_doc_num();
        let records = counts
            .groups()
            .flat_map(|(doc, freq)| {
                let total = freq.total_term_count();
                let corpus = &corpus;
                freq.iter().map(move |(term, count)| {
                    Self::record::<E>(doc, term, count, total, doc_num, corpus.get_term_count(term))
                })
            })
            .collect::<Vec<_>>();
        debug!(documents = doc_num, records = records.len(), "computed tf-idf");
        Self { records, doc_num }
    }

    /// TF-IDF from term-count records plus per-document totals
    ///
    /// The number of documents is the number of distinct documents in `records`.
    ///
    /// # Errors
    /// `DegenerateInput` if a record's document has no total, or a total
    /// smaller than the record's count, or a (document, term) pair occurs in
    /// more than one record.
    pub fn compute<E, S>(records: &[TermCount<K>], totals: &IndexMap<K, u64, S>) -> Result<Self>
    where
        E: TfIdfEngine<N>,
        S: BuildHasher,
    {
        let mut seen: AHashSet<(&K, &str)> = AHashSet::new();
        let mut documents: IndexMap<&K, (), RandomState> = IndexMap::with_hasher(RandomState::new());
        let mut containing: AHashMap<&str, u64> = AHashMap::new();
        for record in records.iter().filter(|r| r.count > 0) {
            documents.insert(&record.document, ());
            if !seen.insert((&record.document, record.term.as_str())) {
                return Err(TextStatsError::degenerate_input(format!(
                    "term {:?} appears in more than one record of the same document",
                    record.term
                )));
            }
            *containing.entry(record.term.as_str()).or_insert(0) += 1;
        }
        let doc_num = documents.len() as u64;

        let mut out = Vec::with_capacity(records.len());
        for record in records.iter().filter(|r| r.count > 0) {
            let total = *totals.get(&record.document).ok_or_else(|| {
                TextStatsError::degenerate_input(format!("no total for the document of term {:?}", record.term))
            })?;
            if total < record.count {
                return Err(TextStatsError::degenerate_input(format!(
                    "document total {} is smaller than the count {} of term {:?}",
                    total, record.count, record.term
                )));
            }
            let df = containing.get(record.term.as_str()).copied().unwrap_or(0);
            out.push(Self::record::<E>(&record.document, &record.term, record.count, total, doc_num, df));
        }
        Ok(Self { records: out, doc_num })
    }

    #[inline]
    fn record<E>(doc: &K, term: &str, count: u64, total: u64, doc_num: u64, df: u64) -> TfIdfRecord<K, N>
    where
        E: TfIdfEngine<N>,
    {
        let term_frequency = E::tf(count, total);
        let inverse_document_frequency = E::idf(doc_num, df);
        TfIdfRecord {
            document: doc.clone(),
            term: term.to_string(),
            term_frequency,
            inverse_document_frequency,
            tf_idf: E::tf_idf(term_frequency, inverse_document_frequency),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, document: &K, term: &str) -> Option<&TfIdfRecord<K, N>> {
        self.records.iter().find(|r| r.document == *document && r.term == term)
    }

    /// IDF of a term (same for every document)
    pub fn idf(&self, term: &str) -> Option<N> {
        self.records
            .iter()
            .find(|r| r.term == term)
            .map(|r| r.inverse_document_frequency)
    }

    /// Records sorted by tf-idf (descending), ties by term (ascending)
    pub fn sorted_records(&self) -> Vec<&TfIdfRecord<K, N>> {
        let mut sorted: Vec<&TfIdfRecord<K, N>> = self.records.iter().collect();
        sorted.sort_by(|a, b| desc_nan_last(a.tf_idf, b.tf_idf).then_with(|| a.term.cmp(&b.term)));
        sorted
    }

    /// Highest `n` tf-idf terms of each document, documents in first-seen order
    pub fn top_n_per_document(&self, n: usize) -> Vec<&TfIdfRecord<K, N>> {
        let mut by_doc: IndexMap<&K, Vec<&TfIdfRecord<K, N>>, RandomState> = IndexMap::with_hasher(RandomState::new());
        for record in &self.records {
            by_doc.entry(&record.document).or_default().push(record);
        }
        by_doc
            .into_values()
            .flat_map(|mut records| {
                records.sort_by(|a, b| desc_nan_last(a.tf_idf, b.tf_idf).then_with(|| a.term.cmp(&b.term)));
                records.into_iter().take(n)
            })
            .collect()
    }
}
