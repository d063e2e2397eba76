//! Sentiment lexicons joined against term counts.
//!
//! A lexicon is supplied from outside (bing-style polarity lists, nrc-style
//! category sets or afinn-style integer scores). It never changes the
//! statistics themselves, it only annotates counted terms.

use std::hash::Hash;

use ahash::RandomState;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::counter::TermCounts;

pub const POSITIVE_LABEL: &str = "positive";
pub const NEGATIVE_LABEL: &str = "negative";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Negative,
}

/// Lexicon entry for one term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentValue {
    Label(Polarity),
    Labels(Vec<String>),
    Score(i32),
}

/// Term to sentiment mapping, in one of three shapes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lexicon {
    /// positive / negative
    Categorical(#[serde(with = "indexmap::map::serde_seq")] IndexMap<String, Polarity, RandomState>),
    /// set of category names per term
    MultiLabel(#[serde(with = "indexmap::map::serde_seq")] IndexMap<String, Vec<String>, RandomState>),
    /// signed integer scale
    Scale(#[serde(with = "indexmap::map::serde_seq")] IndexMap<String, i32, RandomState>),
}

/// A counted term found in the lexicon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentMatch<K> {
    pub document: K,
    pub term: String,
    pub count: u64,
    pub value: SentimentValue,
}

/// Sentiment totals of one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSentiment<K> {
    pub document: K,
    pub positive: u64,
    pub negative: u64,
    /// positive - negative
    pub net: i64,
}

impl Lexicon {
    pub fn categorical<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Polarity)>,
        S: Into<String>,
    {
        Lexicon::Categorical(entries.into_iter().map(|(t, p)| (t.into(), p)).collect())
    }

    pub fn multi_label<I, S, L>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<L>)>,
        S: Into<String>,
        L: Into<String>,
    {
        Lexicon::MultiLabel(
            entries
                .into_iter()
                .map(|(t, labels)| (t.into(), labels.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }

    pub fn scale<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        Lexicon::Scale(entries.into_iter().map(|(t, s)| (t.into(), s)).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Lexicon::Categorical(m) => m.len(),
            Lexicon::MultiLabel(m) => m.len(),
            Lexicon::Scale(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lookup(&self, term: &str) -> Option<SentimentValue> {
        match self {
            Lexicon::Categorical(m) => m.get(term).map(|p| SentimentValue::Label(*p)),
            Lexicon::MultiLabel(m) => m.get(term).map(|l| SentimentValue::Labels(l.clone())),
            Lexicon::Scale(m) => m.get(term).map(|s| SentimentValue::Score(*s)),
        }
    }

    /// Inner join of counted terms with the lexicon, by term
    pub fn join<K>(&self, counts: &TermCounts<K>) -> Vec<SentimentMatch<K>>
    where
        K: Clone + Hash + Eq,
    {
        let matches: Vec<SentimentMatch<K>> = counts
            .groups()
            .flat_map(|(doc, freq)| {
                freq.iter().filter_map(move |(term, count)| {
                    self.lookup(term).map(|value| SentimentMatch {
                        document: doc.clone(),
                        term: term.to_string(),
                        count,
                        value,
                    })
                })
            })
            .collect();
        debug!(matches = matches.len(), lexicon = self.len(), "joined lexicon");
        matches
    }

    /// Positive / negative totals per group
    ///
    /// Categorical and multi-label entries add their count to the matching
    /// side. Scale entries add count x |score|. Groups without any match are
    /// left out, as in an inner join.
    pub fn net_sentiment<K>(&self, counts: &TermCounts<K>) -> Vec<GroupSentiment<K>>
    where
        K: Clone + Hash + Eq,
    {
        let mut by_group: IndexMap<K, GroupSentiment<K>, RandomState> = IndexMap::with_hasher(RandomState::new());
        for m in self.join(counts) {
            let entry = by_group.entry(m.document.clone()).or_insert_with(|| GroupSentiment {
                document: m.document.clone(),
                positive: 0,
                negative: 0,
                net: 0,
            });
            let (pos, neg) = weight(&m.value, m.count);
            entry.positive += pos;
            entry.negative += neg;
        }
        by_group
            .into_values()
            .map(|mut g| {
                g.net = g.positive as i64 - g.negative as i64;
                g
            })
            .collect()
    }

    /// Total count per label (multi-label) or polarity (categorical)
    ///
    /// Scale lexicons are bucketed by score.
    pub fn label_counts<K>(&self, counts: &TermCounts<K>) -> IndexMap<String, u64, RandomState>
    where
        K: Clone + Hash + Eq,
    {
        let mut labels: IndexMap<String, u64, RandomState> = IndexMap::with_hasher(RandomState::new());
        for m in self.join(counts) {
            match m.value {
                SentimentValue::Label(p) => *labels.entry(polarity_label(p).to_string()).or_insert(0) += m.count,
                SentimentValue::Labels(ls) => {
                    for l in ls {
                        *labels.entry(l).or_insert(0) += m.count;
                    }
                }
                SentimentValue::Score(s) => *labels.entry(s.to_string()).or_insert(0) += m.count,
            }
        }
        labels
    }
}

#[inline]
fn polarity_label(p: Polarity) -> &'static str {
    match p {
        Polarity::Positive => POSITIVE_LABEL,
        Polarity::Negative => NEGATIVE_LABEL,
    }
}

#[inline]
fn weight(value: &SentimentValue, count: u64) -> (u64, u64) {
    match value {
        SentimentValue::Label(Polarity::Positive) => (count, 0),
        SentimentValue::Label(Polarity::Negative) => (0, count),
        SentimentValue::Labels(labels) => {
            let pos = labels.iter().any(|l| l == POSITIVE_LABEL);
            let neg = labels.iter().any(|l| l == NEGATIVE_LABEL);
            (if pos { count } else { 0 }, if neg { count } else { 0 })
        }
        SentimentValue::Score(s) if *s > 0 => (count * s.unsigned_abs() as u64, 0),
        SentimentValue::Score(s) => (0, count * s.unsigned_abs() as u64),
    }
}
