use std::hash::Hash;

use ahash::{AHashSet, RandomState};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use stop_words::{get, LANGUAGE};
use tracing::debug;

use crate::analysis::{corpus::Corpus, term::{frequency_order, TermFrequency}, token::{split_ngram, TokenRecord}};

/// How a term is compared against a stop-word list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopWordMatch {
    /// the whole term must be a stop word
    #[default]
    Whole,
    /// any space-separated word of the term (n-grams)
    AnyComponent,
}

/// Stop-word set
///
/// Always passed explicitly into the counting calls, there is no process-wide list.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: AHashSet<String>,
}

impl StopWords {
    /// Empty list
    pub fn new() -> Self {
        Self { words: AHashSet::new() }
    }

    /// English list from the `stop-words` crate
    pub fn english() -> Self {
        let words: Vec<String> = get(LANGUAGE::English);
        Self::from_iter(words)
    }

    pub fn insert<S: Into<String>>(&mut self, word: S) -> &mut Self {
        self.words.insert(word.into());
        self
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Should this term be dropped?
    #[inline]
    pub fn rejects(&self, term: &str, matching: StopWordMatch) -> bool {
        match matching {
            StopWordMatch::Whole => self.contains(term),
            StopWordMatch::AnyComponent => split_ngram(term).any(|w| self.contains(w)),
        }
    }

    /// Drop stop-word tokens from a token stream
    pub fn retain_tokens<'a, K, I>(&'a self, tokens: I, matching: StopWordMatch) -> impl Iterator<Item = TokenRecord<K>> + 'a
    where
        I: IntoIterator<Item = TokenRecord<K>>,
        I::IntoIter: 'a,
        K: 'a,
    {
        tokens.into_iter().filter(move |t| !self.rejects(&t.term, matching))
    }
}

impl<S: Into<String>> FromIterator<S> for StopWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Term-count record
/// (document_id, term, count), unique per (document, term)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount<K> {
    pub document: K,
    pub term: String,
    pub count: u64,
}

/// Term counts for every group of a token stream
///
/// A group is a document id by default, or any key derived from the token
/// (a section id, a chapter...) with [`TermCounts::from_tokens_by`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "K: Serialize + Hash + Eq", deserialize = "K: Deserialize<'de> + Hash + Eq"))]
pub struct TermCounts<K>
where
    K: Hash + Eq,
{
    #[serde(with = "indexmap::map::serde_seq")]
    groups: IndexMap<K, TermFrequency, RandomState>,
}

impl<K> TermCounts<K>
where
    K: Clone + Hash + Eq,
{
    /// Count tokens grouped by their document id
    ///
    /// # Arguments
    /// * `tokens` - token stream
    /// * `stop_words` - optional stop-word filter
    /// * `matching` - how terms are checked against `stop_words`
    pub fn from_tokens<I>(tokens: I, stop_words: Option<&StopWords>, matching: StopWordMatch) -> Self
    where
        I: IntoIterator<Item = TokenRecord<K>>,
    {
        Self::from_tokens_by(tokens, stop_words, matching, |t: &TokenRecord<K>| t.document.clone())
    }
}

impl<G> TermCounts<G>
where
    G: Clone + Hash + Eq,
{
    /// Count tokens grouped by a caller-derived key
    pub fn from_tokens_by<K, I, F>(tokens: I, stop_words: Option<&StopWords>, matching: StopWordMatch, mut key: F) -> Self
    where
        I: IntoIterator<Item = TokenRecord<K>>,
        F: FnMut(&TokenRecord<K>) -> G,
    {
        let mut groups: IndexMap<G, TermFrequency, RandomState> = IndexMap::with_hasher(RandomState::new());
        let mut dropped: u64 = 0;
        for token in tokens {
            if stop_words.is_some_and(|s| s.rejects(&token.term, matching)) {
                dropped += 1;
                continue;
            }
            groups
                .entry(key(&token))
                .or_insert_with(TermFrequency::new)
                .add_term(&token.term);
        }
        debug!(groups = groups.len(), stop_words_dropped = dropped, "counted terms");
        Self { groups }
    }

    pub fn group_num(&self) -> usize {
        self.groups.len()
    }

    pub fn get(&self, group: &G) -> Option<&TermFrequency> {
        self.groups.get(group)
    }

    /// Groups in first-seen order
    pub fn groups(&self) -> impl Iterator<Item = (&G, &TermFrequency)> {
        self.groups.iter()
    }

    /// Count of a term within a group
    pub fn count(&self, group: &G, term: &str) -> u64 {
        self.groups.get(group).map_or(0, |f| f.term_count(term))
    }

    /// Number of counted tokens in a group
    pub fn group_total(&self, group: &G) -> u64 {
        self.groups.get(group).map_or(0, |f| f.total_term_count())
    }

    /// Per-group totals
    pub fn totals(&self) -> IndexMap<G, u64, RandomState> {
        self.groups
            .iter()
            .map(|(g, f)| (g.clone(), f.total_term_count()))
            .collect()
    }

    /// Records in first-seen order
    pub fn records(&self) -> Vec<TermCount<G>> {
        self.groups
            .iter()
            .flat_map(|(g, f)| {
                f.iter().map(move |(term, count)| TermCount {
                    document: g.clone(),
                    term: term.to_string(),
                    count,
                })
            })
            .collect()
    }

    /// Records sorted by count (descending), ties by term (ascending)
    /// then by group order
    pub fn sorted_records(&self) -> Vec<TermCount<G>> {
        let mut records = self.records();
        // stable sort なので group 順は保たれる
        records.sort_by(|a, b| frequency_order(&(a.term.as_str(), a.count), &(b.term.as_str(), b.count)));
        records
    }

    /// Top `n` terms of each group
    pub fn top_n_per_group(&self, n: usize) -> Vec<TermCount<G>> {
        self.groups
            .iter()
            .flat_map(|(g, f)| {
                f.sorted_frequency_vector()
                    .into_iter()
                    .take(n)
                    .map(move |(term, count)| TermCount {
                        document: g.clone(),
                        term: term.to_string(),
                        count,
                    })
            })
            .collect()
    }

    /// Counts over all groups
    pub fn corpus_totals(&self) -> TermFrequency {
        let mut total = TermFrequency::new();
        for freq in self.groups.values() {
            total.add_terms_from_freq(freq);
        }
        total
    }

    /// Document-frequency table: one document per group
    pub fn document_frequency(&self) -> Corpus {
        let mut corpus = Corpus::new();
        for freq in self.groups.values() {
            corpus.add_set(&freq.term_set_ref_str());
        }
        corpus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Tokenizer;

    #[test]
    fn test_counts_match_token_stream() {
        let tokenizer = Tokenizer::words();
        let docs = vec![("a", "the cat and the dog"), ("b", "a dog")];
        let tokens: Vec<_> = tokenizer.tokenize(docs.clone()).collect();
        let counts = TermCounts::from_tokens(tokens.clone(), None, StopWordMatch::Whole);

        for (doc, _) in &docs {
            let emitted = tokens.iter().filter(|t| t.document == *doc).count() as u64;
            assert_eq!(counts.group_total(doc), emitted);
        }
        assert_eq!(counts.count(&"a", "the"), 2);
    }

    #[test]
    fn test_stop_words_applied() {
        let stop: StopWords = ["the", "and", "a"].into_iter().collect();
        let tokenizer = Tokenizer::words();
        let tokens = tokenizer.tokenize(vec![(1, "the cat and the dog")]);
        let counts = TermCounts::from_tokens(tokens, Some(&stop), StopWordMatch::Whole);
        assert_eq!(counts.group_total(&1), 2);
        assert_eq!(counts.count(&1, "the"), 0);
    }

    #[test]
    fn test_any_component_match_for_bigrams() {
        let stop: StopWords = ["of", "the"].into_iter().collect();
        let tokenizer = Tokenizer::ngrams(2).unwrap();
        let tokens = tokenizer.tokenize(vec![(1, "the white whale of ahab")]);
        let counts = TermCounts::from_tokens(tokens, Some(&stop), StopWordMatch::AnyComponent);
        let terms: Vec<_> = counts.records().into_iter().map(|r| r.term).collect();
        assert_eq!(terms, vec!["white whale"]);
    }

    #[test]
    fn test_sorted_records_tie_break() {
        let tokenizer = Tokenizer::words();
        let tokens = tokenizer.tokenize(vec![(1, "b a c a b")]);
        let counts = TermCounts::from_tokens(tokens, None, StopWordMatch::Whole);
        let sorted: Vec<_> = counts
            .sorted_records()
            .into_iter()
            .map(|r| (r.term, r.count))
            .collect();
        assert_eq!(sorted, vec![("a".to_string(), 2), ("b".to_string(), 2), ("c".to_string(), 1)]);
    }

    #[test]
    fn test_group_by_derived_key() {
        let tokenizer = Tokenizer::words();
        let tokens = tokenizer.tokenize(vec![(1, "x y"), (2, "x"), (3, "y")]);
        let counts = TermCounts::from_tokens_by(tokens, None, StopWordMatch::Whole, |t| t.document % 2);
        assert_eq!(counts.group_num(), 2);
        assert_eq!(counts.count(&1, "x"), 1);
        assert_eq!(counts.count(&1, "y"), 2);
        assert_eq!(counts.count(&0, "x"), 1);
    }

    #[test]
    fn test_top_n_and_corpus_totals() {
        let tokenizer = Tokenizer::words();
        let tokens = tokenizer.tokenize(vec![("a", "x x y z"), ("b", "z z")]);
        let counts = TermCounts::from_tokens(tokens, None, StopWordMatch::Whole);
        let top: Vec<_> = counts.top_n_per_group(1).into_iter().map(|r| (r.document, r.term)).collect();
        assert_eq!(top, vec![("a", "x".to_string()), ("b", "z".to_string())]);
        assert_eq!(counts.corpus_totals().term_count("z"), 3);
        assert_eq!(counts.document_frequency().get_term_count("z"), 2);
    }

    #[test]
    fn test_english_stop_words_loaded() {
        let stop = StopWords::english();
        assert!(!stop.is_empty());
        assert!(stop.contains("the"));
    }
}
