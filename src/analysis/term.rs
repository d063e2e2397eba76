use std::cmp::Ordering;

use ahash::RandomState;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};


/// TermFrequency struct
/// Counts the occurrences of each term inside one group (a document or a section).
/// Terms are kept in first-seen order, so iteration is deterministic.
///
/// # Examples
/// ```
/// use text_statistics::TermFrequency;
/// let mut term_freq = TermFrequency::new();
/// term_freq.add_term("term1");
/// term_freq.add_term("term2");
/// term_freq.add_term("term1");
///
/// assert_eq!(term_freq.term_count("term1"), 2);
/// assert_eq!(term_freq.total_term_count(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TermFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    term_count: IndexMap<String, u64, RandomState>,
    total_term_count: u64,
}

/// Implementation for adding terms
impl TermFrequency {
    /// Create a new TermFrequency
    pub fn new() -> Self {
        TermFrequency {
            term_count: IndexMap::with_hasher(RandomState::new()),
            total_term_count: 0,
        }
    }

    /// Add a term
    ///
    /// # Arguments
    /// * `term` - term to add
    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        self.add_term_n(term, 1)
    }

    /// Add a term `n` times
    #[inline]
    pub fn add_term_n(&mut self, term: &str, n: u64) -> &mut Self {
        if n == 0 {
            return self;
        }
        if let Some(count) = self.term_count.get_mut(term) {
            *count += n;
        } else {
            self.term_count.insert(term.to_string(), n);
        }
        self.total_term_count += n;
        self
    }

    /// Add multiple terms
    ///
    /// # Arguments
    /// * `terms` - Slice of terms to add
    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where T: AsRef<str>
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }

    /// Merge with another TermFrequency
    pub fn add_terms_from_freq(&mut self, other: &TermFrequency) -> &mut Self {
        for (term, count) in other.iter() {
            self.add_term_n(term, count);
        }
        self
    }
}

impl<T> From<&[T]> for TermFrequency
where
    T: AsRef<str>,
{
    fn from(terms: &[T]) -> Self {
        let mut tf = TermFrequency::new();
        tf.add_terms(terms);
        tf
    }
}

/// Implementation for retrieving information from TermFrequency
impl TermFrequency {
    /// Iterate over terms and their counts in first-seen order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.term_count.iter().map(|(term, &count)| (term.as_str(), count))
    }

    /// Occurrence count of a term (0 if absent)
    #[inline]
    pub fn term_count(&self, term: &str) -> u64 {
        self.term_count.get(term).copied().unwrap_or(0)
    }

    /// Sum of all counts
    #[inline]
    pub fn total_term_count(&self) -> u64 {
        self.total_term_count
    }

    /// Number of distinct terms
    #[inline]
    pub fn term_num(&self) -> usize {
        self.term_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.term_count.is_empty()
    }

    #[inline]
    pub fn contains_term(&self, term: &str) -> bool {
        self.term_count.contains_key(term)
    }

    /// Distinct terms in first-seen order
    #[inline]
    pub fn term_set_ref_str(&self) -> Vec<&str> {
        self.term_count.keys().map(|s| s.as_str()).collect()
    }

    /// Terms sorted by count (descending), ties by term (ascending)
    pub fn sorted_frequency_vector(&self) -> Vec<(&str, u64)> {
        let mut term_list: Vec<(&str, u64)> = self.iter().collect();
        term_list.sort_by(|a, b| frequency_order(a, b));
        term_list
    }

    /// 1-based rank of a term in `sorted_frequency_vector` order
    pub fn rank_of(&self, term: &str) -> Option<usize> {
        let count = *self.term_count.get(term)?;
        let ahead = self
            .iter()
            .filter(|&(other, other_count)| frequency_order(&(other, other_count), &(term, count)) == Ordering::Less)
            .count();
        Some(ahead + 1)
    }

    /// Distinct terms / total terms
    /// 1.0 means every term occurs once
    #[inline]
    pub fn unique_term_ratio(&self) -> f64 {
        if self.total_term_count == 0 {
            return 0.0;
        }
        self.term_count.len() as f64 / self.total_term_count as f64
    }
}

#[inline]
pub(crate) fn frequency_order(a: &(&str, u64), b: &(&str, u64)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_total() {
        let mut freq = TermFrequency::new();
        freq.add_terms(&["b", "a", "b", "c"]);
        assert_eq!(freq.term_count("b"), 2);
        assert_eq!(freq.term_count("zzz"), 0);
        assert_eq!(freq.total_term_count(), 4);
        assert_eq!(freq.term_num(), 3);
        assert_eq!(freq.term_set_ref_str(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_sorted_ties_break_lexically() {
        let freq = TermFrequency::from(&["c", "b", "a", "b", "c"][..]);
        assert_eq!(freq.sorted_frequency_vector(), vec![("b", 2), ("c", 2), ("a", 1)]);
        assert_eq!(freq.rank_of("b"), Some(1));
        assert_eq!(freq.rank_of("c"), Some(2));
        assert_eq!(freq.rank_of("a"), Some(3));
        assert_eq!(freq.rank_of("missing"), None);
    }

    #[test]
    fn test_add_term_n_zero_is_noop() {
        let mut freq = TermFrequency::new();
        freq.add_term_n("x", 0);
        assert!(freq.is_empty());
        assert_eq!(freq.unique_term_ratio(), 0.0);
    }
}
