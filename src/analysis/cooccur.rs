//! Pairwise co-occurrence counts and phi-coefficient correlations.
//!
//! Terms are reduced to their presence in groups (sections, documents, ...).
//! A pair co-occurs once per group in which both terms appear, and the phi
//! coefficient is the correlation of the two "present in group" indicators.
//!
//! # Precondition
//!
//! Correlation is only meaningful for terms observed often enough. Restrict
//! the terms with [`TermIncidence::with_min_frequency`] before calling
//! [`TermIncidence::pairwise_correlation`]: nothing is filtered implicitly.

use std::cmp::Ordering;
use std::hash::Hash;

use ahash::{AHashMap, RandomState};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{analysis::token::TokenRecord, error::{Result, TextStatsError}, utils::order::desc_nan_last};

/// Correlation needs at least two groups
pub const MIN_GROUPS: usize = 2;

/// What to do with a pair whose phi coefficient is undefined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// stop with `DegenerateInput`
    #[default]
    Fail,
    /// report NaN for that pair
    Nan,
}

/// Co-occurrence record, `term_a < term_b`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooccurrence {
    pub term_a: String,
    pub term_b: String,
    pub joint_count: u64,
}

/// Correlation record, `term_a < term_b`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub term_a: String,
    pub term_b: String,
    pub phi_coefficient: f64,
}

/// 2x2 contingency table over groups
///
/// |            | b present | b absent |
/// |------------|-----------|----------|
/// | a present  | n11       | n10      |
/// | a absent   | n01       | n00      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContingencyTable {
    pub n11: u64,
    pub n10: u64,
    pub n01: u64,
    pub n00: u64,
}

impl ContingencyTable {
    /// Build from group counts
    ///
    /// # Arguments
    /// * `groups` - total number of groups
    /// * `with_a` - groups containing a
    /// * `with_b` - groups containing b
    /// * `with_both` - groups containing both
    ///
    /// # Errors
    /// `DegenerateInput` if the counts cannot come from one set of groups
    pub fn from_counts(groups: u64, with_a: u64, with_b: u64, with_both: u64) -> Result<Self> {
        let n10 = with_a.checked_sub(with_both);
        let n01 = with_b.checked_sub(with_both);
        let n00 = n10
            .zip(n01)
            .and_then(|(n10, n01)| groups.checked_sub(with_both)?.checked_sub(n10)?.checked_sub(n01));
        match (n10, n01, n00) {
            (Some(n10), Some(n01), Some(n00)) => Ok(Self { n11: with_both, n10, n01, n00 }),
            _ => Err(TextStatsError::degenerate_input(format!(
                "inconsistent group counts: groups={}, with_a={}, with_b={}, with_both={}",
                groups, with_a, with_b, with_both
            ))),
        }
    }

    pub fn total(&self) -> u64 {
        self.n11 + self.n10 + self.n01 + self.n00
    }

    /// Swap the roles of a and b
    pub fn transpose(&self) -> Self {
        Self {
            n11: self.n11,
            n10: self.n01,
            n01: self.n10,
            n00: self.n00,
        }
    }

    /// φ = (n11·n00 − n10·n01) / sqrt(n1·n0·n·0·n·1)
    ///
    /// # Errors
    /// `DegenerateInput` when a marginal is zero, i.e. a term is present in
    /// every group or in none.
    pub fn phi(&self) -> Result<f64> {
        let a_present = (self.n11 + self.n10) as u128;
        let a_absent = (self.n01 + self.n00) as u128;
        let b_present = (self.n11 + self.n01) as u128;
        let b_absent = (self.n10 + self.n00) as u128;
        // 整数で積を取るので a, b を入れ替えても同じ値になる
        let denominator = a_present * a_absent * b_present * b_absent;
        if denominator == 0 {
            return Err(TextStatsError::degenerate_input(format!(
                "phi coefficient undefined for {:?}: a term is present in all or none of the groups",
                self
            )));
        }
        let numerator = (self.n11 as i128) * (self.n00 as i128) - (self.n10 as i128) * (self.n01 as i128);
        let phi = numerator as f64 / (denominator as f64).sqrt();
        Ok(phi.clamp(-1.0, 1.0))
    }

    #[inline]
    fn phi_with(&self, policy: DegeneratePolicy) -> Result<f64> {
        match policy {
            DegeneratePolicy::Fail => self.phi(),
            DegeneratePolicy::Nan => Ok(self.phi().unwrap_or(f64::NAN)),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Incidence {
    /// sorted, distinct group indices
    groups: Vec<usize>,
    /// token occurrences over all groups
    occurrences: u64,
}

/// Which groups each term occurs in
///
/// Groups are indexed in first-seen order, terms likewise.
#[derive(Debug, Clone)]
pub struct TermIncidence<G>
where
    G: Hash + Eq,
{
    groups: IndexSet<G, RandomState>,
    terms: IndexMap<String, Incidence, RandomState>,
}

impl<G> TermIncidence<G>
where
    G: Clone + Hash + Eq,
{
    /// Use each token's document id as its group
    pub fn from_tokens<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = TokenRecord<G>>,
    {
        Self::from_tokens_by(tokens, |t: &TokenRecord<G>| t.document.clone())
    }

    /// Group tokens by a caller-derived key
    pub fn from_tokens_by<K, I, F>(tokens: I, mut key: F) -> Self
    where
        I: IntoIterator<Item = TokenRecord<K>>,
        F: FnMut(&TokenRecord<K>) -> G,
    {
        let mut groups: IndexSet<G, RandomState> = IndexSet::with_hasher(RandomState::new());
        let mut terms: IndexMap<String, Incidence, RandomState> = IndexMap::with_hasher(RandomState::new());
        for token in tokens {
            let (group, _) = groups.insert_full(key(&token));
            let entry = terms.entry(token.term).or_default();
            if entry.groups.last() != Some(&group) {
                entry.groups.push(group);
            }
            entry.occurrences += 1;
        }
        for entry in terms.values_mut() {
            entry.groups.sort_unstable();
            entry.groups.dedup();
        }
        debug!(groups = groups.len(), terms = terms.len(), "built term incidence");
        Self { groups, terms }
    }

    /// Keep only terms with at least `min_frequency` token occurrences
    ///
    /// Group indices are unchanged, so groups left without a term still count
    /// toward n00.
    pub fn with_min_frequency(mut self, min_frequency: u64) -> Self {
        let before = self.terms.len();
        self.terms.retain(|_, entry| entry.occurrences >= min_frequency);
        debug!(min_frequency, before, after = self.terms.len(), "filtered terms by frequency");
        self
    }

    pub fn group_num(&self) -> usize {
        self.groups.len()
    }

    pub fn term_num(&self) -> usize {
        self.terms.len()
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    /// Token occurrences of a term
    pub fn occurrences(&self, term: &str) -> u64 {
        self.terms.get(term).map_or(0, |e| e.occurrences)
    }

    /// Number of groups containing a term
    pub fn group_count(&self, term: &str) -> u64 {
        self.terms.get(term).map_or(0, |e| e.groups.len() as u64)
    }

    /// Contingency table of two terms, `None` if either is unknown
    pub fn contingency(&self, term_a: &str, term_b: &str) -> Option<ContingencyTable> {
        let a = self.terms.get(term_a)?;
        let b = self.terms.get(term_b)?;
        Some(self.table(a, b))
    }

    #[inline]
    fn table(&self, a: &Incidence, b: &Incidence) -> ContingencyTable {
        // どちらのグループ列も self.groups の部分集合なので引き算は負にならない
        let n11 = intersection_len(&a.groups, &b.groups);
        let n10 = a.groups.len() as u64 - n11;
        let n01 = b.groups.len() as u64 - n11;
        ContingencyTable {
            n11,
            n10,
            n01,
            n00: self.groups.len() as u64 - n11 - n10 - n01,
        }
    }

    /// Phi coefficient of two terms
    ///
    /// # Errors
    /// `DegenerateInput` for an unknown term, fewer than two groups or a zero
    /// denominator.
    pub fn correlation(&self, term_a: &str, term_b: &str) -> Result<f64> {
        self.check_group_num()?;
        let table = self.contingency(term_a, term_b).ok_or_else(|| {
            TextStatsError::degenerate_input(format!("{:?} or {:?} was not observed", term_a, term_b))
        })?;
        table.phi()
    }

    /// Joint counts for every unordered pair of distinct terms sharing a group
    ///
    /// Ordered by joint_count (descending), then term_a, then term_b.
    pub fn pairwise_count(&self) -> Vec<Cooccurrence> {
        // group -> term indices
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); self.groups.len()];
        for (term_idx, entry) in self.terms.values().enumerate() {
            for &group in &entry.groups {
                members[group].push(term_idx);
            }
        }

        let mut joint: AHashMap<(usize, usize), u64> = AHashMap::new();
        for terms in &members {
            for (i, &a) in terms.iter().enumerate() {
                for &b in &terms[i + 1..] {
                    *joint.entry((a.min(b), a.max(b))).or_insert(0) += 1;
                }
            }
        }

        let mut pairs: Vec<Cooccurrence> = joint
            .into_iter()
            .filter_map(|((a, b), joint_count)| {
                let (term_a, term_b) = self.ordered_pair(a, b)?;
                Some(Cooccurrence { term_a, term_b, joint_count })
            })
            .collect();
        pairs.sort_by(|x, y| {
            y.joint_count
                .cmp(&x.joint_count)
                .then_with(|| x.term_a.cmp(&y.term_a))
                .then_with(|| x.term_b.cmp(&y.term_b))
        });
        debug!(pairs = pairs.len(), "counted co-occurring pairs");
        pairs
    }

    /// Phi coefficient for every unordered pair of distinct terms
    ///
    /// Callers should first drop rare terms with [`Self::with_min_frequency`].
    /// Ordered by phi (descending, NaN last), then term_a, then term_b.
    ///
    /// # Errors
    /// `DegenerateInput` when there are fewer than two groups, or with
    /// [`DegeneratePolicy::Fail`] as soon as one pair is undefined.
    pub fn pairwise_correlation(&self, policy: DegeneratePolicy) -> Result<Vec<Correlation>> {
        if policy == DegeneratePolicy::Fail {
            self.check_group_num()?;
        }

        // 辞書順に並べて a < b のペアだけ計算する
        let mut sorted: Vec<(&str, &Incidence)> = self.terms.iter().map(|(t, e)| (t.as_str(), e)).collect();
        sorted.sort_by(|x, y| x.0.cmp(y.0));

        let mut correlations = Vec::with_capacity(sorted.len() * sorted.len().saturating_sub(1) / 2);
        for (i, &(term_a, a)) in sorted.iter().enumerate() {
            for &(term_b, b) in &sorted[i + 1..] {
                let phi = self.table(a, b).phi_with(policy).map_err(|_| {
                    TextStatsError::degenerate_input(format!(
                        "phi coefficient undefined for ({:?}, {:?}): a term is present in all or none of the {} groups",
                        term_a,
                        term_b,
                        self.groups.len()
                    ))
                })?;
                correlations.push(Correlation {
                    term_a: term_a.to_string(),
                    term_b: term_b.to_string(),
                    phi_coefficient: phi,
                });
            }
        }
        correlations.sort_by(|x, y| {
            desc_nan_last(x.phi_coefficient, y.phi_coefficient)
                .then_with(|| x.term_a.cmp(&y.term_a))
                .then_with(|| x.term_b.cmp(&y.term_b))
        });
        debug!(pairs = correlations.len(), "computed phi correlations");
        Ok(correlations)
    }

    fn check_group_num(&self) -> Result<()> {
        if self.groups.len() < MIN_GROUPS {
            return Err(TextStatsError::degenerate_input(format!(
                "correlation needs at least {} groups, got {}",
                MIN_GROUPS,
                self.groups.len()
            )));
        }
        Ok(())
    }

    fn ordered_pair(&self, a: usize, b: usize) -> Option<(String, String)> {
        let (term_a, _) = self.terms.get_index(a)?;
        let (term_b, _) = self.terms.get_index(b)?;
        match term_a.cmp(term_b) {
            Ordering::Greater => Some((term_b.clone(), term_a.clone())),
            _ => Some((term_a.clone(), term_b.clone())),
        }
    }
}

/// Pairs involving `term`, in their original order
pub fn pairs_with<'a>(pairs: &'a [Cooccurrence], term: &'a str) -> impl Iterator<Item = &'a Cooccurrence> + 'a {
    pairs.iter().filter(move |p| p.term_a == term || p.term_b == term)
}

#[inline]
fn intersection_len(a: &[usize], b: &[usize]) -> u64 {
    let (mut i, mut j, mut n) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                n += 1;
                i += 1;
                j += 1;
            }
        }
    }
    n
}
