use serde::{Deserialize, Serialize};
use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Result, TextStatsError};

/// Tokenization unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenMode {
    /// single words
    #[default]
    Words,
    /// overlapping word n-grams of size `n`
    NGrams { n: usize },
    /// whole sentences
    Sentences,
}

/// Tokenizer settings
///
/// Case folding and punctuation stripping are on by default.
/// Turning both off gives the pass-through mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    pub mode: TokenMode,
    pub lowercase: bool,
    pub strip_punctuation: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            mode: TokenMode::Words,
            lowercase: true,
            strip_punctuation: true,
        }
    }
}

impl TokenizerConfig {
    pub fn validate(&self) -> Result<()> {
        if let TokenMode::NGrams { n } = self.mode {
            if n < 1 {
                return Err(TextStatsError::invalid_configuration(format!(
                    "n-gram size must be at least 1 (got {})",
                    n
                )));
            }
        }
        Ok(())
    }
}

/// One raw input document
///
/// `id` is optional so that suppliers can hand over records with a missing key.
/// Such records are skipped by the tokenizer, as are records whose text is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument<K, T = String> {
    pub id: Option<K>,
    pub text: T,
}

impl<K, T> RawDocument<K, T> {
    pub fn new(id: Option<K>, text: T) -> Self {
        Self { id, text }
    }
}

impl<K, T> From<(K, T)> for RawDocument<K, T> {
    fn from((id, text): (K, T)) -> Self {
        Self { id: Some(id), text }
    }
}

/// Token record
/// (document_id, term, position)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord<K> {
    pub document: K,
    pub term: String,
    /// token index within the document, starting at 0
    pub position: usize,
}

/// Tokenizer
///
/// # Examples
/// ```
/// use text_statistics::Tokenizer;
///
/// let tokenizer = Tokenizer::ngrams(2).unwrap();
/// let terms: Vec<String> = tokenizer
///     .tokenize(vec![("doc1", "a b c")])
///     .map(|t| t.term)
///     .collect();
/// assert_eq!(terms, vec!["a b", "b c"]);
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    /// Create a tokenizer from a config
    ///
    /// # Errors
    /// `InvalidConfiguration` if the n-gram size is 0
    pub fn new(config: TokenizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn words() -> Self {
        Self { config: TokenizerConfig::default() }
    }

    pub fn ngrams(n: usize) -> Result<Self> {
        Self::new(TokenizerConfig {
            mode: TokenMode::NGrams { n },
            ..TokenizerConfig::default()
        })
    }

    pub fn sentences() -> Self {
        Self {
            config: TokenizerConfig {
                mode: TokenMode::Sentences,
                ..TokenizerConfig::default()
            },
        }
    }

    /// Disable case folding and punctuation stripping
    pub fn pass_through(mut self) -> Self {
        self.config.lowercase = false;
        self.config.strip_punctuation = false;
        self
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Tokenize a sequence of documents
    ///
    /// Lazy: documents are split one at a time as the output is consumed.
    /// Documents without an id or with blank text are dropped silently.
    ///
    /// # Arguments
    /// * `documents` - `(id, text)` pairs or `RawDocument`s
    pub fn tokenize<'a, K, T, I>(&'a self, documents: I) -> impl Iterator<Item = TokenRecord<K>> + 'a
    where
        I: IntoIterator + 'a,
        I::IntoIter: 'a,
        I::Item: Into<RawDocument<K, T>>,
        K: Clone + 'a,
        T: AsRef<str> + 'a,
    {
        documents
            .into_iter()
            .map(Into::into)
            .filter_map(|doc: RawDocument<K, T>| {
                let Some(id) = doc.id else {
                    trace!("skipping document without id");
                    return None;
                };
                if doc.text.as_ref().trim().is_empty() {
                    trace!("skipping document with empty text");
                    return None;
                }
                Some((id, doc.text))
            })
            .flat_map(move |(id, text)| {
                self.tokenize_text(text.as_ref())
                    .into_iter()
                    .enumerate()
                    .map(move |(position, term)| TokenRecord {
                        document: id.clone(),
                        term,
                        position,
                    })
            })
    }

    /// Split a single text into terms
    pub fn tokenize_text(&self, text: &str) -> Vec<String> {
        match self.config.mode {
            TokenMode::Words => self.split_words(text).into_iter().map(|w| self.fold(w)).collect(),
            TokenMode::NGrams { n } => {
                let words = self.split_words(text);
                // windows() は n == 0 で panic するが validate 済み
                words
                    .windows(n)
                    .map(|gram| self.fold(&gram.join(" ")))
                    .collect()
            }
            TokenMode::Sentences => text
                .unicode_sentences()
                .filter_map(|sentence| {
                    let sentence = if self.config.strip_punctuation {
                        sentence.unicode_words().collect::<Vec<_>>().join(" ")
                    } else {
                        sentence.trim().to_string()
                    };
                    if sentence.is_empty() {
                        None
                    } else {
                        Some(self.fold(&sentence))
                    }
                })
                .collect(),
        }
    }

    #[inline]
    fn split_words<'t>(&self, text: &'t str) -> Vec<&'t str> {
        if self.config.strip_punctuation {
            text.unicode_words().collect()
        } else {
            text.split_whitespace().collect()
        }
    }

    #[inline]
    fn fold(&self, term: &str) -> String {
        if self.config.lowercase {
            term.to_lowercase()
        } else {
            term.to_string()
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::words()
    }
}

/// Split an n-gram term back into its words
#[inline]
pub fn split_ngram(term: &str) -> impl Iterator<Item = &str> {
    term.split(' ').filter(|w| !w.is_empty())
}
