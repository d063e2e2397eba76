/// This crate computes text-mining statistics over a corpus snapshot:
/// tokens, term counts, tf-idf, and pairwise co-occurrence / phi correlation.
pub mod analysis;
pub mod error;
pub mod utils;

/// Text Analyzer
/// The top-level struct of this crate. It bundles a validated `AnalysisConfig`
/// and an explicit stop-word list, then runs the whole pipeline:
/// raw text -> tokens -> term counts -> {tf-idf, co-occurrence, correlation}.
///
/// Every run is a pure function of its input documents.
/// Running it twice on the same documents gives identical records.
pub use analysis::{AnalysisReport, TextAnalyzer};

/// Analysis configuration
/// Serializable settings for one run: tokenizer mode, section size,
/// minimum term frequency for correlations and the degenerate-input policy.
pub use analysis::config::AnalysisConfig;

/// Tokenizer
/// Splits `(document_id, raw_text)` pairs into token records lazily.
/// Supported modes:
/// - Words
/// - NGrams (overlapping, size n >= 1)
/// - Sentences
///
/// Case folding and punctuation stripping are on by default; `pass_through`
/// turns both off. Records without id or with empty text are skipped.
pub use analysis::token::{split_ngram, RawDocument, TokenMode, TokenRecord, Tokenizer, TokenizerConfig};

/// Term Frequency structure
/// Occurrence counts of terms inside one group plus the group total.
pub use analysis::term::TermFrequency;

/// Frequency Counter
/// - `TermCounts`: per-group term counts built from a token stream, grouped by
///   document id or by any caller-derived key
/// - `StopWords`: stop-word set passed explicitly to each call
/// - `TermCount`: one (document, term, count) record
pub use analysis::counter::{StopWordMatch, StopWords, TermCount, TermCounts};

/// Corpus
/// Number of documents and number of documents containing each term.
/// Base data for IDF.
pub use analysis::corpus::Corpus;

/// TF IDF Calculation Engine Trait
/// `TfIdfEngine` defines tf and idf. `DefaultTfIdfEngine` is the textbook one:
/// - tf = count / document_total
/// - idf = ln(total_documents / documents_containing)
///
/// Works for `f32` and `f64`.
pub use analysis::tfidf::{DefaultTfIdfEngine, TfIdfEngine, TfIdfRecord, TfIdfTable};

/// Co-occurrence / Correlation
/// `TermIncidence` records which groups each term appears in and derives
/// pairwise joint counts and phi coefficients from it.
/// Terms below a minimum frequency must be removed by the caller first
/// (`with_min_frequency`).
pub use analysis::cooccur::{pairs_with, ContingencyTable, Cooccurrence, Correlation, DegeneratePolicy, TermIncidence};

/// Sections
/// Fixed-size line windows used as correlation groups.
pub use analysis::section::{SectionKey, Sectioner};

/// Sentiment Lexicon
/// External term -> sentiment mapping (categorical, multi-label or scale),
/// joined against term counts by term.
pub use analysis::lexicon::{GroupSentiment, Lexicon, Polarity, SentimentMatch, SentimentValue};

pub use error::{Result, TextStatsError};
