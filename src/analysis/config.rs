use serde::{Deserialize, Serialize};

use crate::{
    analysis::{
        cooccur::DegeneratePolicy,
        counter::StopWordMatch,
        section::{Sectioner, DEFAULT_SECTION_SIZE},
        token::{TokenMode, TokenizerConfig},
    },
    error::{Result, TextStatsError},
};

/// Settings of one analysis run
///
/// Every field has a default, so a partial config deserializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub tokenizer: TokenizerConfig,
    /// lines per section for co-occurrence and correlation
    pub section_size: usize,
    /// terms with fewer token occurrences are left out of the correlations
    pub min_term_frequency: u64,
    pub degenerate: DegeneratePolicy,
    pub stop_word_match: StopWordMatch,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerConfig::default(),
            section_size: DEFAULT_SECTION_SIZE,
            min_term_frequency: 1,
            degenerate: DegeneratePolicy::Fail,
            stop_word_match: StopWordMatch::Whole,
        }
    }
}

impl AnalysisConfig {
    /// Bigram analysis: n = 2 and stop words matched per word
    pub fn bigrams() -> Self {
        Self {
            tokenizer: TokenizerConfig {
                mode: TokenMode::NGrams { n: 2 },
                ..TokenizerConfig::default()
            },
            stop_word_match: StopWordMatch::AnyComponent,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.tokenizer.validate()?;
        Sectioner::new(self.section_size)?;
        if self.min_term_frequency == 0 {
            return Err(TextStatsError::invalid_configuration("min_term_frequency must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
        assert!(AnalysisConfig::bigrams().validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        let config = AnalysisConfig { section_size: 0, ..AnalysisConfig::default() };
        assert!(matches!(config.validate(), Err(TextStatsError::InvalidConfiguration(_))));

        let config = AnalysisConfig { min_term_frequency: 0, ..AnalysisConfig::default() };
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.tokenizer.mode = TokenMode::NGrams { n: 0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cbor_round_trip_with_defaults() {
        let config = AnalysisConfig::bigrams();
        let bytes = serde_cbor::to_vec(&config).unwrap();
        let decoded: AnalysisConfig = serde_cbor::from_slice(&bytes).unwrap();
        assert_eq!(decoded, config);
    }
}
