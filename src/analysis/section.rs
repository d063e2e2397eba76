use serde::{Deserialize, Serialize};

use crate::{analysis::token::RawDocument, error::{Result, TextStatsError}};

/// Lines per section when none is configured
pub const DEFAULT_SECTION_SIZE: usize = 10;

/// Group key of a fixed-size window of lines
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionKey<K> {
    pub document: K,
    /// 0-based section index within the document
    pub section: usize,
}

/// Cuts texts into windows of `size` lines
///
/// Line `i` (0-based) belongs to section `i / size`.
///
/// # Examples
/// ```
/// use text_statistics::Sectioner;
///
/// let sectioner = Sectioner::new(2).unwrap();
/// let sections: Vec<_> = sectioner.split("book", "l0\nl1\nl2").collect();
/// assert_eq!(sections.len(), 2);
/// assert_eq!(sections[1].text, "l2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sectioner {
    size: usize,
}

impl Sectioner {
    /// # Errors
    /// `InvalidConfiguration` if `size` is 0
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(TextStatsError::invalid_configuration("section size must be at least 1"));
        }
        Ok(Self { size })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn section_of(&self, line: usize) -> usize {
        line / self.size
    }

    /// Split one document into sections
    ///
    /// Each section becomes a raw document keyed by [`SectionKey`], lines
    /// joined with `\n`.
    pub fn split<K>(&self, document: K, text: &str) -> impl Iterator<Item = RawDocument<SectionKey<K>, String>>
    where
        K: Clone,
    {
        let lines: Vec<&str> = text.lines().collect();
        let sections: Vec<RawDocument<SectionKey<K>, String>> = lines
            .chunks(self.size)
            .enumerate()
            .map(|(section, chunk)| {
                RawDocument::new(
                    Some(SectionKey { document: document.clone(), section }),
                    chunk.join("\n"),
                )
            })
            .collect();
        sections.into_iter()
    }
}

impl Default for Sectioner {
    fn default() -> Self {
        Self { size: DEFAULT_SECTION_SIZE }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_of() {
        let sectioner = Sectioner::new(10).unwrap();
        assert_eq!(sectioner.section_of(0), 0);
        assert_eq!(sectioner.section_of(9), 0);
        assert_eq!(sectioner.section_of(10), 1);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(Sectioner::new(0), Err(TextStatsError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_split_keys() {
        let sectioner = Sectioner::new(2).unwrap();
        let sections: Vec<_> = sectioner.split(7u32, "a\nb\nc\nd\ne").collect();
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].id, Some(SectionKey { document: 7, section: 0 }));
        assert_eq!(sections[0].text, "a\nb");
        assert_eq!(sections[2].id, Some(SectionKey { document: 7, section: 2 }));
        assert_eq!(sections[2].text, "e");
    }
}
