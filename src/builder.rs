use std::collections::HashMap;

use crate::errors::{HyphError, Result};
use crate::hyphenation::ExceptionPart;
use crate::tree::HyphenationTree;
use crate::tst::TernaryTree;
use crate::values::ValueSpace;
use crate::vector::BLOCK_LEN;
use crate::{Statistics, COMPRESSED_MARKER, END_MARKER};

/// Receiver of the entries of a hyphenation pattern file.
///
/// A pattern-file loader drives construction only through these three methods.
pub trait PatternConsumer {
    /// Registers a group of equivalent characters. The first character of
    /// `chargroup` becomes the representative of all of them.
    fn add_class(&mut self, chargroup: &str) -> Result<()>;

    /// Registers the explicit hyphenation of a normalized word, overriding
    /// any pattern-based result for it.
    fn add_exception(&mut self, word: &str, parts: Vec<ExceptionPart>) -> Result<()>;

    /// Registers a pattern with its interletter priorities.
    ///
    /// `pattern` holds letters only, and `digits` one ASCII digit for every gap
    /// around and between them, e.g., `("hyph", "00100")` for `hy1ph`.
    fn add_pattern(&mut self, pattern: &str, digits: &str) -> Result<()>;
}

/// Builder of [`HyphenationTree`].
///
/// # Examples
///
/// ```
/// use hyphtree::{HyphenationTreeBuilder, PatternConsumer};
///
/// let mut builder = HyphenationTreeBuilder::new();
/// builder.add_class("hH").unwrap();
/// builder.add_class("yY").unwrap();
/// builder.add_class("pP").unwrap();
/// builder.add_class("eE").unwrap();
/// builder.add_class("nN").unwrap();
/// builder.add_pattern("hyph", "00100").unwrap();
/// builder.add_pattern("phen", "00300").unwrap();
/// let tree = builder.build().unwrap();
///
/// let h = tree.hyphenate("Hyphen", 2, 2).unwrap();
/// assert_eq!(h.points(), &[0, 2, 4, 6]);
/// ```
pub struct HyphenationTreeBuilder {
    block_len: usize,
    patterns: TernaryTree,
    values: ValueSpace,
    classmap: TernaryTree,
    exceptions: HashMap<String, Vec<ExceptionPart>>,
    // Offsets of already packed digit strings, dropped by build().
    digit_offsets: TernaryTree,
}

impl HyphenationTreeBuilder {
    /// Creates a builder with the default growth increment.
    pub fn new() -> Self {
        Self::with_block_len(BLOCK_LEN)
    }

    fn with_block_len(block_len: usize) -> Self {
        Self {
            block_len,
            patterns: TernaryTree::with_block_len(block_len),
            values: ValueSpace::with_block_len(block_len),
            classmap: TernaryTree::with_block_len(block_len),
            exceptions: HashMap::new(),
            digit_offsets: TernaryTree::with_block_len(block_len),
        }
    }

    /// Sets the number of slots by which the internal buffers grow.
    ///
    /// # Errors
    ///
    /// [`HyphError`] will be returned when
    ///
    /// - `block_len` is zero, or
    /// - an entry has already been added.
    pub fn block_len(self, block_len: usize) -> Result<Self> {
        if block_len == 0 {
            return Err(HyphError::input("block_len must not be zero."));
        }
        if !self.patterns.is_empty() || !self.classmap.is_empty() || !self.exceptions.is_empty()
        {
            return Err(HyphError::setup(
                "block_len must be set before adding entries.",
            ));
        }
        Ok(Self::with_block_len(block_len))
    }

    /// Freezes the added entries into a [`HyphenationTree`].
    ///
    /// The pattern tree and the class map are balanced and compacted, and all
    /// buffers are shrunk to their used length.
    pub fn build(self) -> Result<HyphenationTree> {
        let Self {
            block_len,
            mut patterns,
            mut values,
            mut classmap,
            exceptions,
            digit_offsets,
        } = self;

        patterns.trim_to_size()?;
        values.trim();
        classmap.trim_to_size()?;

        tracing::debug!(
            block_len,
            patterns = patterns.len(),
            nodes = patterns.num_nodes(),
            suffix_len = patterns.suffix_len(),
            distinct_values = digit_offsets.len(),
            value_bytes = values.len(),
            classes = classmap.len(),
            exceptions = exceptions.len(),
            "built hyphenation tree"
        );

        Ok(HyphenationTree::new(patterns, values, classmap, exceptions))
    }
}

impl Default for HyphenationTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternConsumer for HyphenationTreeBuilder {
    fn add_class(&mut self, chargroup: &str) -> Result<()> {
        if let Some(equiv) = chargroup.chars().next() {
            for c in chargroup.chars() {
                self.classmap.insert_chars(&[c], u32::from(equiv))?;
            }
        }
        Ok(())
    }

    fn add_exception(&mut self, word: &str, parts: Vec<ExceptionPart>) -> Result<()> {
        self.exceptions.insert(word.to_string(), parts);
        Ok(())
    }

    fn add_pattern(&mut self, pattern: &str, digits: &str) -> Result<()> {
        if let Some(c) = pattern
            .chars()
            .find(|&c| c == END_MARKER || c == COMPRESSED_MARKER)
        {
            return Err(HyphError::reserved_char(c));
        }
        if digits.chars().count() != pattern.chars().count() + 1 {
            return Err(HyphError::input(
                "digits must have exactly one more character than pattern.",
            ));
        }
        let offset = match self.digit_offsets.find(digits.chars()) {
            Some(offset) => offset,
            None => {
                let offset = self.values.pack(digits)?;
                self.digit_offsets.insert(digits, offset)?;
                offset
            }
        };
        self.patterns.insert(pattern, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_len() {
        assert_eq!(
            HyphenationTreeBuilder::new().block_len(0).err(),
            Some(HyphError::input("block_len must not be zero."))
        );

        let mut builder = HyphenationTreeBuilder::new().block_len(4).unwrap();
        builder.add_pattern("hyph", "00100").unwrap();
        assert_eq!(
            builder.block_len(8).err(),
            Some(HyphError::setup(
                "block_len must be set before adding entries."
            ))
        );
    }

    #[test]
    fn test_small_blocks() {
        let mut builder = HyphenationTreeBuilder::new().block_len(1).unwrap();
        builder.add_pattern("hyph", "00100").unwrap();
        builder.add_pattern("phen", "00300").unwrap();
        builder.add_pattern("hena", "00004").unwrap();
        for c in "hypena".chars() {
            builder.add_class(&c.to_string()).unwrap();
        }
        let tree = builder.build().unwrap();
        assert_eq!(tree.find_pattern("hena").as_deref(), Some("00004"));
        assert_eq!(tree.hyphenate("hyphen", 2, 2).unwrap().points(), &[0, 2, 4, 6]);
    }

    #[test]
    fn test_digits_length() {
        let mut builder = HyphenationTreeBuilder::new();
        assert!(builder.add_pattern("hyph", "0102").is_err());
        assert!(builder.add_pattern("hyph", "001000").is_err());
        assert_eq!(
            builder.add_pattern("hy\0ph", "000100").err(),
            Some(HyphError::reserved_char('\0'))
        );
        assert!(builder.add_pattern("hyph", "00100").is_ok());
    }

    #[test]
    fn test_shared_values() {
        let mut builder = HyphenationTreeBuilder::new();
        builder.add_pattern("ab", "010").unwrap();
        builder.add_pattern("cd", "010").unwrap();
        builder.add_pattern("ef", "012").unwrap();
        assert_eq!(builder.digit_offsets.len(), 2);
        // Offset 0 is reserved; two sequences of three bytes each follow.
        assert_eq!(builder.values.len(), 7);

        let tree = builder.build().unwrap();
        assert_eq!(tree.find("ab".chars()), tree.find("cd".chars()));
        assert_ne!(tree.find("ab".chars()), tree.find("ef".chars()));
        assert_eq!(tree.find("ab".chars()), Some(1));
    }

    #[test]
    fn test_add_class() {
        let mut builder = HyphenationTreeBuilder::new();
        builder.add_class("aAáÁ").unwrap();
        builder.add_class("").unwrap();
        let tree = builder.build().unwrap();
        for c in "aAáÁ".chars() {
            assert_eq!(tree.class_of(c), Some('a'));
        }
        assert_eq!(tree.class_of('b'), None);
    }

    #[test]
    fn test_exception_overwrite() {
        let mut builder = HyphenationTreeBuilder::new();
        builder
            .add_exception("table", vec![ExceptionPart::text("table")])
            .unwrap();
        builder
            .add_exception(
                "table",
                vec![
                    ExceptionPart::text("ta"),
                    ExceptionPart::hyphen(),
                    ExceptionPart::text("ble"),
                ],
            )
            .unwrap();
        let tree = builder.build().unwrap();
        assert_eq!(tree.exception("table").map(<[_]>::len), Some(3));
    }
}
