//! Hyphtree: hyphenation with ternary search trees.
//!
//! Hyphtree computes break points inside words with the Knuth-Liang
//! (TeX) hyphenation algorithm, as a building block of compound-word analysis.
//! Thousands of patterns are stored in a memory-dense ternary search tree, so
//! that all patterns occurring at a position of a word are found in a single
//! descent of the tree.
//!
//! # Data structures
//!
//! - [`TernaryTree`] is an ordered map from strings to `u32` values with
//!   compressed branches, balancing, and suffix compaction.
//! - [`HyphenationTree`] stores patterns, character classes, and exceptions,
//!   and hyphenates words.
//!
//! # Examples
//!
//! ## Building a hyphenation tree
//!
//! A pattern-file loader fills a [`HyphenationTreeBuilder`] through the
//! [`PatternConsumer`] trait. `hy1ph` is given as the letters `hyph` and the
//! priorities `00100`.
//!
//! ```
//! use hyphtree::{HyphenationTreeBuilder, PatternConsumer};
//!
//! let mut builder = HyphenationTreeBuilder::new();
//! for c in "hypen".chars() {
//!     builder.add_class(&c.to_string()).unwrap();
//! }
//! builder.add_pattern("hyph", "00100").unwrap();
//! builder.add_pattern("phen", "00300").unwrap();
//! let tree = builder.build().unwrap();
//!
//! let hyphenation = tree.hyphenate("hyphen", 2, 2).unwrap();
//! assert_eq!(hyphenation.points(), &[0, 2, 4, 6]);
//! ```
//!
//! ## Looking up a key
//!
//! ```
//! use hyphtree::TernaryTree;
//!
//! let mut tree = TernaryTree::new();
//! tree.insert("世界", 0).unwrap();
//! tree.insert("世界中", 1).unwrap();
//! tree.trim_to_size().unwrap();
//!
//! assert_eq!(tree.find("世界中".chars()), Some(1));
//! assert_eq!(tree.find("日本中".chars()), None);
//! ```
#![deny(missing_docs)]

#[cfg(target_pointer_width = "16")]
compile_error!("`target_pointer_width` must be larger than or equal to 32");

mod builder;
pub mod errors;
mod hyphenation;
mod tree;
mod tst;
mod values;
mod vector;

/// Special terminator, which must not be contained in keys.
pub const END_MARKER: char = '\u{0}';

/// Split character marking a compressed branch, which must not be contained in keys.
pub const COMPRESSED_MARKER: char = '\u{ffff}';

/// Marker put before and after the letters of a word while matching patterns.
pub const WORD_BOUNDARY: char = '.';

pub use builder::{HyphenationTreeBuilder, PatternConsumer};
pub use hyphenation::{ExceptionPart, Hyphen, Hyphenation};
pub use tree::HyphenationTree;
pub use tst::{RecordIter, TernaryTree};
pub use vector::{BlockVec, BLOCK_LEN};

/// Memory statistics of the data structures.
pub trait Statistics {
    /// Heap used by the data structure in bytes.
    fn heap_bytes(&self) -> usize;

    /// Number of node slots in use, including the null node.
    fn num_nodes(&self) -> usize;

    /// Number of allocated but unused node slots.
    fn num_vacants(&self) -> usize;

    /// Ratio of unused node slots.
    fn vacant_ratio(&self) -> f64 {
        let total = self.num_nodes() + self.num_vacants();
        if total == 0 {
            0.0
        } else {
            self.num_vacants() as f64 / total as f64
        }
    }
}
