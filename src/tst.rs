//! Ternary search tree mapping strings to `u32` values.
//!
//! Nodes live in a [`BlockVec`] and refer to each other by `u32` handles,
//! where handle `0` is the null node. A key whose tail is not shared with any
//! other key is stored as a single *compressed* node pointing into a separate
//! suffix buffer; such nodes are expanded one character at a time when another
//! key with the same prefix is inserted.
mod iter;

pub use iter::RecordIter;

use std::cmp::Ordering;

use crate::errors::{HyphError, Result};
use crate::vector::{BlockVec, BLOCK_LEN};
use crate::{Statistics, COMPRESSED_MARKER, END_MARKER};

/// A tree node.
///
/// - Terminator (`sc == END_MARKER`): `eq` holds the value.
/// - Compressed (`sc == COMPRESSED_MARKER`): `lo` is the offset of the key tail
///   in the suffix buffer and `eq` holds the value.
/// - Branch: `lo`/`hi` lead to keys sorting below/above `sc`, and `eq` to the
///   continuation after `sc`.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) lo: u32,
    pub(crate) hi: u32,
    pub(crate) eq: u32,
    pub(crate) sc: char,
}

impl Node {
    #[inline(always)]
    const fn terminator(value: u32, hi: u32) -> Self {
        Self {
            lo: 0,
            hi,
            eq: value,
            sc: END_MARKER,
        }
    }

    #[inline(always)]
    const fn compressed(offset: u32, value: u32) -> Self {
        Self {
            lo: offset,
            hi: 0,
            eq: value,
            sc: COMPRESSED_MARKER,
        }
    }

    #[inline(always)]
    pub(crate) const fn is_terminator(&self) -> bool {
        self.sc == END_MARKER
    }

    #[inline(always)]
    pub(crate) const fn is_compressed(&self) -> bool {
        self.sc == COMPRESSED_MARKER
    }
}

/// Ternary search tree mapping strings to `u32` values.
///
/// # Examples
///
/// ```
/// use hyphtree::TernaryTree;
///
/// let mut tree = TernaryTree::new();
/// tree.insert("Carlos", 1).unwrap();
/// tree.insert("Car", 2).unwrap();
/// tree.insert("palos", 3).unwrap();
/// tree.trim_to_size().unwrap();
///
/// assert_eq!(tree.find("Car".chars()), Some(2));
/// assert_eq!(tree.find("Carlos".chars()), Some(1));
/// assert_eq!(tree.find("alto".chars()), None);
/// ```
#[derive(Clone, Debug)]
pub struct TernaryTree {
    pub(crate) nodes: BlockVec<Node>,
    pub(crate) suffixes: BlockVec<char>,
    pub(crate) root: u32,
    len: usize,
}

impl TernaryTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::with_block_len(BLOCK_LEN)
    }

    /// Creates an empty tree whose buffers grow by `block_len` slots.
    ///
    /// # Panics
    ///
    /// `block_len` must not be zero.
    pub fn with_block_len(block_len: usize) -> Self {
        let mut nodes = BlockVec::with_block_len(block_len);
        // Handle 0 is the null node.
        nodes.alloc(1);
        Self {
            nodes,
            suffixes: BlockVec::with_block_len(block_len),
            root: 0,
            len: 0,
        }
    }

    /// Inserts a key-value pair, overwriting the value if the key exists.
    ///
    /// # Errors
    ///
    /// [`HyphError`] will be returned when
    ///
    /// - `key` contains [`END_MARKER`] or [`COMPRESSED_MARKER`], or
    /// - the number of nodes or the suffix buffer exceeds `u32` addressing.
    pub fn insert<K>(&mut self, key: K, value: u32) -> Result<()>
    where
        K: AsRef<str>,
    {
        let key: Vec<char> = key.as_ref().chars().collect();
        self.insert_chars(&key, value)
    }

    /// Inserts a key given as characters. See [`TernaryTree::insert`].
    pub fn insert_chars(&mut self, key: &[char], value: u32) -> Result<()> {
        if let Some(&c) = key
            .iter()
            .find(|&&c| c == END_MARKER || c == COMPRESSED_MARKER)
        {
            return Err(HyphError::reserved_char(c));
        }
        let root = self.insert_at(self.root, key, value)?;
        self.root = root;
        Ok(())
    }

    /// Returns the value associated with `key` if exists.
    pub fn find<I>(&self, key: I) -> Option<u32>
    where
        I: IntoIterator<Item = char>,
    {
        // Markers in the query are mapped to a character no stored key has.
        let mut key = key.into_iter().fuse().map(|c| {
            if c == END_MARKER {
                COMPRESSED_MARKER
            } else {
                c
            }
        });
        let mut c = key.next().unwrap_or(END_MARKER);
        let mut p = self.root;
        while p != 0 {
            let node = self.nodes[p as usize];
            if node.is_compressed() {
                for t in self.suffix(node.lo) {
                    if c != t {
                        return None;
                    }
                    c = key.next().unwrap_or(END_MARKER);
                }
                return (c == END_MARKER).then_some(node.eq);
            }
            match c.cmp(&node.sc) {
                Ordering::Equal => {
                    if c == END_MARKER {
                        return Some(node.eq);
                    }
                    c = key.next().unwrap_or(END_MARKER);
                    p = node.eq;
                }
                Ordering::Less => p = node.lo,
                Ordering::Greater => p = node.hi,
            }
        }
        None
    }

    /// Checks if `key` is stored.
    #[inline]
    pub fn contains_key<I>(&self, key: I) -> bool
    where
        I: IntoIterator<Item = char>,
    {
        self.find(key).is_some()
    }

    /// Number of stored keys.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Checks if no key is stored.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of characters in the suffix buffer, including garbage left
    /// behind by decompression until [`TernaryTree::trim_to_size`] is called.
    #[inline(always)]
    pub const fn suffix_len(&self) -> usize {
        self.suffixes.len()
    }

    /// Sorted keys as strings.
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.record_iter().map(|(key, _)| key.into_iter().collect())
    }

    /// Rebuilds the tree by inserting the sorted records median first,
    /// minimizing the search depth regardless of the insertion order.
    pub fn balance(&mut self) -> Result<()> {
        let records: Vec<(Vec<char>, u32)> = self.record_iter().collect();
        *self = Self::with_block_len(self.nodes.block_len());
        self.insert_balanced(&records)?;
        tracing::debug!(
            keys = self.len,
            nodes = self.nodes.len(),
            "balanced ternary tree"
        );
        Ok(())
    }

    /// Balances the tree, shrinks the node array to the live nodes, and
    /// compacts the suffix buffer by dropping garbage and sharing identical
    /// suffixes.
    pub fn trim_to_size(&mut self) -> Result<()> {
        self.balance()?;
        self.nodes.trim();

        let mut compacted = BlockVec::with_block_len(self.suffixes.block_len());
        let mut offsets = Self::with_block_len(self.suffixes.block_len());
        self.compact(&mut compacted, &mut offsets, self.root)?;
        compacted.trim();
        tracing::debug!(
            before = self.suffixes.len(),
            after = compacted.len(),
            distinct = offsets.len(),
            "compacted suffix buffer"
        );
        self.suffixes = compacted;
        Ok(())
    }

    /// Key tail stored at `offset` in the suffix buffer.
    #[inline(always)]
    pub(crate) fn suffix(&self, offset: u32) -> impl Iterator<Item = char> + '_ {
        self.suffixes.as_slice()[offset as usize..]
            .iter()
            .copied()
            .take_while(|&c| c != END_MARKER)
    }

    fn insert_balanced(&mut self, records: &[(Vec<char>, u32)]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let m = records.len() >> 1;
        let (key, value) = &records[m];
        self.insert_chars(key, *value)?;
        self.insert_balanced(&records[..m])?;
        self.insert_balanced(&records[m + 1..])
    }

    /// Inserts `key`, the remaining characters of the original key, below `p`
    /// and returns the handle replacing `p`.
    fn insert_at(&mut self, p: u32, key: &[char], value: u32) -> Result<u32> {
        if p == 0 {
            return self.new_branch(key, value);
        }

        if self.nodes[p as usize].is_compressed() {
            let old = self.nodes[p as usize];
            let pp = self.alloc_node()?;
            if key.is_empty() {
                // The key ends here, so `p` turns into its terminator and keeps
                // the compressed tail on the high side.
                self.nodes[pp as usize] = Node::compressed(old.lo, old.eq);
                self.nodes[p as usize] = Node::terminator(value, pp);
                self.len += 1;
                return Ok(p);
            }
            let rest = old.lo + 1;
            self.nodes[pp as usize] = if self.suffixes[rest as usize] == END_MARKER {
                Node::terminator(old.eq, 0)
            } else {
                Node::compressed(rest, old.eq)
            };
            self.nodes[p as usize] = Node {
                lo: 0,
                hi: 0,
                eq: pp,
                sc: self.suffixes[old.lo as usize],
            };
        }

        let node = self.nodes[p as usize];
        let c = key.first().copied().unwrap_or(END_MARKER);
        match c.cmp(&node.sc) {
            Ordering::Less => {
                let lo = self.insert_at(node.lo, key, value)?;
                self.nodes[p as usize].lo = lo;
            }
            Ordering::Equal => {
                if c == END_MARKER {
                    self.nodes[p as usize].eq = value;
                } else {
                    let eq = self.insert_at(node.eq, &key[1..], value)?;
                    self.nodes[p as usize].eq = eq;
                }
            }
            Ordering::Greater => {
                let hi = self.insert_at(node.hi, key, value)?;
                self.nodes[p as usize].hi = hi;
            }
        }
        Ok(p)
    }

    fn new_branch(&mut self, key: &[char], value: u32) -> Result<u32> {
        let p = self.alloc_node()?;
        self.nodes[p as usize] = if key.is_empty() {
            Node::terminator(value, 0)
        } else {
            let offset = push_suffix(&mut self.suffixes, key)?;
            Node::compressed(offset, value)
        };
        self.len += 1;
        Ok(p)
    }

    fn alloc_node(&mut self) -> Result<u32> {
        let p = u32::try_from(self.nodes.len())
            .map_err(|_| HyphError::scale("node handle", u32::MAX))?;
        self.nodes.alloc(1);
        Ok(p)
    }

    fn compact(
        &mut self,
        compacted: &mut BlockVec<char>,
        offsets: &mut TernaryTree,
        p: u32,
    ) -> Result<()> {
        if p == 0 {
            return Ok(());
        }
        let node = self.nodes[p as usize];
        if node.is_compressed() {
            let suffix: Vec<char> = self.suffix(node.lo).collect();
            let offset = match offsets.find(suffix.iter().copied()) {
                Some(offset) => offset,
                None => {
                    let offset = push_suffix(compacted, &suffix)?;
                    offsets.insert_chars(&suffix, offset)?;
                    offset
                }
            };
            self.nodes[p as usize].lo = offset;
        } else {
            self.compact(compacted, offsets, node.lo)?;
            if !node.is_terminator() {
                self.compact(compacted, offsets, node.eq)?;
            }
            self.compact(compacted, offsets, node.hi)?;
        }
        Ok(())
    }
}

impl Default for TernaryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistics for TernaryTree {
    fn heap_bytes(&self) -> usize {
        self.nodes.heap_bytes() + self.suffixes.heap_bytes()
    }

    fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn num_vacants(&self) -> usize {
        self.nodes.capacity() - self.nodes.len()
    }
}

/// Appends `suffix` and a terminator to `buf`, returning its offset.
fn push_suffix(buf: &mut BlockVec<char>, suffix: &[char]) -> Result<u32> {
    let offset =
        u32::try_from(buf.len()).map_err(|_| HyphError::scale("suffix offset", u32::MAX))?;
    let start = buf.alloc(suffix.len() + 1);
    for (i, &c) in suffix.iter().enumerate() {
        buf[start + i] = c;
    }
    buf[start + suffix.len()] = END_MARKER;
    Ok(offset)
}
