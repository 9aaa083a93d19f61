//! Append-only buffer growing in fixed-size blocks.
use std::ops::{Index, IndexMut};

/// Default growth increment of [`BlockVec`].
pub const BLOCK_LEN: usize = 2048;

/// Append-only array of `T` that grows by `block_len` slots at a time.
///
/// Slots are reserved with [`BlockVec::alloc`] and addressed by the returned index.
/// [`BlockVec::trim`] drops the spare capacity once construction is finished.
#[derive(Clone, Debug)]
pub struct BlockVec<T> {
    data: Vec<T>,
    len: usize,
    block_len: usize,
}

impl<T> BlockVec<T>
where
    T: Copy + Default,
{
    /// Creates an empty buffer with the default growth increment.
    pub fn new() -> Self {
        Self::with_block_len(BLOCK_LEN)
    }

    /// Creates an empty buffer growing by `block_len` slots.
    ///
    /// # Panics
    ///
    /// `block_len` must not be zero.
    pub fn with_block_len(block_len: usize) -> Self {
        assert_ne!(block_len, 0);
        Self {
            data: vec![T::default(); block_len],
            len: 0,
            block_len,
        }
    }

    /// Reserves `n` contiguous slots and returns the index of the first one.
    ///
    /// Reserved slots hold `T::default()` until written.
    pub fn alloc(&mut self, n: usize) -> usize {
        let idx = self.len;
        let needed = self.len + n;
        if needed > self.data.len() {
            let mut capa = self.data.len();
            while capa < needed {
                capa += self.block_len;
            }
            self.data.resize(capa, T::default());
        }
        self.len = needed;
        idx
    }

    /// Shrinks the backing array to the reserved length.
    pub fn trim(&mut self) {
        self.data.truncate(self.len);
        self.data.shrink_to_fit();
    }

    /// Number of reserved slots.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Checks if no slot is reserved.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the backing array.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Growth increment.
    #[inline(always)]
    pub const fn block_len(&self) -> usize {
        self.block_len
    }

    /// Reserved slots as a slice.
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        &self.data[..self.len]
    }

    /// Heap usage of the backing array.
    pub fn heap_bytes(&self) -> usize {
        self.data.capacity() * std::mem::size_of::<T>()
    }
}

impl<T> Default for BlockVec<T>
where
    T: Copy + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for BlockVec<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, idx: usize) -> &T {
        assert!(idx < self.len, "index {idx} out of reserved range {}", self.len);
        &self.data[idx]
    }
}

impl<T> IndexMut<usize> for BlockVec<T> {
    #[inline(always)]
    fn index_mut(&mut self, idx: usize) -> &mut T {
        assert!(idx < self.len, "index {idx} out of reserved range {}", self.len);
        &mut self.data[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_grows_by_blocks() {
        let mut v = BlockVec::<u8>::with_block_len(4);
        assert_eq!(v.capacity(), 4);
        assert_eq!(v.alloc(3), 0);
        assert_eq!(v.capacity(), 4);
        assert_eq!(v.alloc(2), 3);
        assert_eq!(v.capacity(), 8);
        assert_eq!(v.alloc(9), 5);
        assert_eq!(v.len(), 14);
        assert_eq!(v.capacity(), 16);
    }

    #[test]
    fn test_growth_keeps_data() {
        let mut v = BlockVec::<char>::with_block_len(2);
        let i = v.alloc(2);
        v[i] = 'a';
        v[i + 1] = 'b';
        let j = v.alloc(5);
        v[j + 4] = 'z';
        assert_eq!(v.as_slice(), &['a', 'b', '\0', '\0', '\0', '\0', 'z']);
    }

    #[test]
    fn test_trim() {
        let mut v = BlockVec::<u8>::new();
        v.alloc(10);
        assert_eq!(v.capacity(), BLOCK_LEN);
        v.trim();
        assert_eq!(v.capacity(), 10);
        assert_eq!(v.len(), 10);
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_reserved_range() {
        let mut v = BlockVec::<u8>::with_block_len(8);
        v.alloc(2);
        let _ = v[2];
    }
}
