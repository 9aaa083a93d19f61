//! Storage of interletter priorities packed two digits per byte.
//!
//! A priority sequence is written high nibble first, each digit biased by one
//! so that a zero nibble terminates the sequence. A trailing zero byte is
//! always appended. Offset `0` is reserved and never holds a sequence.
use crate::errors::{HyphError, Result};
use crate::vector::BlockVec;

#[derive(Clone, Debug)]
pub(crate) struct ValueSpace {
    bytes: BlockVec<u8>,
}

impl ValueSpace {
    pub fn with_block_len(block_len: usize) -> Self {
        let mut bytes = BlockVec::with_block_len(block_len);
        bytes.alloc(1);
        Self { bytes }
    }

    /// Packs a string of ASCII digits and returns its offset.
    pub fn pack(&mut self, digits: &str) -> Result<u32> {
        let digits = digits.as_bytes();
        let offset = u32::try_from(self.bytes.len())
            .map_err(|_| HyphError::scale("value space offset", u32::MAX))?;

        let n = digits.len();
        let m = if n & 1 == 1 { (n >> 1) + 2 } else { (n >> 1) + 1 };
        let start = self.bytes.alloc(m);
        for (i, &d) in digits.iter().enumerate() {
            debug_assert!(d.is_ascii_digit());
            let v = d.wrapping_sub(b'0').wrapping_add(1) & 0x0f;
            let j = start + (i >> 1);
            if i & 1 == 1 {
                self.bytes[j] |= v;
            } else {
                self.bytes[j] = v << 4;
            }
        }
        self.bytes[start + m - 1] = 0;
        Ok(offset)
    }

    /// Raw priorities stored at `offset`.
    #[inline(always)]
    pub fn priorities(&self, offset: u32) -> Priorities<'_> {
        Priorities {
            bytes: self.bytes.as_slice(),
            pos: offset as usize,
            low: false,
            done: false,
        }
    }

    /// Priorities stored at `offset` as a string of digits.
    pub fn unpack(&self, offset: u32) -> String {
        self.priorities(offset)
            .map(|v| char::from(b'0' + v))
            .collect()
    }

    pub fn trim(&mut self) {
        self.bytes.trim();
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn heap_bytes(&self) -> usize {
        self.bytes.heap_bytes()
    }
}

/// Iterator over the nibbles of a packed sequence.
pub(crate) struct Priorities<'a> {
    bytes: &'a [u8],
    pos: usize,
    low: bool,
    done: bool,
}

impl Iterator for Priorities<'_> {
    type Item = u8;

    #[inline(always)]
    fn next(&mut self) -> Option<u8> {
        if self.done {
            return None;
        }
        let b = self.bytes[self.pos];
        let v = if self.low {
            self.pos += 1;
            b & 0x0f
        } else {
            b >> 4
        };
        self.low = !self.low;
        if v == 0 {
            self.done = true;
            return None;
        }
        Some(v - 1)
    }
}
