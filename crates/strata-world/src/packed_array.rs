use strata_common::{Result, StrataError};

/// Fixed-width unsigned entries packed back to back into 64-bit words. An
/// entry starts at bit `index * bits` and may straddle two adjacent words,
/// never more, since `bits` stays at or below 32.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedArray {
    bits: u8,
    len: usize,
    words: Vec<u64>,
}

impl PackedArray {
    pub const MIN_BITS: u8 = 4;
    pub const MAX_BITS: u8 = 32;

    pub fn new(bits: u8, len: usize) -> PackedArray {
        debug_assert!((Self::MIN_BITS..=Self::MAX_BITS).contains(&bits));
        PackedArray {
            bits,
            len,
            words: vec![0; Self::word_count(bits, len)],
        }
    }

    /// Reassembles an array from wire parts. The word slice must be exactly
    /// the size implied by `bits` and `len`.
    pub fn from_words(bits: u8, len: usize, words: Vec<u64>) -> Result<PackedArray> {
        if !(Self::MIN_BITS..=Self::MAX_BITS).contains(&bits) {
            return Err(StrataError::Decode(format!(
                "bits per entry {} outside {}..={}",
                bits,
                Self::MIN_BITS,
                Self::MAX_BITS
            )));
        }
        let expected = Self::word_count(bits, len);
        if words.len() != expected {
            return Err(StrataError::Decode(format!(
                "packed array holds {} words, {} bits over {} entries needs {}",
                words.len(),
                bits,
                len,
                expected
            )));
        }
        Ok(PackedArray { bits, len, words })
    }

    /// Words needed to hold `len` entries of `bits` bits each.
    pub fn word_count(bits: u8, len: usize) -> usize {
        (len * bits as usize + 63) / 64
    }

    /// Width required for ids addressing a palette of `count` entries,
    /// never below [`MIN_BITS`](Self::MIN_BITS).
    pub fn bits_for(count: usize) -> u8 {
        if count <= 1 {
            return Self::MIN_BITS;
        }
        let needed = (usize::BITS - (count - 1).leading_zeros()) as u8;
        needed.max(Self::MIN_BITS)
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn words(&self) -> &[u64] {
        &self.words
    }

    pub fn get(&self, index: usize) -> u32 {
        debug_assert!(index < self.len);
        let bits = self.bits as usize;
        let bit_index = index * bits;
        let word = bit_index >> 6;
        let offset = bit_index & 63;
        let mask = (1u64 << bits) - 1;

        let mut value = self.words[word] >> offset;
        if offset + bits > 64 {
            value |= self.words[word + 1] << (64 - offset);
        }
        (value & mask) as u32
    }

    pub fn set(&mut self, index: usize, value: u32) {
        debug_assert!(index < self.len);
        let bits = self.bits as usize;
        debug_assert!(bits == 32 || u64::from(value) < (1u64 << bits));
        let bit_index = index * bits;
        let word = bit_index >> 6;
        let offset = bit_index & 63;
        let mask = (1u64 << bits) - 1;
        let value = u64::from(value) & mask;

        self.words[word] = (self.words[word] & !(mask << offset)) | (value << offset);
        if offset + bits > 64 {
            let low = 64 - offset;
            self.words[word + 1] = (self.words[word + 1] & !(mask >> low)) | (value >> low);
        }
    }

    /// Copy of this array rewritten at `new_bits` per entry. Callers swap
    /// the result in whole, so no partially rewritten state is visible.
    pub fn resized(&self, new_bits: u8) -> PackedArray {
        let mut resized = PackedArray::new(new_bits, self.len);
        for index in 0..self.len {
            resized.set(index, self.get(index));
        }
        resized
    }
}
