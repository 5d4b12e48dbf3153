//! A fixed-size bit vector with sequential and parallel operations.

use rayon::prelude::*;

const WORD_BITS: usize = 64;

fn word_count(num_bits: usize) -> usize {
    (num_bits + WORD_BITS - 1) / WORD_BITS
}

/// Mask selecting bit positions `[beg, end)` within a single word.
fn range_mask(beg: usize, end: usize) -> u64 {
    debug_assert!(beg <= end && end <= WORD_BITS);
    if end - beg == WORD_BITS {
        !0
    } else {
        ((1u64 << (end - beg)) - 1) << beg
    }
}

fn chunk_size(len: usize, thread_num: usize) -> usize {
    std::cmp::max(1, (len + thread_num - 1) / thread_num)
}

/// A fixed-size bit vector packed into 64-bit words.
///
/// Parallel variants partition the word array across `thread_num` workers
/// in a fork-join pattern; they never synchronize with other processes.
#[derive(Debug, Default)]
pub struct Bitset {
    words: Vec<u64>,
    num_bits: usize,
}

impl Bitset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resizes to `num_bits` bits. Bit values are unspecified until a
    /// `clear` (retained words keep their previous contents).
    pub fn init(&mut self, num_bits: usize) {
        self.words.resize(word_count(num_bits), 0);
        self.num_bits = num_bits;
    }

    pub fn len(&self) -> usize {
        self.num_bits
    }

    /// Returns `true` if no bit is set.
    pub fn empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Returns `true` if no bit in `[beg, end)` is set.
    pub fn partial_empty(&self, beg: usize, end: usize) -> bool {
        self.partial_count(beg, end) == 0
    }

    pub fn get_bit(&self, i: usize) -> bool {
        self.words[i / WORD_BITS] & (1 << (i % WORD_BITS)) != 0
    }

    pub fn set_bit(&mut self, i: usize) {
        self.words[i / WORD_BITS] |= 1 << (i % WORD_BITS);
    }

    /// Sets bit `i`, returning its previous value.
    pub fn set_bit_with_ret(&mut self, i: usize) -> bool {
        let word = &mut self.words[i / WORD_BITS];
        let mask = 1 << (i % WORD_BITS);
        let prev = *word & mask != 0;
        *word |= mask;
        prev
    }

    pub fn reset_bit(&mut self, i: usize) {
        self.words[i / WORD_BITS] &= !(1 << (i % WORD_BITS));
    }

    /// Clears bit `i`, returning its previous value.
    pub fn reset_bit_with_ret(&mut self, i: usize) -> bool {
        let word = &mut self.words[i / WORD_BITS];
        let mask = 1 << (i % WORD_BITS);
        let prev = *word & mask != 0;
        *word &= !mask;
        prev
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn parallel_count(&self, thread_num: usize) -> usize {
        if thread_num <= 1 {
            return self.count();
        }
        self.words
            .par_chunks(chunk_size(self.words.len(), thread_num))
            .map(|chunk| chunk.iter().map(|w| w.count_ones() as usize).sum::<usize>())
            .sum()
    }

    /// Counts set bits at positions `[beg, end)`.
    pub fn partial_count(&self, beg: usize, end: usize) -> usize {
        if beg >= end {
            return 0;
        }
        let first = beg / WORD_BITS;
        let last = (end - 1) / WORD_BITS;
        if first == last {
            let mask = range_mask(beg % WORD_BITS, (end - 1) % WORD_BITS + 1);
            return (self.words[first] & mask).count_ones() as usize;
        }
        let head = self.words[first] & range_mask(beg % WORD_BITS, WORD_BITS);
        let tail = self.words[last] & range_mask(0, (end - 1) % WORD_BITS + 1);
        let middle: usize = self.words[first + 1..last]
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum();
        head.count_ones() as usize + middle + tail.count_ones() as usize
    }

    pub fn parallel_partial_count(&self, thread_num: usize, beg: usize, end: usize) -> usize {
        if thread_num <= 1 || beg >= end {
            return self.partial_count(beg, end);
        }
        let chunk = chunk_size(end - beg, thread_num);
        (0..thread_num)
            .into_par_iter()
            .map(|t| {
                let b = beg + t * chunk;
                let e = std::cmp::min(end, b + chunk);
                if b < e {
                    self.partial_count(b, e)
                } else {
                    0
                }
            })
            .sum()
    }

    pub fn clear(&mut self) {
        for word in &mut self.words {
            *word = 0;
        }
    }

    pub fn parallel_clear(&mut self, thread_num: usize) {
        if thread_num <= 1 {
            return self.clear();
        }
        let chunk = chunk_size(self.words.len(), thread_num);
        self.words.par_chunks_mut(chunk).for_each(|chunk| {
            for word in chunk {
                *word = 0;
            }
        });
    }

    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }
}
