//! O(1) membership sets over a vertex span.

use crate::bitset::Bitset;
use crate::types::VertexId;
use crate::vertex::{Vertex, VertexVector};

/// A dense vertex membership set backed by a bitset over the span of a
/// [`VertexVector`].
///
/// Bit `id - base` holds membership of `id`, where `base` is the first
/// identifier of the span. Accessing an identifier outside the
/// initialized span is a programming error; the hot-path accessors do
/// not guard against it.
///
/// There is no internal locking. Concurrent use from several threads is
/// safe only when the caller assigns disjoint identifier sub-ranges.
#[derive(Debug, Default)]
pub struct DenseVertexSet<I> {
    base: usize,
    range: VertexVector<I>,
    bits: Bitset,
}

impl<I: VertexId> DenseVertexSet<I> {
    pub fn new() -> Self {
        Self {
            base: 0,
            range: VertexVector::default(),
            bits: Bitset::new(),
        }
    }

    /// Sizes the set to the span of `vertices` and clears it, in
    /// parallel when `thread_num > 1`.
    pub fn init(&mut self, vertices: &VertexVector<I>, thread_num: usize) {
        let (base, width) = match vertices.span() {
            Some((first, last)) => (first.index(), last.index() - first.index() + 1),
            None => (0, 0),
        };
        self.base = base;
        self.range = vertices.clone();
        self.bits.init(width);
        if thread_num <= 1 {
            self.bits.clear();
        } else {
            self.bits.parallel_clear(thread_num);
        }
    }

    pub fn insert(&mut self, v: Vertex<I>) {
        self.bits.set_bit(v.value().index() - self.base);
    }

    /// Inserts `v`, returning whether it was already present. Lets
    /// frontier expansion detect first-time visits in one pass.
    pub fn insert_with_ret(&mut self, v: Vertex<I>) -> bool {
        self.bits.set_bit_with_ret(v.value().index() - self.base)
    }

    pub fn erase(&mut self, v: Vertex<I>) {
        self.bits.reset_bit(v.value().index() - self.base);
    }

    pub fn erase_with_ret(&mut self, v: Vertex<I>) -> bool {
        self.bits.reset_bit_with_ret(v.value().index() - self.base)
    }

    pub fn exist(&self, v: Vertex<I>) -> bool {
        self.bits.get_bit(v.value().index() - self.base)
    }

    /// The range this set was initialized from.
    pub fn vertices(&self) -> &VertexVector<I> {
        &self.range
    }

    pub fn count(&self) -> usize {
        self.bits.count()
    }

    pub fn parallel_count(&self, thread_num: usize) -> usize {
        self.bits.parallel_count(thread_num)
    }

    /// Number of members with identifiers in `[beg, end)`.
    pub fn partial_count(&self, beg: I, end: I) -> usize {
        self.bits
            .partial_count(beg.index() - self.base, end.index() - self.base)
    }

    pub fn parallel_partial_count(&self, thread_num: usize, beg: I, end: I) -> usize {
        self.bits
            .parallel_partial_count(thread_num, beg.index() - self.base, end.index() - self.base)
    }

    pub fn clear(&mut self) {
        self.bits.clear();
    }

    pub fn parallel_clear(&mut self, thread_num: usize) {
        self.bits.parallel_clear(thread_num);
    }

    /// O(1) exchange of the full internal state, for double-buffering
    /// frontier sets across supersteps.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.base, &mut other.base);
        self.range.swap(&mut other.range);
        self.bits.swap(&mut other.bits);
    }

    pub fn empty(&self) -> bool {
        self.bits.empty()
    }

    pub fn partial_empty(&self, beg: I, end: I) -> bool {
        self.bits
            .partial_empty(beg.index() - self.base, end.index() - self.base)
    }

    pub fn bitset(&self) -> &Bitset {
        &self.bits
    }

    pub fn bitset_mut(&mut self) -> &mut Bitset {
        &mut self.bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_over(ids: Vec<u32>, members: &[u32]) -> DenseVertexSet<u32> {
        let range = VertexVector::from_ids(ids);
        let mut set = DenseVertexSet::new();
        set.init(&range, 1);
        for &id in members {
            set.insert(Vertex::new(id));
        }
        set
    }

    #[test]
    fn test_membership() {
        let set = set_over(vec![10, 12, 17, 20], &[10, 17]);
        for id in 10..=20 {
            assert_eq!(set.exist(Vertex::new(id)), id == 10 || id == 17);
        }
        assert_eq!(set.count(), 2);
    }

    #[test]
    fn test_span_width_allocation() {
        // 4 listed vertices spread over a width-11 span; ids near the
        // top of the span must be addressable.
        let mut set = set_over(vec![10, 12, 17, 20], &[]);
        set.insert(Vertex::new(20));
        assert!(set.exist(Vertex::new(20)));
        assert_eq!(set.count(), 1);
    }

    #[test]
    fn test_with_ret() {
        let mut set = set_over(vec![0, 5], &[]);
        assert_eq!(set.insert_with_ret(Vertex::new(3)), false);
        assert_eq!(set.insert_with_ret(Vertex::new(3)), true);
        assert_eq!(set.erase_with_ret(Vertex::new(3)), true);
        assert_eq!(set.erase_with_ret(Vertex::new(3)), false);
    }

    #[test]
    fn test_partial_count_matches_count() {
        let members = [10u32, 13, 14, 19];
        let set = set_over((10..=20).collect(), &members);
        for beg in 10..=20u32 {
            for end in beg..=20u32 {
                let expected = members.iter().filter(|&&m| m >= beg && m < end).count();
                assert_eq!(set.partial_count(beg, end), expected);
                assert_eq!(set.parallel_partial_count(2, beg, end), expected);
            }
        }
        assert_eq!(set.partial_count(10, 21), set.count());
    }

    #[test]
    fn test_clear_and_swap() {
        let mut a = set_over(vec![1, 2, 3], &[1, 3]);
        let mut b = set_over(vec![100, 104], &[104]);
        a.swap(&mut b);
        assert!(a.exist(Vertex::new(104)));
        assert_eq!(a.count(), 1);
        assert!(b.exist(Vertex::new(1)) && b.exist(Vertex::new(3)));
        b.clear();
        assert_eq!(b.count(), 0);
        assert!(b.empty());
    }

    #[test]
    fn test_parallel_init_and_count() {
        let range = VertexVector::from_ids((0u32..300).collect());
        let mut set = DenseVertexSet::new();
        set.init(&range, 4);
        for id in (0..300).step_by(3) {
            set.insert(Vertex::new(id));
        }
        assert_eq!(set.parallel_count(4), 100);
        set.parallel_clear(4);
        assert!(set.empty());
    }

    #[test]
    fn test_empty_range() {
        let mut set: DenseVertexSet<u32> = DenseVertexSet::new();
        set.init(&VertexVector::default(), 1);
        assert_eq!(set.count(), 0);
        assert!(set.empty());
    }
}
