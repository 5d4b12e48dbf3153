//! Vertex handles, ordered vertex ranges and dense per-vertex storage.

use crate::types::VertexId;
use derive_more::Display;
use itertools::Itertools;
use std::ops::{Index, IndexMut};

/// A process-local vertex handle within one fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Vertex<I>(I);

impl<I: VertexId> Vertex<I> {
    pub fn new(id: I) -> Self {
        Vertex(id)
    }

    pub fn value(self) -> I {
        self.0
    }
}

impl<I: VertexId> From<I> for Vertex<I> {
    fn from(id: I) -> Self {
        Vertex(id)
    }
}

#[derive(Debug, Display, PartialEq)]
pub enum VertexError {
    #[display(fmt = "vertex ids out of order at position {}", _0)]
    OutOfOrder(usize),
}

impl std::error::Error for VertexError {}

/// An ordered collection of vertices defining a named vertex group,
/// e.g. a fragment's inner vertices.
///
/// Identifiers must be non-decreasing from first to last; they need not
/// be contiguous. The closed interval `[first, last]` is the span used
/// as the addressing domain by [`VertexValues`] and
/// [`DenseVertexSet`](crate::vertex_set::DenseVertexSet).
#[derive(Debug, Clone, PartialEq)]
pub struct VertexVector<I> {
    vertices: Vec<Vertex<I>>,
}

impl<I> Default for VertexVector<I> {
    fn default() -> Self {
        Self { vertices: Vec::new() }
    }
}

impl<I: VertexId> VertexVector<I> {
    /// Builds a vertex range, aborting on an ordering violation.
    ///
    /// The list is algorithm-generated; disorder indicates a programming
    /// error upstream, not a runtime condition to recover from. Use
    /// [`try_new`](Self::try_new) to intercept the failure instead.
    pub fn new(vertices: Vec<Vertex<I>>) -> Self {
        match Self::try_new(vertices) {
            Ok(range) => range,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_new(vertices: Vec<Vertex<I>>) -> Result<Self, VertexError> {
        if let Some(pos) = vertices
            .iter()
            .tuple_windows()
            .position(|(prev, curr)| prev.value() > curr.value())
        {
            return Err(VertexError::OutOfOrder(pos + 1));
        }
        Ok(Self { vertices })
    }

    pub fn from_ids(ids: Vec<I>) -> Self {
        Self::new(ids.into_iter().map(Vertex::new).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = Vertex<I>> + '_ {
        self.vertices.iter().copied()
    }

    pub fn get(&self, idx: usize) -> Vertex<I> {
        self.vertices[idx]
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The `(first, last)` identifiers, or `None` if the range is empty.
    pub fn span(&self) -> Option<(I, I)> {
        match (self.vertices.first(), self.vertices.last()) {
            (Some(first), Some(last)) => Some((first.value(), last.value())),
            _ => None,
        }
    }

    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.vertices, &mut other.vertices);
    }
}

impl<I: VertexId> Index<usize> for VertexVector<I> {
    type Output = Vertex<I>;

    fn index(&self, idx: usize) -> &Vertex<I> {
        &self.vertices[idx]
    }
}

impl<'a, I: VertexId> IntoIterator for &'a VertexVector<I> {
    type Item = Vertex<I>;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Vertex<I>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.vertices.iter().copied()
    }
}

/// A value of type `T` for every identifier in the span of a
/// [`VertexVector`], listed or not.
///
/// Storage is `last - first + 1` slots addressed by `id - first`, so
/// every access is O(1) regardless of how densely the span is
/// populated. Memory cost is proportional to identifier spread, which
/// is the deliberate trade against hash lookups.
///
/// An instance initialized from an empty range stays unusable; indexing
/// it is a programming error and aborts.
#[derive(Debug, Clone)]
pub struct VertexValues<T, I> {
    data: Vec<T>,
    base: usize,
    vertices: VertexVector<I>,
}

impl<T, I> Default for VertexValues<T, I> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            base: 0,
            vertices: VertexVector::default(),
        }
    }
}

impl<T, I: VertexId> VertexValues<T, I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(&mut self, vertices: &VertexVector<I>)
    where
        T: Default + Clone,
    {
        self.init_with(vertices, T::default());
    }

    pub fn init_with(&mut self, vertices: &VertexVector<I>, value: T)
    where
        T: Clone,
    {
        let (first, last) = match vertices.span() {
            Some(span) => span,
            None => return,
        };
        self.base = first.index();
        self.data = vec![value; last.index() - self.base + 1];
        self.vertices = vertices.clone();
    }

    /// Sets `value` at exactly the listed identifiers, a subset of the
    /// span.
    pub fn set_value(&mut self, vertices: &VertexVector<I>, value: &T)
    where
        T: Clone,
    {
        for v in vertices {
            self[v] = value.clone();
        }
    }

    /// Sets `value` uniformly across the whole span.
    pub fn set_value_all(&mut self, value: &T)
    where
        T: Clone,
    {
        for slot in &mut self.data {
            *slot = value.clone();
        }
    }

    /// The range this container was initialized from.
    pub fn vertex_range(&self) -> &VertexVector<I> {
        &self.vertices
    }

    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Resets to a fresh uninitialized state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn slot(&self, v: Vertex<I>) -> usize {
        let idx = v.value().index();
        debug_assert!(
            idx >= self.base && idx - self.base < self.data.len(),
            "vertex {:?} outside initialized span",
            v
        );
        idx - self.base
    }
}

impl<T, I: VertexId> Index<Vertex<I>> for VertexValues<T, I> {
    type Output = T;

    fn index(&self, v: Vertex<I>) -> &T {
        &self.data[self.slot(v)]
    }
}

impl<T, I: VertexId> IndexMut<Vertex<I>> for VertexValues<T, I> {
    fn index_mut(&mut self, v: Vertex<I>) -> &mut T {
        let slot = self.slot(v);
        &mut self.data[slot]
    }
}
