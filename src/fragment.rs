//! The fragment collaborator seam.
//!
//! Partitioning and fragment construction happen outside this crate;
//! the substrate only needs to know which vertices a fragment owns.

use crate::types::VertexId;
use crate::vertex::VertexVector;

/// One rank's share of a distributed graph.
pub trait Fragment {
    type Id: VertexId;

    /// The vertices this fragment is authoritative for, as the span
    /// consumed by the dense containers and contexts.
    fn inner_vertices(&self) -> &VertexVector<Self::Id>;
}

/// A fragment that is nothing but its owned vertex list. Enough for
/// vertex-centric algorithms and for tests.
#[derive(Debug, Default)]
pub struct SimpleFragment<I> {
    inner: VertexVector<I>,
}

impl<I: VertexId> SimpleFragment<I> {
    pub fn new(inner: VertexVector<I>) -> Self {
        Self { inner }
    }

    pub fn from_ids(ids: Vec<I>) -> Self {
        Self::new(VertexVector::from_ids(ids))
    }
}

impl<I: VertexId> Fragment for SimpleFragment<I> {
    type Id = I;

    fn inner_vertices(&self) -> &VertexVector<I> {
        &self.inner
    }
}
