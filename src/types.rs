//! Shared types of the execution substrate.

use num_traits::{PrimInt, ToPrimitive};
use std::fmt::Debug;

/// The rank of a process within its group, `0..group_size`.
pub type Rank = usize;

/// An integral vertex identifier type.
///
/// Identifiers are non-negative and totally ordered. They are dense in
/// practice after renumbering, but need not start at zero nor be
/// contiguous.
pub trait VertexId: PrimInt + Debug + Send + Sync + 'static {
    /// Converts the identifier into an array index.
    ///
    /// A negative identifier is a programming error upstream and aborts.
    fn index(self) -> usize {
        self.to_usize().expect("negative vertex id")
    }
}

impl<T> VertexId for T where T: PrimInt + Debug + Send + Sync + 'static {}
