//! Collective communication over a fixed-size ranked process group.
//!
//! The group is established once before any collective call and torn
//! down once. Every rank runs the same program and must issue the same
//! sequence of collective operations; a diverging or crashed rank
//! stalls the whole group indefinitely (fail-stop, no timeout, no
//! recovery).

pub mod channel;
pub mod communicator;
pub mod error;

pub use channel::{LocalChannel, LocalGroup, RankedChannel};
pub use communicator::Communicator;
pub use error::{CommError, Result};
