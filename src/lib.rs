//! Distributed-execution substrate for partitioned graph processing.
//!
//! A graph is split into fragments, each owned by one rank of a fixed
//! process group. Algorithms run the same program on every rank (SPMD),
//! keep per-vertex state in dense vertex-indexed containers, and
//! synchronize through blocking collectives.

pub mod archive;
pub mod bitset;
pub mod communication;
pub mod context;
pub mod fragment;
pub mod types;
pub mod vertex;
pub mod vertex_set;
