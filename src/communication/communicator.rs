//! Distributed aggregation over a ranked group.

use super::channel::RankedChannel;
use super::error::{CommError, Result};
use crate::archive::{Archivable, InArchive, OutArchive};
use crate::types::Rank;
use log::trace;

/// Typed point-to-point messaging and star-topology collectives.
///
/// A `Communicator` starts empty and becomes valid once
/// [`init_communicator`](Self::init_communicator) duplicates a group
/// handle; the duplicated lane is released on drop. Collectives gather
/// at rank 0 and broadcast back, which bounds scalability by the root's
/// bandwidth; the trade is accepted for small groups.
pub struct Communicator<C: RankedChannel> {
    channel: Option<C>,
}

impl<C: RankedChannel> Default for Communicator<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: RankedChannel> Communicator<C> {
    pub fn new() -> Self {
        Self { channel: None }
    }

    /// Duplicates `group` into a private lane so collective traffic
    /// never interleaves with other users of the handle.
    pub fn init_communicator(&mut self, group: &C) -> Result<()> {
        self.channel = Some(group.duplicate()?);
        Ok(())
    }

    fn channel(&self) -> Result<&C> {
        self.channel.as_ref().ok_or(CommError::NotInitialized)
    }

    pub fn send_to<T: Archivable>(&self, dst: Rank, msg: &T) -> Result<()> {
        let mut arc = InArchive::new();
        arc.add(msg);
        self.channel()?.send(dst, arc.into_bytes())
    }

    pub fn recv_from<T: Archivable>(&self, src: Rank) -> Result<T> {
        let bytes = self.channel()?.recv(src)?;
        Ok(OutArchive::from(bytes).get()?)
    }

    /// Globally reduces one value per rank; every rank returns the same
    /// result.
    ///
    /// Rank 0 folds the contributions in strictly ascending rank order
    /// and broadcasts the outcome. The order is a contract: a
    /// non-commutative `combine` still yields the same result on every
    /// run.
    pub fn all_reduce<T, F>(&self, msg_in: T, combine: F) -> Result<T>
    where
        T: Archivable,
        F: Fn(&mut T, T),
    {
        let chan = self.channel()?;
        let (rank, size) = (chan.rank(), chan.group_size());
        if rank == 0 {
            let mut out = msg_in;
            for src in 1..size {
                let got = self.recv_from(src)?;
                combine(&mut out, got);
            }
            trace!("all_reduce: combined {} contributions", size);
            for dst in 1..size {
                self.send_to(dst, &out)?;
            }
            Ok(out)
        } else {
            self.send_to(0, &msg_in)?;
            self.recv_from(0)
        }
    }

    pub fn max<T: Archivable + Ord>(&self, msg_in: T) -> Result<T> {
        self.all_reduce(msg_in, |lhs, rhs| {
            if rhs > *lhs {
                *lhs = rhs;
            }
        })
    }

    pub fn min<T: Archivable + Ord>(&self, msg_in: T) -> Result<T> {
        self.all_reduce(msg_in, |lhs, rhs| {
            if rhs < *lhs {
                *lhs = rhs;
            }
        })
    }

    pub fn sum<T: Archivable + std::ops::AddAssign>(&self, msg_in: T) -> Result<T> {
        self.all_reduce(msg_in, |lhs, rhs| *lhs += rhs)
    }

    /// Concatenates every rank's archive in ascending rank order; every
    /// rank returns the full combined buffer.
    ///
    /// Segment lengths travel first so each rank's placement offset is a
    /// prefix sum; rank 0 then gathers the segments into place and
    /// broadcasts the combined buffer. Traffic is O(total bytes) at the
    /// root.
    pub fn archive_all_gather(&self, in_archive: &InArchive) -> Result<OutArchive> {
        let chan = self.channel()?;
        let (rank, size) = (chan.rank(), chan.group_size());
        let local_len = in_archive.len() as u64;

        let lens: Vec<u64> = if rank == 0 {
            let mut lens = vec![0u64; size];
            lens[0] = local_len;
            for src in 1..size {
                lens[src] = self.recv_from(src)?;
            }
            for dst in 1..size {
                self.send_to(dst, &lens)?;
            }
            lens
        } else {
            self.send_to(0, &local_len)?;
            self.recv_from(0)?
        };

        let mut offsets = vec![0usize; size];
        for r in 1..size {
            offsets[r] = offsets[r - 1] + lens[r - 1] as usize;
        }
        let total = offsets[size - 1] + lens[size - 1] as usize;
        trace!(
            "archive_all_gather: rank {} contributes {} of {} bytes",
            rank,
            local_len,
            total
        );

        if rank == 0 {
            let mut combined = vec![0u8; total];
            combined[..in_archive.len()].copy_from_slice(in_archive.bytes());
            for src in 1..size {
                let segment = chan.recv(src)?;
                debug_assert_eq!(segment.len() as u64, lens[src]);
                combined[offsets[src]..offsets[src] + segment.len()].copy_from_slice(&segment);
            }
            for dst in 1..size {
                chan.send(dst, combined.clone())?;
            }
            Ok(OutArchive::from(combined))
        } else {
            chan.send(0, in_archive.bytes().to_vec())?;
            Ok(OutArchive::from(chan.recv(0)?))
        }
    }
}
