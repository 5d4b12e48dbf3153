//! The ranked transport seam and its in-process implementation.

use super::error::{CommError, Result};
use crate::types::Rank;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// Blocking point-to-point transport over a fixed ranked group.
///
/// Implementable over OS processes and sockets, in-process channels, or
/// any message transport; the collective protocols only need these five
/// operations.
pub trait RankedChannel: Sized {
    /// This endpoint's rank, `0..group_size`.
    fn rank(&self) -> Rank;

    fn group_size(&self) -> usize;

    /// Blocking send of an opaque payload to `dst`.
    fn send(&self, dst: Rank, payload: Vec<u8>) -> Result<()>;

    /// Blocking receive of the next payload from `src`.
    fn recv(&self, src: Rank) -> Result<Vec<u8>>;

    /// Opens a fresh lane over the same group, isolating its traffic
    /// from this handle's.
    ///
    /// Duplication is a collective: every rank must duplicate its handle
    /// in the same order, like every other collective operation.
    fn duplicate(&self) -> Result<Self>;
}

struct Link {
    tx: Option<Sender<Vec<u8>>>,
    rx: Option<Receiver<Vec<u8>>>,
}

impl Link {
    fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx: Some(tx),
            rx: Some(rx),
        }
    }
}

/// One channel per (lane, src, dst); each endpoint claims its half
/// exactly once, and fully claimed links leave the map so channel
/// lifetime follows the handles.
struct Mesh {
    size: usize,
    links: Mutex<HashMap<(u32, Rank, Rank), Link>>,
    next_lane: Vec<AtomicU32>,
}

impl Mesh {
    fn new(size: usize) -> Self {
        Self {
            size,
            links: Mutex::new(HashMap::new()),
            next_lane: (0..size).map(|_| AtomicU32::new(1)).collect(),
        }
    }

    fn claim_sender(&self, lane: u32, src: Rank, dst: Rank) -> Sender<Vec<u8>> {
        let mut links = self.links.lock().expect("mesh lock poisoned");
        let link = links.entry((lane, src, dst)).or_insert_with(Link::new);
        let tx = link.tx.take().expect("sender half already claimed");
        if link.rx.is_none() {
            links.remove(&(lane, src, dst));
        }
        tx
    }

    fn claim_receiver(&self, lane: u32, src: Rank, dst: Rank) -> Receiver<Vec<u8>> {
        let mut links = self.links.lock().expect("mesh lock poisoned");
        let link = links.entry((lane, src, dst)).or_insert_with(Link::new);
        let rx = link.rx.take().expect("receiver half already claimed");
        if link.tx.is_none() {
            links.remove(&(lane, src, dst));
        }
        rx
    }
}

/// A fixed-size in-process group; each member is a thread holding one
/// [`LocalChannel`].
pub struct LocalGroup;

impl LocalGroup {
    /// Creates the group, handing out one channel per rank.
    pub fn new(size: usize) -> Vec<LocalChannel> {
        let mesh = Arc::new(Mesh::new(size));
        (0..size)
            .map(|rank| LocalChannel::attach(Arc::clone(&mesh), rank, 0))
            .collect()
    }
}

/// One rank's endpoint of an in-process group lane.
pub struct LocalChannel {
    mesh: Arc<Mesh>,
    rank: Rank,
    outbox: Vec<Sender<Vec<u8>>>,
    inbox: Vec<Receiver<Vec<u8>>>,
}

impl LocalChannel {
    fn attach(mesh: Arc<Mesh>, rank: Rank, lane: u32) -> Self {
        let outbox = (0..mesh.size)
            .map(|dst| mesh.claim_sender(lane, rank, dst))
            .collect();
        let inbox = (0..mesh.size)
            .map(|src| mesh.claim_receiver(lane, src, rank))
            .collect();
        Self {
            mesh,
            rank,
            outbox,
            inbox,
        }
    }
}

impl RankedChannel for LocalChannel {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn group_size(&self) -> usize {
        self.mesh.size
    }

    fn send(&self, dst: Rank, payload: Vec<u8>) -> Result<()> {
        let tx = self.outbox.get(dst).ok_or(CommError::InvalidRank(dst))?;
        tx.send(payload).map_err(|_| CommError::Disconnected(dst))
    }

    fn recv(&self, src: Rank) -> Result<Vec<u8>> {
        let rx = self.inbox.get(src).ok_or(CommError::InvalidRank(src))?;
        rx.recv().map_err(|_| CommError::Disconnected(src))
    }

    fn duplicate(&self) -> Result<Self> {
        // Per-rank lane counters; matching duplication sequences across
        // ranks yield matching lanes.
        let lane = self.mesh.next_lane[self.rank].fetch_add(1, Ordering::SeqCst);
        Ok(Self::attach(Arc::clone(&self.mesh), self.rank, lane))
    }
}
