//! A two-rank breadth-first traversal exercising the whole substrate:
//! frontier sets, dense per-vertex values and the collectives.

use grapnel::archive::InArchive;
use grapnel::communication::{Communicator, LocalChannel, LocalGroup, RankedChannel};
use grapnel::fragment::{Fragment, SimpleFragment};
use grapnel::vertex::{Vertex, VertexValues, VertexVector};
use grapnel::vertex_set::DenseVertexSet;
use std::thread;

const VERTICES_PER_RANK: u64 = 4;
const NUM_RANKS: usize = 2;

/// The global graph is the chain 0 -> 1 -> ... -> 7; rank r owns the
/// ids [4r, 4r + 4).
fn bfs_rank(chan: LocalChannel) -> Vec<u64> {
    let rank = chan.rank();
    let base = rank as u64 * VERTICES_PER_RANK;
    let last = NUM_RANKS as u64 * VERTICES_PER_RANK - 1;
    let frag = SimpleFragment::new(VertexVector::from_ids(
        (base..base + VERTICES_PER_RANK).collect(),
    ));
    let mut comm = Communicator::new();
    comm.init_communicator(&chan).unwrap();

    let mut depth: VertexValues<u64, u64> = VertexValues::new();
    depth.init_with(frag.inner_vertices(), u64::MAX);
    let mut frontier = DenseVertexSet::new();
    frontier.init(frag.inner_vertices(), 1);
    let mut next = DenseVertexSet::new();
    next.init(frag.inner_vertices(), 1);

    if rank == 0 {
        depth[Vertex::new(0)] = 0;
        frontier.insert(Vertex::new(0));
    }

    loop {
        let mut outgoing: Vec<(u64, u64)> = Vec::new();
        for v in frag.inner_vertices() {
            if !frontier.exist(v) {
                continue;
            }
            let d = depth[v];
            if v.value() == last {
                continue;
            }
            let succ = v.value() + 1;
            if succ < base || succ >= base + VERTICES_PER_RANK {
                outgoing.push((succ, d + 1));
            } else {
                let u = Vertex::new(succ);
                if depth[u] > d + 1 {
                    depth[u] = d + 1;
                    next.insert(u);
                }
            }
        }

        let mut arc = InArchive::new();
        arc.add(&outgoing);
        let mut gathered = comm.archive_all_gather(&arc).unwrap();
        for _ in 0..chan.group_size() {
            let messages: Vec<(u64, u64)> = gathered.get().unwrap();
            for (target, d) in messages {
                if target >= base && target < base + VERTICES_PER_RANK {
                    let u = Vertex::new(target);
                    if depth[u] > d {
                        depth[u] = d;
                        next.insert(u);
                    }
                }
            }
        }

        let active = comm.sum(next.count() as u64).unwrap();
        frontier.swap(&mut next);
        next.clear();
        if active == 0 {
            break;
        }
    }

    frag.inner_vertices().iter().map(|v| depth[v]).collect()
}

#[test]
fn test_distributed_bfs_depths() {
    let handles: Vec<_> = LocalGroup::new(NUM_RANKS)
        .into_iter()
        .map(|chan| thread::spawn(move || bfs_rank(chan)))
        .collect();
    let results: Vec<Vec<u64>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    // In the chain graph every vertex's depth equals its id.
    assert_eq!(results[0], vec![0, 1, 2, 3]);
    assert_eq!(results[1], vec![4, 5, 6, 7]);
}
