use grapnel::archive::InArchive;
use grapnel::communication::{Communicator, LocalChannel, LocalGroup, RankedChannel};
use std::sync::Arc;
use std::thread;

/// Runs `f` once per rank, one thread each, returning the per-rank
/// results in rank order.
fn run_ranks<T, F>(size: usize, f: F) -> Vec<T>
where
    T: Send + 'static,
    F: Fn(LocalChannel) -> T + Send + Sync + 'static,
{
    let _ = env_logger::builder().is_test(true).try_init();
    let f = Arc::new(f);
    let handles: Vec<_> = LocalGroup::new(size)
        .into_iter()
        .map(|chan| {
            let f = Arc::clone(&f);
            thread::spawn(move || f(chan))
        })
        .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

fn init(chan: &LocalChannel) -> Communicator<LocalChannel> {
    let mut comm = Communicator::new();
    comm.init_communicator(chan).unwrap();
    comm
}

#[test]
fn test_sum_on_every_rank() {
    let results = run_ranks(4, |chan| {
        let comm = init(&chan);
        comm.sum(chan.rank() as u64).unwrap()
    });
    assert_eq!(results, vec![6, 6, 6, 6]);
}

#[test]
fn test_max_and_min() {
    let results = run_ranks(4, |chan| {
        let comm = init(&chan);
        let contribution = [20i64, 3, 17, 9][chan.rank()];
        (comm.max(contribution).unwrap(), comm.min(contribution).unwrap())
    });
    assert!(results.iter().all(|&r| r == (20, 3)));
}

#[test]
fn test_all_reduce_order_is_rank_ascending() {
    // A non-commutative combinator pins the combination order.
    let results = run_ranks(4, |chan| {
        let comm = init(&chan);
        let word = format!("r{}", chan.rank());
        comm.all_reduce(word, |lhs, rhs| lhs.push_str(&rhs)).unwrap()
    });
    assert!(results.iter().all(|r| r == "r0r1r2r3"));
}

#[test]
fn test_archive_all_gather_round_trip() {
    let size = 4;
    let results = run_ranks(size, |chan| {
        let comm = init(&chan);
        let mut arc = InArchive::new();
        arc.add(&(chan.rank() as u32));
        let mut combined = comm.archive_all_gather(&arc).unwrap();
        (0..chan.group_size())
            .map(|_| combined.get::<u32>().unwrap())
            .collect::<Vec<_>>()
    });
    for ranks in results {
        assert_eq!(ranks, vec![0, 1, 2, 3]);
    }
}

#[test]
fn test_archive_all_gather_variable_lengths() {
    let results = run_ranks(3, |chan| {
        let comm = init(&chan);
        let mut arc = InArchive::new();
        // Segment lengths differ per rank.
        arc.add(&"x".repeat(chan.rank() + 1));
        let mut combined = comm.archive_all_gather(&arc).unwrap();
        (0..chan.group_size())
            .map(|_| combined.get::<String>().unwrap())
            .collect::<Vec<_>>()
    });
    for strings in results {
        assert_eq!(strings, vec!["x", "xx", "xxx"]);
    }
}

#[test]
fn test_point_to_point() {
    let results = run_ranks(2, |chan| {
        let comm = init(&chan);
        if chan.rank() == 0 {
            comm.send_to(1, &(41u32, String::from("ping"))).unwrap();
            comm.recv_from::<String>(1).unwrap()
        } else {
            let (n, word) = comm.recv_from::<(u32, String)>(0).unwrap();
            comm.send_to(0, &format!("{}-{}", word, n + 1)).unwrap();
            String::from("done")
        }
    });
    assert_eq!(results[0], "ping-42");
}

#[test]
fn test_collective_sequence_repeats() {
    // Several collectives back to back over the same communicator.
    let results = run_ranks(3, |chan| {
        let comm = init(&chan);
        let a = comm.sum(1u64).unwrap();
        let b = comm.max(chan.rank() as u64).unwrap();
        let c = comm.sum(b + a).unwrap();
        (a, b, c)
    });
    assert!(results.iter().all(|&r| r == (3, 2, 15)));
}
