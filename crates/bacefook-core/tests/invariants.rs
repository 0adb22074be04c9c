//! Multi-batch invariants of the graph simulator.
//!
//! Each test replays the emitted events into an independent edge set and
//! checks them against the structural rules of the social graph: sequential
//! registration, no self or duplicate edges, unfriends only of live edges,
//! and referrers that predate the referred user.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::BTreeSet;

use bacefook_core::simulator::initial_degree_cap;
use bacefook_core::{GraphSimulator, RngSource, SeededRandom};
use bacefook_types::{ConnectionEvent, EventKind, UserName};

type Edge = (String, String);

fn edge(a: &UserName, b: &UserName) -> Edge {
    let (a, b) = (a.to_string(), b.to_string());
    if a < b { (a, b) } else { (b, a) }
}

fn simulator(seed: u64) -> GraphSimulator<SeededRandom> {
    GraphSimulator::with_random(RngSource::seeded(seed))
}

/// Replays batches and asserts every invariant along the way.
struct Replay {
    users: Vec<String>,
    edges: BTreeSet<Edge>,
}

impl Replay {
    const fn new() -> Self {
        Self {
            users: Vec::new(),
            edges: BTreeSet::new(),
        }
    }

    fn apply(&mut self, batch: &[ConnectionEvent], requested: usize) {
        let existing_before = self.users.len();
        let stamp = batch[0].created_at().to_owned();
        let mut removed_this_batch = BTreeSet::new();

        for event in batch {
            assert_eq!(event.created_at(), stamp, "one timestamp per batch");
            match event {
                ConnectionEvent::Register(reg) => {
                    let expected = UserName::from_index(self.users.len()).to_string();
                    assert_eq!(reg.name.as_str(), expected);
                    self.users.push(expected);
                }
                ConnectionEvent::Referral(referral) => {
                    assert_ne!(referral.referred_by, referral.user);
                    let referrer = self
                        .users
                        .iter()
                        .position(|u| u == referral.referred_by.as_str())
                        .unwrap();
                    let referred = self
                        .users
                        .iter()
                        .position(|u| u == referral.user.as_str())
                        .unwrap();
                    assert!(referred >= existing_before, "only new users are referred");
                    assert!(referrer < referred);
                    if existing_before > 0 {
                        assert!(referrer < existing_before);
                    }
                }
                ConnectionEvent::AddFriend(add) => {
                    assert_ne!(add.user1_name, add.user2_name, "no self edges");
                    assert!(
                        self.edges.insert(edge(&add.user1_name, &add.user2_name)),
                        "addfriend must not duplicate a live edge"
                    );
                }
                ConnectionEvent::Unfriend(rm) => {
                    assert!(rm.user1_name < rm.user2_name, "canonical order");
                    let pair = edge(&rm.user1_name, &rm.user2_name);
                    assert!(self.edges.remove(&pair), "unfriend of a live edge");
                    assert!(removed_this_batch.insert(pair), "removed at most once");
                }
            }
        }

        assert_eq!(self.users.len(), existing_before + requested);
    }
}

#[test]
fn invariants_hold_across_many_batches() {
    for seed in 0..5 {
        let mut sim = simulator(seed);
        let mut replay = Replay::new();
        for (round, size) in [30, 12, 15, 19, 10, 11, 14, 18].into_iter().enumerate() {
            let batch = sim.generate_batch(size).unwrap();
            replay.apply(&batch, size);
            if round == 0 {
                assert!(batch.iter().all(|e| e.kind() != EventKind::Unfriend));
            }
        }

        let graph_edges: BTreeSet<Edge> = sim
            .graph()
            .canonical_edges()
            .iter()
            .map(|(a, b)| edge(a, b))
            .collect();
        assert_eq!(replay.edges, graph_edges);
        assert_eq!(sim.stats().friendships, graph_edges.len());
        assert_eq!(sim.stats().users, replay.users.len());
    }
}

#[test]
fn example_first_batch_of_ten() {
    let mut sim = simulator(42);
    let events = sim.generate_batch(10).unwrap();

    let names: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            ConnectionEvent::Register(r) => Some(r.name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(
        names,
        [
            "user00001", "user00002", "user00003", "user00004", "user00005", "user00006",
            "user00007", "user00008", "user00009", "user00010",
        ]
    );
    assert!(events.iter().all(|e| e.kind() != EventKind::Unfriend));
    let stamp = events[0].created_at();
    assert!(events.iter().all(|e| e.created_at() == stamp));
}

#[test]
fn second_generation_churns_existing_friendships() {
    let mut sim = simulator(7);
    let genesis = sim.generate_batch(50).unwrap();
    assert!(genesis.iter().all(|e| e.kind() != EventKind::Unfriend));
    assert!(sim.graph().edge_count() > 0);

    let second = sim.generate_batch(50).unwrap();
    assert!(second.iter().any(|e| e.kind() == EventKind::Unfriend));
}

#[test]
fn referral_rate_is_roughly_one_in_five() {
    let mut sim = simulator(99);
    let events = sim.generate_batch(100).unwrap();
    let referrals = events
        .iter()
        .filter(|e| e.kind() == EventKind::Referral)
        .count();
    assert!(referrals > 5, "got {referrals}");
    assert!(referrals < 40, "got {referrals}");
}

#[test]
fn initial_round_degree_growth_is_bounded() {
    let total = 120;
    let cap = initial_degree_cap(total);
    let mut sim = simulator(5);
    let events = sim.generate_batch(total).unwrap();

    let adds = events
        .iter()
        .filter(|e| e.kind() == EventKind::AddFriend)
        .count();
    assert!(adds <= total * cap);
    assert!(sim.stats().max_degree < total);
}

#[test]
fn failed_calls_do_not_disturb_a_running_simulation() {
    let mut sim = simulator(3);
    sim.generate_batch(20).unwrap();
    let before = sim.graph().clone();

    assert!(sim.generate_batch(0).is_err());
    assert!(sim.generate_batch(-5).is_err());
    assert!(sim.generate_batch(f64::NAN).is_err());
    assert!(sim.generate_batch("Infinity".parse::<f64>().unwrap()).is_err());

    assert_eq!(sim.graph(), &before);
}

#[test]
fn independent_simulators_do_not_share_state() {
    let mut a = simulator(1);
    let mut b = simulator(1);
    a.generate_batch(10).unwrap();
    a.generate_batch(10).unwrap();
    let first_of_b = b.generate_batch(10).unwrap();

    assert_eq!(a.graph().user_count(), 20);
    assert_eq!(b.graph().user_count(), 10);
    assert_eq!(
        first_of_b[0],
        ConnectionEvent::Register(bacefook_types::RegisterEvent {
            name: UserName::from_index(0),
            created_at: first_of_b[0].created_at().to_owned(),
        })
    );
}

#[test]
fn stream_batches_satisfy_invariants() {
    let mut replay = Replay::new();
    for batch in simulator(11).into_stream(16).take(6) {
        replay.apply(&batch.unwrap(), 16);
    }
    assert_eq!(replay.users.len(), 96);
}
