//! The friend-graph simulation engine.
//!
//! A [`GraphSimulator`] owns one evolving [`FriendGraph`] and advances it one
//! generation per call to [`GraphSimulator::generate_batch`]. Each batch runs
//! five phases against a single timestamp:
//!
//! 1. **Registration**: append the requested number of sequential users.
//! 2. **Referrals**: each new user is credited to an earlier user with
//!    probability [`REFERRAL_RATE`]. Referrals never touch the graph.
//! 3. **Churn**: every existing edge is removed with probability
//!    [`CHURN_RATE`], each unordered pair evaluated exactly once.
//! 4. **Friend formation**: the very first batch seeds each user with a
//!    random target degree; later batches give every user a
//!    [`NEW_FRIEND_RATE`] chance of one new friend.
//! 5. **Assembly**: events are returned as registrations, unfriends,
//!    addfriends, then referrals.
//!
//! State is cumulative across calls and there is no reset. Invalid counts are
//! rejected before any phase runs, so a failed call leaves the graph
//! untouched.

use bacefook_types::{
    AddFriendEvent, ConnectionEvent, ReferralEvent, RegisterEvent, UnfriendEvent, UserName,
};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::clock::batch_timestamp;
use crate::count::UserCount;
use crate::error::SimulationError;
use crate::graph::{FriendGraph, GraphStats};
use crate::random::{RandomSource, ThreadRandom};
use crate::stream::EventStream;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Probability that a new user is credited to a referrer.
pub const REFERRAL_RATE: f64 = 0.2;

/// Probability that an existing edge is removed in a batch.
pub const CHURN_RATE: f64 = 0.2;

/// Probability that a user looks for one new friend in a later batch.
pub const NEW_FRIEND_RATE: f64 = 0.3;

/// Partner draws allowed per user when looking for a new friend.
pub const FRIEND_SEARCH_ATTEMPTS: usize = 10;

/// Absolute ceiling on the initial target degree.
pub const INITIAL_DEGREE_CEILING: usize = 200;

/// Consecutive failed partner draws after which the initial round stops
/// growing a user's degree.
pub const INITIAL_SEARCH_MISS_LIMIT: usize = 100;

/// Upper bound of the initial target degree for a network of `total` users:
/// `min(200, floor(total * 0.5))`.
pub const fn initial_degree_cap(total: usize) -> usize {
    let half = total / 2;
    if half < INITIAL_DEGREE_CEILING {
        half
    } else {
        INITIAL_DEGREE_CEILING
    }
}

// ---------------------------------------------------------------------------
// GraphSimulator
// ---------------------------------------------------------------------------

/// Stateful generator of social-network activity.
///
/// The random source is injected so that tests can drive the simulation with
/// seeded or scripted decisions; [`GraphSimulator::new`] uses the
/// thread-local generator.
#[derive(Debug, Clone)]
pub struct GraphSimulator<R = ThreadRandom> {
    /// Users and friendships accumulated so far.
    graph: FriendGraph,
    /// Source of every random decision.
    random: R,
}

impl GraphSimulator {
    /// Create an empty simulation backed by the thread-local generator.
    pub fn new() -> Self {
        Self::with_random(ThreadRandom::thread())
    }
}

impl Default for GraphSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> GraphSimulator<R> {
    /// Create an empty simulation driven by `random`.
    pub const fn with_random(random: R) -> Self {
        Self {
            graph: FriendGraph::new(),
            random,
        }
    }

    /// The current graph.
    pub const fn graph(&self) -> &FriendGraph {
        &self.graph
    }

    /// Summary of the current graph.
    pub fn stats(&self) -> GraphStats {
        self.graph.stats()
    }

    /// Mutable access to the injected random source.
    pub const fn random_mut(&mut self) -> &mut R {
        &mut self.random
    }

    /// Advance the simulation by one generation stamped with the current time.
    ///
    /// `new_user_count` may be any value convertible into a [`UserCount`];
    /// zero, negative, fractional, infinite and `NaN` inputs fail with
    /// [`SimulationError::InvalidArgument`] and leave the state untouched.
    pub fn generate_batch<C>(
        &mut self,
        new_user_count: C,
    ) -> Result<Vec<ConnectionEvent>, SimulationError>
    where
        C: TryInto<UserCount>,
        SimulationError: From<C::Error>,
    {
        self.generate_batch_at(new_user_count, Utc::now())
    }

    /// Advance the simulation by one generation stamped with `now`.
    pub fn generate_batch_at<C>(
        &mut self,
        new_user_count: C,
        now: DateTime<Utc>,
    ) -> Result<Vec<ConnectionEvent>, SimulationError>
    where
        C: TryInto<UserCount>,
        SimulationError: From<C::Error>,
    {
        let count: UserCount = new_user_count.try_into()?;
        Ok(self.run_batch(count, &batch_timestamp(now)))
    }

    /// Turn this simulator into an endless stream of batches of `count` new
    /// users each. The count is checked when the first batch is pulled.
    pub fn into_stream<C>(self, count: C) -> EventStream<R>
    where
        C: TryInto<UserCount>,
        SimulationError: From<C::Error>,
    {
        EventStream::new(self, count.try_into().map_err(SimulationError::from))
    }

    /// Run all phases of one generation.
    pub(crate) fn run_batch(
        &mut self,
        count: UserCount,
        created_at: &str,
    ) -> Vec<ConnectionEvent> {
        let first_new = self.graph.user_count();

        let registered = self.register_users(count, created_at);
        let referrals = self.referral_events(first_new, created_at);
        let unfriended = self.unfriend_random_subset(created_at);

        let initial_round = self.graph.user_count() == count.get();
        let befriended = if initial_round {
            self.add_initial_friendships(created_at)
        } else {
            self.add_new_friendships(created_at)
        };

        debug!(
            created_at,
            registered = registered.len(),
            unfriended = unfriended.len(),
            befriended = befriended.len(),
            referrals = referrals.len(),
            initial_round,
            friendships = self.graph.edge_count(),
            "Batch generated"
        );

        let mut events = registered;
        events.reserve(
            unfriended
                .len()
                .saturating_add(befriended.len())
                .saturating_add(referrals.len()),
        );
        events.extend(unfriended);
        events.extend(befriended);
        events.extend(referrals);
        events
    }

    // -----------------------------------------------------------------------
    // Phases
    // -----------------------------------------------------------------------

    /// Append `count` sequential users, one `register` event each.
    fn register_users(&mut self, count: UserCount, created_at: &str) -> Vec<ConnectionEvent> {
        (0..count.get())
            .map(|_| {
                ConnectionEvent::from(RegisterEvent {
                    name: self.graph.register_next(),
                    created_at: created_at.to_owned(),
                })
            })
            .collect()
    }

    /// Credit new users (positions `first_new..`) to earlier users.
    ///
    /// Referrers come from the users that existed before this batch. On the
    /// very first batch there are none, so a new user may only be credited to
    /// someone registered earlier in the same batch. Either way the pool ends
    /// before the new user, so it can never refer itself.
    fn referral_events(&mut self, first_new: usize, created_at: &str) -> Vec<ConnectionEvent> {
        let total = self.graph.user_count();
        if total < 2 {
            return Vec::new();
        }

        let mut events = Vec::new();
        for position in first_new..total {
            let pool = if first_new > 0 { first_new } else { position };
            if pool == 0 || !self.random.chance(REFERRAL_RATE) {
                continue;
            }
            let referrer_index = self.random.int_in_range(0, pool.saturating_sub(1));
            let (Some(referrer), Some(user)) = (
                self.graph.user_at(referrer_index),
                self.graph.user_at(position),
            ) else {
                continue;
            };
            if referrer == user {
                continue;
            }
            events.push(ConnectionEvent::from(ReferralEvent {
                referred_by: referrer.clone(),
                user: user.clone(),
                created_at: created_at.to_owned(),
            }));
        }
        events
    }

    /// Remove each existing edge with probability [`CHURN_RATE`].
    ///
    /// Edges are visited from their lexicographically smaller endpoint only,
    /// so every unordered pair gets exactly one draw and at most one
    /// `unfriend` event.
    fn unfriend_random_subset(&mut self, created_at: &str) -> Vec<ConnectionEvent> {
        let mut events = Vec::new();
        for (smaller, larger) in self.graph.canonical_edges() {
            if self.random.chance(CHURN_RATE) && self.graph.remove_friendship(&smaller, &larger) {
                events.push(ConnectionEvent::from(UnfriendEvent {
                    user1_name: smaller,
                    user2_name: larger,
                    created_at: created_at.to_owned(),
                }));
            }
        }
        events
    }

    /// First batch: grow every user towards a random target degree.
    fn add_initial_friendships(&mut self, created_at: &str) -> Vec<ConnectionEvent> {
        let total = self.graph.user_count();
        let cap = initial_degree_cap(total);
        let users = self.graph.users().to_vec();

        let mut events = Vec::new();
        for user in &users {
            let target = self.random.int_in_range(0, cap);
            let mut misses = 0_usize;
            while self.graph.degree(user) < target && misses < INITIAL_SEARCH_MISS_LIMIT {
                match self.try_befriend(user, total, created_at) {
                    Some(event) => {
                        events.push(event);
                        misses = 0;
                    }
                    None => misses = misses.saturating_add(1),
                }
            }
        }
        events
    }

    /// Later batches: every user may gain one friend.
    fn add_new_friendships(&mut self, created_at: &str) -> Vec<ConnectionEvent> {
        let total = self.graph.user_count();
        let users = self.graph.users().to_vec();

        let mut events = Vec::new();
        for user in &users {
            if !self.random.chance(NEW_FRIEND_RATE) {
                continue;
            }
            if let Some(event) =
                (0..FRIEND_SEARCH_ATTEMPTS).find_map(|_| self.try_befriend(user, total, created_at))
            {
                events.push(event);
            }
        }
        events
    }

    /// Draw one uniform partner for `user` and add the edge if it is valid.
    fn try_befriend(
        &mut self,
        user: &UserName,
        total: usize,
        created_at: &str,
    ) -> Option<ConnectionEvent> {
        let index = self.random.int_in_range(0, total.saturating_sub(1));
        let partner = self.graph.user_at(index)?.clone();
        self.graph
            .add_friendship(user, &partner)
            .then(|| {
                ConnectionEvent::from(AddFriendEvent {
                    user1_name: user.clone(),
                    user2_name: partner,
                    created_at: created_at.to_owned(),
                })
            })
    }
}
