//! Undirected friendship graph.
//!
//! The graph owns the ordered list of registered users and a symmetric
//! adjacency map. Its mutators enforce the structural invariants every batch
//! relies on:
//!
//! - no self-loops,
//! - at most one edge per unordered pair,
//! - symmetry (`u` lists `v` exactly when `v` lists `u`),
//! - edges only between registered users.
//!
//! Users are never removed or renamed.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound::{Excluded, Unbounded};

use bacefook_types::UserName;

/// Point-in-time summary of a [`FriendGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphStats {
    /// Number of registered users.
    pub users: usize,
    /// Number of undirected friendship edges.
    pub friendships: usize,
    /// Highest degree of any user (0 for an empty graph).
    pub max_degree: usize,
}

/// The evolving social graph of a simulation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FriendGraph {
    /// Users in registration order.
    users: Vec<UserName>,
    /// Adjacency sets keyed by user. Every registered user has an entry.
    friendships: BTreeMap<UserName, BTreeSet<UserName>>,
    /// Number of undirected edges.
    edge_count: usize,
}

impl FriendGraph {
    /// Create an empty graph.
    pub const fn new() -> Self {
        Self {
            users: Vec::new(),
            friendships: BTreeMap::new(),
            edge_count: 0,
        }
    }

    /// Register the next sequential user and return its name.
    pub fn register_next(&mut self) -> UserName {
        let name = UserName::from_index(self.users.len());
        self.friendships.entry(name.clone()).or_default();
        self.users.push(name.clone());
        name
    }

    /// Number of registered users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Registered users in registration order.
    pub fn users(&self) -> &[UserName] {
        &self.users
    }

    /// The user registered at the given 0-based position.
    pub fn user_at(&self, index: usize) -> Option<&UserName> {
        self.users.get(index)
    }

    /// Whether `user` has been registered.
    pub fn contains(&self, user: &UserName) -> bool {
        self.friendships.contains_key(user)
    }

    /// Number of undirected edges.
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of friends of `user` (0 for unknown users).
    pub fn degree(&self, user: &UserName) -> usize {
        self.friendships.get(user).map_or(0, BTreeSet::len)
    }

    /// Whether `a` and `b` are currently friends.
    pub fn are_friends(&self, a: &UserName, b: &UserName) -> bool {
        self.friendships
            .get(a)
            .is_some_and(|friends| friends.contains(b))
    }

    /// Iterate over the friends of `user` in name order.
    pub fn friends_of<'a>(
        &'a self,
        user: &UserName,
    ) -> impl Iterator<Item = &'a UserName> + use<'a> {
        self.friendships.get(user).into_iter().flatten()
    }

    /// Add the edge `{a, b}`.
    ///
    /// Returns `false` without changing anything if `a == b`, either user is
    /// unknown, or the edge already exists.
    pub fn add_friendship(&mut self, a: &UserName, b: &UserName) -> bool {
        if a == b || !self.contains(a) || !self.contains(b) || self.are_friends(a, b) {
            return false;
        }
        if let Some(friends) = self.friendships.get_mut(a) {
            friends.insert(b.clone());
        }
        if let Some(friends) = self.friendships.get_mut(b) {
            friends.insert(a.clone());
        }
        self.edge_count = self.edge_count.saturating_add(1);
        true
    }

    /// Remove the edge `{a, b}`. Returns `false` if it did not exist.
    pub fn remove_friendship(&mut self, a: &UserName, b: &UserName) -> bool {
        let removed = self
            .friendships
            .get_mut(a)
            .is_some_and(|friends| friends.remove(b));
        if !removed {
            return false;
        }
        if let Some(friends) = self.friendships.get_mut(b) {
            friends.remove(a);
        }
        self.edge_count = self.edge_count.saturating_sub(1);
        true
    }

    /// Every edge exactly once, as `(smaller, larger)` by name.
    ///
    /// Each pair is taken only from its lexicographically smaller endpoint,
    /// so callers that mutate the graph while walking this snapshot never see
    /// the same pair twice.
    pub fn canonical_edges(&self) -> Vec<(UserName, UserName)> {
        let mut edges = Vec::with_capacity(self.edge_count);
        for (user, friends) in &self.friendships {
            for friend in friends.range::<UserName, _>((Excluded(user), Unbounded)) {
                edges.push((user.clone(), friend.clone()));
            }
        }
        edges
    }

    /// Summarize the current state.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            users: self.users.len(),
            friendships: self.edge_count,
            max_degree: self
                .friendships
                .values()
                .map(BTreeSet::len)
                .max()
                .unwrap_or(0),
        }
    }
}
