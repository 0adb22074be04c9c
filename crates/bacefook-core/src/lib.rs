//! Friend-graph simulation engine for the Bacefook event generator.
//!
//! This crate owns the stateful model behind the generator: an undirected
//! social graph that grows, churns and gains new users across repeated
//! generation rounds, emitting one [`ConnectionEvent`] per state transition.
//!
//! # Modules
//!
//! - [`clock`] -- Compact, filename-safe batch timestamps.
//! - [`count`] -- [`UserCount`] validation for untrusted batch sizes.
//! - [`error`] -- [`SimulationError`].
//! - [`graph`] -- [`FriendGraph`], the symmetric adjacency structure.
//! - [`random`] -- [`RandomSource`] trait with seeded, thread-local and
//!   scripted implementations.
//! - [`simulator`] -- [`GraphSimulator`], one generation per call.
//! - [`stream`] -- [`EventStream`], an endless pull-based batch iterator.
//!
//! [`ConnectionEvent`]: bacefook_types::ConnectionEvent

pub mod clock;
pub mod count;
pub mod error;
pub mod graph;
pub mod random;
pub mod simulator;
pub mod stream;

pub use count::UserCount;
pub use error::SimulationError;
pub use graph::{FriendGraph, GraphStats};
pub use random::{RandomSource, RngSource, ScriptedRandom, SeededRandom, ThreadRandom};
pub use simulator::GraphSimulator;
pub use stream::EventStream;
