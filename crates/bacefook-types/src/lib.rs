//! Shared type definitions for the Bacefook event generator.
//!
//! Types defined here are the wire contract of the generator: every batch
//! is a JSON array of [`ConnectionEvent`] values. They flow to `TypeScript`
//! via `ts-rs` for consumers of the fixture files.
//!
//! # Modules
//!
//! - [`names`] -- Sequential user names (`user00001`, ...)
//! - [`events`] -- The four event kinds and their tagged union

pub mod events;
pub mod names;

pub use events::{
    AddFriendEvent, ConnectionEvent, EventKind, ReferralEvent, RegisterEvent, UnfriendEvent,
};
pub use names::UserName;
