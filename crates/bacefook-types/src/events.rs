//! Connection events emitted by the graph simulator.
//!
//! Each event is an immutable record of one state transition. On the wire an
//! event is a flat JSON object carrying a `type` discriminator next to its
//! fields:
//!
//! ```json
//! { "type": "addfriend", "user1_name": "user00003", "user2_name": "user00017", "created_at": "20250101T120000000Z" }
//! ```
//!
//! All events of one batch share the same `created_at` value.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::names::UserName;

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// A new user joined the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RegisterEvent {
    /// Name of the newly registered user.
    pub name: UserName,
    /// Batch timestamp.
    pub created_at: String,
}

/// A new user was referred by an existing one. Does not touch the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ReferralEvent {
    /// The existing user credited with the referral.
    #[serde(rename = "referredBy")]
    pub referred_by: UserName,
    /// The newly registered user.
    pub user: UserName,
    /// Batch timestamp.
    pub created_at: String,
}

/// A friendship edge was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AddFriendEvent {
    /// The user who initiated the friendship.
    pub user1_name: UserName,
    /// The partner chosen by the initiator.
    pub user2_name: UserName,
    /// Batch timestamp.
    pub created_at: String,
}

/// A friendship edge was removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct UnfriendEvent {
    /// The lexicographically smaller endpoint.
    pub user1_name: UserName,
    /// The lexicographically larger endpoint.
    pub user2_name: UserName,
    /// Batch timestamp.
    pub created_at: String,
}

// ---------------------------------------------------------------------------
// Tagged union
// ---------------------------------------------------------------------------

/// Any event produced by a generation batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConnectionEvent {
    /// See [`RegisterEvent`].
    Register(RegisterEvent),
    /// See [`ReferralEvent`].
    Referral(ReferralEvent),
    /// See [`AddFriendEvent`].
    AddFriend(AddFriendEvent),
    /// See [`UnfriendEvent`].
    Unfriend(UnfriendEvent),
}

impl ConnectionEvent {
    /// The discriminator of this event.
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Register(_) => EventKind::Register,
            Self::Referral(_) => EventKind::Referral,
            Self::AddFriend(_) => EventKind::AddFriend,
            Self::Unfriend(_) => EventKind::Unfriend,
        }
    }

    /// The batch timestamp carried by this event.
    pub fn created_at(&self) -> &str {
        match self {
            Self::Register(e) => &e.created_at,
            Self::Referral(e) => &e.created_at,
            Self::AddFriend(e) => &e.created_at,
            Self::Unfriend(e) => &e.created_at,
        }
    }
}

impl From<RegisterEvent> for ConnectionEvent {
    fn from(event: RegisterEvent) -> Self {
        Self::Register(event)
    }
}

impl From<ReferralEvent> for ConnectionEvent {
    fn from(event: ReferralEvent) -> Self {
        Self::Referral(event)
    }
}

impl From<AddFriendEvent> for ConnectionEvent {
    fn from(event: AddFriendEvent) -> Self {
        Self::AddFriend(event)
    }
}

impl From<UnfriendEvent> for ConnectionEvent {
    fn from(event: UnfriendEvent) -> Self {
        Self::Unfriend(event)
    }
}

/// The `type` discriminator of a [`ConnectionEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// `register`
    Register,
    /// `referral`
    Referral,
    /// `addfriend`
    AddFriend,
    /// `unfriend`
    Unfriend,
}

impl EventKind {
    /// The wire name of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Referral => "referral",
            Self::AddFriend => "addfriend",
            Self::Unfriend => "unfriend",
        }
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    const STAMP: &str = "20250101T120000000Z";

    #[test]
    fn register_wire_shape() {
        let event = ConnectionEvent::from(RegisterEvent {
            name: UserName::from_index(0),
            created_at: String::from(STAMP),
        });
        let value: Value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({ "type": "register", "name": "user00001", "created_at": STAMP })
        );
    }

    #[test]
    fn referral_uses_camel_case_referrer() {
        let event = ConnectionEvent::from(ReferralEvent {
            referred_by: UserName::from_index(0),
            user: UserName::from_index(4),
            created_at: String::from(STAMP),
        });
        let value: Value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "referral",
                "referredBy": "user00001",
                "user": "user00005",
                "created_at": STAMP
            })
        );
    }

    #[test]
    fn friendship_events_use_lowercase_tags() {
        let add = ConnectionEvent::from(AddFriendEvent {
            user1_name: UserName::from_index(2),
            user2_name: UserName::from_index(1),
            created_at: String::from(STAMP),
        });
        let remove = ConnectionEvent::from(UnfriendEvent {
            user1_name: UserName::from_index(1),
            user2_name: UserName::from_index(2),
            created_at: String::from(STAMP),
        });

        let add_json = serde_json::to_value(&add).unwrap();
        let remove_json = serde_json::to_value(&remove).unwrap();
        assert_eq!(add_json["type"], "addfriend");
        assert_eq!(add_json["user1_name"], "user00003");
        assert_eq!(remove_json["type"], "unfriend");
        assert_eq!(remove_json["user2_name"], "user00003");
    }

    #[test]
    fn parses_events_written_by_other_tools() {
        let raw = r#"[
            {"type":"register","name":"user00001","created_at":"x"},
            {"type":"unfriend","user1_name":"user00001","user2_name":"user00002","created_at":"x"}
        ]"#;
        let events: Vec<ConnectionEvent> = serde_json::from_str(raw).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind(), EventKind::Register);
        assert_eq!(events[1].kind(), EventKind::Unfriend);
        assert_eq!(events[1].created_at(), "x");
    }

    #[test]
    fn kind_display_matches_wire_tag() {
        for kind in [
            EventKind::Register,
            EventKind::Referral,
            EventKind::AddFriend,
            EventKind::Unfriend,
        ] {
            let tagged = serde_json::to_value(kind).unwrap();
            assert_eq!(tagged, Value::String(kind.to_string()));
        }
    }
}
