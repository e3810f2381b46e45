use serde::{Deserialize, Serialize};

use crate::types::{TabId, UserId};

/// Message exchanged between tabs over the broadcast channel.
///
/// A tagged union with an explicit `type` discriminant — peers decode the
/// variant from the tag, never from duck-typed property sniffing. The wire
/// shape is camelCase JSON so browser-hosted peers interoperate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PeerMessage {
    /// "I am now the active tab for this user."
    TabAnnounce {
        user_id: UserId,
        tab_id: TabId,
        tab_created_at_ms: i64,
    },
    /// "A remote validity check failed; all tabs must terminate immediately."
    RemoteKick,
}
