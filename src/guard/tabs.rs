use time::OffsetDateTime;

use crate::session::StorageArea;
use crate::types::TabId;

/// Tab-scoped storage key for the random tab identifier.
pub const TAB_ID_KEY: &str = "salesAppTabId";
/// Tab-scoped storage key for the identity's creation timestamp.
pub const TAB_CREATED_AT_KEY: &str = "salesAppTabCreatedAt";

/// One open tab's identity: a random id plus its first-generation time.
///
/// Stable for the lifetime of the tab (survives in-tab navigation); a
/// duplicated tab gets a fresh identity because the backing storage area is
/// tab-scoped and not copied on duplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabIdentity {
    pub tab_id: TabId,
    pub created_at_ms: i64,
}

impl TabIdentity {
    /// Loads the identity from the tab-scoped area, generating and
    /// persisting a fresh one if either value is missing or malformed.
    pub fn load_or_create<S: StorageArea>(area: &S) -> Self {
        let stored_id = area.get(TAB_ID_KEY).filter(|s| !s.is_empty());
        let stored_ts = area
            .get(TAB_CREATED_AT_KEY)
            .and_then(|s| s.parse::<i64>().ok());

        if let (Some(id), Some(created_at_ms)) = (stored_id, stored_ts) {
            return Self {
                tab_id: TabId(id),
                created_at_ms,
            };
        }

        let identity = Self {
            tab_id: TabId::generate(),
            created_at_ms: now_ms(),
        };
        area.set(TAB_ID_KEY, identity.tab_id.as_str());
        area.set(TAB_CREATED_AT_KEY, &identity.created_at_ms.to_string());
        tracing::debug!(tab_id = %identity.tab_id, "Generated tab identity");
        identity
    }

    /// Last-tab-wins ordering against another tab's announce.
    ///
    /// True when the other tab is strictly newer, or was created in the same
    /// millisecond and carries the lexicographically greater id. The
    /// secondary id compare makes the ordering total: of any two distinct
    /// tabs, exactly one loses.
    #[must_use]
    pub fn loses_to(&self, other_created_at_ms: i64, other_id: &TabId) -> bool {
        other_created_at_ms > self.created_at_ms
            || (other_created_at_ms == self.created_at_ms
                && other_id.as_str() > self.tab_id.as_str())
    }
}

fn now_ms() -> i64 {
    i64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000)
        .unwrap_or(i64::MAX)
}
