use serde::{Deserialize, Serialize};

use crate::types::{Role, SessionToken, UserId};

/// Storage key of the persisted session record.
///
/// Matches the key the login page writes, so records created by either side
/// are visible to the other.
pub const SESSION_STORAGE_KEY: &str = "salesAppSession";

/// The authenticated-session record, one per browser profile.
///
/// Serialized as camelCase JSON (`userId`, `sessionToken`) — the on-disk
/// shape is shared with the login flow and must not drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Absent on sessions created before tokens existed. Legacy sessions
    /// never participate in remote validity polling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<SessionToken>,
}

impl Session {
    /// Name shown in page chrome, falling back to the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

/// Consumer-provided key/value storage area.
///
/// Two instances back the guard: a profile-scoped area holding the session
/// record (shared by every tab of the browser profile) and a tab-scoped area
/// holding the tab identity. The tab-scoped area must NOT be copied when the
/// host duplicates a tab — a duplicated tab is a new tab and needs a fresh
/// identity.
///
/// Implementations never touch the network; all methods are infallible from
/// the caller's perspective (a lost write degrades enforcement, it does not
/// crash the page).
pub trait StorageArea: Send + Sync + 'static {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Reads and writes the persisted session record. Pure local state.
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    area: S,
}

impl<S: StorageArea> SessionStore<S> {
    #[must_use]
    pub fn new(area: S) -> Self {
        Self { area }
    }

    /// Parses the persisted record.
    ///
    /// Returns `None` on a missing key or malformed JSON — corrupt local
    /// state is recovered as "not signed in", never an error.
    #[must_use]
    pub fn read(&self) -> Option<Session> {
        let raw = self.area.get(SESSION_STORAGE_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::debug!(error = %e, "Malformed session record treated as absent");
                None
            }
        }
    }

    /// Overwrites the persisted record.
    pub fn write(&self, session: &Session) {
        match serde_json::to_string(session) {
            Ok(raw) => self.area.set(SESSION_STORAGE_KEY, &raw),
            Err(e) => tracing::error!(error = %e, "Failed to serialize session record"),
        }
    }

    /// Removes the persisted record.
    pub fn clear(&self) {
        self.area.remove(SESSION_STORAGE_KEY);
    }
}
