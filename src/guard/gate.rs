use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::channel::{PeerReceiver, PeerSender, TabBus};
use super::config::GuardConfig;
use super::kick::{KickTrigger, kick};
use super::state::{GuardState, Watchers};
use super::tabs::TabIdentity;
use super::traits::{PageChrome, SessionAuthority};
use super::types::PeerMessage;
use crate::session::{Session, SessionStore, StorageArea};
use crate::types::Role;

/// Absolute login entry point, used by the page-load auth check.
const LOGIN_ENTRY: &str = "/index.html";

/// Login path relative to whether the current page lives in a role-specific
/// subsection (`/user/`, `/admin/`) or at the top level. Kicks and voluntary
/// logouts navigate here.
pub(super) fn login_entry_from(current_path: &str) -> String {
    if current_path.contains("/user/") || current_path.contains("/admin/") {
        "../index.html".to_string()
    } else {
        "index.html".to_string()
    }
}

/// Page-load session guard: authentication gate plus single-session
/// enforcement watchers, owned per page instead of on ambient globals.
///
/// `initialize` is the one entry point protected pages call; it returns
/// whether the page should proceed rendering.
///
/// # Example
///
/// ```rust,ignore
/// let guard = SessionGuard::new(
///     GuardConfig::from_env()?,
///     profile_storage,   // shared by every tab of the profile
///     tab_storage,       // scoped to this tab, not copied on duplication
///     api_client,        // SessionAuthority
///     LocalHub::new(),   // TabBus
///     page,              // PageChrome
/// );
/// if !guard.initialize(Some(Role::Admin)) {
///     return; // redirected to login
/// }
/// ```
pub struct SessionGuard<S, T, A, B: TabBus, C> {
    inner: Arc<GuardState<S, T, A, B, C>>,
}

// Manual Clone: avoid derive adding bounds on the collaborator parameters.
impl<S, T, A, B: TabBus, C> Clone for SessionGuard<S, T, A, B, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, T, A, B, C> SessionGuard<S, T, A, B, C>
where
    S: StorageArea,
    T: StorageArea,
    A: SessionAuthority,
    B: TabBus,
    C: PageChrome,
{
    #[must_use]
    pub fn new(
        config: GuardConfig,
        profile_area: S,
        tab_area: T,
        authority: A,
        bus: B,
        chrome: C,
    ) -> Self {
        Self {
            inner: Arc::new(GuardState {
                config,
                store: SessionStore::new(profile_area),
                tab_area,
                authority: Arc::new(authority),
                bus,
                chrome: Arc::new(chrome),
                watchers: Mutex::new(Watchers::default()),
                shutdown: AtomicBool::new(false),
            }),
        }
    }

    /// Current session record, if any.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.inner.store.read()
    }

    /// True iff a well-formed session record with an identity exists.
    /// Malformed or missing records are simply "not signed in".
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .store
            .read()
            .is_some_and(|s| !s.user_id.as_str().is_empty())
    }

    /// Page-load auth check. Redirects to the login entry point and returns
    /// false when unauthenticated or when `required_role` does not match.
    /// A role mismatch mutates nothing: the session stays intact.
    pub fn require_auth(&self, required_role: Option<Role>) -> bool {
        let Some(session) = self.inner.store.read() else {
            self.inner.chrome.navigate(LOGIN_ENTRY);
            return false;
        };
        if session.user_id.as_str().is_empty() {
            self.inner.chrome.navigate(LOGIN_ENTRY);
            return false;
        }
        if let Some(role) = required_role {
            if session.role != role {
                tracing::debug!(required = %role, actual = %session.role, "Role mismatch; redirecting");
                self.inner.chrome.navigate(LOGIN_ENTRY);
                return false;
            }
        }
        true
    }

    /// Full page-load initialization: auth check, identity display, and the
    /// single-session watchers (tab coordinator + validity poller).
    ///
    /// Must be called within a tokio runtime: the watchers are spawned
    /// tasks. Returns whether the page should proceed rendering.
    pub fn initialize(&self, required_role: Option<Role>) -> bool {
        if !self.require_auth(required_role) {
            return false;
        }
        // Re-read rather than reuse: the record is shared mutable state and
        // a sibling may have cleared it between the check and here.
        let Some(session) = self.inner.store.read() else {
            self.inner.chrome.navigate(LOGIN_ENTRY);
            return false;
        };

        self.inner
            .chrome
            .show_identity(session.display_name(), &session.email);

        self.start_tab_coordinator(&session);
        self.inner.watchers().poll = super::poller::spawn(&self.inner);
        true
    }

    /// Same-device arbitration: announce this tab and listen for peers.
    /// Degrades to a no-op when the broadcast capability is missing.
    fn start_tab_coordinator(&self, session: &Session) {
        let identity = TabIdentity::load_or_create(&self.inner.tab_area);

        // Opening subscribes immediately, so announces racing with ours are
        // not missed even though the listener task starts afterwards.
        let Some((tx, mut rx)) = self.inner.bus.open(&self.inner.config.channel_name) else {
            tracing::debug!("Tab broadcast channel unavailable; cross-tab enforcement disabled");
            return;
        };

        let state = Arc::clone(&self.inner);
        let own_user = session.user_id.clone();
        let own = identity.clone();
        let listener = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                match msg {
                    PeerMessage::TabAnnounce {
                        user_id,
                        tab_id,
                        tab_created_at_ms,
                    } => {
                        if user_id != own_user {
                            // Different account in that tab; identity
                            // isolation is per account, no conflict.
                            continue;
                        }
                        if tab_id == own.tab_id {
                            continue; // own echo
                        }
                        if own.loses_to(tab_created_at_ms, &tab_id) {
                            kick(&state, KickTrigger::TabConflict);
                            break;
                        }
                    }
                    PeerMessage::RemoteKick => {
                        // Unconditional: a remote-detected kick applies to
                        // every tab regardless of identity or age.
                        kick(&state, KickTrigger::PeerKick);
                        break;
                    }
                }
            }
        });

        tx.publish(PeerMessage::TabAnnounce {
            user_id: session.user_id.clone(),
            tab_id: identity.tab_id.clone(),
            tab_created_at_ms: identity.created_at_ms,
        });

        let mut watchers = self.inner.watchers();
        watchers.listener = Some(listener);
        watchers.peer_tx = Some(tx);
    }

    /// Voluntary, user-initiated sign-out.
    ///
    /// Unlike a kick: the remote token IS revoked (exactly once), no notice
    /// is shown, and navigation happens immediately. A guard that was
    /// already kicked does nothing here — in particular it never revokes
    /// the newer login's server-side state.
    pub async fn logout(&self) {
        if self.inner.shutdown.swap(true, Ordering::SeqCst) {
            tracing::debug!("Logout ignored; session already shut down");
            return;
        }
        tracing::info!("Voluntary logout");

        if let Err(e) = self.inner.authority.revoke().await {
            tracing::warn!(error = %e, "Remote sign-out cleanup failed");
        }

        {
            let mut watchers = self.inner.watchers();
            if let Some(poll) = watchers.poll.take() {
                poll.abort();
            }
            if let Some(listener) = watchers.listener.take() {
                listener.abort();
            }
            watchers.peer_tx.take(); // drop closes the channel
        }

        self.inner.store.clear();
        let target = login_entry_from(&self.inner.chrome.current_path());
        self.inner.chrome.navigate(&target);
    }

    /// Sends a signed-in visitor to the dashboard matching their role, or
    /// to the login page when signed out.
    pub fn redirect_to_dashboard(&self) {
        match self.inner.store.read() {
            Some(session) if session.role == Role::Admin => {
                self.inner.chrome.navigate("/admin/dashboard.html");
            }
            Some(_) => self.inner.chrome.navigate("/user/dashboard.html"),
            None => self.inner.chrome.navigate(LOGIN_ENTRY),
        }
    }

    #[cfg(test)]
    pub(super) fn state(&self) -> &Arc<GuardState<S, T, A, B, C>> {
        &self.inner
    }
}
