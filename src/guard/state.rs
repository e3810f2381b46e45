use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tokio::task::JoinHandle;

use super::channel::TabBus;
use super::config::GuardConfig;
use crate::session::SessionStore;

/// Handles to the running watchers, torn down exactly once on logout or
/// kick. Each handle is taken out (nulled) when stopped, so stopping twice
/// is safe.
pub(super) struct Watchers<Tx> {
    /// Remote validity poll task.
    pub(super) poll: Option<JoinHandle<()>>,
    /// Broadcast channel listener task.
    pub(super) listener: Option<JoinHandle<()>>,
    /// Delayed post-kick redirect task.
    pub(super) redirect: Option<JoinHandle<()>>,
    /// Publishing end of the tab channel; dropping it closes this tab's end.
    pub(super) peer_tx: Option<Tx>,
}

// Manual impl: avoid a derive adding a `Tx: Default` bound.
impl<Tx> Default for Watchers<Tx> {
    fn default() -> Self {
        Self {
            poll: None,
            listener: None,
            redirect: None,
            peer_tx: None,
        }
    }
}

/// Per-page session lifecycle context.
///
/// Owns the collaborator handles and the watcher state that the reference
/// implementation kept on ambient globals. Everything the kick path and the
/// watchers touch hangs off one `Arc` of this.
pub(super) struct GuardState<S, T, A, B: TabBus, C> {
    pub(super) config: GuardConfig,
    pub(super) store: SessionStore<S>,
    pub(super) tab_area: T,
    pub(super) authority: Arc<A>,
    pub(super) bus: B,
    pub(super) chrome: Arc<C>,
    pub(super) watchers: Mutex<Watchers<B::Tx>>,
    /// Set exactly once, by whichever of kick or voluntary logout runs
    /// first; the loser becomes a no-op.
    pub(super) shutdown: AtomicBool,
}

impl<S, T, A, B: TabBus, C> GuardState<S, T, A, B, C> {
    /// Watcher guard that tolerates a poisoned mutex: a panicking watcher
    /// must not block the kick path.
    pub(super) fn watchers(&self) -> std::sync::MutexGuard<'_, Watchers<B::Tx>> {
        match self.watchers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
