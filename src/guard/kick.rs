use std::sync::Arc;
use std::sync::atomic::Ordering;

use super::channel::{PeerSender, TabBus};
use super::gate::login_entry_from;
use super::state::GuardState;
use super::traits::{PageChrome, SessionAuthority};
use super::types::PeerMessage;
use crate::session::StorageArea;

/// What demanded the forced sign-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum KickTrigger {
    /// A newer tab announced itself for the same account on this device.
    TabConflict,
    /// The remote authority reported this session's token superseded.
    RemoteInvalidation,
    /// A sibling tab broadcast a `RemoteKick`.
    PeerKick,
}

impl KickTrigger {
    fn as_str(self) -> &'static str {
        match self {
            Self::TabConflict => "tab_conflict",
            Self::RemoteInvalidation => "remote_invalidation",
            Self::PeerKick => "peer_kick",
        }
    }
}

impl std::fmt::Display for KickTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single funnel for "this tab's session must end right now".
///
/// Idempotent: the shutdown flag admits exactly one caller; a visible notice
/// is the belt over that. Contains no await points, so the poller or the
/// listener may invoke it on itself — the self-abort lands at that task's
/// next suspension point, after the funnel has finished.
pub(super) fn kick<S, T, A, B, C>(state: &Arc<GuardState<S, T, A, B, C>>, trigger: KickTrigger)
where
    S: StorageArea,
    T: StorageArea,
    A: SessionAuthority,
    B: TabBus,
    C: PageChrome,
{
    if state.shutdown.swap(true, Ordering::SeqCst) {
        tracing::debug!(trigger = %trigger, "Kick ignored; session already shut down");
        return;
    }
    if state.chrome.notice_visible() {
        tracing::debug!(trigger = %trigger, "Kick ignored; notice already rendered");
        return;
    }

    tracing::warn!(trigger = %trigger, "Forcing sign-out");

    {
        let mut watchers = state.watchers();
        if let Some(poll) = watchers.poll.take() {
            poll.abort();
        }
        if let Some(listener) = watchers.listener.take() {
            listener.abort();
        }
        if let Some(peer_tx) = watchers.peer_tx.take() {
            // Siblings on this device learn of a remote invalidation here,
            // before the channel closes, instead of each waiting out its own
            // poll. A tab-conflict trigger needs no broadcast: the winning
            // tab already knows.
            if trigger == KickTrigger::RemoteInvalidation {
                peer_tx.publish(PeerMessage::RemoteKick);
            }
            drop(peer_tx);
        }
    }

    // Local clear only. The remote token is never revoked on a kick: the
    // newer login owns the server-side state now.
    state.store.clear();

    let redirect_delay = state.config.kick_redirect_delay;
    state.chrome.show_forced_signout_notice(redirect_delay);

    let chrome = Arc::clone(&state.chrome);
    let redirect = tokio::spawn(async move {
        tokio::time::sleep(redirect_delay).await;
        let target = login_entry_from(&chrome.current_path());
        chrome.navigate(&target);
    });
    state.watchers().redirect = Some(redirect);
}
