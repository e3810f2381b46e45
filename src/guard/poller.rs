use std::sync::Arc;

use tokio::task::JoinHandle;

use super::channel::TabBus;
use super::kick::{KickTrigger, kick};
use super::state::GuardState;
use super::traits::{PageChrome, SessionAuthority};
use crate::session::StorageArea;

/// Starts the cross-device validity poller for the current session.
///
/// Returns `None` when the session carries no token (legacy login) — those
/// sessions opt out of remote enforcement silently.
///
/// Schedule: one check after `poll_initial_delay`, then one per
/// `poll_interval` until the session disappears, a check comes back
/// invalid, or the task is aborted.
pub(super) fn spawn<S, T, A, B, C>(
    state: &Arc<GuardState<S, T, A, B, C>>,
) -> Option<JoinHandle<()>>
where
    S: StorageArea,
    T: StorageArea,
    A: SessionAuthority,
    B: TabBus,
    C: PageChrome,
{
    let session = state.store.read()?;
    if session.session_token.is_none() {
        tracing::debug!(user_id = %session.user_id, "Session has no token; remote validity polling disabled");
        return None;
    }

    let state = Arc::clone(state);
    Some(tokio::spawn(async move {
        tokio::time::sleep(state.config.poll_initial_delay).await;
        loop {
            if !check(&state).await {
                break;
            }
            tokio::time::sleep(state.config.poll_interval).await;
        }
    }))
}

/// One validity check. Returns false when polling should stop.
async fn check<S, T, A, B, C>(state: &Arc<GuardState<S, T, A, B, C>>) -> bool
where
    S: StorageArea,
    T: StorageArea,
    A: SessionAuthority,
    B: TabBus,
    C: PageChrome,
{
    // Re-read every time: the session may have been cleared by a logout or
    // a sibling tab since the last tick.
    let Some(session) = state.store.read() else {
        tracing::debug!("Session cleared; stopping validity polling");
        return false;
    };
    let Some(token) = session.session_token else {
        return false;
    };

    match state.authority.validate(&session.user_id, &token).await {
        Ok(true) => true,
        Ok(false) => {
            tracing::info!(user_id = %session.user_id, "Session token superseded by a newer login");
            kick(state, KickTrigger::RemoteInvalidation);
            false
        }
        Err(e) => {
            // Inconclusive, not invalid: a transient outage must not sign
            // the user out. Keep the session and keep polling.
            tracing::warn!(error = %e, "Validity check failed; keeping session");
            true
        }
    }
}
