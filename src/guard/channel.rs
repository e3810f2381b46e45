use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use super::types::PeerMessage;

/// Buffered messages per receiver before the oldest are dropped.
const CHANNEL_CAPACITY: usize = 16;

/// Host-provided cross-tab broadcast capability.
///
/// One channel name is shared by every tab of the origin. Opening may fail
/// when the host has no broadcast support — the guard then degrades to
/// per-tab enforcement only, which is not fatal.
pub trait TabBus: Send + Sync + 'static {
    type Tx: PeerSender;
    type Rx: PeerReceiver;

    /// Opens the named channel, already subscribed: messages published by
    /// peers after this call are delivered even if `recv` starts later.
    ///
    /// Returns `None` when the capability is unavailable.
    fn open(&self, channel_name: &str) -> Option<(Self::Tx, Self::Rx)>;
}

/// Publishing half of an open channel. Dropping it closes this tab's end.
pub trait PeerSender: Send + Sync + 'static {
    /// Best-effort publish; a channel with no listeners is not an error.
    fn publish(&self, msg: PeerMessage);
}

/// Receiving half of an open channel.
pub trait PeerReceiver: Send + 'static {
    /// Next message, `None` once the channel is closed.
    fn recv(&mut self) -> impl Future<Output = Option<PeerMessage>> + Send;
}

/// In-process bus: every "tab" in the same process sharing a [`LocalHub`]
/// clone sees the others' messages, keyed by channel name.
///
/// Senders hear their own messages back, like a browser tab listening on the
/// channel it posts to — the coordinator filters echoes by tab id.
#[derive(Debug, Clone, Default)]
pub struct LocalHub {
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<PeerMessage>>>>,
}

impl LocalHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TabBus for LocalHub {
    type Tx = LocalSender;
    type Rx = LocalReceiver;

    fn open(&self, channel_name: &str) -> Option<(LocalSender, LocalReceiver)> {
        let mut channels = self.channels.lock().ok()?;
        let tx = channels
            .entry(channel_name.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone();
        let rx = tx.subscribe();
        Some((LocalSender { tx }, LocalReceiver { rx }))
    }
}

pub struct LocalSender {
    tx: broadcast::Sender<PeerMessage>,
}

impl PeerSender for LocalSender {
    fn publish(&self, msg: PeerMessage) {
        // Err means no active receivers; nothing to notify.
        let _ = self.tx.send(msg);
    }
}

pub struct LocalReceiver {
    rx: broadcast::Receiver<PeerMessage>,
}

impl PeerReceiver for LocalReceiver {
    fn recv(&mut self) -> impl Future<Output = Option<PeerMessage>> + Send {
        async move {
            loop {
                match self.rx.recv().await {
                    Ok(msg) => return Some(msg),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Tab channel receiver lagged; continuing");
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        }
    }
}
