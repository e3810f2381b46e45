#![doc = include_str!("../README.md")]

pub mod error;
pub mod guard;
pub mod memory;
pub mod session;
pub mod types;

// Re-exports for convenient access
pub use error::Error;
pub use guard::{
    GuardConfig, LocalHub, PageChrome, PeerMessage, PeerReceiver, PeerSender, SessionAuthority,
    SessionGuard, TabBus, TabIdentity,
};
pub use memory::MemoryStorage;
pub use session::{SESSION_STORAGE_KEY, Session, SessionStore, StorageArea};
pub use types::{Role, SessionToken, TabId, UserId};
