//! Single-session enforcement: one active login wins across tabs and
//! devices, with a graceful forced-signout notice for the losers.
//!
//! Three mechanisms cooperate per page:
//!
//! - a **tab coordinator** (same device): tabs announce themselves on a
//!   broadcast channel and the newest tab for an account survives;
//! - a **validity poller** (cross device): the session token is checked
//!   against the remote authority on a fixed schedule, catching logins the
//!   local channel cannot see;
//! - a **kick controller**: the single idempotent funnel that stops the
//!   watchers, clears local state, shows the notice, and redirects.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use salesops_session::{GuardConfig, LocalHub, Role, SessionGuard};
//!
//! // 1. Implement StorageArea, SessionAuthority and PageChrome for your host
//! // 2. Configure from environment
//! let config = GuardConfig::from_env()?;
//!
//! // 3. One guard per page load
//! let guard = SessionGuard::new(config, profile_storage, tab_storage,
//!                               api_client, LocalHub::new(), page);
//! if !guard.initialize(Some(Role::User)) {
//!     return; // redirected to login
//! }
//! ```

mod channel;
mod config;
mod gate;
mod kick;
mod poller;
mod state;
mod tabs;
mod traits;
mod types;

pub use channel::{LocalHub, PeerReceiver, PeerSender, TabBus};
pub use config::GuardConfig;
pub use gate::SessionGuard;
pub use tabs::{TAB_CREATED_AT_KEY, TAB_ID_KEY, TabIdentity};
pub use traits::{PageChrome, SessionAuthority};
pub use types::PeerMessage;
