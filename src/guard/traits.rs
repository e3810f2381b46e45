use std::future::Future;
use std::time::Duration;

use crate::types::{SessionToken, UserId};

/// Consumer-provided remote session authority.
///
/// The single source of truth for which login event currently owns an
/// account. Out of scope for this crate; typically a thin wrapper over the
/// identity provider's API.
///
/// # Example
///
/// ```rust,ignore
/// impl SessionAuthority for ApiClient {
///     async fn validate(
///         &self,
///         user_id: &UserId,
///         token: &SessionToken,
///     ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
///         let current = self.fetch_current_token(user_id).await?;
///         Ok(current.as_deref() == Some(token.as_str()))
///     }
///
///     async fn revoke(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///         self.sign_out().await
///     }
/// }
/// ```
pub trait SessionAuthority: Send + Sync + 'static {
    /// Is `token` still the authoritative login for `user_id`?
    ///
    /// `Ok(false)` means a later login superseded this session (kick).
    /// `Err` means the check could not complete — inconclusive, never
    /// treated as invalid: a transient outage must not sign anyone out.
    fn validate(
        &self,
        user_id: &UserId,
        token: &SessionToken,
    ) -> impl Future<Output = Result<bool, Box<dyn std::error::Error + Send + Sync>>> + Send;

    /// Voluntary sign-out cleanup (revokes the token server-side).
    ///
    /// Called on user-initiated logout only — never on a kick, where the
    /// newer login owns the server-side state and must not be revoked.
    fn revoke(
        &self,
    ) -> impl Future<Output = Result<(), Box<dyn std::error::Error + Send + Sync>>> + Send;
}

/// Consumer-provided page surface: navigation, identity display, and the
/// forced-signout notice.
///
/// All methods are synchronous fire-and-forget from the guard's view; the
/// host applies them to whatever UI it has. The notice is the only
/// user-visible failure surface in the whole subsystem.
pub trait PageChrome: Send + Sync + 'static {
    /// Path of the page currently hosting the guard (e.g.
    /// `/user/dashboard.html`). Used to compute relative redirect targets.
    fn current_path(&self) -> String;

    /// Navigates away from the page.
    fn navigate(&self, path: &str);

    /// Fills the signed-in identity into the page header.
    fn show_identity(&self, name: &str, email: &str);

    /// Renders the blocking forced-signout notice, with a visible countdown
    /// of `redirect_in` until the guard navigates to the login page.
    /// Distinct from a normal logout, which shows nothing.
    fn show_forced_signout_notice(&self, redirect_in: Duration);

    /// Whether the notice is already rendered. Second line of defense
    /// against double-kicks rendering twice.
    fn notice_visible(&self) -> bool;
}
