#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Missing or invalid configuration (bad env var, unknown role, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The remote session authority failed while validating or revoking.
    ///
    /// Distinct from an explicit "token superseded" verdict: an authority
    /// error is inconclusive and never terminates the session.
    #[error("Session authority error: {0}")]
    Authority(String),
}
