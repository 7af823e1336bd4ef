//! External identity provider abstraction.

use crate::domain::error::Result;
use async_trait::async_trait;

/// Parameters of an interactive authorization flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizeRequest {
    /// Space-separated OAuth scopes.
    pub scope: String,
    /// Provider-specific login method, e.g. a social connection name.
    pub connection: String,
    /// Where the provider returns after authorization.
    pub redirect_uri: String,
}

/// Parameters of the provider's session-clearing flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearSessionRequest {
    /// Also sign out of the upstream social provider.
    pub federated: bool,
    /// Where the provider returns after clearing.
    pub return_to: String,
}

/// Tokens returned by a successful authorization.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Bearer credential for API calls.
    pub access_token: String,
    /// Signed identity assertion (JWT).
    pub id_token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}

/// Hosted identity and authorization provider.
///
/// `authorize` is interactive and may stay pending for as long as the user
/// takes. Implementations map every provider failure, including user
/// cancellation, to an error.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Runs the interactive authorization flow.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow fails or is cancelled.
    async fn authorize(&self, request: &AuthorizeRequest) -> Result<Credentials>;

    /// Clears the provider-side session.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot clear the session.
    async fn clear_session(&self, request: &ClearSessionRequest) -> Result<()>;
}
