use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// CSRF state validation failed during OAuth callback.
    ///
    /// The CSRF state token in the OAuth callback URL does not match the token stored
    /// in the session, indicating a potential CSRF attack or an invalid callback request.
    #[error("Failed to login user due to CSRF state mismatch")]
    CsrfValidationFailed,

    /// Discord redirected back without an authorization code.
    #[error("Authorization code not received from Discord")]
    MissingAuthorizationCode,

    /// The token endpoint could not be reached or its response could not be read.
    #[error("Failed to exchange authorization code: {0}")]
    TokenExchange(String),

    /// The token endpoint answered the code exchange with an error.
    #[error("Failed to exchange authorization code: HTTP {status}: {body}")]
    TokenEndpoint { status: u16, body: String },

    /// Fetching the authorized user's profile returned a non-success status.
    #[error("Failed to fetch user profile: HTTP {status}: {body}")]
    ProfileFetch { status: u16, body: String },
}
