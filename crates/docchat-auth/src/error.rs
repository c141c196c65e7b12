#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    /// The Authorization header was missing or not a bearer credential.
    #[error("missing or malformed Authorization header: {0}")]
    Unauthenticated(String),
    /// The identity provider rejected a well-formed credential.
    #[error("invalid or expired token: {0}")]
    InvalidCredential(String),
}
