//! Composition of credential verification and throttling in front of a
//! protected operation.

use std::future::Future;
use std::time::Instant;

use tracing::{debug, warn};

use crate::error::AuthError;
use crate::throttle::RequestThrottle;
use crate::verify::{AuthClaims, TokenVerifier, bearer_token};

/// Terminal outcome of a gated request. Auth and throttle rejections are
/// ordinary values here, not panics or transport errors, so every call site
/// handles them explicitly.
#[derive(thiserror::Error, Debug)]
pub enum GateError<E> {
    #[error("not authenticated: {0}")]
    Unauthenticated(String),
    #[error("not authenticated: {0}")]
    InvalidCredential(String),
    #[error("rate limit exceeded: max {limit} requests per {window_secs} seconds")]
    RateLimited { limit: usize, window_secs: u64 },
    #[error(transparent)]
    Operation(E),
}

/// Verifies the caller and charges the throttle before running an operation.
///
/// The gate owns the only mutable shared state of the service (the throttle)
/// and is passed by handle into the request-handling layer.
pub struct RequestGate<V> {
    verifier: V,
    throttle: RequestThrottle,
}

impl<V: TokenVerifier> RequestGate<V> {
    pub fn new(verifier: V, throttle: RequestThrottle) -> Self {
        Self { verifier, throttle }
    }

    /// Run `op` behind the gate.
    ///
    /// Verification failure and throttle rejection short-circuit: the
    /// operation is never started, so no retrieval or generation call is
    /// wasted on a request that was going to be refused.
    pub async fn guard<Op, Fut, T, E>(
        &self,
        auth_header: Option<&str>,
        op: Op,
    ) -> Result<T, GateError<E>>
    where
        Op: FnOnce(AuthClaims) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let token = bearer_token(auth_header).map_err(|err| {
            warn!(error = %err, "rejected unauthenticated request");
            GateError::from_auth(err)
        })?;

        let claims = self.verifier.verify(token).await.map_err(|err| {
            warn!(error = %err, "credential verification failed");
            GateError::from_auth(err)
        })?;

        if !self.throttle.admit(&claims.subject, Instant::now()).await {
            warn!(subject = %claims.subject, "rate limit exceeded");
            return Err(GateError::RateLimited {
                limit: self.throttle.max_requests(),
                window_secs: self.throttle.window().as_secs(),
            });
        }

        debug!(subject = %claims.subject, "request admitted");
        op(claims).await.map_err(GateError::Operation)
    }
}

impl<E> GateError<E> {
    fn from_auth(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated(msg) => GateError::Unauthenticated(msg),
            AuthError::InvalidCredential(msg) => GateError::InvalidCredential(msg),
        }
    }
}
