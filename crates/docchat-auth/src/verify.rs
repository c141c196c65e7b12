//! Bearer-credential verification against the identity provider.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Claims decoded from a verified credential. Valid only for the duration of
/// one request; never cached.
#[derive(Debug, Clone)]
pub struct AuthClaims {
    pub subject: String,
    pub email: Option<String>,
}

/// Extract the raw token from an `Authorization: Bearer <token>` header.
/// Rejects before any provider call when the header is absent or malformed.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header
        .ok_or_else(|| AuthError::Unauthenticated("no Authorization header".to_string()))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::Unauthenticated("expected a Bearer credential".to_string()))?;
    if token.trim().is_empty() {
        return Err(AuthError::Unauthenticated("empty bearer token".to_string()));
    }
    Ok(token)
}

/// Verifies a raw bearer token and yields the caller's claims.
pub trait TokenVerifier: Send + Sync {
    fn verify(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<AuthClaims, AuthError>> + Send;
}

/// Client for the identity provider's token lookup endpoint.
///
/// Verification is delegated to the provider: the token is posted to the
/// project's `accounts:lookup` endpoint, which checks signature, expiry,
/// audience, and revocation. Nothing is cached between calls.
pub struct IdentityClient {
    client: reqwest::Client,
    lookup_url: String,
    timeout: Duration,
}

impl IdentityClient {
    pub fn new(base_url: &str, project_id: &str, timeout: Duration) -> Self {
        let lookup_url = format!(
            "{}/v1/projects/{}/accounts:lookup",
            base_url.trim_end_matches('/'),
            project_id
        );
        Self {
            client: reqwest::Client::new(),
            lookup_url,
            timeout,
        }
    }
}

impl TokenVerifier for IdentityClient {
    async fn verify(&self, token: &str) -> Result<AuthClaims, AuthError> {
        let response = self
            .client
            .post(&self.lookup_url)
            .timeout(self.timeout)
            .json(&LookupRequest { id_token: token })
            .send()
            .await
            .map_err(|e| {
                AuthError::InvalidCredential(format!("identity provider unreachable: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(AuthError::InvalidCredential(format!(
                "lookup failed ({status}): {body}"
            )));
        }

        let parsed: LookupResponse = response.json().await.map_err(|e| {
            AuthError::InvalidCredential(format!("malformed lookup response: {e}"))
        })?;
        let account = parsed
            .users
            .into_iter()
            .next()
            .ok_or_else(|| AuthError::InvalidCredential("no matching account".to_string()))?;

        Ok(AuthClaims {
            subject: account.local_id,
            email: account.email,
        })
    }
}

#[derive(Serialize)]
struct LookupRequest<'a> {
    #[serde(rename = "idToken")]
    id_token: &'a str,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupAccount>,
}

#[derive(Deserialize)]
struct LookupAccount {
    #[serde(rename = "localId")]
    local_id: String,
    email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_bearer_token_missing_header() {
        let err = bearer_token(None).unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(_)));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let err = bearer_token(Some("Basic dXNlcjpwYXNz")).unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(_)));
    }

    #[test]
    fn test_bearer_token_empty_token() {
        let err = bearer_token(Some("Bearer  ")).unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(_)));
    }

    #[test]
    fn test_bearer_token_ok() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    fn client_for(server: &MockServer) -> IdentityClient {
        IdentityClient::new(&server.uri(), "demo-project", Duration::from_secs(2))
    }

    #[tokio::test]
    async fn test_verify_returns_claims() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/projects/demo-project/accounts:lookup"))
            .and(body_partial_json(serde_json::json!({ "idToken": "tok123" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "users": [{ "localId": "uid-1", "email": "alice@example.com" }]
            })))
            .mount(&server)
            .await;

        let claims = client_for(&server).verify("tok123").await.unwrap();
        assert_eq!(claims.subject, "uid-1");
        assert_eq!(claims.email.as_deref(), Some("alice@example.com"));
    }

    #[tokio::test]
    async fn test_verify_provider_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "message": "INVALID_ID_TOKEN" }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).verify("expired").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredential(_)));
        assert!(err.to_string().contains("INVALID_ID_TOKEN"));
    }

    #[tokio::test]
    async fn test_verify_no_matching_account() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "users": [] })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).verify("tok").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredential(_)));
    }
}
