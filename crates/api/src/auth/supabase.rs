//! Reqwest-backed Supabase Auth (GoTrue) adapter.
//!
//! This adapter owns transport details only: request shapes, status code
//! mapping, and decoding of the provider's user objects. The HTTP client is
//! built once and reused for every request.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use agrinit_core::user::CallerIdentity;

use super::{AuthError, AuthProvider, AuthUserRecord, Session, SessionUser};

/// User object as returned by the GoTrue API.
#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    email: Option<String>,
    #[serde(default)]
    user_metadata: Value,
}

impl GoTrueUser {
    fn display_name(&self) -> Option<String> {
        self.user_metadata
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Successful `grant_type=password` response.
#[derive(Debug, Deserialize)]
struct GoTrueTokenResponse {
    access_token: String,
    expires_in: i64,
    user: GoTrueUser,
}

/// GoTrue reports errors under several field names depending on endpoint
/// and version.
#[derive(Debug, Default, Deserialize)]
struct GoTrueErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl GoTrueErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
    }
}

/// Identity provider backed by a Supabase project's Auth service.
pub struct SupabaseAuthProvider {
    client: Client,
    /// Project URL without trailing slash, e.g. `https://abc.supabase.co`.
    base_url: String,
    service_role_key: String,
}

impl SupabaseAuthProvider {
    /// Build the adapter and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: &str, service_role_key: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("agrinit-api/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_role_key: service_role_key.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    /// Attach the project API key every GoTrue request needs.
    fn with_api_key(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("apikey", &self.service_role_key)
    }
}

fn transport_error(err: reqwest::Error) -> AuthError {
    AuthError::Unavailable(err.to_string())
}

/// Map a non-success response: 5xx is an outage, anything else a refusal
/// carrying the provider's own message.
async fn provider_error(response: Response) -> AuthError {
    let status = response.status();
    let body: GoTrueErrorBody = response.json().await.unwrap_or_default();
    let message = body
        .into_message()
        .unwrap_or_else(|| format!("auth provider responded with {status}"));
    if status.is_server_error() {
        AuthError::Unavailable(message)
    } else {
        AuthError::Rejected(message)
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuthProvider {
    async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthUserRecord, AuthError> {
        let response = self
            .with_api_key(self.client.post(self.endpoint("admin/users")))
            .bearer_auth(&self.service_role_key)
            .json(&json!({
                "email": email,
                "password": password,
                "user_metadata": { "name": name },
                // No mail server is configured, so confirm immediately.
                "email_confirm": true,
            }))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(provider_error(response).await);
        }

        let user: GoTrueUser = response.json().await.map_err(transport_error)?;
        Ok(AuthUserRecord {
            email: user.email.unwrap_or_else(|| email.to_string()),
            id: user.id,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .with_api_key(self.client.post(self.endpoint("token")))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            s if s.is_success() => {}
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                return Err(AuthError::InvalidCredentials)
            }
            _ => return Err(provider_error(response).await),
        }

        let token: GoTrueTokenResponse = response.json().await.map_err(transport_error)?;
        let name = token.user.display_name();
        Ok(Session {
            access_token: token.access_token,
            expires_in: token.expires_in,
            user: SessionUser {
                id: token.user.id,
                email: token.user.email,
                name,
            },
        })
    }

    async fn get_user(&self, access_token: &str) -> Result<CallerIdentity, AuthError> {
        let response = self
            .with_api_key(self.client.get(self.endpoint("user")))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            s if s.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(AuthError::InvalidToken),
            _ => return Err(provider_error(response).await),
        }

        let user: GoTrueUser = response.json().await.map_err(transport_error)?;
        if user.id.is_empty() {
            return Err(AuthError::InvalidToken);
        }
        Ok(CallerIdentity {
            user_id: user.id,
            email: user.email,
        })
    }
}
