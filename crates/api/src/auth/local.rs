//! In-process identity provider for development and tests.
//!
//! Accounts live in memory (lost on restart). Passwords are stored as
//! Argon2id hashes and access tokens are HS256 JWTs signed with the
//! configured secret. Token validation also checks that the account still
//! exists, so it behaves like a provider round-trip rather than a pure
//! signature check.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use agrinit_core::types::{new_record_id, RecordId};
use agrinit_core::user::CallerIdentity;

use super::jwt::{generate_access_token, validate_token, JwtConfig};
use super::password::{hash_password, verify_password};
use super::{AuthError, AuthProvider, AuthUserRecord, Session, SessionUser};

/// Message returned when an e-mail is registered twice.
pub const EMAIL_TAKEN_MESSAGE: &str = "A user with this email address has already been registered";

#[derive(Debug, Clone)]
struct LocalAccount {
    id: RecordId,
    email: String,
    name: String,
    password_hash: String,
}

/// Identity provider holding accounts in process memory.
pub struct LocalAuthProvider {
    jwt: JwtConfig,
    /// Keyed by lower-cased e-mail.
    accounts: RwLock<HashMap<String, LocalAccount>>,
}

impl LocalAuthProvider {
    pub fn new(jwt: JwtConfig) -> Self {
        Self {
            jwt,
            accounts: RwLock::new(HashMap::new()),
        }
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthUserRecord, AuthError> {
        let key = email_key(email);
        if self.accounts.read().await.contains_key(&key) {
            return Err(AuthError::Rejected(EMAIL_TAKEN_MESSAGE.to_string()));
        }

        let password_hash = hash_password(password)?;
        let account = LocalAccount {
            id: new_record_id(),
            email: email.trim().to_string(),
            name: name.to_string(),
            password_hash,
        };

        let mut accounts = self.accounts.write().await;
        // Re-check under the write lock; another sign-up may have won the race.
        if accounts.contains_key(&key) {
            return Err(AuthError::Rejected(EMAIL_TAKEN_MESSAGE.to_string()));
        }
        let record = AuthUserRecord {
            id: account.id.clone(),
            email: account.email.clone(),
        };
        accounts.insert(key, account);
        tracing::debug!(user_id = %record.id, "Local account created");
        Ok(record)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let account = self
            .accounts
            .read()
            .await
            .get(&email_key(email))
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &account.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = generate_access_token(&account.id, &account.email, &self.jwt)
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        Ok(Session {
            access_token,
            expires_in: self.jwt.expires_in_secs(),
            user: SessionUser {
                id: account.id,
                email: Some(account.email),
                name: Some(account.name),
            },
        })
    }

    async fn get_user(&self, access_token: &str) -> Result<CallerIdentity, AuthError> {
        let claims = validate_token(access_token, &self.jwt).map_err(|_| AuthError::InvalidToken)?;

        let accounts = self.accounts.read().await;
        let account = accounts
            .values()
            .find(|a| a.id == claims.sub)
            .ok_or(AuthError::InvalidToken)?;

        Ok(CallerIdentity {
            user_id: account.id.clone(),
            email: Some(account.email.clone()),
        })
    }
}
