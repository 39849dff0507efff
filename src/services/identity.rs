// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password authentication.
//!
//! [`FirebaseAuth`] talks to the Identity Toolkit REST API; [`MemoryAuth`]
//! keeps accounts in process for tests and local development. Both report
//! failures with the same generic messages, so callers cannot tell a wrong
//! password from an unknown account.

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::models::{Credentials, Identity};

const SIGN_IN_FAILED: &str = "Incorrect email or password.";
const SIGN_UP_FAILED: &str = "Could not create the account.";

/// Authentication backend.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AppError>;

    async fn sign_up(&self, credentials: &Credentials) -> Result<Identity, AppError>;

    async fn sign_out(&self, identity: &Identity) -> Result<(), AppError>;
}

/// Identity Toolkit client (Firebase Authentication).
#[derive(Clone)]
pub struct FirebaseAuth {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    email: String,
}

impl FirebaseAuth {
    pub fn new(api_key: String) -> Self {
        // Emulator speaks the same API under a path prefix
        let base_url = match std::env::var("FIREBASE_AUTH_EMULATOR_HOST") {
            Ok(host) => format!("http://{}/identitytoolkit.googleapis.com/v1", host),
            Err(_) => "https://identitytoolkit.googleapis.com/v1".to_string(),
        };
        Self::with_base_url(api_key, base_url)
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    async fn account_request(
        &self,
        method: &str,
        credentials: &Credentials,
        failure: &str,
    ) -> Result<Identity, AppError> {
        let url = format!("{}/accounts:{}", self.base_url, method);
        let body = serde_json::json!({
            "email": credentials.email.trim(),
            "password": credentials.password,
            "returnSecureToken": true,
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Identity Toolkit request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(method, %status, body = %body, "Identity Toolkit rejected request");
            return Err(AppError::Auth(failure.to_string()));
        }

        let account: AccountResponse = response
            .json()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid Identity Toolkit response: {}", e)))?;

        Ok(Identity {
            uid: account.local_id,
            email: account.email,
        })
    }
}

#[async_trait]
impl AuthProvider for FirebaseAuth {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AppError> {
        credentials.check_sign_in()?;
        self.account_request("signInWithPassword", credentials, SIGN_IN_FAILED)
            .await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Identity, AppError> {
        credentials.check_sign_up()?;
        self.account_request("signUp", credentials, SIGN_UP_FAILED)
            .await
    }

    async fn sign_out(&self, identity: &Identity) -> Result<(), AppError> {
        // ID tokens are never stored server-side; nothing to revoke
        tracing::debug!(uid = %identity.uid, "Signed out");
        Ok(())
    }
}

struct Account {
    uid: String,
    email: String,
    password_digest: String,
}

/// In-process account table.
#[derive(Default)]
pub struct MemoryAuth {
    /// Keyed by normalized (lowercase) email
    accounts: DashMap<String, Account>,
}

fn digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AppError> {
        credentials.check_sign_in()?;

        let account = self
            .accounts
            .get(&normalize(&credentials.email))
            .filter(|a| a.password_digest == digest(&credentials.password))
            .ok_or_else(|| AppError::Auth(SIGN_IN_FAILED.to_string()))?;

        Ok(Identity {
            uid: account.uid.clone(),
            email: account.email.clone(),
        })
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Identity, AppError> {
        credentials.check_sign_up()?;

        let email = normalize(&credentials.email);
        let entry = self.accounts.entry(email.clone());
        if matches!(entry, Entry::Occupied(_)) {
            return Err(AppError::Auth(SIGN_UP_FAILED.to_string()));
        }

        let uid = uuid::Uuid::new_v4().simple().to_string();
        entry.or_insert(Account {
            uid: uid.clone(),
            email: email.clone(),
            password_digest: digest(&credentials.password),
        });

        tracing::info!(uid = %uid, "Account created");
        Ok(Identity { uid, email })
    }

    async fn sign_out(&self, identity: &Identity) -> Result<(), AppError> {
        tracing::debug!(uid = %identity.uid, "Signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let auth = MemoryAuth::new();
        let creds = Credentials::new("Ana@Example.com", "secret1");

        let created = auth.sign_up(&creds).await.unwrap();
        let signed_in = auth.sign_in(&creds).await.unwrap();

        assert_eq!(created, signed_in);
        assert_eq!(signed_in.email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_account_look_the_same() {
        let auth = MemoryAuth::new();
        auth.sign_up(&Credentials::new("ana@example.com", "secret1"))
            .await
            .unwrap();

        let wrong = auth
            .sign_in(&Credentials::new("ana@example.com", "secret2"))
            .await
            .unwrap_err();
        let unknown = auth
            .sign_in(&Credentials::new("bob@example.com", "secret1"))
            .await
            .unwrap_err();

        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(wrong, AppError::Auth(_)));
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_rejected() {
        let auth = MemoryAuth::new();
        let creds = Credentials::new("ana@example.com", "secret1");
        auth.sign_up(&creds).await.unwrap();
        assert!(matches!(
            auth.sign_up(&creds).await,
            Err(AppError::Auth(_))
        ));
    }

    #[tokio::test]
    async fn test_short_password_is_a_validation_error() {
        let auth = MemoryAuth::new();
        let result = auth
            .sign_up(&Credentials::new("ana@example.com", "12345"))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_firebase_auth_validates_before_network() {
        // Unroutable base URL: reaching the network would fail differently
        let auth = FirebaseAuth::with_base_url("key".to_string(), "http://127.0.0.1:9".to_string());
        let result = auth.sign_in(&Credentials::new("", "")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
