//! Scope-partitioned bearer-credential storage.
//!
//! Each scope keeps its access and refresh tokens under several legacy
//! storage keys at once: writes hit every alias, reads take the first
//! non-empty alias in priority order. The storage medium itself is
//! injected (see [`TokenStorage`]), so independent stores can coexist.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::storage::{StorageError, TokenStorage};

/// Authentication realm a client instance operates against. Customer and
/// admin sessions hold independent token state.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenScope {
    Customer,
    Admin,
}

impl TokenScope {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }

    /// Alias keys for the scope's access token, in read-priority order.
    const fn access_keys(self) -> &'static [&'static str] {
        match self {
            Self::Customer => &["access_token", "access"],
            Self::Admin => &["admin_access", "admin_access_token"],
        }
    }

    /// Alias keys for the scope's refresh token, in read-priority order.
    const fn refresh_keys(self) -> &'static [&'static str] {
        match self {
            Self::Customer => &["refresh_token", "refresh"],
            Self::Admin => &["admin_refresh", "admin_refresh_token"],
        }
    }
}

impl fmt::Display for TokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token store over any [`TokenStorage`] medium.
#[derive(Clone, Debug)]
pub struct TokenStore<S> {
    storage: S,
}

impl<S> TokenStore<S>
where
    S: TokenStorage + Clone + Send + Sync,
{
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Current access token for the scope, if any. Absence is a valid,
    /// silent outcome meaning "not authenticated".
    pub async fn access_token(&self, scope: TokenScope) -> Result<Option<String>, StorageError> {
        self.first_existing(scope.access_keys()).await
    }

    /// Current refresh token for the scope, if any.
    pub async fn refresh_token(&self, scope: TokenScope) -> Result<Option<String>, StorageError> {
        self.first_existing(scope.refresh_keys()).await
    }

    /// Write the access token to every alias key of the scope; write the
    /// refresh token likewise when one is supplied, leaving the stored
    /// refresh token untouched otherwise.
    pub async fn set_tokens(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
        scope: TokenScope,
    ) -> Result<(), StorageError> {
        self.set_all(scope.access_keys(), access_token).await?;
        if let Some(refresh_token) = refresh_token.filter(|token| !token.is_empty()) {
            self.set_all(scope.refresh_keys(), refresh_token).await?;
        }
        Ok(())
    }

    /// Remove every access and refresh alias for the scope. Idempotent.
    pub async fn clear_tokens(&self, scope: TokenScope) -> Result<(), StorageError> {
        for key in scope.access_keys().iter().chain(scope.refresh_keys()) {
            self.storage.remove(key).await?;
        }
        Ok(())
    }

    /// True iff the scope currently holds an access token. No expiry
    /// inspection happens locally; expiry surfaces as a rejected request.
    pub async fn is_authenticated(&self, scope: TokenScope) -> Result<bool, StorageError> {
        Ok(self.access_token(scope).await?.is_some())
    }

    async fn first_existing(&self, keys: &[&str]) -> Result<Option<String>, StorageError> {
        for key in keys {
            if let Some(value) = self.storage.get(key).await? {
                if !value.is_empty() {
                    return Ok(Some(value));
                }
            }
        }
        Ok(None)
    }

    async fn set_all(&self, keys: &[&str], value: &str) -> Result<(), StorageError> {
        for key in keys {
            self.storage.set(key, value).await?;
        }
        Ok(())
    }
}
