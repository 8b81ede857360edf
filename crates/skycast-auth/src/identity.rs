//! Who is signed in.
//!
//! Credential exchange happens in an external identity provider; this crate
//! only tracks the resulting user id for the lifetime of the process.
//! Nothing is persisted, so every launch starts signed out.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("User id must not be empty")]
    EmptyUserId,
}

/// Source of the current user's id
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user's id, or `None` when signed out
    fn current_user_id(&self) -> Option<String>;
}

/// A user signed in through the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInUser {
    pub user_id: String,
    pub email: Option<String>,
    pub signed_in_at: DateTime<Utc>,
}

/// In-memory session state
#[derive(Debug, Default)]
pub struct Session {
    user: RwLock<Option<SignedInUser>>,
}

impl Session {
    /// A signed-out session
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful sign-in, replacing any previous user.
    pub fn sign_in(&self, user_id: &str, email: Option<&str>) -> Result<SignedInUser, AuthError> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(AuthError::EmptyUserId);
        }

        let user = SignedInUser {
            user_id: user_id.to_string(),
            email: email.map(str::to_string),
            signed_in_at: Utc::now(),
        };
        *self.user.write() = Some(user.clone());

        tracing::info!("Signed in user {}", user.user_id);
        Ok(user)
    }

    pub fn sign_out(&self) {
        if let Some(user) = self.user.write().take() {
            tracing::info!("Signed out user {}", user.user_id);
        }
    }

    pub fn current_user(&self) -> Option<SignedInUser> {
        self.user.read().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.read().is_some()
    }
}

impl IdentityProvider for Session {
    fn current_user_id(&self) -> Option<String> {
        self.user.read().as_ref().map(|u| u.user_id.clone())
    }
}

/// Fixed identity, for offline use and tests
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(pub Option<String>);

impl StaticIdentity {
    pub fn user(user_id: impl Into<String>) -> Self {
        Self(Some(user_id.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user_id(&self) -> Option<String> {
        self.0.clone()
    }
}
