//! Credential persistence.
//!
//! Handlers only talk to [`CredentialStore`]; the concrete backend is picked at
//! startup and shared through the router state. Two backends ship with the
//! crate:
//!
//! - [`MemoryCredentialStore`]: process-local, used by tests and `--store memory`.
//! - [`PgCredentialStore`]: `PostgreSQL` table `credentials`.
//!
//! Usernames are **not** unique. `create` always inserts a new record and
//! `find_by_username` returns the earliest record for a username when several
//! exist. Passwords are stored and compared exactly as received.

pub mod memory;
pub mod postgres;

pub use self::memory::MemoryCredentialStore;
pub use self::postgres::PgCredentialStore;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// A stored (username, password) pair.
#[derive(ToSchema, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub id: Uuid,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Fields supplied by a signup request.
#[derive(Clone)]
pub struct NewCredential {
    pub username: String,
    pub password: String,
}

impl NewCredential {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Assign a fresh identifier.
    #[must_use]
    pub fn into_record(self) -> CredentialRecord {
        CredentialRecord {
            id: Uuid::new_v4(),
            username: self.username,
            password: self.password,
        }
    }
}

impl fmt::Debug for NewCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewCredential")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Short backend name used in logs.
    fn kind(&self) -> &'static str;

    /// Persist a new record.
    ///
    /// `Ok(None)` means the backend declined the write without failing, for
    /// example when an operator added a uniqueness constraint.
    ///
    /// # Errors
    /// Returns an error if the backend is unreachable or the write fails.
    async fn create(&self, credential: NewCredential) -> Result<Option<CredentialRecord>>;

    /// Look up a record by username only.
    ///
    /// # Errors
    /// Returns an error if the backend is unreachable or the query fails.
    async fn find_by_username(&self, username: &str) -> Result<Option<CredentialRecord>>;

    /// Check the backend is reachable.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be reached.
    async fn ping(&self) -> Result<()>;
}
