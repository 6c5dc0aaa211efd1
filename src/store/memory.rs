use super::{CredentialRecord, CredentialStore, NewCredential};
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

/// Process-local store. Records live in insertion order.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    records: RwLock<Vec<CredentialRecord>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored record, oldest first.
    pub async fn records(&self) -> Vec<CredentialRecord> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, credential: NewCredential) -> Result<Option<CredentialRecord>> {
        let record = credential.into_record();
        self.records.write().await.push(record.clone());

        debug!(id = %record.id, "credential stored in memory");

        Ok(Some(record))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<CredentialRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|record| record.username == username)
            .cloned())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
