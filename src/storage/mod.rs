mod memory;

pub use memory::{InMemoryCalmItemStorage, InMemorySettingsStorage};

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{CalmItem, CalmItemId, Settings};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("persistence unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait SettingsStorage: Send + Sync {
    async fn read_settings(&self) -> Result<Option<Settings>, StorageError>;
    async fn write_settings(&self, settings: &Settings) -> Result<(), StorageError>;
}

/// Ordered checklist items living next to the settings record. Pure
/// pass-through, no business logic behind these.
#[async_trait]
pub trait CalmItemStorage: Send + Sync {
    async fn all(&self) -> Result<Vec<CalmItem>, StorageError>;
    async fn get(&self, id: CalmItemId) -> Result<Option<CalmItem>, StorageError>;
    async fn insert(&self, text: String, order: u32) -> Result<CalmItem, StorageError>;
    async fn delete(&self, id: CalmItemId) -> Result<(), StorageError>;
    async fn set_checked(&self, id: CalmItemId, checked: bool) -> Result<(), StorageError>;
    async fn uncheck_all(&self) -> Result<(), StorageError>;
    async fn count(&self) -> Result<u32, StorageError>;
}
