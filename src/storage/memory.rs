use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::model::{CalmItem, CalmItemId, Settings};

use super::{CalmItemStorage, SettingsStorage, StorageError};

#[derive(Default)]
pub struct InMemorySettingsStorage {
    store: RwLock<Option<Settings>>,
}

impl InMemorySettingsStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStorage for InMemorySettingsStorage {
    async fn read_settings(&self) -> Result<Option<Settings>, StorageError> {
        Ok(self.store.read().await.clone())
    }

    async fn write_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        *self.store.write().await = Some(settings.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryCalmItemStorage {
    store: RwLock<(CalmItemId, HashMap<CalmItemId, CalmItem>)>,
}

impl InMemoryCalmItemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CalmItemStorage for InMemoryCalmItemStorage {
    async fn all(&self) -> Result<Vec<CalmItem>, StorageError> {
        let store = self.store.read().await;
        let mut items: Vec<_> = store.1.values().cloned().collect();
        items.sort_by_key(|item| item.order);
        Ok(items)
    }

    async fn get(&self, id: CalmItemId) -> Result<Option<CalmItem>, StorageError> {
        let store = self.store.read().await;
        Ok(store.1.get(&id).cloned())
    }

    async fn insert(&self, text: String, order: u32) -> Result<CalmItem, StorageError> {
        let mut store = self.store.write().await;
        let id = store.0;
        let item = CalmItem {
            id,
            text,
            order,
            checked: false,
        };
        store.1.insert(id, item.clone());
        store.0 += 1;
        Ok(item)
    }

    async fn delete(&self, id: CalmItemId) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        store.1.remove(&id);
        Ok(())
    }

    async fn set_checked(&self, id: CalmItemId, checked: bool) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        if let Some(item) = store.1.get_mut(&id) {
            item.checked = checked;
        }
        Ok(())
    }

    async fn uncheck_all(&self) -> Result<(), StorageError> {
        let mut store = self.store.write().await;
        for item in store.1.values_mut() {
            item.checked = false;
        }
        Ok(())
    }

    async fn count(&self) -> Result<u32, StorageError> {
        let store = self.store.read().await;
        Ok(store.1.len() as u32)
    }
}
