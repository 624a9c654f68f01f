use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::api::PokeApi;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NameEntry {
    pub name: String,
    pub id: u32,
}

/// Process-lifetime list of every Pokémon name and id, fetched on first use.
#[derive(Default)]
pub struct NameIndex {
    slot: OnceCell<Arc<Vec<NameEntry>>>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached list, fetching it first if this is the first call.
    /// Concurrent first calls share a single fetch. A failed fetch leaves the
    /// slot empty so a later call can try again.
    pub async fn get_or_populate<A: PokeApi>(
        &self,
        api: &A,
    ) -> Result<Arc<Vec<NameEntry>>, AppError> {
        let entries = self
            .slot
            .get_or_try_init(|| async {
                tracing::debug!("Name index empty, fetching the full list");
                let entries = api.pokemon_names().await?;
                tracing::info!("Name index populated with {} entries", entries.len());
                Ok::<_, AppError>(Arc::new(entries))
            })
            .await?;
        Ok(Arc::clone(entries))
    }

    pub fn is_populated(&self) -> bool {
        self.slot.initialized()
    }

    /// Entries whose name starts with `prefix` (case-insensitive), in list order.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<NameEntry> {
        let Some(entries) = self.slot.get() else {
            return Vec::new();
        };
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return Vec::new();
        }

        entries
            .iter()
            .filter(|entry| entry.name.starts_with(&prefix))
            .take(limit)
            .cloned()
            .collect()
    }
}
