//! Best coin count
//!
//! A single scalar persisted between sessions: LocalStorage in the browser,
//! a small JSON file natively.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from a score backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored score is corrupt: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Somewhere to keep the best score
pub trait ScoreStore {
    /// `Ok(None)` when nothing has been stored yet
    fn load_best(&self) -> Result<Option<u32>, StoreError>;
    fn save_best(&mut self, coins: u32) -> Result<(), StoreError>;
}

/// Best score bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScore {
    pub coins: u32,
}

impl BestScore {
    /// Read the stored best; a missing or unreadable value counts as 0
    pub fn load(store: &impl ScoreStore) -> Self {
        match store.load_best() {
            Ok(Some(coins)) => {
                log::info!("Loaded best score: {} coins", coins);
                Self { coins }
            }
            Ok(None) => {
                log::info!("No best score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read best score ({}), treating as none", e);
                Self::default()
            }
        }
    }

    /// Whether `coins` beats the current record
    pub fn qualifies(&self, coins: u32) -> bool {
        coins > self.coins
    }

    /// Record `coins` if it beats the best. Returns true on a new record.
    pub fn record(&mut self, coins: u32) -> bool {
        if !self.qualifies(coins) {
            return false;
        }
        self.coins = coins;
        true
    }

    /// Write back to the store; failures are logged, never fatal
    pub fn save(&self, store: &mut impl ScoreStore) {
        match store.save_best(self.coins) {
            Ok(()) => log::info!("Best score saved ({} coins)", self.coins),
            Err(e) => log::warn!("Could not save best score: {}", e),
        }
    }
}

/// In-memory store (tests, and hosts without storage)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub value: Option<String>,
}

impl MemoryStore {
    pub fn with_best(coins: u32) -> Self {
        Self {
            value: Some(coins.to_string()),
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load_best(&self) -> Result<Option<u32>, StoreError> {
        self.value
            .as_deref()
            .map(|s| serde_json::from_str::<u32>(s))
            .transpose()
            .map_err(StoreError::from)
    }

    fn save_best(&mut self, coins: u32) -> Result<(), StoreError> {
        self.value = Some(serde_json::to_string(&coins)?);
        Ok(())
    }
}

/// JSON file store for native builds
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    pub path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for JsonFileStore {
    fn load_best(&self) -> Result<Option<u32>, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let best: BestScore = serde_json::from_str(&text)?;
        Ok(Some(best.coins))
    }

    fn save_best(&mut self, coins: u32) -> Result<(), StoreError> {
        let json = serde_json::to_string(&BestScore { coins })?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Browser LocalStorage store
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "lane_runner_max_coins";

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("no localStorage".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn load_best(&self) -> Result<Option<u32>, StoreError> {
        let item = Self::storage()?
            .get_item(Self::STORAGE_KEY)
            .map_err(|_| StoreError::Unavailable("localStorage read failed".into()))?;
        item.as_deref()
            .map(|s| serde_json::from_str::<u32>(s))
            .transpose()
            .map_err(StoreError::from)
    }

    fn save_best(&mut self, coins: u32) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(Self::STORAGE_KEY, &coins.to_string())
            .map_err(|_| StoreError::Unavailable("localStorage write failed".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_only_on_improvement() {
        let mut best = BestScore { coins: 10 };
        assert!(!best.record(10));
        assert!(!best.record(3));
        assert!(best.record(11));
        assert_eq!(best.coins, 11);
    }

    #[test]
    fn test_missing_and_corrupt_read_as_zero() {
        assert_eq!(BestScore::load(&MemoryStore::default()).coins, 0);
        let corrupt = MemoryStore {
            value: Some("lots".into()),
        };
        assert!(corrupt.load_best().is_err());
        assert_eq!(BestScore::load(&corrupt).coins, 0);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::default();
        BestScore { coins: 42 }.save(&mut store);
        assert_eq!(BestScore::load(&store).coins, 42);
    }

    #[test]
    fn test_json_file_store() {
        let path = std::env::temp_dir().join(format!("lane_runner_best_{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let mut store = JsonFileStore::new(&path);

        assert_eq!(store.load_best().unwrap(), None);
        store.save_best(17).unwrap();
        assert_eq!(store.load_best().unwrap(), Some(17));

        std::fs::write(&path, "{ broken").unwrap();
        assert!(matches!(store.load_best(), Err(StoreError::Parse(_))));
        let _ = std::fs::remove_file(&path);
    }
}
