use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::{
    ConfigContentProvider, ConfigSerializer, FileContentConfigProvider, YamlConfigSerializer,
};
use crate::session::HighScoreStore;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u32,
    #[serde(default)]
    pub achieved_at: Option<String>,
}

/// High score kept as a small YAML record behind a content provider.
pub struct FileHighScoreStore<TProvider = FileContentConfigProvider>
where
    TProvider: ConfigContentProvider,
{
    provider: TProvider,
    serializer: YamlConfigSerializer,
}

impl FileHighScoreStore<FileContentConfigProvider> {
    pub fn from_file(file_path: impl Into<PathBuf>) -> Self {
        Self::new(FileContentConfigProvider::new(file_path))
    }
}

impl<TProvider> FileHighScoreStore<TProvider>
where
    TProvider: ConfigContentProvider,
{
    pub fn new(provider: TProvider) -> Self {
        Self {
            provider,
            serializer: YamlConfigSerializer::new(),
        }
    }

    pub fn load_record(&self) -> Result<Option<HighScoreRecord>, String> {
        match self.provider.get_config_content()? {
            Some(content) => Ok(Some(self.serializer.deserialize(&content)?)),
            None => Ok(None),
        }
    }
}

impl<TProvider> HighScoreStore for FileHighScoreStore<TProvider>
where
    TProvider: ConfigContentProvider,
{
    fn load_high_score(&self) -> Result<u32, String> {
        Ok(self
            .load_record()?
            .map(|record| record.high_score)
            .unwrap_or_default())
    }

    fn save_high_score(&self, score: u32) -> Result<(), String> {
        let record = HighScoreRecord {
            high_score: score,
            achieved_at: Some(Local::now().to_rfc3339()),
        };
        let content = self.serializer.serialize(&record)?;
        self.provider.set_config_content(&content)
    }
}

/// Process-local store; clones share the same value.
#[derive(Clone, Debug, Default)]
pub struct MemoryHighScoreStore {
    high_score: Arc<Mutex<u32>>,
}

impl MemoryHighScoreStore {
    pub fn new(initial: u32) -> Self {
        Self {
            high_score: Arc::new(Mutex::new(initial)),
        }
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load_high_score(&self) -> Result<u32, String> {
        self.high_score
            .lock()
            .map(|value| *value)
            .map_err(|e| format!("High score lock poisoned: {}", e))
    }

    fn save_high_score(&self, score: u32) -> Result<(), String> {
        let mut value = self
            .high_score
            .lock()
            .map_err(|e| format!("High score lock poisoned: {}", e))?;
        *value = score;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_temp_file_path() -> PathBuf {
        let random_number: u32 = rand::random();
        std::env::temp_dir().join(format!("snake_high_score_{}.yaml", random_number))
    }

    #[test]
    fn test_missing_file_reads_as_zero() {
        let store = FileHighScoreStore::from_file(get_temp_file_path());
        assert_eq!(store.load_high_score(), Ok(0));
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = get_temp_file_path();
        let store = FileHighScoreStore::from_file(path.clone());

        store.save_high_score(42).unwrap();

        let reopened = FileHighScoreStore::from_file(path.clone());
        assert_eq!(reopened.load_high_score(), Ok(42));
        let record = reopened.load_record().unwrap().unwrap();
        assert!(record.achieved_at.is_some());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = get_temp_file_path();
        std::fs::write(&path, "high_score: [not a number").unwrap();
        let store = FileHighScoreStore::from_file(path.clone());
        assert!(store.load_high_score().is_err());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_memory_store_clones_share_value() {
        let store = MemoryHighScoreStore::new(3);
        let observer = store.clone();
        store.save_high_score(9).unwrap();
        assert_eq!(observer.load_high_score(), Ok(9));
    }
}
