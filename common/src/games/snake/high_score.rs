use std::collections::BTreeMap;

use serde_yaml_ng::Value;

use crate::config::ConfigContentProvider;

pub const HIGH_SCORE_KEY: &str = "highScore";

pub trait HighScoreStore {
    fn load(&self) -> Result<Option<u32>, String>;
    fn save(&self, high_score: u32) -> Result<(), String>;
}

/// Keeps the high score as one named entry of a YAML key-value document.
pub struct KeyValueHighScoreStore<P: ConfigContentProvider> {
    provider: P,
    key: String,
}

impl<P: ConfigContentProvider> KeyValueHighScoreStore<P> {
    pub fn new(provider: P) -> Self {
        Self::with_key(provider, HIGH_SCORE_KEY)
    }

    pub fn with_key(provider: P, key: impl Into<String>) -> Self {
        Self {
            provider,
            key: key.into(),
        }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, Value>, String> {
        let content = self.provider.get_config_content()?;
        parse_entries(content.as_deref())
    }
}

fn parse_entries(content: Option<&str>) -> Result<BTreeMap<String, Value>, String> {
    match content {
        Some(content) if !content.trim().is_empty() => serde_yaml_ng::from_str(content)
            .map_err(|e| format!("Failed to parse high score store: {}", e)),
        _ => Ok(BTreeMap::new()),
    }
}

impl<P: ConfigContentProvider> HighScoreStore for KeyValueHighScoreStore<P> {
    fn load(&self) -> Result<Option<u32>, String> {
        let entries = self.read_entries()?;
        let Some(value) = entries.get(&self.key) else {
            return Ok(None);
        };
        value
            .as_u64()
            .and_then(|score| u32::try_from(score).ok())
            .map(Some)
            .ok_or_else(|| format!("Stored {} is not a score: {:?}", self.key, value))
    }

    fn save(&self, high_score: u32) -> Result<(), String> {
        // An unreadable document must not be overwritten; unparsable content is replaced.
        let content = self.provider.get_config_content()?;
        let mut entries = parse_entries(content.as_deref()).unwrap_or_default();
        entries.insert(self.key.clone(), Value::from(high_score));
        let content = serde_yaml_ng::to_string(&entries)
            .map_err(|e| format!("Failed to serialize high score: {}", e))?;
        self.provider.set_config_content(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryProvider {
        content: RefCell<Option<String>>,
    }

    impl MemoryProvider {
        fn with_content(content: &str) -> Self {
            Self {
                content: RefCell::new(Some(content.to_string())),
            }
        }
    }

    impl ConfigContentProvider for MemoryProvider {
        fn get_config_content(&self) -> Result<Option<String>, String> {
            Ok(self.content.borrow().clone())
        }

        fn set_config_content(&self, content: &str) -> Result<(), String> {
            *self.content.borrow_mut() = Some(content.to_string());
            Ok(())
        }
    }

    struct UnreadableProvider {
        content: RefCell<String>,
    }

    impl ConfigContentProvider for UnreadableProvider {
        fn get_config_content(&self) -> Result<Option<String>, String> {
            Err("EBUSY".to_string())
        }

        fn set_config_content(&self, content: &str) -> Result<(), String> {
            *self.content.borrow_mut() = content.to_string();
            Ok(())
        }
    }

    #[test]
    fn test_missing_document_reads_as_none() {
        let store = KeyValueHighScoreStore::new(MemoryProvider::default());
        assert_eq!(store.load(), Ok(None));
    }

    #[test]
    fn test_save_then_load() {
        let store = KeyValueHighScoreStore::new(MemoryProvider::default());
        store.save(140).unwrap();
        assert_eq!(store.load(), Ok(Some(140)));
    }

    #[test]
    fn test_non_numeric_value_is_an_error() {
        let store = KeyValueHighScoreStore::new(MemoryProvider::with_content("highScore: lots\n"));
        assert!(store.load().is_err());
    }

    #[test]
    fn test_negative_value_is_an_error() {
        let store = KeyValueHighScoreStore::new(MemoryProvider::with_content("highScore: -5\n"));
        assert!(store.load().is_err());
    }

    #[test]
    fn test_save_keeps_other_keys() {
        let provider = MemoryProvider::with_content("theme: dark\nhighScore: 10\n");
        let store = KeyValueHighScoreStore::new(provider);
        store.save(20).unwrap();

        let content = store.provider.get_config_content().unwrap().unwrap();
        assert!(content.contains("theme: dark"));
        assert_eq!(store.load(), Ok(Some(20)));
    }

    #[test]
    fn test_save_over_garbage_replaces_document() {
        let store = KeyValueHighScoreStore::new(MemoryProvider::with_content("[not, a, map"));
        store.save(30).unwrap();
        assert_eq!(store.load(), Ok(Some(30)));
    }

    #[test]
    fn test_save_with_unreadable_document_leaves_it_untouched() {
        let provider = UnreadableProvider {
            content: RefCell::new("theme: dark\nhighScore: 10\n".to_string()),
        };
        let store = KeyValueHighScoreStore::new(provider);

        assert!(store.save(20).is_err());
        assert_eq!(*store.provider.content.borrow(), "theme: dark\nhighScore: 10\n");
        assert!(store.load().is_err());
    }
}
