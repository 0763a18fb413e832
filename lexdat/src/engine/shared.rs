use std::path::Path;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::engine::Engine;
use crate::errors::Result;
use crate::trie::{InsertOutcome, NodeMatch, SearchMatch, WordEntry};

/// Engine shared between threads.
///
/// Queries take a read lock and mutations take a write lock, so a query never
/// observes a half-applied mutation.
#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<RwLock<Engine>>,
}

impl SharedEngine {
    /// Wraps an engine.
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(RwLock::new(engine)),
        }
    }

    /// See [`Engine::initialize()`].
    ///
    /// # Errors
    ///
    /// See [`Engine::initialize()`].
    pub fn initialize<P, Q>(store_path: P, dict_path: Q) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        Ok(Self::new(Engine::initialize(store_path, dict_path)?))
    }

    /// Locks the engine for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, Engine> {
        self.inner.read()
    }

    /// Locks the engine for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, Engine> {
        self.inner.write()
    }

    /// See [`Engine::exact_match()`].
    pub fn exact_match(&self, key: &str, force_back: bool) -> Result<NodeMatch> {
        self.read().exact_match(key, force_back)
    }

    /// See [`Engine::search()`].
    pub fn search(&self, text: &str) -> Vec<SearchMatch> {
        self.read().search(text)
    }

    /// See [`Engine::prefix()`].
    pub fn prefix(&self, pre: &str, limit: usize) -> Result<Vec<WordEntry>> {
        self.read().prefix(pre, limit)
    }

    /// See [`Engine::suffix()`].
    pub fn suffix(&self, key: &str, limit: usize) -> Result<Vec<WordEntry>> {
        self.read().suffix(key, limit)
    }

    /// See [`Engine::fuzzy()`].
    pub fn fuzzy(&self, key: &str, limit: usize) -> Result<Vec<WordEntry>> {
        self.read().fuzzy(key, limit)
    }

    /// See [`Engine::insert()`].
    pub fn insert(&self, word: &str, level: u8) -> Result<InsertOutcome> {
        self.write().insert(word, level)
    }

    /// See [`Engine::remove()`].
    pub fn remove(&self, word: &str) -> Result<()> {
        self.write().remove(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::thread;

    #[test]
    fn test_concurrent_access() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("dat.data");
        let dict = dir.path().join("dict.txt");
        fs::write(&dict, "1 a\n2 ab\n1 abc").unwrap();
        let engine = SharedEngine::initialize(&store, &dict).unwrap();

        let words: Vec<String> = (0..8).map(|i| format!("w{i}")).collect();
        let mut handles = vec![];
        for (i, word) in words.iter().enumerate() {
            let engine = engine.clone();
            let word = word.clone();
            handles.push(thread::spawn(move || {
                engine.insert(&word, (i % 10) as u8).unwrap();
                assert_eq!(engine.exact_match("ab", false).unwrap().level, 2);
                assert!(!engine.search("xabcx").is_empty());
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        for (i, word) in words.iter().enumerate() {
            assert_eq!(
                engine.exact_match(word, false).unwrap().level,
                (i % 10) as u8
            );
        }
        let prefixed = engine.prefix("w", usize::MAX).unwrap();
        assert_eq!(prefixed.len(), words.len());

        let reloaded = Engine::initialize(&store, &dict).unwrap();
        assert_eq!(reloaded.trie(), engine.read().trie());
    }
}
