//! File-backed matching engine.
mod image;
mod shared;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::dictionary::{self, Dictionary};
use crate::errors::Result;
use crate::num::Level;
use crate::trie::{ArrayTrie, InsertOutcome, NodeMatch, SearchMatch, WordEntry};
use image::StoreImage;

pub use shared::SharedEngine;

/// Matching engine bound to a dictionary source and a store file.
///
/// The dictionary source is the list of words edited by users, and the store
/// file keeps the compiled trie so that an unchanged source is not compiled
/// again. Every mutation updates both files.
pub struct Engine {
    trie: ArrayTrie,
    dict: Dictionary,
    digest: String,
    store_path: PathBuf,
    dict_path: PathBuf,
}

impl Engine {
    /// Loads the store file, and compiles the dictionary source if the store
    /// is missing, broken, or out of date.
    ///
    /// # Arguments
    ///
    ///  - `store_path`: The store file, written after compiling.
    ///  - `dict_path`: The dictionary source, one `<level> <word>` per line.
    ///
    /// # Errors
    ///
    /// [`LexdatError`](crate::errors::LexdatError) is returned when the
    /// dictionary source cannot be read or compiled, or the store cannot be
    /// written. A store that cannot be loaded is only reported in the log.
    pub fn initialize<P, Q>(store_path: P, dict_path: Q) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let store_path = store_path.as_ref().to_path_buf();
        let dict_path = dict_path.as_ref().to_path_buf();

        let image = match StoreImage::load(&store_path) {
            Ok(image) => {
                log::info!("loaded the store {}", store_path.display());
                Some(image)
            }
            Err(e) => {
                log::warn!("failed to load the store {}: {}", store_path.display(), e);
                None
            }
        };

        let digest = dictionary::file_digest(&dict_path)?;
        if let Some(image) = image.filter(|image| image.digest == digest) {
            log::info!("the dictionary is unchanged; skipped compiling");
            return Ok(Self {
                trie: image.trie,
                dict: image.dict,
                digest,
                store_path,
                dict_path,
            });
        }

        Self::compile_with_digest(store_path, dict_path, digest)
    }

    /// Compiles the dictionary source and overwrites the store file, whether
    /// or not the store is up to date.
    ///
    /// # Errors
    ///
    /// [`LexdatError`](crate::errors::LexdatError) is returned when the
    /// dictionary source cannot be read or compiled, or the store cannot be
    /// written.
    pub fn compile<P, Q>(store_path: P, dict_path: Q) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let digest = dictionary::file_digest(&dict_path)?;
        Self::compile_with_digest(
            store_path.as_ref().to_path_buf(),
            dict_path.as_ref().to_path_buf(),
            digest,
        )
    }

    fn compile_with_digest(store_path: PathBuf, dict_path: PathBuf, digest: String) -> Result<Self> {
        log::info!("compiling the dictionary {}", dict_path.display());
        let start = Instant::now();
        let dict = Dictionary::from_reader(File::open(&dict_path)?)?;
        let trie = dict.build_trie()?;
        log::info!(
            "compiled {} words into {} slots in {:.3} seconds",
            dict.len(),
            trie.size(),
            start.elapsed().as_secs_f64()
        );

        let engine = Self {
            trie,
            dict,
            digest,
            store_path,
            dict_path,
        };
        engine.save()?;
        Ok(engine)
    }

    /// Gets the reference to the trie.
    pub const fn trie(&self) -> &ArrayTrie {
        &self.trie
    }

    /// Gets the reference to the registered words.
    pub const fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// See [`ArrayTrie::exact_match()`].
    pub fn exact_match(&self, key: &str, force_back: bool) -> Result<NodeMatch> {
        self.trie.exact_match(key, force_back)
    }

    /// See [`ArrayTrie::search()`].
    pub fn search(&self, text: &str) -> Vec<SearchMatch> {
        self.trie.search(text)
    }

    /// See [`ArrayTrie::prefix()`].
    pub fn prefix(&self, pre: &str, limit: usize) -> Result<Vec<WordEntry>> {
        self.trie.prefix(pre, limit)
    }

    /// See [`ArrayTrie::suffix()`].
    pub fn suffix(&self, key: &str, limit: usize) -> Result<Vec<WordEntry>> {
        self.trie.suffix(key, limit)
    }

    /// See [`ArrayTrie::fuzzy()`].
    pub fn fuzzy(&self, key: &str, limit: usize) -> Result<Vec<WordEntry>> {
        self.trie.fuzzy(key, limit)
    }

    /// Registers a word, appends it to the dictionary source, and updates the
    /// store.
    ///
    /// The trie is patched in place when possible, and rebuilt otherwise.
    ///
    /// # Errors
    ///
    /// [`LexdatError`](crate::errors::LexdatError) is returned when `level`
    /// exceeds 9, `word` cannot be registered, or a file operation fails.
    /// After a file error the in-memory state is updated but the files may
    /// be stale.
    pub fn insert(&mut self, word: &str, level: u8) -> Result<InsertOutcome> {
        let level = Level::try_from_u8(level)?;
        let outcome = self.trie.insert(word, level)?;
        let previous = self.dict.insert(word, level);
        if outcome == InsertOutcome::Conflict {
            match self.dict.build_trie() {
                Ok(trie) => {
                    log::info!("rebuilt the trie to insert {:?}", word);
                    self.trie = trie;
                }
                Err(e) => {
                    match previous {
                        Some(previous) => self.dict.insert(word, previous),
                        None => self.dict.remove(word),
                    };
                    return Err(e);
                }
            }
        }
        dictionary::append_entry(&self.dict_path, word, level)?;
        self.sync_store()?;
        Ok(outcome)
    }

    /// Unregisters a word, deletes it from the dictionary source, and updates
    /// the store.
    ///
    /// # Errors
    ///
    /// [`LexdatError::NotFound`](crate::errors::LexdatError::NotFound) is
    /// returned when `word` is not registered, and other errors when a file
    /// operation fails.
    pub fn remove(&mut self, word: &str) -> Result<()> {
        self.trie.remove(word)?;
        self.dict.remove(word);
        dictionary::remove_entry(&self.dict_path, word)?;
        self.sync_store()
    }

    /// Rebuilds the trie from the registered words and updates the store.
    ///
    /// # Errors
    ///
    /// [`LexdatError`](crate::errors::LexdatError) is returned when no word
    /// is registered or the store cannot be written.
    pub fn rebuild(&mut self) -> Result<()> {
        self.trie = self.dict.build_trie()?;
        self.sync_store()
    }

    /// Writes the store file.
    ///
    /// # Errors
    ///
    /// [`LexdatError`](crate::errors::LexdatError) is returned when the store
    /// cannot be written.
    pub fn save(&self) -> Result<()> {
        let image = StoreImage {
            digest: self.digest.clone(),
            dict: self.dict.clone(),
            trie: self.trie.clone(),
        };
        let num_bytes = image.save(&self.store_path)?;
        log::info!(
            "saved the store {} ({} bytes)",
            self.store_path.display(),
            num_bytes
        );
        Ok(())
    }

    fn sync_store(&mut self) -> Result<()> {
        self.digest = dictionary::file_digest(&self.dict_path)?;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use crate::errors::LexdatError;

    struct Fixture {
        _dir: tempfile::TempDir,
        store: PathBuf,
        dict: PathBuf,
    }

    fn fixture(source: &str) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("dat.data");
        let dict = dir.path().join("dict.txt");
        fs::write(&dict, source).unwrap();
        Fixture {
            _dir: dir,
            store,
            dict,
        }
    }

    #[test]
    fn test_initialize() {
        let f = fixture("1 a\n2 ab\n1 abc");
        let engine = Engine::initialize(&f.store, &f.dict).unwrap();
        assert!(f.store.exists());
        assert_eq!(engine.exact_match("ab", false).unwrap().level, 2);
        assert_eq!(engine.dictionary().len(), 3);
    }

    #[test]
    fn test_initialize_reuses_store() {
        let f = fixture("1 a\n2 ab\n1 abc");
        let first = Engine::initialize(&f.store, &f.dict).unwrap();
        let saved = fs::read(&f.store).unwrap();
        let second = Engine::initialize(&f.store, &f.dict).unwrap();
        assert_eq!(first.trie(), second.trie());
        assert_eq!(fs::read(&f.store).unwrap(), saved);
    }

    #[test]
    fn test_initialize_recompiles_on_change() {
        let f = fixture("1 a\n2 ab");
        Engine::initialize(&f.store, &f.dict).unwrap();
        fs::write(&f.dict, "1 a\n2 ab\n5 xyz").unwrap();
        let engine = Engine::initialize(&f.store, &f.dict).unwrap();
        assert_eq!(engine.exact_match("xyz", false).unwrap().level, 5);
    }

    #[test]
    fn test_compile_overwrites_store() {
        let f = fixture("1 a\n2 ab");
        fs::write(&f.store, b"garbage").unwrap();
        let engine = Engine::compile(&f.store, &f.dict).unwrap();
        let image = StoreImage::load(&f.store).unwrap();
        assert_eq!(&image.trie, engine.trie());
        assert_eq!(image.digest, dictionary::file_digest(&f.dict).unwrap());
    }

    #[test]
    fn test_initialize_broken_store() {
        let f = fixture("1 a");
        fs::write(&f.store, b"garbage").unwrap();
        let engine = Engine::initialize(&f.store, &f.dict).unwrap();
        assert_eq!(engine.exact_match("a", false).unwrap().level, 1);
    }

    #[test]
    fn test_initialize_non_digit_level() {
        let f = fixture("x foo\n1 a");
        let engine = Engine::initialize(&f.store, &f.dict).unwrap();
        assert_eq!(engine.exact_match("foo", false).unwrap().level, 0);
        assert_eq!(engine.exact_match("a", false).unwrap().level, 1);
    }

    #[test]
    fn test_initialize_missing_dict() {
        let f = fixture("1 a");
        fs::remove_file(&f.dict).unwrap();
        assert!(matches!(
            Engine::initialize(&f.store, &f.dict),
            Err(LexdatError::StdIo(_))
        ));
    }

    #[test]
    fn test_initialize_empty_dict() {
        let f = fixture("\n");
        assert!(matches!(
            Engine::initialize(&f.store, &f.dict),
            Err(LexdatError::EmptyDictionary)
        ));
    }

    #[test]
    fn test_insert_persists() {
        let f = fixture("1 a\n2 ab\n1 abc");
        let mut engine = Engine::initialize(&f.store, &f.dict).unwrap();
        assert_eq!(engine.insert("abd", 3).unwrap(), InsertOutcome::Appended);
        assert_eq!(engine.exact_match("abd", false).unwrap().level, 3);
        assert_eq!(
            fs::read_to_string(&f.dict).unwrap(),
            "1 a\n2 ab\n1 abc\n3 abd"
        );

        let reloaded = Engine::initialize(&f.store, &f.dict).unwrap();
        assert_eq!(reloaded.trie(), engine.trie());
        assert_eq!(reloaded.exact_match("abd", false).unwrap().level, 3);
    }

    #[test]
    fn test_insert_conflict_rebuilds() {
        let f = fixture("1 a\n1 b\n1 ac");
        let mut engine = Engine::initialize(&f.store, &f.dict).unwrap();
        assert_eq!(engine.insert("ab", 2).unwrap(), InsertOutcome::Conflict);
        for (word, level) in [("a", 1), ("b", 1), ("ac", 1), ("ab", 2)] {
            assert_eq!(engine.exact_match(word, false).unwrap().level, level);
        }
        engine.trie().verify().unwrap();
    }

    #[test]
    fn test_insert_invalid_level() {
        let f = fixture("1 a");
        let mut engine = Engine::initialize(&f.store, &f.dict).unwrap();
        assert!(matches!(
            engine.insert("b", 10),
            Err(LexdatError::InvalidArgument(_))
        ));
        assert!(engine.exact_match("b", false).unwrap_err().is_not_found());
        assert_eq!(engine.dictionary().get("b"), None);
    }

    #[test]
    fn test_remove_persists() {
        let f = fixture("1 a\n2 ab\n1 abc");
        let mut engine = Engine::initialize(&f.store, &f.dict).unwrap();
        engine.remove("ab").unwrap();
        assert!(engine.exact_match("ab", false).unwrap_err().is_not_found());
        assert!(engine.exact_match("ab", true).is_ok());
        assert_eq!(engine.exact_match("abc", false).unwrap().level, 1);
        assert_eq!(fs::read_to_string(&f.dict).unwrap(), "1 a\n1 abc");

        let reloaded = Engine::initialize(&f.store, &f.dict).unwrap();
        assert!(reloaded.exact_match("ab", false).unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_missing() {
        let f = fixture("1 a");
        let mut engine = Engine::initialize(&f.store, &f.dict).unwrap();
        assert!(engine.remove("b").unwrap_err().is_not_found());
        assert_eq!(fs::read_to_string(&f.dict).unwrap(), "1 a");
    }

    #[test]
    fn test_rebuild() {
        let f = fixture("1 a\n2 ab\n1 abc");
        let mut engine = Engine::initialize(&f.store, &f.dict).unwrap();
        engine.insert("abd", 3).unwrap();
        engine.remove("abc").unwrap();
        engine.rebuild().unwrap();
        let fresh = Dictionary::from_reader(fs::read(&f.dict).unwrap().as_slice())
            .unwrap()
            .build_trie()
            .unwrap();
        assert_eq!(engine.trie(), &fresh);
    }
}
