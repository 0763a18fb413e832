//! Word list with levels, and its source file.
mod source;

use std::io::{BufRead, BufReader, Read};

use bincode::{
    de::Decoder,
    enc::Encoder,
    error::{DecodeError, EncodeError},
    Decode, Encode,
};
use hashbrown::HashMap;

use crate::errors::{LexdatError, Result};
use crate::num::Level;
use crate::trie::ArrayTrie;
use crate::utils::find_zero_char;

pub use source::{append_entry, file_digest, remove_entry};

/// Mapping from words to their levels.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Dictionary {
    words: HashMap<String, Level>,
}

impl Dictionary {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a dictionary source.
    ///
    /// Each line is `<level digit><space><word>`. Lines shorter than three
    /// bytes are ignored, a line without a level digit is read as level 0,
    /// and a later line overrides an earlier one with the same word.
    ///
    /// # Errors
    ///
    /// [`LexdatError`] is returned when a line is not valid UTF-8.
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut dict = Self::new();
        let mut reader = BufReader::new(rdr);
        let mut line = vec![];
        let mut lineno = 0;
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            lineno += 1;
            if let Some((word, level)) = Self::parse_line(&line, lineno)? {
                dict.words.insert(word, level);
            }
        }
        Ok(dict)
    }

    fn parse_line(line: &[u8], lineno: usize) -> Result<Option<(String, Level)>> {
        if line.len() < 3 {
            return Ok(None);
        }
        let level = Level::from_digit(line[0]).unwrap_or_else(|| {
            log::warn!("line {lineno} does not start with a level digit; read as level 0");
            Level::default()
        });
        let mut word = &line[2..];
        while let Some((&(b'\n' | b'\r'), rest)) = word.split_last() {
            word = rest;
        }
        let word = std::str::from_utf8(word).map_err(|e| {
            LexdatError::invalid_format("dict", format!("line {lineno}: {e}"))
        })?;
        if word.is_empty() {
            return Ok(None);
        }
        if find_zero_char(word).is_some() {
            log::warn!("skipped a word with a zero code point (at line {lineno})");
            return Ok(None);
        }
        Ok(Some((word.to_string(), level)))
    }

    /// Registers a word, returning the level it had before.
    pub fn insert<S>(&mut self, word: S, level: Level) -> Option<Level>
    where
        S: Into<String>,
    {
        self.words.insert(word.into(), level)
    }

    /// Unregisters a word, returning its level.
    pub fn remove(&mut self, word: &str) -> Option<Level> {
        self.words.remove(word)
    }

    /// Gets the level of a word.
    pub fn get(&self, word: &str) -> Option<Level> {
        self.words.get(word).copied()
    }

    /// Gets the number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Checks if no word is registered.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterates over the words in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Level)> {
        self.words.iter().map(|(w, &l)| (w.as_str(), l))
    }

    /// Compiles the words into a trie.
    ///
    /// # Errors
    ///
    /// [`LexdatError::EmptyDictionary`] is returned when no word is registered.
    pub fn build_trie(&self) -> Result<ArrayTrie> {
        ArrayTrie::from_iter_records(self.iter())
    }

    fn sorted_records(&self) -> Vec<(String, Level)> {
        let mut records: Vec<_> = self.words.iter().map(|(w, &l)| (w.clone(), l)).collect();
        records.sort_unstable();
        records
    }
}

impl Encode for Dictionary {
    fn encode<E: Encoder>(&self, encoder: &mut E) -> Result<(), EncodeError> {
        Encode::encode(&self.sorted_records(), encoder)?;
        Ok(())
    }
}

impl<Context> Decode<Context> for Dictionary {
    fn decode<D: Decoder<Context = Context>>(decoder: &mut D) -> Result<Self, DecodeError> {
        let records: Vec<(String, Level)> = Decode::decode(decoder)?;
        Ok(Self {
            words: records.into_iter().collect(),
        })
    }
}

bincode::impl_borrow_decode!(Dictionary);

#[cfg(test)]
mod tests {
    use super::*;

    use crate::utils::hashmap;

    fn level(x: u8) -> Level {
        Level::new(x).unwrap()
    }

    #[test]
    fn test_from_reader() {
        let data = "1 a\n2 ab\r\n1 abc\n\n3 東京";
        let dict = Dictionary::from_reader(data.as_bytes()).unwrap();
        assert_eq!(
            dict.words,
            hashmap![
                "a".to_string() => level(1),
                "ab".to_string() => level(2),
                "abc".to_string() => level(1),
                "東京".to_string() => level(3),
            ]
        );
    }

    #[test]
    fn test_last_line_wins() {
        let data = "1 a\n7 a\n";
        let dict = Dictionary::from_reader(data.as_bytes()).unwrap();
        assert_eq!(dict.get("a"), Some(level(7)));
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_short_lines() {
        let data = "1\n\n12\n3 \n2 x";
        let dict = Dictionary::from_reader(data.as_bytes()).unwrap();
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get("x"), Some(level(2)));
    }

    #[test]
    fn test_non_digit_level() {
        let data = "x foo\n1 a\n- bar";
        let dict = Dictionary::from_reader(data.as_bytes()).unwrap();
        assert_eq!(dict.get("foo"), Some(level(0)));
        assert_eq!(dict.get("a"), Some(level(1)));
        assert_eq!(dict.get("bar"), Some(level(0)));
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn test_invalid_utf8() {
        let data = b"1 \xff\xfe\n";
        assert!(matches!(
            Dictionary::from_reader(&data[..]),
            Err(LexdatError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_insert_remove() {
        let mut dict = Dictionary::new();
        assert_eq!(dict.insert("a", level(1)), None);
        assert_eq!(dict.insert("a", level(2)), Some(level(1)));
        assert_eq!(dict.remove("a"), Some(level(2)));
        assert!(dict.is_empty());
    }

    #[test]
    fn test_build_trie() {
        let dict = Dictionary::from_reader("1 a\n2 ab".as_bytes()).unwrap();
        let trie = dict.build_trie().unwrap();
        assert_eq!(trie.exact_match("ab", false).unwrap().level, 2);
        assert!(matches!(
            Dictionary::new().build_trie(),
            Err(LexdatError::EmptyDictionary)
        ));
    }
}
