use std::ops::{ControlFlow, Range};

use hashbrown::HashSet;

use crate::common::ROOT_INDEX;
use crate::errors::{LexdatError, Result};
use crate::num::Level;
use crate::trie::ArrayTrie;
use crate::utils::{code_of, find_zero_char};

/// Node resolved by [`ArrayTrie::exact_match()`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NodeMatch {
    /// Slot of the last character.
    pub index: usize,

    /// Level of the word, or 0 if the node does not end a word.
    pub level: u8,

    /// Whether the node ends a word.
    pub terminal: bool,
}

/// Word found by [`ArrayTrie::search()`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchMatch {
    /// The matched word.
    pub word: String,

    /// Level of the word.
    pub level: u8,

    /// Position of the first character in the text.
    pub start: usize,

    /// Position next to the last character in the text.
    pub end: usize,
}

impl SearchMatch {
    /// Gets the position range in characters.
    #[inline(always)]
    pub const fn range_char(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Word with its level, as listed by the enumerating queries.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct WordEntry {
    /// The word.
    pub word: String,

    /// Level of the word.
    pub level: u8,
}

impl WordEntry {
    fn new(word: String, level: Level) -> Self {
        Self {
            word,
            level: level.get(),
        }
    }
}

impl ArrayTrie {
    /// Resolves `key` to its node.
    ///
    /// With `force_back`, any node spelling `key` is returned even if it does
    /// not end a word. The empty key resolves to the root in that mode.
    ///
    /// # Errors
    ///
    /// [`LexdatError::InvalidCharacter`] is returned for a zero code point, and
    /// [`LexdatError::NotFound`] when `key` is absent or, without
    /// `force_back`, is only a prefix of other words.
    pub fn exact_match(&self, key: &str, force_back: bool) -> Result<NodeMatch> {
        let mut index = ROOT_INDEX;
        let mut state = self.state(ROOT_INDEX);
        for (pos, c) in key.chars().enumerate() {
            if c == '\0' {
                return Err(LexdatError::invalid_character(key, pos));
            }
            // A leaf before the key is exhausted.
            let offset = state.offset().ok_or_else(|| LexdatError::not_found(key))?;
            let next = offset + code_of(c);
            let next_state = self.state(next);
            if next_state.parent() != Some(index) {
                return Err(LexdatError::not_found(key));
            }
            index = next;
            state = next_state;
        }
        let level = state.level();
        if level.is_none() && !force_back {
            return Err(LexdatError::not_found(key));
        }
        Ok(NodeMatch {
            index,
            level: level.map_or(0, Level::get),
            terminal: level.is_some(),
        })
    }

    /// Finds every word occurring in `text`.
    ///
    /// Each start position is tried independently, so the matches are ordered
    /// by start position, then by length.
    pub fn search(&self, text: &str) -> Vec<SearchMatch> {
        let mut matches = vec![];
        let Some(root_offset) = self.state(ROOT_INDEX).offset() else {
            return matches;
        };
        let chars: Vec<char> = text.chars().collect();
        for start in 0..chars.len() {
            let mut index = ROOT_INDEX;
            let mut offset = root_offset;
            for (i, &c) in chars.iter().enumerate().skip(start) {
                if c == '\0' {
                    break;
                }
                let next = offset + code_of(c);
                let state = self.state(next);
                if state.parent() != Some(index) {
                    break;
                }
                if let Some(level) = state.level() {
                    matches.push(SearchMatch {
                        word: chars[start..=i].iter().collect(),
                        level: level.get(),
                        start,
                        end: i + 1,
                    });
                }
                match state.offset() {
                    Some(o) => {
                        index = next;
                        offset = o;
                    }
                    None => break,
                }
            }
        }
        matches
    }

    /// Lists at most `limit` words starting with `pre`.
    ///
    /// The words come in depth-first order with children ascending by code
    /// point, which is the lexicographic order. `pre` itself comes first if it
    /// is a word. The empty prefix lists the whole dictionary.
    ///
    /// # Errors
    ///
    /// [`LexdatError::NotFound`] is returned when no word starts with `pre`.
    pub fn prefix(&self, pre: &str, limit: usize) -> Result<Vec<WordEntry>> {
        let m = self.exact_match(pre, true)?;
        let mut entries = vec![];
        if limit == 0 {
            return Ok(entries);
        }
        self.visit_words(m.index, pre.to_string(), |word, level| {
            entries.push(WordEntry::new(word, level));
            if entries.len() >= limit {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;
        Ok(entries)
    }

    /// Lists at most `limit` words ending with `key`, in slot order.
    ///
    /// # Errors
    ///
    /// [`LexdatError::InvalidCharacter`] is returned for a zero code point.
    pub fn suffix(&self, key: &str, limit: usize) -> Result<Vec<WordEntry>> {
        if let Some(pos) = find_zero_char(key) {
            return Err(LexdatError::invalid_character(key, pos));
        }
        let keys: Vec<char> = key.chars().collect();
        let mut entries = vec![];
        let Some((&last, init)) = keys.split_last() else {
            return Ok(entries);
        };
        for index in ROOT_INDEX + 1..self.size() {
            if entries.len() >= limit {
                break;
            }
            let Some(level) = self.state(index).level() else {
                continue;
            };
            let Some((parent, c)) = self.label(index) else {
                continue;
            };
            if c != last || !self.ends_with(parent, init) {
                continue;
            }
            entries.push(WordEntry::new(self.word_at(index)?, level));
        }
        Ok(entries)
    }

    /// Checks that the path to `index` ends with `tail`.
    fn ends_with(&self, mut index: usize, tail: &[char]) -> bool {
        for &k in tail.iter().rev() {
            match self.label(index) {
                Some((parent, c)) if c == k => index = parent,
                // Either the root was reached or the characters differ.
                _ => return false,
            }
        }
        true
    }

    /// Lists at most `limit` words passing through a node labeled by any
    /// character of `key`.
    ///
    /// Nodes are scanned in slot order and each one contributes its own word
    /// first, then its descendants. A word is reported once.
    ///
    /// # Errors
    ///
    /// [`LexdatError::InvalidCharacter`] is returned for a zero code point.
    pub fn fuzzy(&self, key: &str, limit: usize) -> Result<Vec<WordEntry>> {
        if let Some(pos) = find_zero_char(key) {
            return Err(LexdatError::invalid_character(key, pos));
        }
        let wanted: HashSet<char> = key.chars().collect();
        let mut seen = HashSet::new();
        let mut entries = vec![];
        for index in ROOT_INDEX + 1..self.size() {
            if entries.len() >= limit {
                break;
            }
            match self.label(index) {
                Some((_, c)) if wanted.contains(&c) => {}
                _ => continue,
            }
            let word = self.word_at(index)?;
            self.visit_words(index, word, |word, level| {
                if seen.insert(word.clone()) {
                    entries.push(WordEntry::new(word, level));
                }
                if entries.len() >= limit {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })?;
        }
        Ok(entries)
    }

    /// Visits every word at or below `index` in pre-order.
    ///
    /// `word` must be the word spelled by `index`.
    fn visit_words<F>(&self, index: usize, word: String, mut f: F) -> Result<()>
    where
        F: FnMut(String, Level) -> ControlFlow<()>,
    {
        let mut stack = vec![(index, word)];
        while let Some((index, word)) = stack.pop() {
            let state = self.state(index);
            let Some(offset) = state.offset() else {
                if let Some(level) = state.level() {
                    if f(word, level).is_break() {
                        break;
                    }
                }
                continue;
            };
            if let Some(level) = state.level() {
                if f(word.clone(), level).is_break() {
                    break;
                }
            }
            for (child, c) in self.children(index, offset)?.into_iter().rev() {
                let mut w = word.clone();
                w.push(c);
                stack.push((child, w));
            }
        }
        Ok(())
    }

    /// Gets the children of `index` in ascending slot order.
    fn children(&self, index: usize, offset: usize) -> Result<Vec<(usize, char)>> {
        let mut children = vec![];
        let end = self.size().min(offset + code_of(char::MAX) + 1);
        for child in offset + 1..end {
            if self.state(child).parent() != Some(index) {
                continue;
            }
            let (_, c) = self
                .label(child)
                .ok_or_else(|| LexdatError::structural_mismatch(child))?;
            children.push((child, c));
        }
        Ok(children)
    }
}
