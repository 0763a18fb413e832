use crate::common::ROOT_INDEX;
use crate::errors::{LexdatError, Result};
use crate::num::Level;
use crate::trie::{ArrayTrie, NodeState};
use crate::utils::code_of;

/// Result of [`ArrayTrie::insert()`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InsertOutcome {
    /// The word was already registered with the same level.
    Unchanged,

    /// The word was already registered; its level was rewritten.
    Relabeled,

    /// The word existed as a prefix of other words and was marked as a word.
    Marked,

    /// New nodes were appended for the unshared suffix.
    Appended,

    /// The word cannot be placed without moving existing nodes.
    /// The trie is left untouched and must be rebuilt.
    Conflict,
}

impl ArrayTrie {
    /// Inserts a word in place.
    ///
    /// The shared prefix is walked as in [`ArrayTrie::exact_match()`]; the rest
    /// of the word is laid out by claiming the first vacant slot for each
    /// character. When the node where the word diverges already has children
    /// and the slot dictated by its offset is taken, [`InsertOutcome::Conflict`]
    /// is returned without modification.
    ///
    /// # Errors
    ///
    /// [`LexdatError`] is returned when `word` is empty or contains a zero
    /// code point.
    pub fn insert(&mut self, word: &str, level: Level) -> Result<InsertOutcome> {
        if word.is_empty() {
            return Err(LexdatError::invalid_argument(
                "word",
                "an empty word cannot be registered",
            ));
        }
        let chars: Vec<char> = word.chars().collect();
        if let Some(pos) = chars.iter().position(|&c| c == '\0') {
            return Err(LexdatError::invalid_character(word, pos));
        }
        if self.size() <= ROOT_INDEX {
            self.ensure_index(ROOT_INDEX);
        }

        let mut index = ROOT_INDEX;
        for (pos, &c) in chars.iter().enumerate() {
            let Some(offset) = self.state(index).offset() else {
                self.append(index, None, &chars[pos..], level);
                return Ok(InsertOutcome::Appended);
            };
            let next = offset + code_of(c);
            match self.state(next).parent() {
                Some(parent) if parent == index => index = next,
                None => {
                    self.append(index, Some(next), &chars[pos..], level);
                    return Ok(InsertOutcome::Appended);
                }
                Some(_) => {
                    log::debug!("slot {next} is taken; {word:?} needs a rebuild");
                    return Ok(InsertOutcome::Conflict);
                }
            }
        }

        let state = self.state(index);
        let outcome = match state.level() {
            Some(current) if current == level => return Ok(InsertOutcome::Unchanged),
            Some(_) => InsertOutcome::Relabeled,
            None => InsertOutcome::Marked,
        };
        self.set_state(index, state.with_level(level));
        Ok(outcome)
    }

    /// Appends a chain of nodes spelling `rest` below `index`.
    ///
    /// `first` is the slot of the first character when `index` already has an
    /// offset; otherwise an offset is probed for every new node.
    fn append(&mut self, mut index: usize, first: Option<usize>, rest: &[char], level: Level) {
        let mut first = first;
        for (i, &c) in rest.iter().enumerate() {
            let slot = match first.take() {
                Some(slot) => slot,
                None => {
                    let offset = self.probe(code_of(c));
                    let state = self.state(index).with_offset(offset);
                    self.set_state(index, state);
                    offset + code_of(c)
                }
            };
            let state = if i + 1 == rest.len() {
                NodeState::Leaf {
                    parent: index,
                    level,
                }
            } else {
                NodeState::Branch {
                    parent: index,
                    offset: 0,
                }
            };
            self.set_state(slot, state);
            index = slot;
        }
    }

    /// Finds the smallest offset placing `code` on a vacant slot.
    fn probe(&mut self, code: usize) -> usize {
        let mut offset = 1;
        loop {
            self.ensure_index(offset + code);
            if self.is_vacant(offset + code) {
                return offset;
            }
            offset += 1;
        }
    }

    /// Removes a word in place.
    ///
    /// A word that prefixes other words only loses its end-of-word marker;
    /// a leaf is cleared.
    ///
    /// # Errors
    ///
    /// [`LexdatError::NotFound`] is returned when `word` is not registered.
    pub fn remove(&mut self, word: &str) -> Result<()> {
        let m = self.exact_match(word, false)?;
        let state = self.state(m.index);
        self.set_state(m.index, state.without_level());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(x: u8) -> Level {
        Level::new(x).unwrap()
    }

    fn sample() -> ArrayTrie {
        ArrayTrie::from_records(&[("a", level(1)), ("ab", level(2)), ("abc", level(1))]).unwrap()
    }

    #[test]
    fn test_insert_sibling() {
        let mut trie = sample();
        assert_eq!(
            trie.insert("abd", level(3)).unwrap(),
            InsertOutcome::Appended
        );
        assert_eq!(trie.exact_match("abd", false).unwrap().level, 3);
        assert_eq!(trie.exact_match("ab", false).unwrap().level, 2);
        assert_eq!(trie.exact_match("abc", false).unwrap().level, 1);
        trie.verify().unwrap();
    }

    #[test]
    fn test_insert_below_leaf() {
        let mut trie = sample();
        assert_eq!(
            trie.insert("abcde", level(0)).unwrap(),
            InsertOutcome::Appended
        );
        assert_eq!(trie.exact_match("abcde", false).unwrap().level, 0);
        assert!(trie.exact_match("abcd", false).unwrap_err().is_not_found());
        assert!(!trie.exact_match("abcd", true).unwrap().terminal);
        // The former leaf keeps its level while gaining a child.
        assert_eq!(trie.exact_match("abc", false).unwrap().level, 1);
        trie.verify().unwrap();
    }

    #[test]
    fn test_insert_marks_prefix() {
        let mut trie = ArrayTrie::from_records(&[("abc", level(1))]).unwrap();
        let before = trie.size();
        assert_eq!(trie.insert("ab", level(6)).unwrap(), InsertOutcome::Marked);
        assert_eq!(trie.exact_match("ab", false).unwrap().level, 6);
        assert_eq!(trie.exact_match("abc", false).unwrap().level, 1);
        assert_eq!(trie.size(), before);
    }

    #[test]
    fn test_insert_twice() {
        let mut trie = sample();
        trie.insert("abd", level(3)).unwrap();
        let once = trie.clone();
        assert_eq!(
            trie.insert("abd", level(3)).unwrap(),
            InsertOutcome::Unchanged
        );
        assert_eq!(trie, once);
    }

    #[test]
    fn test_insert_relabel() {
        let mut trie = sample();
        assert_eq!(
            trie.insert("ab", level(9)).unwrap(),
            InsertOutcome::Relabeled
        );
        assert_eq!(trie.exact_match("ab", false).unwrap().level, 9);
        assert_eq!(trie.exact_match("abc", false).unwrap().level, 1);
    }

    #[test]
    fn test_insert_conflict() {
        // Root children 'a' and 'b' sit at 1 + 'a' and 1 + 'b'; "ab" places
        // its child at 1 + 'b' too, which is taken by "b".
        let mut trie = ArrayTrie::from_records(&[("a", level(1)), ("b", level(1)), ("ac", level(1))])
            .unwrap();
        let root = trie.state(ROOT_INDEX).offset().unwrap();
        let a = root + code_of('a');
        let offset = trie.state(a).offset().unwrap();
        let taken = offset + code_of('b');
        assert!(!trie.is_vacant(taken));
        assert_ne!(trie.state(taken).parent(), Some(a));

        let before = trie.clone();
        assert_eq!(
            trie.insert("ab", level(2)).unwrap(),
            InsertOutcome::Conflict
        );
        assert_eq!(trie, before);
    }

    #[test]
    fn test_insert_new_root_child() {
        let mut trie = sample();
        assert_eq!(
            trie.insert("東京", level(4)).unwrap(),
            InsertOutcome::Appended
        );
        assert_eq!(trie.exact_match("東京", false).unwrap().level, 4);
        assert!(trie.size() > code_of('東'));
        trie.verify().unwrap();
    }

    #[test]
    fn test_insert_invalid() {
        let mut trie = sample();
        assert!(matches!(
            trie.insert("", level(1)),
            Err(LexdatError::InvalidArgument(_))
        ));
        assert!(matches!(
            trie.insert("x\0", level(1)),
            Err(LexdatError::InvalidCharacter(_))
        ));
    }

    #[test]
    fn test_remove_branch() {
        let mut trie = sample();
        trie.insert("abd", level(3)).unwrap();
        trie.remove("ab").unwrap();
        assert!(trie.exact_match("ab", false).unwrap_err().is_not_found());
        assert!(!trie.exact_match("ab", true).unwrap().terminal);
        assert_eq!(trie.exact_match("abc", false).unwrap().level, 1);
        assert_eq!(trie.exact_match("abd", false).unwrap().level, 3);
        trie.verify().unwrap();
    }

    #[test]
    fn test_remove_leaf() {
        let mut trie = sample();
        let index = trie.exact_match("abc", false).unwrap().index;
        trie.remove("abc").unwrap();
        assert!(trie.is_vacant(index));
        assert!(trie.exact_match("abc", false).unwrap_err().is_not_found());
        assert_eq!(trie.exact_match("ab", false).unwrap().level, 2);
    }

    #[test]
    fn test_remove_missing() {
        let mut trie = sample();
        assert!(trie.remove("abd").unwrap_err().is_not_found());
        assert!(trie.remove("").unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_then_insert() {
        let mut trie = sample();
        trie.remove("abc").unwrap();
        assert_eq!(
            trie.insert("abc", level(5)).unwrap(),
            InsertOutcome::Appended
        );
        assert_eq!(trie.exact_match("abc", false).unwrap().level, 5);
    }
}
