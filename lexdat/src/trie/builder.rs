use crate::common::ROOT_INDEX;
use crate::errors::{LexdatError, Result};
use crate::num::Level;
use crate::trie::node::ConstructionNode;
use crate::trie::{ArrayTrie, NodeState};
use crate::utils::find_zero_char;

impl ArrayTrie {
    /// Builds a new trie from pairs of a word and its level.
    ///
    /// When a word appears more than once, the last level wins.
    ///
    /// # Errors
    ///
    /// [`LexdatError`] is returned when
    ///  - `records` is empty,
    ///  - a word is empty, or
    ///  - a word contains a zero code point.
    pub fn from_records<K>(records: &[(K, Level)]) -> Result<Self>
    where
        K: AsRef<str>,
    {
        Self::from_iter_records(records.iter().map(|(k, v)| (k.as_ref(), *v)))
    }

    pub(crate) fn from_iter_records<'a, I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, Level)>,
    {
        let mut sorted: Vec<(&str, Level)> = records.into_iter().collect();
        if sorted.is_empty() {
            return Err(LexdatError::EmptyDictionary);
        }
        // Stable, so equal words keep their input order and the last one wins below.
        sorted.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut keys: Vec<Vec<char>> = Vec::with_capacity(sorted.len());
        let mut levels: Vec<Level> = Vec::with_capacity(sorted.len());
        let mut prev: Option<&str> = None;
        for (word, level) in sorted {
            if word.is_empty() {
                return Err(LexdatError::invalid_argument(
                    "records",
                    "an empty word cannot be registered",
                ));
            }
            if let Some(pos) = find_zero_char(word) {
                return Err(LexdatError::invalid_character(word, pos));
            }
            if prev == Some(word) {
                if let Some(last) = levels.last_mut() {
                    *last = level;
                }
                continue;
            }
            prev = Some(word);
            keys.push(word.chars().collect());
            levels.push(level);
        }

        Ok(TrieBuilder::new(&keys, &levels).build())
    }
}

struct TrieBuilder<'a> {
    keys: &'a [Vec<char>],
    levels: &'a [Level],
    trie: ArrayTrie,
    // Every slot below this index is occupied.
    first_vacant: usize,
}

impl<'a> TrieBuilder<'a> {
    fn new(keys: &'a [Vec<char>], levels: &'a [Level]) -> Self {
        debug_assert_eq!(keys.len(), levels.len());
        let mut trie = ArrayTrie::default();
        trie.ensure_index(keys.len().max(ROOT_INDEX + 1) - 1);
        Self {
            keys,
            levels,
            trie,
            first_vacant: ROOT_INDEX + 1,
        }
    }

    fn build(mut self) -> ArrayTrie {
        // Depth-first, children in code order: the same visiting order as a
        // recursive construction, without its call depth.
        let mut stack = vec![(ConstructionNode::root(self.keys.len()), ROOT_INDEX)];
        while let Some((node, index)) = stack.pop() {
            let children = node.fetch(self.keys);
            if children.is_empty() {
                continue;
            }
            let offset = self.place(&children, index);
            for child in children.into_iter().rev() {
                stack.push((child, offset + child.code));
            }
        }
        log::debug!(
            "built a trie of {} words in {} slots",
            self.keys.len(),
            self.trie.size()
        );
        self.trie
    }

    /// Finds the smallest offset at which all siblings fit, then writes the
    /// parent and the siblings.
    fn place(&mut self, children: &[ConstructionNode], parent: usize) -> usize {
        debug_assert!(!children.is_empty());
        let first_code = children[0].code;
        let last_code = children[children.len() - 1].code;

        let mut offset = self.first_vacant.saturating_sub(first_code).max(1);
        loop {
            self.trie.ensure_index(offset + last_code);
            if children
                .iter()
                .all(|c| self.trie.is_vacant(offset + c.code))
            {
                break;
            }
            offset += 1;
        }

        let state = self.trie.state(parent).with_offset(offset);
        self.trie.set_state(parent, state);

        for child in children {
            let state = if child.is_end {
                NodeState::Leaf {
                    parent,
                    level: self.levels[child.left],
                }
            } else {
                NodeState::Branch { parent, offset: 0 }
            };
            self.trie.set_state(offset + child.code, state);
        }

        while !self.trie.is_vacant(self.first_vacant) {
            self.first_vacant += 1;
        }
        offset
    }
}
