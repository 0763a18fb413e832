//! Double-array trie of level-tagged words.
mod builder;
mod mutate;
mod node;
mod query;
mod slot;

use bincode::{Decode, Encode};

use crate::common::{GROWTH_FACTOR, ROOT_INDEX};
use crate::errors::{LexdatError, Result};
use crate::utils::char_of;

pub use mutate::InsertOutcome;
pub use query::{NodeMatch, SearchMatch, WordEntry};

pub(crate) use slot::{NodeState, Slot};

/// Double-array trie mapping words to levels.
///
/// Every node occupies one slot of a single growable array of `(base, check)`
/// pairs. A child of node `p` reached by character `c` lives at
/// `offset(p) + c`, and its `check` records `p`, negated when the child ends a
/// word.
#[derive(Clone, Debug, Default, Eq, PartialEq, Decode, Encode)]
pub struct ArrayTrie {
    slots: Vec<Slot>,
}

impl ArrayTrie {
    /// Gets the capacity of the arrays.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Gets the number of occupied slots, the root included.
    pub fn num_nodes(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_vacant()).count()
    }

    /// Gets the number of words.
    pub fn num_words(&self) -> usize {
        self.slots.iter().filter(|s| s.state().is_terminal()).count()
    }

    #[inline(always)]
    pub(crate) fn state(&self, index: usize) -> NodeState {
        self.slots.get(index).map_or(NodeState::Vacant, Slot::state)
    }

    #[inline(always)]
    pub(crate) fn set_state(&mut self, index: usize, state: NodeState) {
        self.ensure_index(index);
        self.slots[index] = state.encode();
    }

    /// Grows the arrays so that `index` is addressable.
    pub(crate) fn ensure_index(&mut self, index: usize) {
        if index < self.slots.len() {
            return;
        }
        let new_size = ((index as f64 * GROWTH_FACTOR) as usize).max(index + 1);
        log::debug!("growing the arrays: {} -> {}", self.slots.len(), new_size);
        self.slots.resize(new_size, Slot::VACANT);
    }

    #[inline(always)]
    pub(crate) fn is_vacant(&self, index: usize) -> bool {
        self.slots.get(index).map_or(true, Slot::is_vacant)
    }

    /// Gets the parent and the incoming character of a non-root node.
    pub(crate) fn label(&self, index: usize) -> Option<(usize, char)> {
        let parent = self.state(index).parent().filter(|&p| p != 0)?;
        let offset = self.state(parent).offset()?;
        let c = char_of(index.checked_sub(offset)?)?;
        Some((parent, c))
    }

    /// Reconstructs the word spelled by the path from the root to `index`.
    ///
    /// # Errors
    ///
    /// [`LexdatError::StructuralMismatch`] is returned when the parent chain
    /// does not lead back to the root.
    pub fn word_at(&self, index: usize) -> Result<String> {
        let mut chars = vec![];
        let mut cur = index;
        while cur != ROOT_INDEX {
            if chars.len() >= self.slots.len() {
                return Err(LexdatError::structural_mismatch(index));
            }
            let (parent, c) = self
                .label(cur)
                .ok_or_else(|| LexdatError::structural_mismatch(cur))?;
            chars.push(c);
            cur = parent;
        }
        Ok(chars.iter().rev().collect())
    }

    /// Checks the parent-child relation of every occupied slot.
    ///
    /// # Errors
    ///
    /// [`LexdatError::StructuralMismatch`] is returned for the first slot
    /// violating the relation.
    pub fn verify(&self) -> Result<()> {
        if !self.is_vacant(0) {
            return Err(LexdatError::structural_mismatch(0));
        }
        match self.state(ROOT_INDEX) {
            NodeState::Branch { parent: 0, .. } if self.slots[ROOT_INDEX].is_well_formed() => {}
            _ => return Err(LexdatError::structural_mismatch(ROOT_INDEX)),
        }
        for (i, slot) in self.slots.iter().enumerate().skip(ROOT_INDEX + 1) {
            if slot.is_vacant() {
                continue;
            }
            if !slot.is_well_formed() || self.label(i).is_none() {
                return Err(LexdatError::structural_mismatch(i));
            }
        }
        Ok(())
    }
}
