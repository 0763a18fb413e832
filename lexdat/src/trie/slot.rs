use bincode::{Decode, Encode};

use crate::common::MAX_LEVEL;
use crate::num::Level;

/// One cell of the double array: the pair `(base, check)`.
///
/// | node | `base` | `check` |
/// |---|---|---|
/// | vacant | `0` | `0` |
/// | root | offset | `0` |
/// | internal | offset (`0` until children are placed) | `parent` |
/// | leaf word | `-level` | `-parent` |
/// | word with children | `offset * 10 + level` | `-parent` |
#[derive(Clone, Copy, Default, Debug, Eq, PartialEq, Decode, Encode)]
pub struct Slot {
    base: i64,
    check: i64,
}

impl Slot {
    pub const VACANT: Self = Self { base: 0, check: 0 };

    #[inline(always)]
    pub const fn is_vacant(&self) -> bool {
        self.base == 0 && self.check == 0
    }

    /// Checks that the sign pattern is one of the encodings and that a
    /// packed level is in range.
    pub const fn is_well_formed(&self) -> bool {
        if self.check < 0 {
            self.base > 0 || self.base >= -(MAX_LEVEL as i64)
        } else {
            self.base >= 0
        }
    }

    #[cfg(test)]
    pub(crate) const fn from_raw(base: i64, check: i64) -> Self {
        Self { base, check }
    }

    #[cfg(test)]
    pub(crate) const fn raw(&self) -> (i64, i64) {
        (self.base, self.check)
    }

    /// Decodes the node stored in this slot.
    #[inline(always)]
    pub fn state(&self) -> NodeState {
        let parent = self.check.unsigned_abs() as usize;
        if self.check < 0 {
            if self.base > 0 {
                NodeState::TerminalBranch {
                    parent,
                    offset: (self.base / 10) as usize,
                    level: Level::new((self.base % 10) as u8).unwrap_or_default(),
                }
            } else {
                NodeState::Leaf {
                    parent,
                    level: u8::try_from(-self.base)
                        .ok()
                        .and_then(Level::new)
                        .unwrap_or_default(),
                }
            }
        } else if self.check > 0 || self.base > 0 {
            NodeState::Branch {
                parent,
                offset: self.base.max(0) as usize,
            }
        } else {
            NodeState::Vacant
        }
    }
}

/// Decoded view of a [`Slot`].
///
/// A `Branch` with `parent == 0` is the root.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NodeState {
    /// Unoccupied slot.
    Vacant,

    /// Node that does not end a word.
    Branch { parent: usize, offset: usize },

    /// Node that ends a word and has no children.
    Leaf { parent: usize, level: Level },

    /// Node that ends a word and has children.
    TerminalBranch {
        parent: usize,
        offset: usize,
        level: Level,
    },
}

impl NodeState {
    /// Encodes the node into a slot.
    pub fn encode(self) -> Slot {
        match self {
            Self::Vacant => Slot::VACANT,
            Self::Branch { parent, offset } => Slot {
                base: offset as i64,
                check: parent as i64,
            },
            Self::Leaf { parent, level } => Slot {
                base: -level.as_i64(),
                check: -(parent as i64),
            },
            Self::TerminalBranch {
                parent,
                offset,
                level,
            } => {
                debug_assert_ne!(offset, 0);
                Slot {
                    base: offset as i64 * 10 + level.as_i64(),
                    check: -(parent as i64),
                }
            }
        }
    }

    /// Gets the parent slot, or `None` for a vacant slot.
    #[inline(always)]
    pub const fn parent(self) -> Option<usize> {
        match self {
            Self::Vacant => None,
            Self::Branch { parent, .. }
            | Self::Leaf { parent, .. }
            | Self::TerminalBranch { parent, .. } => Some(parent),
        }
    }

    /// Gets the offset of the children, or `None` if no children are placed.
    #[inline(always)]
    pub const fn offset(self) -> Option<usize> {
        match self {
            Self::Branch { offset, .. } | Self::TerminalBranch { offset, .. } if offset != 0 => {
                Some(offset)
            }
            _ => None,
        }
    }

    /// Gets the level if the node ends a word.
    #[inline(always)]
    pub const fn level(self) -> Option<Level> {
        match self {
            Self::Leaf { level, .. } | Self::TerminalBranch { level, .. } => Some(level),
            _ => None,
        }
    }

    #[inline(always)]
    pub const fn is_terminal(self) -> bool {
        self.level().is_some()
    }

    /// Returns the node with its children placed at `offset`.
    pub const fn with_offset(self, offset: usize) -> Self {
        match self {
            Self::Vacant => Self::Branch { parent: 0, offset },
            Self::Branch { parent, .. } => Self::Branch { parent, offset },
            Self::Leaf { parent, level } | Self::TerminalBranch { parent, level, .. } => {
                Self::TerminalBranch {
                    parent,
                    offset,
                    level,
                }
            }
        }
    }

    /// Returns the node marked as the end of a word with `level`.
    pub const fn with_level(self, level: Level) -> Self {
        match self {
            Self::Vacant => Self::Vacant,
            Self::Branch { parent, offset } | Self::TerminalBranch { parent, offset, .. } => {
                if offset == 0 {
                    Self::Leaf { parent, level }
                } else {
                    Self::TerminalBranch {
                        parent,
                        offset,
                        level,
                    }
                }
            }
            Self::Leaf { parent, .. } => Self::Leaf { parent, level },
        }
    }

    /// Returns the node with its end-of-word marker cleared.
    ///
    /// A leaf loses its only purpose and becomes vacant.
    pub const fn without_level(self) -> Self {
        match self {
            Self::TerminalBranch { parent, offset, .. } => Self::Branch { parent, offset },
            Self::Leaf { .. } => Self::Vacant,
            other => other,
        }
    }
}
