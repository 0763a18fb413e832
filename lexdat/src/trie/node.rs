use crate::utils::code_of;

/// Range of sorted keys sharing a prefix, used only while building.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ConstructionNode {
    /// Code of the character leading to this node.
    pub code: usize,
    /// Length of the shared prefix including this node's character.
    pub depth: usize,
    /// Inclusive start of the key range.
    pub left: usize,
    /// Exclusive end of the key range.
    pub right: usize,
    /// Whether `keys[left]` ends exactly at this node.
    pub is_end: bool,
}

impl ConstructionNode {
    pub const fn root(num_keys: usize) -> Self {
        Self {
            code: 0,
            depth: 0,
            left: 0,
            right: num_keys,
            is_end: false,
        }
    }

    /// Groups the keys in `[left, right)` by their character at `depth`.
    ///
    /// `keys` must be sorted. Keys not longer than `depth` are skipped.
    pub fn fetch(&self, keys: &[Vec<char>]) -> Vec<Self> {
        let mut children: Vec<Self> = vec![];
        let mut prev = None;
        for (i, key) in keys.iter().enumerate().take(self.right).skip(self.left) {
            let Some(&c) = key.get(self.depth) else {
                continue;
            };
            if prev == Some(c) {
                continue;
            }
            prev = Some(c);
            if let Some(last) = children.last_mut() {
                last.right = i;
            }
            children.push(Self {
                code: code_of(c),
                depth: self.depth + 1,
                left: i,
                right: self.right,
                is_end: key.len() == self.depth + 1,
            });
        }
        children
    }
}
