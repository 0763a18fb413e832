//! Common settings in lexdat.

use bincode::config::{self, Fixint, LittleEndian};

/// Magic bytes at the head of a store image.
pub const LEXDAT_MAGIC: &[u8] = b"LexdatStore 0.1\n";

/// Slot of the root node. Slot 0 is never used.
pub const ROOT_INDEX: usize = 1;

/// The largest level a word can carry.
///
/// A node that ends a word and also has children packs its level into the
/// lowest decimal digit of `base`, so levels are limited to one digit.
pub const MAX_LEVEL: u8 = 9;

/// Growth factor applied to the required capacity when the arrays expand.
pub const GROWTH_FACTOR: f64 = 1.25;

/// Suffix appended to the dictionary path while it is being rewritten.
pub const DICT_TMP_SUFFIX: &str = "_tmp";

pub(crate) fn bincode_config() -> config::Configuration<LittleEndian, Fixint> {
    config::standard()
        .with_little_endian()
        .with_fixed_int_encoding()
}
