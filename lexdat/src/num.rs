use bincode::{
    de::Decoder,
    enc::Encoder,
    error::{AllowedEnumVariants, DecodeError, EncodeError},
    Decode, Encode,
};

use crate::common::MAX_LEVEL;
use crate::errors::{LexdatError, Result};

/// Weight of a word, an integer from 0 to 9.
///
/// This type guarantees that the value fits in the single decimal digit the
/// trie encoding reserves for it.
#[derive(Clone, Copy, Default, Eq, PartialEq, Debug, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Level(u8);

impl Level {
    /// The largest level.
    pub const MAX: Self = Self(MAX_LEVEL);

    /// Creates a level, or returns `None` if `x` exceeds [`Level::MAX`].
    #[inline(always)]
    pub const fn new(x: u8) -> Option<Self> {
        if x <= Self::MAX.get() {
            Some(Self(x))
        } else {
            None
        }
    }

    /// Gets the raw value.
    #[inline(always)]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Converts an ASCII digit such as `b'3'`.
    #[inline(always)]
    pub const fn from_digit(b: u8) -> Option<Self> {
        if b.is_ascii_digit() {
            Some(Self(b - b'0'))
        } else {
            None
        }
    }

    pub(crate) fn try_from_u8(x: u8) -> Result<Self> {
        Self::new(x).ok_or_else(|| {
            LexdatError::invalid_argument(
                "level",
                format!("level must be in 0..={MAX_LEVEL}, got {x}"),
            )
        })
    }

    #[inline(always)]
    pub(crate) const fn as_i64(self) -> i64 {
        self.0 as i64
    }
}

const LEVEL_VALID_RANGE: AllowedEnumVariants = AllowedEnumVariants::Range {
    min: 0,
    max: MAX_LEVEL as u32,
};

impl<Context> Decode<Context> for Level {
    fn decode<D: Decoder<Context = Context>>(decoder: &mut D) -> Result<Self, DecodeError> {
        let x: u8 = Decode::decode(decoder)?;
        Self::new(x).ok_or(DecodeError::UnexpectedVariant {
            type_name: "Level",
            allowed: &LEVEL_VALID_RANGE,
            found: u32::from(x),
        })
    }
}

bincode::impl_borrow_decode!(Level);

impl Encode for Level {
    fn encode<E: Encoder>(&self, encoder: &mut E) -> Result<(), EncodeError> {
        Encode::encode(&self.0, encoder)?;
        Ok(())
    }
}
