//! Definition of errors.

use std::error::Error;
use std::fmt;

/// A specialized Result type for lexdat.
pub type Result<T, E = LexdatError> = std::result::Result<T, E>;

/// The error type for lexdat.
#[derive(Debug)]
pub enum LexdatError {
    /// The error variant for [`InvalidCharacterError`].
    InvalidCharacter(InvalidCharacterError),

    /// The error variant for [`NotFoundError`].
    NotFound(NotFoundError),

    /// The error variant for [`StructuralMismatchError`].
    StructuralMismatch(StructuralMismatchError),

    /// The error variant used when a trie is built from no words.
    EmptyDictionary,

    /// The error variant for [`InvalidArgumentError`].
    InvalidArgument(InvalidArgumentError),

    /// The error variant for [`InvalidFormatError`].
    InvalidFormat(InvalidFormatError),

    /// The error variant for [`DecodeError`](bincode::error::DecodeError).
    BincodeDecode(bincode::error::DecodeError),

    /// The error variant for [`EncodeError`](bincode::error::EncodeError).
    BincodeEncode(bincode::error::EncodeError),

    /// The error variant for [`std::io::Error`].
    StdIo(std::io::Error),
}

impl LexdatError {
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn invalid_character<S>(key: S, position: usize) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidCharacter(InvalidCharacterError {
            key: key.into(),
            position,
        })
    }

    pub(crate) fn not_found<S>(key: S) -> Self
    where
        S: Into<String>,
    {
        Self::NotFound(NotFoundError { key: key.into() })
    }

    pub(crate) const fn structural_mismatch(index: usize) -> Self {
        Self::StructuralMismatch(StructuralMismatchError { index })
    }

    /// Checks if the error indicates a missing key.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl fmt::Display for LexdatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidCharacter(e) => e.fmt(f),
            Self::NotFound(e) => e.fmt(f),
            Self::StructuralMismatch(e) => e.fmt(f),
            Self::EmptyDictionary => write!(f, "EmptyDictionary: no words to compile"),
            Self::InvalidArgument(e) => e.fmt(f),
            Self::InvalidFormat(e) => e.fmt(f),
            Self::BincodeDecode(e) => e.fmt(f),
            Self::BincodeEncode(e) => e.fmt(f),
            Self::StdIo(e) => e.fmt(f),
        }
    }
}

impl Error for LexdatError {}

/// Error used when a key contains a character that cannot be stored.
#[derive(Debug)]
pub struct InvalidCharacterError {
    /// The offending key.
    pub(crate) key: String,

    /// Character position of the invalid character.
    pub(crate) position: usize,
}

impl fmt::Display for InvalidCharacterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "InvalidCharacterError: {:?}: zero code point at {}",
            self.key, self.position
        )
    }
}

impl Error for InvalidCharacterError {}

/// Error used when a key is not registered as a word.
#[derive(Debug)]
pub struct NotFoundError {
    /// The missing key.
    pub(crate) key: String,
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NotFoundError: {:?}", self.key)
    }
}

impl Error for NotFoundError {}

/// Error used when the arrays violate the parent-child relation.
#[derive(Debug)]
pub struct StructuralMismatchError {
    /// Slot at which the inconsistency was detected.
    pub(crate) index: usize,
}

impl fmt::Display for StructuralMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "StructuralMismatchError: slot {} is not reachable from its parent",
            self.index
        )
    }
}

impl Error for StructuralMismatchError {}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// Error used when the input format is invalid.
#[derive(Debug)]
pub struct InvalidFormatError {
    /// Name of the format.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}

impl From<bincode::error::DecodeError> for LexdatError {
    fn from(error: bincode::error::DecodeError) -> Self {
        Self::BincodeDecode(error)
    }
}

impl From<bincode::error::EncodeError> for LexdatError {
    fn from(error: bincode::error::EncodeError) -> Self {
        Self::BincodeEncode(error)
    }
}

impl From<std::io::Error> for LexdatError {
    fn from(error: std::io::Error) -> Self {
        Self::StdIo(error)
    }
}
