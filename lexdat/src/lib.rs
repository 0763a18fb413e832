//! # lexdat
//!
//! Dictionary matching on a double-array trie. Every word carries a level, an
//! integer from 0 to 9, and can be looked up exactly, found inside a text, or
//! enumerated by prefix, suffix, or shared characters.
//!
//! ```
//! use lexdat::{ArrayTrie, Level};
//!
//! let level = |x| Level::new(x).unwrap();
//! let trie = ArrayTrie::from_records(&[
//!     ("東京", level(1)),
//!     ("東京都", level(2)),
//!     ("京都", level(3)),
//! ])?;
//!
//! assert_eq!(trie.exact_match("東京都", false)?.level, 2);
//!
//! let found: Vec<_> = trie
//!     .search("東京都に行く")
//!     .into_iter()
//!     .map(|m| {
//!         let range = m.range_char();
//!         (m.word, range)
//!     })
//!     .collect();
//! assert_eq!(
//!     found,
//!     vec![
//!         ("東京".to_string(), 0..2),
//!         ("東京都".to_string(), 0..3),
//!         ("京都".to_string(), 1..3),
//!     ]
//! );
//! # Ok::<(), lexdat::errors::LexdatError>(())
//! ```
//!
//! [`Engine`] binds a trie to a dictionary source file and a store file, and
//! keeps both up to date on every insertion and removal.
#![deny(missing_docs)]

#[cfg(target_pointer_width = "16")]
compile_error!("`target_pointer_width` must be larger than or equal to 32");

pub mod common;
pub mod dictionary;
pub mod engine;
pub mod errors;
mod num;
pub mod trie;
mod utils;


pub use dictionary::Dictionary;
pub use engine::{Engine, SharedEngine};
pub use num::Level;
pub use trie::ArrayTrie;
