use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use bincode::{Decode, Encode};

use crate::common::{self, LEXDAT_MAGIC};
use crate::dictionary::Dictionary;
use crate::errors::{LexdatError, Result};
use crate::trie::ArrayTrie;

/// Compiled state persisted next to the dictionary source.
#[derive(Clone, Debug, Eq, PartialEq, Decode, Encode)]
pub struct StoreImage {
    /// Digest of the dictionary source the trie was compiled from.
    pub digest: String,
    pub dict: Dictionary,
    pub trie: ArrayTrie,
}

impl StoreImage {
    /// Exports the image.
    ///
    /// # Errors
    ///
    /// When bincode generates an error, it will be returned as is.
    pub fn write<W>(&self, mut wtr: W) -> Result<usize>
    where
        W: Write,
    {
        wtr.write_all(LEXDAT_MAGIC)?;
        let num_bytes = bincode::encode_into_std_write(self, &mut wtr, common::bincode_config())?;
        Ok(LEXDAT_MAGIC.len() + num_bytes)
    }

    /// Imports an image and checks its arrays.
    ///
    /// # Errors
    ///
    /// [`LexdatError`] is returned when the magic number mismatches, bincode
    /// fails, or the arrays are inconsistent.
    pub fn read<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut magic = [0; LEXDAT_MAGIC.len()];
        rdr.read_exact(&mut magic)?;
        if magic != LEXDAT_MAGIC {
            return Err(LexdatError::invalid_argument(
                "rdr",
                "The magic number of the input store mismatches.",
            ));
        }
        let image: Self = bincode::decode_from_std_read(&mut rdr, common::bincode_config())?;
        image.trie.verify()?;
        Ok(image)
    }

    pub fn save<P>(&self, path: P) -> Result<usize>
    where
        P: AsRef<Path>,
    {
        let mut wtr = BufWriter::new(File::create(path)?);
        let num_bytes = self.write(&mut wtr)?;
        wtr.flush()?;
        Ok(num_bytes)
    }

    pub fn load<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::read(BufReader::new(File::open(path)?))
    }
}
