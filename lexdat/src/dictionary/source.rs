use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::common::DICT_TMP_SUFFIX;
use crate::dictionary::Dictionary;
use crate::errors::Result;
use crate::num::Level;

/// Computes the SHA-256 digest of a file as a lowercase hex string.
///
/// # Errors
///
/// [`LexdatError::StdIo`](crate::errors::LexdatError::StdIo) is returned when
/// the file cannot be read.
pub fn file_digest<P>(path: P) -> Result<String>
where
    P: AsRef<Path>,
{
    let mut hasher = Sha256::new();
    let mut file = File::open(path)?;
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Appends a `<level> <word>` line to a dictionary source.
///
/// The file is created if it does not exist.
///
/// # Errors
///
/// [`LexdatError::StdIo`](crate::errors::LexdatError::StdIo) is returned when
/// the file cannot be written.
pub fn append_entry<P>(path: P, word: &str, level: Level) -> Result<()>
where
    P: AsRef<Path>,
{
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    write!(file, "\n{} {}", level.get(), word)?;
    Ok(())
}

/// Deletes every line registering `word` from a dictionary source.
///
/// The remaining lines are written to a sibling file suffixed with `_tmp`,
/// which then replaces the original.
///
/// # Errors
///
/// [`LexdatError::StdIo`](crate::errors::LexdatError::StdIo) is returned when
/// a file operation fails. The original file is left intact if the
/// temporary file cannot be written.
pub fn remove_entry<P>(path: P, word: &str) -> Result<()>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let tmp_path = tmp_path_of(path);
    let num_removed = copy_without(path, &tmp_path, word)?;
    fs::remove_file(path)?;
    fs::rename(&tmp_path, path)?;
    log::debug!("removed {num_removed} line(s) of {word:?} from {}", path.display());
    Ok(())
}

fn tmp_path_of(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(DICT_TMP_SUFFIX);
    PathBuf::from(name)
}

fn copy_without(src: &Path, dst: &Path, word: &str) -> Result<usize> {
    let mut reader = BufReader::new(File::open(src)?);
    let mut writer = BufWriter::new(File::create(dst)?);
    let mut line = vec![];
    let mut lineno = 0;
    let mut num_removed = 0;
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        lineno += 1;
        let matched = Dictionary::parse_line(&line, lineno)
            .ok()
            .flatten()
            .is_some_and(|(w, _)| w == word);
        if matched {
            num_removed += 1;
            continue;
        }
        writer.write_all(&line)?;
    }
    writer.flush()?;
    Ok(num_removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(x: u8) -> Level {
        Level::new(x).unwrap()
    }

    #[test]
    fn test_append_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.txt");
        fs::write(&path, "1 a").unwrap();
        append_entry(&path, "ab", level(2)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1 a\n2 ab");

        let dict = Dictionary::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(dict.get("ab"), Some(level(2)));
    }

    #[test]
    fn test_append_entry_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.txt");
        append_entry(&path, "x", level(0)).unwrap();
        let dict = Dictionary::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(dict.get("x"), Some(level(0)));
    }

    #[test]
    fn test_remove_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.txt");
        fs::write(&path, "1 a\n2 ab\n3 abc\n4 ab").unwrap();
        remove_entry(&path, "ab").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1 a\n3 abc\n");
        assert!(!tmp_path_of(&path).exists());
    }

    #[test]
    fn test_remove_entry_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("none.txt");
        assert!(remove_entry(&path, "a").is_err());
    }

    #[test]
    fn test_file_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.txt");
        fs::write(&path, "abc").unwrap();
        assert_eq!(
            file_digest(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        fs::write(&path, "abd").unwrap();
        assert_ne!(
            file_digest(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
