//! BLAKE3 hashing utilities for tree comparison

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;

use crate::error::{Result, fs as fs_error};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

fn update_from_file(hasher: &mut Hasher, path: &Path) -> Result<()> {
    let file = File::open(path).map_err(|e| fs_error::read_failed(path, e))?;

    let mut reader = BufReader::new(file);
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| fs_error::read_failed(path, e))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(())
}

/// Calculate BLAKE3 hash of a file
pub fn hash_file(path: &Path) -> Result<String> {
    let mut hasher = Hasher::new();
    update_from_file(&mut hasher, path)?;
    Ok(format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex()))
}

/// Whether two files have identical contents
///
/// Sizes are compared first so differing files are rarely read in full.
pub fn same_contents(a: &Path, b: &Path) -> Result<bool> {
    let len_a = a.metadata().map_err(|e| fs_error::read_failed(a, e))?.len();
    let len_b = b.metadata().map_err(|e| fs_error::read_failed(b, e))?.len();
    if len_a != len_b {
        return Ok(false);
    }
    Ok(hash_file(a)? == hash_file(b)?)
}
