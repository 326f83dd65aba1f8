//! Streaming content fingerprints.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha512};

use crate::error::Result;

/// Chunk size for streaming reads (64 KiB).
const HASH_BLOCK_SIZE: usize = 1 << 16;

/// Compute the SHA-512 digest of a file's contents as a lowercase hex string.
///
/// The file is read in fixed-size chunks so working memory stays bounded
/// regardless of file size, and no prior knowledge of the size is needed. A
/// single pass reads to the current end of file once; a zero-length file
/// yields the digest of empty content. Open or read failures surface as
/// [`crate::EngineError::Io`].
pub fn fingerprint(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha512::new();
    let mut buf = vec![0u8; HASH_BLOCK_SIZE];

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}
