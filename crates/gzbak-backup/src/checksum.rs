//! Archive checksums.

use camino::Utf8Path;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;

/// Calculates the SHA256 checksum of a file as lowercase hex.
pub fn calculate_checksum(path: &Utf8Path) -> io::Result<String> {
    let mut file = File::open(path)?;

    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;

    Ok(format!("{:x}", hasher.finalize()))
}
