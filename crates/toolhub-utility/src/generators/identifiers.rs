// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Checksums and identifiers: SHA-256 digests and random v4 UUIDs.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, instrument};
use uuid::Uuid;

use toolhub_core::error::{Result, ToolhubError};

/// Most UUIDs produced by a single call.
pub const MAX_UUIDS: usize = 10_000;

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// SHA-256 of a file's contents, streamed so large files are not loaded
/// into memory.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn hash_file(path: impl AsRef<Path>) -> Result<String> {
    let mut reader = BufReader::new(File::open(path.as_ref())?);
    let mut hasher = Sha256::new();
    let bytes = io::copy(&mut reader, &mut hasher)?;
    debug!(bytes, "file hashed");
    Ok(hex::encode(hasher.finalize()))
}

/// Verify that `data` matches the expected SHA-256 hex digest.
///
/// The comparison ignores case and surrounding whitespace, so digests pasted
/// from other tools verify as expected.
pub fn verify_hash(data: &[u8], expected_hex: &str) -> Result<()> {
    check_digest(hash_bytes(data), expected_hex)
}

/// Streamed counterpart of [`verify_hash`] for files.
pub fn verify_file(path: impl AsRef<Path>, expected_hex: &str) -> Result<()> {
    check_digest(hash_file(path)?, expected_hex)
}

fn check_digest(actual: String, expected_hex: &str) -> Result<()> {
    let expected = expected_hex.trim();
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(ToolhubError::HashMismatch {
            expected: expected.to_owned(),
            actual,
        })
    }
}

/// `count` random (v4) UUIDs.
pub fn generate_uuids(count: usize) -> Result<Vec<Uuid>> {
    if count == 0 || count > MAX_UUIDS {
        return Err(ToolhubError::Generator(format!(
            "UUID count must be 1-{MAX_UUIDS}, got {count}"
        )));
    }
    Ok((0..count).map(|_| Uuid::new_v4()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io::Write;

    /// SHA-256 of the empty byte slice (well-known constant).
    const EMPTY_SHA256: &str =
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn hash_empty_input() {
        assert_eq!(hash_bytes(b""), EMPTY_SHA256);
    }

    #[test]
    fn hash_known_value() {
        // SHA-256("hello"), as printed by coreutils sha256sum.
        let expected = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
        assert_eq!(hash_bytes(b"hello"), expected);
    }

    #[test]
    fn file_hash_matches_byte_hash() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello").unwrap();
        assert_eq!(hash_file(file.path()).unwrap(), hash_bytes(b"hello"));
        assert!(matches!(
            hash_file("/definitely/not/here"),
            Err(ToolhubError::Io(_))
        ));
    }

    #[test]
    fn verify_matching_hash_ignores_case() {
        let data = b"toolhub";
        let hex = hash_bytes(data).to_uppercase();
        assert!(verify_hash(data, &format!(" {hex}\n")).is_ok());
    }

    #[test]
    fn verify_mismatched_hash() {
        match verify_hash(b"a", "0000") {
            Err(ToolhubError::HashMismatch { expected, actual }) => {
                assert_eq!(expected, "0000");
                assert_eq!(actual, hash_bytes(b"a"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn verify_file_streams() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        assert!(verify_file(file.path(), &hash_bytes(b"abc")).is_ok());
        assert!(matches!(
            verify_file(file.path(), &hash_bytes(b"abd")),
            Err(ToolhubError::HashMismatch { .. })
        ));
    }

    #[test]
    fn uuids_are_unique_v4() {
        let ids = generate_uuids(100).unwrap();
        assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 100);
        assert!(ids.iter().all(|id| id.get_version_num() == 4));
        assert!(generate_uuids(0).is_err());
    }
}
