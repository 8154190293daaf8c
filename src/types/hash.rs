//! 32-byte Keccak-256 digests used as program fingerprints.

use sha3::{Digest, Keccak256};
use std::fmt;

/// Keccak-256 digest length in bytes.
pub const HASH_LEN: usize = 32;

/// Fixed-size 32-byte Keccak-256 digest.
///
/// Acts as the content address of a code blob: identical bytes always
/// produce the same fingerprint. This type is `Copy`: fingerprints are
/// passed around constantly during cache lookups and should live on the
/// stack rather than behind a reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash, Ord, PartialOrd)]
pub struct Hash(pub [u8; HASH_LEN]);

impl Hash {
    /// Creates a zero-valued hash (all bytes are 0x00).
    pub const fn zero() -> Hash {
        Hash([0u8; HASH_LEN])
    }

    /// Returns the hash as a byte slice.
    pub const fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Returns the hash as a byte Vec.
    pub fn to_vec(self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Creates a hash from a byte slice.
    ///
    /// Returns `None` if the slice length is not exactly [`HASH_LEN`] bytes.
    pub fn from_slice(slice: &[u8]) -> Option<Hash> {
        if slice.len() != HASH_LEN {
            return None;
        }
        let mut bytes = [0u8; HASH_LEN];
        bytes.copy_from_slice(slice);
        Some(Hash(bytes))
    }

    /// Computes the Keccak-256 digest of `data` in one shot.
    pub fn keccak(data: &[u8]) -> Hash {
        let mut h = Hash::builder();
        h.update(data);
        h.finalize()
    }

    /// Creates a new Keccak-256 hash builder for incremental hashing.
    pub fn builder() -> HashBuilder {
        HashBuilder::new()
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Incremental Keccak-256 hash builder.
///
/// Allows feeding data in chunks and finalizing to produce a [`Hash`]
/// without intermediate byte buffers.
pub struct HashBuilder {
    hasher: Keccak256,
}

impl HashBuilder {
    /// Creates a new hash builder with empty state.
    pub fn new() -> Self {
        Self {
            hasher: Keccak256::new(),
        }
    }

    /// Feeds data into the hash computation.
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    pub fn chain(mut self, data: &[u8]) -> Self {
        self.hasher.update(data);
        self
    }

    /// Consumes the builder and returns the final hash.
    pub fn finalize(self) -> Hash {
        Hash(self.hasher.finalize().into())
    }
}

impl Default for HashBuilder {
    fn default() -> Self {
        Self::new()
    }
}
