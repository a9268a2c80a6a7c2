//! # Secure Secret Type
//!
//! Swap preimage wrapper that zeroizes on drop and never prints its bytes.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::errors::Secret;

/// A swap secret held by the maker until reveal.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecureSecret {
    inner: Secret,
}

impl SecureSecret {
    /// Wrap existing bytes.
    pub fn new(bytes: Secret) -> Self {
        Self { inner: bytes }
    }

    /// Fresh secret from the thread RNG.
    pub fn random() -> Self {
        let mut inner = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut inner);
        Self { inner }
    }

    /// Copy from a 32-byte slice.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != 32 {
            return None;
        }
        let mut inner = [0u8; 32];
        inner.copy_from_slice(slice);
        Some(Self { inner })
    }

    /// Borrow the preimage. Revealing it to an escrow makes it public.
    pub fn as_bytes(&self) -> &Secret {
        &self.inner
    }

    /// SHA-256 hashlock committing to this secret.
    pub fn hashlock(&self) -> [u8; 32] {
        crate::algorithms::create_hash_lock(&self.inner)
    }
}

impl std::fmt::Debug for SecureSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecureSecret(***)")
    }
}

impl Serialize for SecureSecret {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(self.inner))
    }
}

impl<'de> Deserialize<'de> for SecureSecret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        Self::from_slice(&bytes).ok_or_else(|| serde::de::Error::custom("invalid secret length"))
    }
}
