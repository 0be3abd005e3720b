//! Signed URLs for backends without native presigning.
//!
//! Signature = base64url(HMAC-SHA256(secret, "{key}\n{expires}")), where
//! `expires` is a unix timestamp in seconds.

use crate::traits::{StorageError, StorageResult};
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies time-limited access to stored keys.
#[derive(Clone)]
pub struct UrlSigner {
    mac: HmacSha256,
}

impl UrlSigner {
    pub fn new(secret: &[u8]) -> StorageResult<Self> {
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| StorageError::Config(format!("Invalid URL signing key: {}", e)))?;
        Ok(Self { mac })
    }

    /// Signer with a random per-process secret.
    pub fn random() -> StorageResult<Self> {
        let secret: [u8; 32] = rand::random();
        Self::new(&secret)
    }

    /// Expiry timestamp for a URL issued now and valid for `ttl`.
    pub fn expiry_from_now(ttl: Duration) -> u64 {
        unix_now().saturating_add(ttl.as_secs())
    }

    pub fn sign(&self, key: &str, expires: u64) -> String {
        let mut mac = self.mac.clone();
        mac.update(signing_payload(key, expires).as_bytes());
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }

    /// Check `signature` for `key` and reject it once `expires` has passed.
    pub fn verify(&self, key: &str, expires: u64, signature: &str) -> StorageResult<()> {
        let invalid = || StorageError::InvalidSignature(key.to_string());

        let tag = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| invalid())?;

        let mut mac = self.mac.clone();
        mac.update(signing_payload(key, expires).as_bytes());
        mac.verify_slice(&tag).map_err(|_| invalid())?;

        if unix_now() > expires {
            return Err(invalid());
        }
        Ok(())
    }
}

fn signing_payload(key: &str, expires: u64) -> String {
    format!("{}\n{}", key, expires)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
