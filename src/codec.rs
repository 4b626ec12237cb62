//! Tamper-checked token codec.
//!
//! The store never hands raw row identifiers or raw session blobs to the
//! outside world. Both pass through a [`Codec`]: encode turns a named byte
//! payload into an opaque token, decode authenticates the token and
//! recovers the payload. Tokens are bound to the name they were encoded
//! under, so a token minted for one cookie cannot be replayed as another.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Symmetric encode/decode of named payloads into opaque tokens.
///
/// Implementations must fail `decode` on any tampering with the token and
/// on a name mismatch.
pub trait Codec: Send + Sync {
    /// Encodes `plaintext` into a token bound to `name`.
    fn encode(&self, name: &str, plaintext: &[u8]) -> Result<String>;

    /// Authenticates `token` against `name` and returns the payload.
    fn decode(&self, name: &str, token: &str) -> Result<Vec<u8>>;
}

/// HMAC-SHA256 codec.
///
/// Token layout is `base64url(payload) "." base64url(mac)` where the MAC
/// covers `name || "|" || payload`. The payload itself is not encrypted;
/// callers who put secrets into session values should front this store
/// with TLS like any cookie-bearing deployment.
pub struct HmacCodec {
    key: Vec<u8>,
}

impl HmacCodec {
    /// Creates a codec from key material. Keys should be at least 32
    /// random bytes; see [`HmacCodec::generate_key`].
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    /// Generates a fresh 32-byte key from the OS RNG.
    pub fn generate_key() -> [u8; 32] {
        let mut key = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut key);
        key
    }

    fn mac(&self, name: &str, payload: &[u8]) -> Result<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| Error::Encode(format!("invalid codec key: {e}")))?;
        mac.update(name.as_bytes());
        mac.update(b"|");
        mac.update(payload);
        Ok(mac)
    }
}

impl Codec for HmacCodec {
    fn encode(&self, name: &str, plaintext: &[u8]) -> Result<String> {
        let mac = self.mac(name, plaintext)?.finalize().into_bytes();
        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(plaintext),
            URL_SAFE_NO_PAD.encode(mac)
        ))
    }

    fn decode(&self, name: &str, token: &str) -> Result<Vec<u8>> {
        let (payload_b64, mac_b64) = token
            .split_once('.')
            .ok_or_else(|| Error::Decode("malformed token".into()))?;
        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|e| Error::Decode(format!("bad token payload: {e}")))?;
        let tag = URL_SAFE_NO_PAD
            .decode(mac_b64)
            .map_err(|e| Error::Decode(format!("bad token mac: {e}")))?;

        self.mac(name, &payload)?
            .verify_slice(&tag)
            .map_err(|_| Error::Decode("token authentication failed".into()))?;
        Ok(payload)
    }
}
