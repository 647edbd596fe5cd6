#![deny(missing_docs)]

//! # Token Minting
//!
//! Strapi stores API tokens as `hex(HMAC-SHA512(API_TOKEN_SALT, access_key))`.
//! The plain access key is only ever known to whoever minted it, so using a
//! token from generated code means minting a fresh one and overwriting the hash.

use crate::error::{AppError, AppResult};
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Number of random bytes in a minted access key.
pub const ACCESS_KEY_BYTES: usize = 128;

/// A freshly minted access key together with its storable hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintedToken {
    /// The bearer token handed to API clients.
    pub access_key: String,
    /// The value written to `strapi_api_tokens.access_key`.
    pub hash: String,
}

impl MintedToken {
    /// Mints a random access key and hashes it with `salt`.
    pub fn mint(salt: &str) -> AppResult<Self> {
        let access_key = generate_access_key();
        let hash = hash_access_key(salt, &access_key)?;
        Ok(Self { access_key, hash })
    }
}

/// Returns `ACCESS_KEY_BYTES` bytes from the OS random source, hex encoded.
pub fn generate_access_key() -> String {
    let mut bytes = [0u8; ACCESS_KEY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn keyed_mac(salt: &str) -> AppResult<HmacSha512> {
    HmacSha512::new_from_slice(salt.as_bytes())
        .map_err(|e| AppError::General(format!("Invalid HMAC key: {}", e)))
}

/// Hashes an access key the way Strapi does before storing it.
pub fn hash_access_key(salt: &str, access_key: &str) -> AppResult<String> {
    let mut mac = keyed_mac(salt)?;
    mac.update(access_key.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Checks `access_key` against a stored hash in constant time.
///
/// A stored value that is not valid hex never matches.
pub fn verify_access_key(salt: &str, access_key: &str, stored_hash: &str) -> AppResult<bool> {
    let Ok(expected) = hex::decode(stored_hash) else {
        return Ok(false);
    };
    let mut mac = keyed_mac(salt)?;
    mac.update(access_key.as_bytes());
    Ok(mac.verify_slice(&expected).is_ok())
}
