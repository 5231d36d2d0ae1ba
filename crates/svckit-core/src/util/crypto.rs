//! Symmetric encryption, hashing and encoding wrappers.
//!
//! Keys are 128-bit and exchanged base64-encoded. Encryption uses
//! AES-128-GCM with a random 96-bit nonce prepended to the ciphertext, so
//! every call produces a distinct output for the same input. Digests are
//! lowercase hex. Salted password hashing is `sha256(password || salt)`;
//! the salt is not embedded in the digest, callers persist both.

use crate::{SvcError, SvcResult};
use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes128Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use md5::Md5;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// AES key length in bytes (128 bits).
pub const AES_KEY_LEN: usize = 16;
/// GCM nonce length in bytes (96 bits).
const NONCE_LEN: usize = 12;
/// Salt length used when a non-positive length is requested.
const DEFAULT_SALT_LEN: usize = 16;

/// Generates a random 128-bit AES key, base64-encoded.
#[must_use]
pub fn generate_aes_key() -> String {
    let mut key = [0u8; AES_KEY_LEN];
    rand::rngs::OsRng.fill_bytes(&mut key);
    BASE64.encode(key)
}

fn cipher_from_key(key_b64: &str) -> SvcResult<Aes128Gcm> {
    let key_bytes = BASE64
        .decode(key_b64)
        .map_err(|e| SvcError::system(format!("invalid AES key encoding: {e}")))?;
    if key_bytes.len() != AES_KEY_LEN {
        return Err(SvcError::system(format!(
            "AES key must be {AES_KEY_LEN} bytes, got {}",
            key_bytes.len()
        )));
    }
    Ok(Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(&key_bytes)))
}

/// Encrypts UTF-8 content under a base64-encoded 128-bit key.
///
/// Returns `base64(nonce || ciphertext)`.
pub fn aes_encrypt(content: &str, key_b64: &str) -> SvcResult<String> {
    let cipher = cipher_from_key(key_b64)?;
    let nonce = Aes128Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, content.as_bytes())
        .map_err(|e| SvcError::system(format!("AES encryption failed: {e}")))?;
    let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(out))
}

/// Decrypts output of [`aes_encrypt`] under the same key.
pub fn aes_decrypt(encrypted_b64: &str, key_b64: &str) -> SvcResult<String> {
    let cipher = cipher_from_key(key_b64)?;
    let raw = BASE64
        .decode(encrypted_b64)
        .map_err(|e| SvcError::system(format!("invalid ciphertext encoding: {e}")))?;
    if raw.len() < NONCE_LEN {
        return Err(SvcError::system("ciphertext too short"));
    }
    let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|e| SvcError::system(format!("AES decryption failed: {e}")))?;
    String::from_utf8(plaintext)
        .map_err(|e| SvcError::system(format!("decrypted bytes are not UTF-8: {e}")))
}

/// MD5 digest of the input, as a lowercase hex string.
#[must_use]
pub fn md5(content: &str) -> String {
    hex::encode(Md5::digest(content.as_bytes()))
}

/// SHA-256 digest of the input, as a lowercase hex string.
#[must_use]
pub fn sha256(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Base64-encodes a UTF-8 string.
#[must_use]
pub fn base64_encode(content: &str) -> String {
    BASE64.encode(content.as_bytes())
}

/// Decodes base64 back to a UTF-8 string.
pub fn base64_decode(encoded: &str) -> SvcResult<String> {
    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| SvcError::system(format!("invalid base64: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| SvcError::system(format!("decoded bytes are not UTF-8: {e}")))
}

/// Generates a random salt of `length` bytes, base64-encoded.
///
/// A non-positive length falls back to 16 bytes.
#[must_use]
pub fn generate_salt(length: i32) -> String {
    let length = if length <= 0 {
        DEFAULT_SALT_LEN
    } else {
        length as usize
    };
    let mut salt = vec![0u8; length];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    BASE64.encode(salt)
}

/// Deterministic salted password digest: `sha256(password || salt)`.
#[must_use]
pub fn encrypt_password(password: &str, salt: &str) -> String {
    sha256(&format!("{password}{salt}"))
}

/// Re-hashes and compares. Callers must supply the same salt they persisted
/// alongside the digest.
#[must_use]
pub fn verify_password(password: &str, salt: &str, digest: &str) -> bool {
    encrypt_password(password, salt) == digest
}
