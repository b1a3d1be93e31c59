//! PAK decryption using AES-256-CBC.
//!
//! Encrypted payloads (entries, and the index when the header says so) are
//! produced as `AES-256-CBC(key, iv = 0, CHECK_BLOCK || plaintext || PKCS#7)`.
//! The check block lets a wrong key fail deterministically instead of handing
//! garbage to the decompressor.

use std::fmt;
use std::str::FromStr;

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecryptMut, KeyIvInit};

use crate::{Error, Result};

type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES block size in bytes.
pub const AES_BLOCK_SIZE: usize = 16;

/// Known plaintext block prepended to every encrypted payload.
pub const CHECK_BLOCK: [u8; AES_BLOCK_SIZE] = *b"VELES-PAK-CHECK\0";

/// The initialization vector (all zeros).
const IV: [u8; AES_BLOCK_SIZE] = [0u8; AES_BLOCK_SIZE];

/// A caller-supplied AES-256 key.
///
/// Keys are never embedded in or derived by this crate.
#[derive(Clone, PartialEq, Eq)]
pub struct AesKey([u8; 32]);

impl AesKey {
    /// Wrap raw key bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a 64-character hex key, with or without a `0x` prefix.
    pub fn from_hex(hex_key: &str) -> Result<Self> {
        let trimmed = hex_key.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| Error::InvalidKey(format!("expected 64 hex digits: {e}")))?;
        Ok(Self(bytes))
    }

    /// Get the raw key bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for AesKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AesKey(..)")
    }
}

/// Decrypt a PAK payload.
///
/// Fails when the ciphertext is not a whole number of blocks, is too short to
/// hold the check block, has invalid padding, or does not start with the
/// check block after decryption (wrong key).
pub fn decrypt(ciphertext: &[u8], key: &AesKey) -> Result<Vec<u8>> {
    if ciphertext.len() % AES_BLOCK_SIZE != 0 {
        return Err(Error::Decryption(format!(
            "ciphertext length {} is not a multiple of {AES_BLOCK_SIZE} bytes",
            ciphertext.len()
        )));
    }
    if ciphertext.len() < 2 * AES_BLOCK_SIZE {
        return Err(Error::Decryption(format!(
            "ciphertext length {} is too short",
            ciphertext.len()
        )));
    }

    let decryptor = Aes256CbcDec::new(
        GenericArray::from_slice(&key.0),
        GenericArray::from_slice(&IV),
    );

    let mut buffer = ciphertext.to_vec();
    let len = decryptor
        .decrypt_padded_mut::<Pkcs7>(&mut buffer)
        .map_err(|_| Error::Decryption("invalid padding (wrong key?)".to_string()))?
        .len();
    buffer.truncate(len);

    if buffer.len() < AES_BLOCK_SIZE || buffer[..AES_BLOCK_SIZE] != CHECK_BLOCK {
        return Err(Error::Decryption("key check failed (wrong key?)".to_string()));
    }

    buffer.drain(..AES_BLOCK_SIZE);
    Ok(buffer)
}

#[cfg(test)]
pub(crate) fn encrypt(plaintext: &[u8], key: &AesKey) -> Vec<u8> {
    use aes::cipher::BlockEncryptMut;

    type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;

    let mut buffer = CHECK_BLOCK.to_vec();
    buffer.extend_from_slice(plaintext);
    let msg_len = buffer.len();
    buffer.resize((msg_len / AES_BLOCK_SIZE + 1) * AES_BLOCK_SIZE, 0);

    let encryptor = Aes256CbcEnc::new(
        GenericArray::from_slice(&key.0),
        GenericArray::from_slice(&IV),
    );
    let len = encryptor
        .encrypt_padded_mut::<Pkcs7>(&mut buffer, msg_len)
        .unwrap()
        .len();
    buffer.truncate(len);
    buffer
}
