// strix-crypto/src/cipher.rs
//! AES-CBC string encryption with an IV-prefixed base64 wire format.
//!
//! The blob layout is `base64(iv ‖ ciphertext)`: a random 16-byte IV followed
//! by AES-CBC ciphertext with PKCS#7 padding. The key is the raw UTF-8
//! encoding of the caller's key string; no key derivation is applied, so the
//! key must encode to exactly 16, 24 or 32 bytes (AES-128/192/256).
//!
//! [`decrypt`] only ever decrypts the **first** ciphertext block. Payloads of
//! 16 bytes or more come back truncated to their first 16 bytes. Blobs
//! produced by other implementations of this format depend on that, so the
//! behaviour is kept; [`decrypt_full`] is the non-truncating variant.
//!
//! License: MIT OR Apache-2.0

use aes::cipher::block_padding::{NoPadding, Padding, Pkcs7};
use aes::cipher::consts::U16;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD, Engine};
use log::{debug, warn};
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};

/// Size of the initialization vector in bytes (one AES block).
pub const IV_SIZE: usize = 16;

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes192CbcEnc = cbc::Encryptor<aes::Aes192>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type Aes192CbcDec = cbc::Decryptor<aes::Aes192>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// An IV plus the ciphertext produced under it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedBlob {
    /// The IV used for encryption (fresh per call).
    pub iv: [u8; IV_SIZE],
    /// PKCS#7-padded AES-CBC ciphertext; always a whole number of blocks.
    pub ciphertext: Vec<u8>,
}

impl EncryptedBlob {
    /// Encrypts `plaintext` under `key` with an explicit IV.
    ///
    /// Most callers want [`encrypt`], which draws the IV from the thread RNG.
    pub fn seal(key: &[u8], iv: [u8; IV_SIZE], plaintext: &[u8]) -> CryptoResult<Self> {
        let ciphertext = cbc_encrypt(key, &iv, plaintext)?;
        Ok(Self { iv, ciphertext })
    }

    /// Size of `iv ‖ ciphertext` before base64 encoding.
    pub fn encoded_len(&self) -> usize {
        IV_SIZE + self.ciphertext.len()
    }

    /// Returns true if there is no ciphertext.
    pub fn is_empty(&self) -> bool {
        self.ciphertext.is_empty()
    }

    /// Encodes as `base64(iv ‖ ciphertext)`.
    pub fn to_base64(&self) -> String {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.extend_from_slice(&self.iv);
        bytes.extend_from_slice(&self.ciphertext);
        STANDARD.encode(&bytes)
    }

    /// Decodes `base64(iv ‖ ciphertext)`, requiring at least one cipher block.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let bytes = STANDARD.decode(encoded.trim())?;

        let expected = IV_SIZE + BLOCK_SIZE;
        if bytes.len() < expected {
            return Err(CryptoError::TruncatedBlob {
                expected,
                actual: bytes.len(),
            });
        }

        let mut iv = [0u8; IV_SIZE];
        iv.copy_from_slice(&bytes[..IV_SIZE]);
        let ciphertext = bytes[IV_SIZE..].to_vec();

        Ok(Self { iv, ciphertext })
    }

    /// Decrypts the first ciphertext block only.
    ///
    /// Padding only ever sits in the last block, so the blob length decides:
    /// a lone block is unpadded with PKCS#7 (a failure there means the key is
    /// wrong), while the first of several blocks is returned as all 16 raw
    /// bytes.
    pub fn open_first_block(&self, key: &[u8]) -> CryptoResult<Vec<u8>> {
        let first = self
            .ciphertext
            .get(..BLOCK_SIZE)
            .ok_or(CryptoError::TruncatedBlob {
                expected: IV_SIZE + BLOCK_SIZE,
                actual: self.encoded_len(),
            })?;

        if self.ciphertext.len() > BLOCK_SIZE {
            debug!(
                "Opening the first block of a {}-byte ciphertext without unpadding.",
                self.ciphertext.len()
            );
            cbc_decrypt::<NoPadding>(key, &self.iv, first)
        } else {
            cbc_decrypt::<Pkcs7>(key, &self.iv, first)
        }
    }

    /// Decrypts every block and strips the final padding.
    pub fn open(&self, key: &[u8]) -> CryptoResult<Vec<u8>> {
        cbc_decrypt::<Pkcs7>(key, &self.iv, &self.ciphertext)
    }
}

/// Encrypts a string with AES-CBC under the raw UTF-8 bytes of `key`.
///
/// Returns `base64(iv ‖ ciphertext)` with a freshly generated IV.
///
/// # Errors
///
/// * [`CryptoError::InvalidArgument`] if `plaintext` or `key` is empty.
/// * [`CryptoError::InvalidKeyLength`] if `key` is not 16, 24 or 32 bytes.
pub fn encrypt(plaintext: &str, key: &str) -> CryptoResult<String> {
    if plaintext.is_empty() {
        return Err(CryptoError::InvalidArgument(
            "an empty string value cannot be encrypted",
        ));
    }
    if key.is_empty() {
        return Err(CryptoError::InvalidArgument(
            "cannot encrypt using an empty key; please supply an encryption key",
        ));
    }

    let key_bytes = Zeroizing::new(key.as_bytes().to_vec());
    let mut iv = [0u8; IV_SIZE];
    rand::rng().fill_bytes(&mut iv);

    let blob = EncryptedBlob::seal(&key_bytes, iv, plaintext.as_bytes())?;
    debug!(
        "Encrypted {} plaintext bytes into {} ciphertext bytes.",
        plaintext.len(),
        blob.ciphertext.len()
    );
    Ok(blob.to_base64())
}

/// Decrypts a blob produced by [`encrypt`], first block only.
///
/// Plaintexts shorter than 16 bytes round-trip exactly. Longer plaintexts are
/// returned truncated to their first 16 bytes; a multi-byte character cut at
/// that boundary is replaced with U+FFFD.
///
/// # Errors
///
/// * [`CryptoError::InvalidArgument`] if `blob` or `key` is empty.
/// * [`CryptoError::InvalidBase64`] / [`CryptoError::TruncatedBlob`] on malformed input.
/// * [`CryptoError::InvalidKeyLength`] if `key` is not 16, 24 or 32 bytes.
/// * [`CryptoError::Decryption`] if a single-block blob fails its padding check.
pub fn decrypt(blob: &str, key: &str) -> CryptoResult<String> {
    check_decrypt_args(blob, key)?;

    let key_bytes = Zeroizing::new(key.as_bytes().to_vec());
    let blob = EncryptedBlob::from_base64(blob)?;
    let plaintext = blob.open_first_block(&key_bytes)?;

    if blob.ciphertext.len() > BLOCK_SIZE {
        warn!(
            "Decrypting only the first of {} cipher blocks; longer payloads are truncated.",
            blob.ciphertext.len() / BLOCK_SIZE
        );
        return Ok(String::from_utf8_lossy(&plaintext).into_owned());
    }

    Ok(String::from_utf8(plaintext)?)
}

/// Decrypts every block of a blob produced by [`encrypt`].
///
/// This departs from [`decrypt`]: it recovers the complete plaintext instead
/// of the first block, and fails on bad padding regardless of length.
pub fn decrypt_full(blob: &str, key: &str) -> CryptoResult<String> {
    check_decrypt_args(blob, key)?;

    let key_bytes = Zeroizing::new(key.as_bytes().to_vec());
    let plaintext = EncryptedBlob::from_base64(blob)?.open(&key_bytes)?;
    Ok(String::from_utf8(plaintext)?)
}

fn check_decrypt_args(blob: &str, key: &str) -> CryptoResult<()> {
    if blob.is_empty() {
        return Err(CryptoError::InvalidArgument(
            "an empty string value cannot be decrypted",
        ));
    }
    if key.is_empty() {
        return Err(CryptoError::InvalidArgument(
            "cannot decrypt using an empty key; please supply a decryption key",
        ));
    }
    Ok(())
}

fn invalid_key(key: &[u8]) -> CryptoError {
    CryptoError::InvalidKeyLength { actual: key.len() }
}

fn cbc_encrypt(key: &[u8], iv: &[u8; IV_SIZE], plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    let ciphertext = match key.len() {
        16 => Aes128CbcEnc::new_from_slices(key, iv)
            .map_err(|_| invalid_key(key))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        24 => Aes192CbcEnc::new_from_slices(key, iv)
            .map_err(|_| invalid_key(key))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        32 => Aes256CbcEnc::new_from_slices(key, iv)
            .map_err(|_| invalid_key(key))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        _ => return Err(invalid_key(key)),
    };
    Ok(ciphertext)
}

fn cbc_decrypt<P: Padding<U16>>(
    key: &[u8],
    iv: &[u8; IV_SIZE],
    ciphertext: &[u8],
) -> CryptoResult<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::Decryption(format!(
            "ciphertext length {} is not a positive multiple of {}",
            ciphertext.len(),
            BLOCK_SIZE
        )));
    }

    let result = match key.len() {
        16 => Aes128CbcDec::new_from_slices(key, iv)
            .map_err(|_| invalid_key(key))?
            .decrypt_padded_vec_mut::<P>(ciphertext),
        24 => Aes192CbcDec::new_from_slices(key, iv)
            .map_err(|_| invalid_key(key))?
            .decrypt_padded_vec_mut::<P>(ciphertext),
        32 => Aes256CbcDec::new_from_slices(key, iv)
            .map_err(|_| invalid_key(key))?
            .decrypt_padded_vec_mut::<P>(ciphertext),
        _ => return Err(invalid_key(key)),
    };

    result.map_err(|_| {
        CryptoError::Decryption("invalid padding (wrong key or tampered data)".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_128: &[u8] = b"0123456789abcdef";

    #[test]
    fn test_seal_is_whole_blocks() {
        let blob = EncryptedBlob::seal(KEY_128, [7u8; IV_SIZE], b"hi").unwrap();
        assert_eq!(blob.ciphertext.len(), BLOCK_SIZE);

        let blob = EncryptedBlob::seal(KEY_128, [7u8; IV_SIZE], &[b'x'; 16]).unwrap();
        assert_eq!(blob.ciphertext.len(), 2 * BLOCK_SIZE);
    }

    #[test]
    fn test_seal_rejects_odd_key_sizes() {
        let err = EncryptedBlob::seal(b"short", [0u8; IV_SIZE], b"data").unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKeyLength { actual: 5 }));
    }

    #[test]
    fn test_open_first_block_single_block() {
        let blob = EncryptedBlob::seal(KEY_128, [1u8; IV_SIZE], b"secret").unwrap();
        assert_eq!(blob.open_first_block(KEY_128).unwrap(), b"secret");
    }

    #[test]
    fn test_open_first_block_truncates() {
        let plaintext = b"The quick brown fox jumps";
        let blob = EncryptedBlob::seal(KEY_128, [2u8; IV_SIZE], plaintext).unwrap();
        assert_eq!(blob.open_first_block(KEY_128).unwrap(), &plaintext[..16]);
        assert_eq!(blob.encoded_len(), IV_SIZE + 2 * BLOCK_SIZE);
        assert_eq!(blob.open(KEY_128).unwrap(), plaintext);
    }

    #[test]
    fn test_base64_layout_is_iv_then_ciphertext() {
        let blob = EncryptedBlob::seal(KEY_128, [9u8; IV_SIZE], b"layout").unwrap();
        let raw = STANDARD.decode(blob.to_base64()).unwrap();
        assert_eq!(&raw[..IV_SIZE], &[9u8; IV_SIZE]);
        assert_eq!(&raw[IV_SIZE..], blob.ciphertext.as_slice());
    }
}
