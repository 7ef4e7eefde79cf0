// strix-crypto/src/lib.rs
//! Reversible string encryption for Strix.
//!
//! Wraps the RustCrypto AES block cipher in CBC mode and renders the result
//! as `base64(iv ‖ ciphertext)`. See [`cipher`] for the wire format and the
//! first-block-only decryption contract.

pub mod cipher;
pub mod error;

pub use cipher::{decrypt, decrypt_full, encrypt, EncryptedBlob, BLOCK_SIZE, IV_SIZE};
pub use error::{CryptoError, CryptoResult};
