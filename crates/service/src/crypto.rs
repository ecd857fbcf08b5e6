//! Obfuscation of record ids on the wire.
//!
//! Callers only ever see tokens; handlers decode them back to row ids before
//! touching the store.

use sha2::{Digest, Sha256};
use thiserror::Error;

const TAG_LEN: usize = 4;
const ID_LEN: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("token is not valid hex")]
    Encoding,
    #[error("token has wrong length: {0}")]
    Length(usize),
    #[error("token failed integrity check")]
    Tampered,
}

/// Encodes row ids into opaque tokens and back.
pub trait IdCipher: Send + Sync {
    fn encrypt(&self, id: i64) -> String;
    fn decrypt(&self, token: &str) -> Result<i64, CipherError>;
}

/// XOR the big-endian id with a SHA-256 keystream and append a truncated tag.
///
/// Tokens are deterministic per secret, hex encoded, 24 characters long.
pub struct Sha256IdCipher {
    key: [u8; 32],
}

impl Sha256IdCipher {
    pub fn new(secret: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"blog-feed-id:");
        hasher.update(secret.as_bytes());
        Self { key: hasher.finalize().into() }
    }

    fn pad(&self) -> [u8; ID_LEN] {
        let mut hasher = Sha256::new();
        hasher.update(self.key);
        hasher.update(b"pad");
        let digest = hasher.finalize();
        let mut out = [0u8; ID_LEN];
        out.copy_from_slice(&digest[..ID_LEN]);
        out
    }

    fn tag(&self, plain: &[u8; ID_LEN]) -> [u8; TAG_LEN] {
        let mut hasher = Sha256::new();
        hasher.update(self.key);
        hasher.update(plain);
        let digest = hasher.finalize();
        let mut out = [0u8; TAG_LEN];
        out.copy_from_slice(&digest[..TAG_LEN]);
        out
    }
}

impl IdCipher for Sha256IdCipher {
    fn encrypt(&self, id: i64) -> String {
        let plain = id.to_be_bytes();
        let pad = self.pad();
        let mut buf = Vec::with_capacity(ID_LEN + TAG_LEN);
        buf.extend(plain.iter().zip(pad.iter()).map(|(p, k)| p ^ k));
        buf.extend_from_slice(&self.tag(&plain));
        hex::encode(buf)
    }

    fn decrypt(&self, token: &str) -> Result<i64, CipherError> {
        let bytes = hex::decode(token.trim()).map_err(|_| CipherError::Encoding)?;
        if bytes.len() != ID_LEN + TAG_LEN {
            return Err(CipherError::Length(bytes.len()));
        }
        let pad = self.pad();
        let mut plain = [0u8; ID_LEN];
        for (i, b) in bytes[..ID_LEN].iter().enumerate() {
            plain[i] = b ^ pad[i];
        }
        if self.tag(&plain)[..] != bytes[ID_LEN..] {
            return Err(CipherError::Tampered);
        }
        Ok(i64::from_be_bytes(plain))
    }
}
