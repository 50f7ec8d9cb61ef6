//! Nonce generation for Sign in with Apple.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// A raw nonce and the digest Apple receives in the login request.
///
/// Apple embeds the digest in the identity token; the backend checks it
/// against the raw value carried by the credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Nonce {
    raw: String,
    hashed: String,
}

impl std::fmt::Debug for Nonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Nonce").field("hashed", &self.hashed).finish()
    }
}

impl Nonce {
    pub fn generate() -> Self {
        let mut buf = [0u8; 32];
        for chunk in buf.chunks_mut(16) {
            let id = uuid::Uuid::new_v4();
            let bytes = id.as_bytes();
            let len = chunk.len().min(16);
            chunk[..len].copy_from_slice(&bytes[..len]);
        }
        Self::from_raw(URL_SAFE_NO_PAD.encode(buf))
    }

    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let hashed = sha256_hex(&raw);
        Self { raw, hashed }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn hashed(&self) -> &str {
        &self.hashed
    }
}

fn sha256_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
