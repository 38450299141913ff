// src/infrastructure/security/pkce.rs
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::domain::oauth::CodeChallengeMethod;

/// A verifier/challenge pair, RFC 7636. The gateway generates one of these
/// per authorization attempt for its own exchange against upstream.
#[derive(Debug, Clone)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    pub fn generate() -> Self {
        let verifier = generate_verifier();
        let challenge = derive_challenge_s256(&verifier);
        Self {
            verifier,
            challenge,
        }
    }
}

/// 32 random bytes, unpadded base64url: 43 characters, within the legal
/// 43..=128 verifier range.
pub fn generate_verifier() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// `BASE64URL(SHA256(verifier))`, no padding.
pub fn derive_challenge_s256(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

/// Recompute the challenge from the verifier and compare. The challenge is
/// not itself a secret, so a plain string compare is sufficient here.
pub fn verify(method: CodeChallengeMethod, verifier: &str, challenge: &str) -> bool {
    match method {
        CodeChallengeMethod::S256 => derive_challenge_s256(verifier) == challenge,
        CodeChallengeMethod::Plain => verifier == challenge,
    }
}
