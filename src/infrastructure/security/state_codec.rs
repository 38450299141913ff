// src/infrastructure/security/state_codec.rs
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use serde::{Serialize, de::DeserializeOwned};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to serialize flow state: {0}")]
    Serialize(String),
    #[error("malformed sealed blob")]
    Malformed,
    #[error("sealed blob failed signature verification")]
    BadSignature,
}

/// Seals short-lived flow records (authorization state, minted codes) into
/// opaque URL-safe blobs: `base64url(json) "." base64url(hmac-sha256 tag)`.
///
/// The tag makes records tamper-evident at rest, so a store compromise
/// cannot rewrite a redirect URI or PKCE binding without detection. Opening
/// a blob verifies the tag before any payload parsing happens.
pub struct StateCodec {
    key: Vec<u8>,
}

impl StateCodec {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            key: secret.into(),
        }
    }

    pub fn seal<T: Serialize>(&self, value: &T) -> Result<String, CodecError> {
        let payload =
            serde_json::to_vec(value).map_err(|err| CodecError::Serialize(err.to_string()))?;
        let tag = self.tag(&payload);
        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(tag)
        ))
    }

    pub fn open<T: DeserializeOwned>(&self, sealed: &str) -> Result<T, CodecError> {
        let (payload_b64, tag_b64) = sealed.split_once('.').ok_or(CodecError::Malformed)?;
        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| CodecError::Malformed)?;
        let tag = URL_SAFE_NO_PAD
            .decode(tag_b64)
            .map_err(|_| CodecError::Malformed)?;

        let mut mac = self.mac();
        mac.update(&payload);
        mac.verify_slice(&tag)
            .map_err(|_| CodecError::BadSignature)?;

        serde_json::from_slice(&payload).map_err(|_| CodecError::Malformed)
    }

    fn tag(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = self.mac();
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length.
        HmacSha256::new_from_slice(&self.key).expect("hmac key of any length")
    }
}
