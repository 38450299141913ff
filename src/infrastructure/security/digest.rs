// src/infrastructure/security/digest.rs
//! RFC 2617 Digest authentication, client side. The provider's direct API
//! challenges every unauthenticated request with `WWW-Authenticate: Digest`;
//! this module parses the challenge and derives the response hash from the
//! static key pair.

use md5::{Digest, Md5};
use rand::RngCore;
use thiserror::Error;

/// Nonce count is fixed: the client never reuses a server nonce, every
/// request starts from a fresh 401 challenge.
pub const NONCE_COUNT: &str = "00000001";

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("challenge is not a Digest scheme: {0}")]
    NotDigest(String),
    #[error("malformed challenge: {0}")]
    Malformed(String),
    #[error("unsupported qop: {0}")]
    UnsupportedQop(String),
}

#[derive(Debug, Clone)]
pub struct DigestCredentials {
    pub username: String,
    pub password: String,
}

/// Parameters parsed out of a `WWW-Authenticate: Digest ...` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestChallenge {
    pub realm: String,
    pub nonce: String,
    pub qop: Option<String>,
    pub opaque: Option<String>,
}

impl DigestChallenge {
    /// Parse a `WWW-Authenticate` header value. Anything other than a
    /// well-formed Digest challenge is an error, never a silent pass.
    pub fn parse(header: &str) -> Result<Self, DigestError> {
        let trimmed = header.trim();
        let params = trimmed
            .strip_prefix("Digest ")
            .or_else(|| trimmed.strip_prefix("digest "))
            .ok_or_else(|| DigestError::NotDigest(scheme_of(trimmed)))?;

        let mut realm = None;
        let mut nonce = None;
        let mut qop = None;
        let mut opaque = None;

        for part in split_challenge_params(params) {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').to_string();
            match key.trim().to_ascii_lowercase().as_str() {
                "realm" => realm = Some(value),
                "nonce" => nonce = Some(value),
                "qop" => qop = Some(value),
                "opaque" => opaque = Some(value),
                _ => {}
            }
        }

        let realm = realm.ok_or_else(|| DigestError::Malformed("missing realm".into()))?;
        let nonce = nonce.ok_or_else(|| DigestError::Malformed("missing nonce".into()))?;

        // The server may advertise several qop options; we only speak "auth".
        let qop = match qop {
            Some(options) => {
                if options.split(',').any(|o| o.trim() == "auth") {
                    Some("auth".to_string())
                } else {
                    return Err(DigestError::UnsupportedQop(options));
                }
            }
            None => None,
        };

        Ok(Self {
            realm,
            nonce,
            qop,
            opaque,
        })
    }
}

/// Compute the digest response hash for a request.
///
/// `HA1 = MD5(username:realm:password)`, `HA2 = MD5(method:uri)`; with qop
/// the response is `MD5(HA1:nonce:nc:cnonce:qop:HA2)`, without it the older
/// `MD5(HA1:nonce:HA2)` form.
pub fn compute_response(
    credentials: &DigestCredentials,
    method: &str,
    uri: &str,
    challenge: &DigestChallenge,
    cnonce: &str,
) -> String {
    let ha1 = md5_hex(&format!(
        "{}:{}:{}",
        credentials.username, challenge.realm, credentials.password
    ));
    let ha2 = md5_hex(&format!("{method}:{uri}"));

    match challenge.qop.as_deref() {
        Some(qop) => md5_hex(&format!(
            "{ha1}:{}:{NONCE_COUNT}:{cnonce}:{qop}:{ha2}",
            challenge.nonce
        )),
        None => md5_hex(&format!("{ha1}:{}:{ha2}", challenge.nonce)),
    }
}

/// Build the full `Authorization: Digest ...` header value for the retry.
pub fn authorization_header(
    credentials: &DigestCredentials,
    method: &str,
    uri: &str,
    challenge: &DigestChallenge,
    cnonce: &str,
) -> String {
    let response = compute_response(credentials, method, uri, challenge, cnonce);

    let mut header = format!(
        "Digest username=\"{}\", realm=\"{}\", nonce=\"{}\", uri=\"{}\", response=\"{}\"",
        credentials.username, challenge.realm, challenge.nonce, uri, response
    );
    if let Some(qop) = &challenge.qop {
        header.push_str(&format!(", qop={qop}, nc={NONCE_COUNT}, cnonce=\"{cnonce}\""));
    }
    if let Some(opaque) = &challenge.opaque {
        header.push_str(&format!(", opaque=\"{opaque}\""));
    }
    header
}

/// Fresh client nonce per authentication attempt.
pub fn generate_cnonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

fn scheme_of(header: &str) -> String {
    header
        .split_whitespace()
        .next()
        .unwrap_or("<empty>")
        .to_string()
}

/// Split challenge parameters on commas outside quoted strings.
fn split_challenge_params(params: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in params.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                if !current.trim().is_empty() {
                    out.push(current.trim().to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        out.push(current.trim().to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rfc_challenge() -> DigestChallenge {
        DigestChallenge {
            realm: "testrealm@host.com".into(),
            nonce: "dcd98b7102dd2f0e8b11d0f600bfb0c093".into(),
            qop: Some("auth".into()),
            opaque: Some("5ccc069c403ebaf9f0171e9517f40e41".into()),
        }
    }

    #[test]
    fn parses_rfc2617_challenge() {
        let header = r#"Digest realm="testrealm@host.com", qop="auth,auth-int", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", opaque="5ccc069c403ebaf9f0171e9517f40e41""#;
        let challenge = DigestChallenge::parse(header).unwrap();
        assert_eq!(challenge, rfc_challenge());
    }

    #[test]
    fn rejects_non_digest_scheme() {
        let result = DigestChallenge::parse("Bearer realm=\"api\"");
        assert!(matches!(result, Err(DigestError::NotDigest(_))));
    }

    #[test]
    fn rejects_challenge_without_nonce() {
        let result = DigestChallenge::parse("Digest realm=\"api\"");
        assert!(matches!(result, Err(DigestError::Malformed(_))));
    }

    #[test]
    fn rejects_unsupported_qop() {
        let result =
            DigestChallenge::parse("Digest realm=\"api\", nonce=\"n\", qop=\"auth-int\"");
        assert!(matches!(result, Err(DigestError::UnsupportedQop(_))));
    }

    #[test]
    fn response_matches_rfc2617_worked_example() {
        let credentials = DigestCredentials {
            username: "Mufasa".into(),
            password: "Circle Of Life".into(),
        };
        let response = compute_response(
            &credentials,
            "GET",
            "/dir/index.html",
            &rfc_challenge(),
            "0a4f113b",
        );
        assert_eq!(response, "6629fae49393a05397450978507c4ef1");
    }

    #[test]
    fn legacy_response_without_qop() {
        let credentials = DigestCredentials {
            username: "user".into(),
            password: "pass".into(),
        };
        let challenge = DigestChallenge {
            realm: "api".into(),
            nonce: "abc".into(),
            qop: None,
            opaque: None,
        };
        let expected = {
            let ha1 = hex::encode(Md5::digest(b"user:api:pass"));
            let ha2 = hex::encode(Md5::digest(b"GET:/v1/ping"));
            hex::encode(Md5::digest(format!("{ha1}:abc:{ha2}").as_bytes()))
        };
        assert_eq!(
            compute_response(&credentials, "GET", "/v1/ping", &challenge, "ignored"),
            expected
        );
    }

    #[test]
    fn header_carries_qop_fields_only_when_negotiated() {
        let credentials = DigestCredentials {
            username: "Mufasa".into(),
            password: "Circle Of Life".into(),
        };
        let header = authorization_header(
            &credentials,
            "GET",
            "/dir/index.html",
            &rfc_challenge(),
            "0a4f113b",
        );
        assert!(header.starts_with("Digest username=\"Mufasa\""));
        assert!(header.contains("qop=auth"));
        assert!(header.contains("nc=00000001"));
        assert!(header.contains("response=\"6629fae49393a05397450978507c4ef1\""));
        assert!(header.contains("opaque=\"5ccc069c403ebaf9f0171e9517f40e41\""));

        let no_qop = DigestChallenge {
            qop: None,
            opaque: None,
            ..rfc_challenge()
        };
        let header = authorization_header(&credentials, "GET", "/dir/index.html", &no_qop, "x");
        assert!(!header.contains("qop="));
        assert!(!header.contains("cnonce="));
    }
}
