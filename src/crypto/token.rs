//! Signed, time-limited bearer tokens (compact JWS, HS256).
//!
//! `header.claims.signature`, each part base64url without padding. The
//! signature is HMAC-SHA256 over `header.claims` with the server secret.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::CryptoError;
use crate::models::Role;

type HmacSha256 = Hmac<Sha256>;

/// Minimum secret length accepted for signing.
pub const MIN_SECRET_LEN: usize = 16;

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: i64,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch. Valid while `now < exp`.
    pub exp: i64,
}

/// Who a token is issued to.
#[derive(Debug, Clone)]
pub enum TokenSubject {
    Patient {
        id: i64,
        email: Option<String>,
        phone: Option<String>,
    },
    Staff {
        id: i64,
        username: String,
    },
}

pub struct TokenService {
    /// Keyed once; cloned per signature.
    mac: HmacSha256,
    ttl: Duration,
}

impl TokenService {
    /// `ttl_secs` must be positive and representable as a `chrono::Duration`.
    pub fn new(secret: &[u8], ttl_secs: i64) -> Result<Self, CryptoError> {
        let mac = HmacSha256::new_from_slice(secret).map_err(|_| CryptoError::InvalidKey)?;
        let ttl = Duration::try_seconds(ttl_secs)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or(CryptoError::InvalidTtl(ttl_secs))?;
        Ok(Self { mac, ttl })
    }

    /// Service with a random per-process secret. Tokens die with the process.
    pub fn with_random_secret(ttl_secs: i64) -> Result<Self, CryptoError> {
        let secret: [u8; 32] = rand::random();
        Self::new(&secret, ttl_secs)
    }

    pub fn issue(&self, subject: TokenSubject) -> Result<String, CryptoError> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: TokenSubject, now: DateTime<Utc>) -> Result<String, CryptoError> {
        let iat = now.timestamp();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or(CryptoError::ExpiryOutOfRange)?
            .timestamp();
        let claims = match subject {
            TokenSubject::Patient { id, email, phone } => TokenClaims {
                id,
                role: Role::Patient,
                email,
                phone,
                username: None,
                iat,
                exp,
            },
            TokenSubject::Staff { id, username } => TokenClaims {
                id,
                role: Role::Staff,
                email: None,
                phone: None,
                username: Some(username),
                iat,
                exp,
            },
        };

        let header = Header {
            alg: "HS256".into(),
            typ: "JWT".into(),
        };
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?),
        );
        let signature = URL_SAFE_NO_PAD.encode(self.sign(signing_input.as_bytes()));
        Ok(format!("{signing_input}.{signature}"))
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims, CryptoError> {
        self.verify_at(token, Utc::now())
    }

    /// Check structure, signature, then expiry, in that order.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, CryptoError> {
        let mut parts = token.split('.');
        let (header_b64, claims_b64, signature_b64) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(h), Some(c), Some(s), None) => (h, c, s),
                _ => return Err(CryptoError::InvalidToken("malformed")),
            };

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| CryptoError::InvalidToken("malformed signature"))?;
        let signing_input = &token[..header_b64.len() + 1 + claims_b64.len()];
        let expected = self.sign(signing_input.as_bytes());
        if !bool::from(expected.as_slice().ct_eq(signature.as_slice())) {
            return Err(CryptoError::InvalidToken("bad signature"));
        }

        let header: Header = decode_part(header_b64)?;
        if header.alg != "HS256" {
            return Err(CryptoError::InvalidToken("unsupported algorithm"));
        }

        let claims: TokenClaims = decode_part(claims_b64)?;
        if now.timestamp() >= claims.exp {
            return Err(CryptoError::InvalidToken("expired"));
        }
        Ok(claims)
    }

    fn sign(&self, input: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(input);
        mac.finalize().into_bytes().to_vec()
    }
}

fn decode_part<T: serde::de::DeserializeOwned>(part: &str) -> Result<T, CryptoError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(part)
        .map_err(|_| CryptoError::InvalidToken("malformed segment"))?;
    serde_json::from_slice(&bytes).map_err(|_| CryptoError::InvalidToken("malformed segment"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn service() -> TokenService {
        TokenService::new(b"test-secret-at-least-16-bytes", 3600).unwrap()
    }

    fn patient() -> TokenSubject {
        TokenSubject::Patient {
            id: 7,
            email: Some("jane@x.com".into()),
            phone: None,
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn issued_token_verifies_with_claims() {
        let svc = service();
        let token = svc.issue_at(patient(), t0()).unwrap();
        let claims = svc.verify_at(&token, t0()).unwrap();
        assert_eq!(claims.id, 7);
        assert_eq!(claims.role, Role::Patient);
        assert_eq!(claims.email.as_deref(), Some("jane@x.com"));
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn token_has_three_segments() {
        let token = service().issue(patient()).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn valid_one_second_before_expiry() {
        let svc = service();
        let token = svc.issue_at(patient(), t0()).unwrap();
        let at = t0() + Duration::seconds(3599);
        assert!(svc.verify_at(&token, at).is_ok());
    }

    #[test]
    fn expired_one_second_after_expiry() {
        let svc = service();
        let token = svc.issue_at(patient(), t0()).unwrap();
        let at = t0() + Duration::seconds(3601);
        assert!(matches!(
            svc.verify_at(&token, at),
            Err(CryptoError::InvalidToken("expired"))
        ));
    }

    #[test]
    fn tampered_claims_rejected() {
        let svc = service();
        let token = svc.issue_at(patient(), t0()).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let forged_claims = TokenClaims {
            id: 8,
            role: Role::Patient,
            email: None,
            phone: None,
            username: None,
            iat: t0().timestamp(),
            exp: t0().timestamp() + 3600,
        };
        let forged = format!(
            "{}.{}.{}",
            parts[0],
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap()),
            parts[2]
        );
        assert!(svc.verify_at(&forged, t0()).is_err());
    }

    #[test]
    fn other_secret_rejected() {
        let token = service().issue_at(patient(), t0()).unwrap();
        let other = TokenService::new(b"a-completely-different-secret", 3600).unwrap();
        assert!(other.verify_at(&token, t0()).is_err());
    }

    #[test]
    fn garbage_rejected() {
        let svc = service();
        for bad in ["", "abc", "a.b", "a.b.c", "a.b.c.d", "mock-admin-jwt-token"] {
            assert!(svc.verify_at(bad, t0()).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn staff_token_carries_username_and_role() {
        let svc = service();
        let token = svc
            .issue_at(
                TokenSubject::Staff {
                    id: 1,
                    username: "drwho".into(),
                },
                t0(),
            )
            .unwrap();
        let claims = svc.verify_at(&token, t0()).unwrap();
        assert_eq!(claims.role, Role::Staff);
        assert_eq!(claims.username.as_deref(), Some("drwho"));
        assert!(claims.email.is_none());
    }

    #[test]
    fn random_secrets_differ() {
        let a = TokenService::with_random_secret(60).unwrap();
        let b = TokenService::with_random_secret(60).unwrap();
        let token = a.issue(patient()).unwrap();
        assert!(a.verify(&token).is_ok());
        assert!(b.verify(&token).is_err());
    }

    #[test]
    fn unrepresentable_ttl_rejected_at_construction() {
        for ttl in [0, -1, i64::MAX] {
            assert!(
                matches!(
                    TokenService::new(b"test-secret-at-least-16-bytes", ttl),
                    Err(CryptoError::InvalidTtl(t)) if t == ttl
                ),
                "accepted ttl {ttl}"
            );
        }
    }

    #[test]
    fn expiry_past_calendar_range_is_an_error() {
        let svc = TokenService::new(b"test-secret-at-least-16-bytes", 9_000_000_000_000).unwrap();
        assert!(matches!(
            svc.issue_at(patient(), t0()),
            Err(CryptoError::ExpiryOutOfRange)
        ));
    }
}
