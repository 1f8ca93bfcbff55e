//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with a single server-side secret.  Payload:
//!
//! ```json
//! { "username": "test", "isAdmin": false, "iat": 1700000000, "exp": 1700086400 }
//! ```
//!
//! `exp` is only present when the authenticator was built with a TTL.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AuthError, Identity};

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
    /// Issued at (Unix timestamp, seconds).
    pub iat: i64,
    /// Expiration (Unix timestamp, seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Signs and verifies tokens with one shared secret.
///
/// The secret is passed in at construction; the authenticator is immutable
/// afterwards and can be shared freely between requests.
#[derive(Clone)]
pub struct TokenAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl fmt::Debug for TokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthenticator")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenAuthenticator {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens without `exp` never expire; `exp` is still checked when present.
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: None,
        }
    }

    /// Stamp an `exp` claim `ttl` after issue on every token this authenticator signs.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Sign a token for `username`.
    pub fn issue(&self, username: &str, is_admin: bool) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            username: username.to_string(),
            is_admin,
            iat: now.timestamp(),
            exp: self.ttl.map(|ttl| (now + ttl).timestamp()),
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims.
    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        Ok(encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)?)
    }

    /// Verify `token` and decode it into an [`Identity`].
    ///
    /// # Errors
    /// [`AuthError::Token`] on a bad signature, an expired token, or
    /// unparseable claims.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        // `Validation` reads `exp` as unsigned and skips negative values.
        if let Some(exp) = claims.exp {
            if exp < 0 || exp < Utc::now().timestamp() {
                return Err(AuthError::Token(ErrorKind::ExpiredSignature.into()));
            }
        }

        let issued_at = DateTime::from_timestamp(claims.iat, 0)
            .ok_or_else(|| AuthError::Token(ErrorKind::InvalidToken.into()))?;

        Ok(Identity {
            username: claims.username,
            is_admin: claims.is_admin,
            issued_at,
        })
    }

    /// Best-effort authentication of an `Authorization` header value.
    ///
    /// A missing or malformed header, or a token that fails verification,
    /// yields `None`. Deciding whether an identity is required is left to
    /// [`Capability`](crate::Capability).
    pub fn authenticate(&self, authorization: Option<&str>) -> Option<Identity> {
        let token = bearer_token(authorization?)?;

        match self.verify(token) {
            Ok(identity) => Some(identity),
            Err(err) => {
                debug!(error = %err, "ignoring unverifiable bearer token");
                None
            }
        }
    }
}

/// Extract the credential from a `Bearer <token>` header value.
///
/// The scheme keyword is matched case-insensitively and surrounding
/// whitespace is ignored.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "secret-dev";

    fn claims(username: &str, is_admin: bool, exp_offset: Option<i64>) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            username: username.to_string(),
            is_admin,
            iat: now,
            exp: exp_offset.map(|offset| now + offset),
        }
    }

    #[test]
    fn issued_token_round_trips_to_identity() {
        let auth = TokenAuthenticator::new(SECRET);
        let token = auth.issue("test", false).unwrap();

        let identity = auth.verify(&token).expect("token should verify");

        assert_eq!(identity.username, "test");
        assert!(!identity.is_admin);
        assert!(identity.issued_at <= Utc::now());
    }

    #[test]
    fn authenticate_via_header() {
        let auth = TokenAuthenticator::new(SECRET);
        let token = auth.issue("admin", true).unwrap();

        let identity = auth
            .authenticate(Some(&format!("Bearer {token}")))
            .expect("identity should be attached");

        assert_eq!(identity.username, "admin");
        assert!(identity.is_admin);
    }

    #[test]
    fn authenticate_without_header_yields_nothing() {
        let auth = TokenAuthenticator::new(SECRET);
        assert_eq!(auth.authenticate(None), None);
    }

    #[test]
    fn token_signed_with_other_secret_is_ignored() {
        let auth = TokenAuthenticator::new(SECRET);
        let bad = TokenAuthenticator::new("wrong").issue("test", true).unwrap();

        assert!(auth.verify(&bad).is_err());
        assert_eq!(auth.authenticate(Some(&format!("Bearer {bad}"))), None);
    }

    #[test]
    fn expired_token_is_ignored() {
        let auth = TokenAuthenticator::new(SECRET);
        let token = auth.sign(&claims("test", false, Some(-3600))).unwrap();

        assert!(matches!(auth.verify(&token), Err(AuthError::Token(_))));
        assert_eq!(auth.authenticate(Some(&format!("Bearer {token}"))), None);
    }

    #[test]
    fn recently_expired_token_is_ignored() {
        let auth = TokenAuthenticator::new(SECRET);
        let token = auth.sign(&claims("u", true, Some(-30))).unwrap();

        assert!(matches!(auth.verify(&token), Err(AuthError::Token(_))));
        assert_eq!(auth.authenticate(Some(&format!("Bearer {token}"))), None);
    }

    #[test]
    fn negative_expiry_is_ignored() {
        let auth = TokenAuthenticator::new(SECRET);
        let mut negative = claims("u", true, None);
        negative.exp = Some(-5);
        let token = auth.sign(&negative).unwrap();

        assert!(auth.verify(&token).is_err());
        assert_eq!(auth.authenticate(Some(&format!("Bearer {token}"))), None);
    }

    #[test]
    fn ttl_stamps_future_expiry() {
        let auth = TokenAuthenticator::new(SECRET).with_ttl(Duration::hours(1));
        let token = auth.issue("test", false).unwrap();

        let data = decode::<Claims>(&token, &auth.decoding_key, &auth.validation).unwrap();
        let exp = data.claims.exp.expect("exp should be set");
        assert!(exp > Utc::now().timestamp());
        assert!(auth.verify(&token).is_ok());
    }

    #[test]
    fn garbage_token_is_ignored() {
        let auth = TokenAuthenticator::new(SECRET);
        assert_eq!(auth.authenticate(Some("Bearer not.a.jwt")), None);
    }

    #[test]
    fn bearer_scheme_is_case_insensitive_and_trimmed() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER abc"), Some("abc"));
        assert_eq!(bearer_token("  Bearer    abc  "), Some("abc"));
    }

    #[test]
    fn malformed_headers_have_no_token() {
        assert_eq!(bearer_token(""), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer    "), None);
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearerabc"), None);
    }
}
