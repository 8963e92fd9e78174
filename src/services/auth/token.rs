use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors returned by credential issuance and verification.
///
/// `Expired` is kept distinct from `Invalid` so the middleware can log which
/// kind rejected a request; both collapse to the same generic 401 response.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("invalid 'sub' claim (expected UUID)")]
    InvalidSub,
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// HS256 issuer/verifier for the bearer credential.
///
/// One symmetric secret signs and verifies every token; issuance and
/// verification are intentionally colocated for a single-service deployment.
/// The secret's presence is enforced by `Config::from_env()` before this type
/// can be constructed.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenCodec")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: a token one second past `exp` is expired.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    /// Issue a signed credential for `user_id`, expiring after the configured TTL.
    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.ttl_seconds,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Verify signature and expiry, returning the embedded subject.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e),
            })?;

        Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::InvalidSub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-test-secret-test-secret!";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, 3600)
    }

    #[test]
    fn round_trip_returns_subject() {
        let codec = codec();
        let user_id = Uuid::new_v4();

        let token = codec.issue(user_id).unwrap();
        assert_eq!(codec.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn expired_token_fails_with_expired_kind() {
        // Negative TTL issues a token that is already past `exp`.
        let codec = TokenCodec::new(SECRET, -3600);
        let token = codec.issue(Uuid::new_v4()).unwrap();

        assert!(matches!(codec.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn tampered_signature_is_invalid_not_expired() {
        let codec = codec();
        let token = codec.issue(Uuid::new_v4()).unwrap();

        let (rest, sig) = token.rsplit_once('.').unwrap();
        let flipped = if sig.starts_with('A') { "Q" } else { "A" };
        let tampered = format!("{rest}.{}{}", flipped, &sig[1..]);

        assert!(matches!(
            codec.verify(&tampered),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let other = TokenCodec::new("another-secret-another-secret-12", 3600);
        let token = other.issue(Uuid::new_v4()).unwrap();

        assert!(matches!(codec().verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn garbage_input_is_rejected() {
        let codec = codec();

        assert!(matches!(codec.verify(""), Err(TokenError::Invalid(_))));
        assert!(matches!(
            codec.verify("abc.def.ghi"),
            Err(TokenError::Invalid(_))
        ));
        assert!(matches!(
            codec.verify("not a jwt at all"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn well_signed_non_uuid_subject_is_rejected() {
        let codec = codec();
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "user-42".to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(codec.verify(&token), Err(TokenError::InvalidSub)));
    }
}
