//! Anonymous identity tokens.
//!
//! Every caller is assigned an opaque identity string carried in a signed
//! JWT. The token itself is the only state: nothing about identities is
//! persisted server-side, and a token is never revoked or rotated. This
//! module is pure token logic; storing the token in a cookie is the HTTP
//! layer's concern.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::IdentityConfig;
use crate::error::{IdentityError, IdentityResult};

/// Issuer claim stamped into every token this service mints.
pub const ISSUER: &str = "formwell";

/// Claims embedded in an identity token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The identity string this token attests to.
    pub aud: String,
    /// Issuance time, seconds since the Unix epoch.
    pub iat: i64,
    /// Fixed issuer string identifying this service.
    pub iss: String,
}

/// Outcome of resolving a request's identity.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// The caller's identity string.
    pub identity: String,
    /// A freshly minted token the caller should persist, present only when
    /// the request carried no token.
    pub fresh_token: Option<String>,
}

/// Mints and verifies signed identity tokens.
///
/// Exactly one signing algorithm (HS256) is accepted; tokens signed with any
/// other algorithm are rejected outright, so there is no negotiation to
/// downgrade.
#[derive(Clone)]
pub struct IdentityService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl IdentityService {
    /// Build the service from the configured signing secret.
    pub fn new(config: &IdentityConfig) -> Self {
        let secret = config.signing_key.as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens carry no expiry and the audience claim is the payload, not
        // something to match against a fixed list.
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Mint a fresh identity and the signed token attesting to it.
    pub fn issue(&self) -> IdentityResult<(String, String)> {
        let identity = Uuid::now_v7().to_string();
        let claims = Claims {
            aud: identity.clone(),
            iat: chrono::Utc::now().timestamp(),
            iss: ISSUER.to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok((identity, token))
    }

    /// Verify a presented token and extract the identity it attests to.
    pub fn verify(&self, token: &str) -> IdentityResult<String> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;

        if data.claims.aud.is_empty() {
            return Err(IdentityError::MissingIdentity);
        }

        Ok(data.claims.aud)
    }

    /// Resolve a request's identity from an optional presented token.
    ///
    /// No token mints a fresh identity; a present token is verified or the
    /// whole request fails. There is no fallback issuance on a
    /// corrupt-but-present token.
    pub fn resolve(&self, token: Option<&str>) -> IdentityResult<Resolved> {
        match token {
            None => {
                let (identity, fresh_token) = self.issue()?;
                Ok(Resolved {
                    identity,
                    fresh_token: Some(fresh_token),
                })
            }
            Some(token) => {
                let identity = self.verify(token)?;
                Ok(Resolved {
                    identity,
                    fresh_token: None,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> IdentityService {
        IdentityService::new(&IdentityConfig {
            signing_key: "test-signing-key".to_string(),
        })
    }

    #[test]
    fn test_issue_then_verify_round_trip() {
        let service = test_service();

        let (identity, token) = service.issue().unwrap();
        let verified = service.verify(&token).unwrap();

        assert_eq!(verified, identity);
    }

    #[test]
    fn test_resolve_without_token_mints() {
        let service = test_service();

        let resolved = service.resolve(None).unwrap();
        assert!(resolved.fresh_token.is_some());
        assert!(!resolved.identity.is_empty());
    }

    #[test]
    fn test_resolve_with_token_keeps_identity() {
        let service = test_service();

        let minted = service.resolve(None).unwrap();
        let replayed = service
            .resolve(minted.fresh_token.as_deref())
            .unwrap();

        assert_eq!(replayed.identity, minted.identity);
        assert!(replayed.fresh_token.is_none(), "No re-mint on a valid token");
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = test_service();

        let (_, token) = service.issue().unwrap();
        let mut tampered = token.clone();
        tampered.pop();

        assert!(service.verify(&tampered).is_err());
        assert!(service.resolve(Some(&tampered)).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = test_service();
        let other = IdentityService::new(&IdentityConfig {
            signing_key: "another-key".to_string(),
        });

        let (_, token) = other.issue().unwrap();
        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_wrong_algorithm_rejected() {
        let service = test_service();

        let claims = Claims {
            aud: "someone".to_string(),
            iat: chrono::Utc::now().timestamp(),
            iss: ISSUER.to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(b"test-signing-key"),
        )
        .unwrap();

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn test_malformed_token_rejected() {
        let service = test_service();
        assert!(service.verify("not-a-jwt").is_err());
    }
}
