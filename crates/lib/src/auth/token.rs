//! Signed session tokens
//!
//! Tokens are compact JWS strings, `base64url(header).base64url(claims).base64url(signature)`,
//! signed with Ed25519 (`"alg": "EdDSA"`). The signing key is a [`SessionKey`] value owned by
//! the login manager. A freshly generated key lives only in memory, so restarting with a new
//! key invalidates every token issued before.

use base64ct::{Base64UrlUnpadded, Encoding};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::errors::AuthError;
use super::types::SessionUser;

/// Size of Ed25519 signatures in bytes
pub const ED25519_SIGNATURE_SIZE: usize = 64;

/// Size of Ed25519 private keys in bytes
pub const ED25519_PRIVATE_KEY_SIZE: usize = 32;

const ALGORITHM: &str = "EdDSA";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user name
    pub sub: String,
    /// Issued at, seconds since Unix epoch
    pub iat: u64,
    /// Expires at, seconds since Unix epoch
    pub exp: u64,
    /// Descriptor as it was at issue time
    pub user: SessionUser,
}

/// Ed25519 key material for signing and verifying session tokens.
pub struct SessionKey {
    signing_key: SigningKey,
}

impl SessionKey {
    /// Generates a new random key.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Rebuilds a key from its 32-byte secret, e.g. one the caller persisted.
    pub fn from_bytes(bytes: &[u8; ED25519_PRIVATE_KEY_SIZE]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(bytes),
        }
    }

    /// The 32-byte secret, wiped when the returned buffer is dropped.
    pub fn to_bytes(&self) -> Zeroizing<[u8; ED25519_PRIVATE_KEY_SIZE]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }

    /// Public half of the key, for verifiers outside this process.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Encodes and signs `claims`.
    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        };
        let header =
            serde_json::to_vec(&header).map_err(|source| AuthError::TokenEncoding { source })?;
        let claims =
            serde_json::to_vec(claims).map_err(|source| AuthError::TokenEncoding { source })?;

        let signing_input = format!(
            "{}.{}",
            Base64UrlUnpadded::encode_string(&header),
            Base64UrlUnpadded::encode_string(&claims)
        );
        let signature = self.signing_key.sign(signing_input.as_bytes());
        Ok(format!(
            "{signing_input}.{}",
            Base64UrlUnpadded::encode_string(&signature.to_bytes())
        ))
    }

    /// Checks the structure, algorithm, signature and expiry of `token` at time `now`.
    ///
    /// # Errors
    /// `InvalidToken` for any structural or signature failure, `TokenExpired` if
    /// `now >= exp`.
    pub fn verify(&self, token: &str, now: u64) -> Result<Claims, AuthError> {
        let mut parts = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid("expected three dot-separated segments"));
        };

        let header: Header = decode_segment(header_b64, "header")?;
        if header.alg != ALGORITHM {
            return Err(invalid(format!("unsupported algorithm {:?}", header.alg)));
        }

        let signature_bytes = Base64UrlUnpadded::decode_vec(signature_b64)
            .map_err(|e| invalid(format!("signature encoding: {e}")))?;
        let signature_bytes: [u8; ED25519_SIGNATURE_SIZE] = signature_bytes
            .try_into()
            .map_err(|v: Vec<u8>| invalid(format!("signature is {} bytes", v.len())))?;
        let signature = Signature::from_bytes(&signature_bytes);

        let signing_input = &token[..header_b64.len() + 1 + claims_b64.len()];
        self.signing_key
            .verifying_key()
            .verify(signing_input.as_bytes(), &signature)
            .map_err(|_| invalid("signature mismatch"))?;

        let claims: Claims = decode_segment(claims_b64, "claims")?;
        if claims.sub != claims.user.name {
            return Err(invalid("subject does not match embedded user"));
        }
        if now >= claims.exp {
            return Err(AuthError::TokenExpired {
                expired_at: claims.exp,
            });
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKey")
            .field("verifying_key", &self.verifying_key())
            .finish_non_exhaustive()
    }
}

fn invalid(reason: impl Into<String>) -> AuthError {
    AuthError::InvalidToken {
        reason: reason.into(),
    }
}

fn decode_segment<T: serde::de::DeserializeOwned>(
    segment: &str,
    what: &str,
) -> Result<T, AuthError> {
    let bytes = Base64UrlUnpadded::decode_vec(segment)
        .map_err(|e| invalid(format!("{what} encoding: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| invalid(format!("{what} json: {e}")))
}
