use crate::castersphere_api::config::ClientConfig;
use crate::castersphere_api::types::{CasterSphereError, Principal};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Platform tag identifying this client type
pub const PLATFORM_WEB: &str = "web";

/// Claims carried by every room service token
///
/// `username` and `sender_id` are always serialized, as `null` when the call
/// is made without a principal. No `exp`, `iat` or `nbf` is set, so identical
/// inputs produce byte-identical tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Client type, always [`PLATFORM_WEB`]
    pub platform: String,
    /// Issuer - the calling application's canonical URL
    pub iss: String,
    /// Principal email
    pub username: Option<String>,
    /// Principal id
    pub sender_id: Option<String>,
}

impl TokenClaims {
    /// Build claims for an optional principal
    pub fn new(issuer: impl Into<String>, principal: Option<&Principal>) -> Self {
        Self {
            platform: PLATFORM_WEB.to_string(),
            iss: issuer.into(),
            username: principal.map(|p| p.email.clone()),
            sender_id: principal.map(|p| p.id.clone()),
        }
    }
}

/// Signed message payload used when messages are sent as envelopes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    /// Issuer - the calling application's canonical URL
    pub iss: String,
    /// Plaintext message
    pub message: String,
}

/// Issues HS256-signed tokens for the room service
///
/// Stateless apart from the shared, read-only configuration; safe to clone
/// and use from many tasks at once.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    config: Arc<ClientConfig>,
}

impl TokenIssuer {
    pub fn new(config: Arc<ClientConfig>) -> Self {
        Self { config }
    }

    /// Mint a token for the given principal
    ///
    /// A missing principal is not an error: the identity claims are sent as
    /// `null` and the room service decides what an anonymous caller may do.
    pub fn issue(&self, principal: Option<&Principal>) -> Result<String, CasterSphereError> {
        let claims = TokenClaims::new(self.config.app_issuer_url(), principal);
        let token = self.sign(&claims)?;

        tracing::debug!(
            "Issued room service token (length: {}, anonymous: {})",
            token.len(),
            principal.is_none()
        );
        Ok(token)
    }

    /// Wrap a message into a [`MessageEnvelope`] and sign it
    pub fn sign_message(&self, message: &str) -> Result<String, CasterSphereError> {
        let envelope = MessageEnvelope {
            iss: self.config.app_issuer_url().to_string(),
            message: message.to_string(),
        };
        self.sign(&envelope)
    }

    /// Verify a token with the shared secret and recover its claims
    pub fn verify(&self, token: &str) -> Result<TokenClaims, CasterSphereError> {
        self.decode_signed(token)
    }

    /// Verify a signed message envelope and recover it
    pub fn verify_message(&self, token: &str) -> Result<MessageEnvelope, CasterSphereError> {
        self.decode_signed(token)
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, CasterSphereError> {
        let key = EncodingKey::from_secret(self.config.secret_bytes());
        encode(&Header::new(Algorithm::HS256), claims, &key).map_err(|e| {
            tracing::error!("Failed to sign room service token: {}", e);
            CasterSphereError::Signing(e.to_string())
        })
    }

    fn decode_signed<T: DeserializeOwned>(&self, token: &str) -> Result<T, CasterSphereError> {
        let key = DecodingKey::from_secret(self.config.secret_bytes());

        // Tokens carry no time-based or audience claims
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        decode::<T>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| CasterSphereError::TokenVerification(e.to_string()))
    }
}
