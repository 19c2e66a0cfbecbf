use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Result, VoiceRelayError};

/// JWT claims as issued by the external auth service.
///
/// The issuer is not under our control, so the user identifier may live
/// in `sub`, `id` or `userId` depending on how the token was signed.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Expiration time (as UTC timestamp)
    pub exp: usize,
    /// Issued at (as UTC timestamp)
    pub iat: usize,
}

impl Claims {
    /// Creates new claims for a user, expiring in 24 hours
    pub fn new(user_id: String) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_secs() as usize;

        Self {
            sub: Some(user_id),
            id: None,
            user_id: None,
            exp: now + 86400,
            iat: now,
        }
    }

    /// Resolve the user identifier, whichever claim field carries it
    pub fn resolve_user_id(&self) -> Option<&str> {
        self.sub
            .as_deref()
            .or(self.id.as_deref())
            .or(self.user_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Manages JWT token operations
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenManager {
    /// Creates a new token manager with a shared HMAC secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Generates a JWT token for the given claims
    pub fn generate_token(&self, claims: &Claims) -> Result<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| VoiceRelayError::AuthenticationFailed(format!("Failed to generate token: {}", e)))
    }

    /// Validates a token and extracts its claims
    pub fn get_claims(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| VoiceRelayError::AuthenticationFailed(format!("Invalid token: {}", e)))
    }

    /// Validates a token and returns the user ID if valid
    pub fn validate_and_get_user_id(&self, token: &str) -> Result<String> {
        let claims = self.get_claims(token)?;

        claims
            .resolve_user_id()
            .map(|id| id.to_string())
            .ok_or_else(|| {
                VoiceRelayError::AuthenticationFailed(
                    "Invalid token payload (no user id)".to_string(),
                )
            })
    }
}

/// Strips an optional `Bearer ` prefix from a credential value
pub fn extract_bearer_token(raw: &str) -> &str {
    raw.strip_prefix("Bearer ").unwrap_or(raw)
}
