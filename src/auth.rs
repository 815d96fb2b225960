//! GitHub App Authentication
//!
//! Mints the short-lived RS256 JWT used to authenticate as the GitHub App
//! itself. The JWT is created fresh for every invocation and never cached.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ExchangeError;

/// Issued-at is backdated to tolerate clock drift between us and GitHub.
const CLOCK_SKEW_SECS: u64 = 10;

/// GitHub rejects app JWTs valid for longer than 10 minutes.
const ASSERTION_TTL_SECS: u64 = 600;

/// JWT claims for GitHub App authentication
#[derive(Debug, Serialize)]
pub struct AppClaims {
    /// Issued at time (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issuer (GitHub App ID)
    pub iss: String,
}

impl AppClaims {
    /// Build claims for an assertion issued at `now` (seconds since epoch).
    pub fn new(app_id: &str, now: u64) -> Self {
        Self {
            iat: now.saturating_sub(CLOCK_SKEW_SECS),
            exp: now + ASSERTION_TTL_SECS,
            iss: app_id.to_string(),
        }
    }
}

/// Sign a fresh app assertion with the App's RSA private key.
///
/// The key must be the PEM private key downloaded from the App's settings
/// page. Returns the encoded JWT, valid for 10 minutes.
pub fn generate_app_jwt(app_id: &str, private_key_pem: &[u8]) -> Result<String, ExchangeError> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let claims = AppClaims::new(app_id, now);

    let encoding_key =
        EncodingKey::from_rsa_pem(private_key_pem).map_err(ExchangeError::InvalidKey)?;

    encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
        .map_err(ExchangeError::Signing)
}
