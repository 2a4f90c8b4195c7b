//! Bearer token check for the admin surface.

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Authenticates admin requests against a single configured token.
///
/// Only the HMAC-SHA256 of the token (keyed by `signing_secret`) is kept in
/// memory, and presented tokens are compared with [`Mac::verify_slice`], which
/// runs in constant time.
pub struct AuthService {
    signing_secret: String,
    expected_mac: Vec<u8>,
}

impl AuthService {
    /// Creates an authentication service for `admin_token`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if `signing_secret` is rejected as an
    /// HMAC key.
    pub fn new(admin_token: &str, signing_secret: String) -> Result<Self, AppError> {
        let expected_mac = Self::mac(&signing_secret, admin_token)?
            .finalize()
            .into_bytes()
            .to_vec();

        Ok(Self {
            signing_secret,
            expected_mac,
        })
    }

    fn mac(signing_secret: &str, token: &str) -> Result<HmacSha256, AppError> {
        let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes()).map_err(|e| {
            AppError::internal("Invalid token signing secret", json!({ "reason": e.to_string() }))
        })?;
        mac.update(token.as_bytes());
        Ok(mac)
    }

    /// Checks a raw bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token does not match.
    pub fn authenticate(&self, token: &str) -> Result<(), AppError> {
        Self::mac(&self.signing_secret, token)?
            .verify_slice(&self.expected_mac)
            .map_err(|_| {
                AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid token" }))
            })
    }
}
