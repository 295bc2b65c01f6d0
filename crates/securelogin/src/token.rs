//! The SecureLogin token.

use crate::error::VerifyError;
use crate::options::VerifyOptions;
use crate::scope::Scope;
use crate::verify::{verify_hmac, verify_scope, verify_signature};
use chrono::{DateTime, Duration, Utc};

/// A SecureLogin token.
///
/// Built by parsing the wire format (see [`Token::unmarshal`]). Verification
/// borrows the token and never changes it; key overrides from
/// [`VerifyOptions`] only apply to the call they are passed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The payload exactly as it was signed. Both the Ed25519 signature and
    /// the HMAC are checked against these bytes.
    pub(crate) raw_payload: Vec<u8>,

    /// Origin of the app this token authenticates for.
    pub provider: String,

    /// Front-end this token authenticates with. Equals the provider unless
    /// the token authorizes a specific scope or a Connect request.
    pub client: String,

    /// What the bearer is allowed to do. Empty for sign-in and sign-up.
    pub scope: Scope,

    /// Expiration time, to prevent replay.
    pub expire_at: DateTime<Utc>,

    /// Ed25519 public key. Can be overridden during verification.
    pub public_key: Vec<u8>,

    /// Shared HMAC secret. Can be overridden during verification.
    pub hmac_secret: Vec<u8>,

    /// Ed25519 signature of the payload.
    pub signature: Vec<u8>,

    /// Truncated HMAC-SHA-512 of the payload.
    pub hmac_signature: Vec<u8>,

    /// Email of the user. The protocol does not confirm it.
    pub email: String,
}

impl Token {
    /// The signed payload bytes.
    pub fn raw_payload(&self) -> &[u8] {
        &self.raw_payload
    }

    /// Verify the token against `options`.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// signature, HMAC (if enabled), provider, client (unless connect mode),
    /// expiry (unless disabled), scope.
    pub fn verify(&self, options: &VerifyOptions) -> Result<(), VerifyError> {
        let public_key = options.public_key().unwrap_or(&self.public_key[..]);
        if !verify_signature(&self.raw_payload, &self.signature, public_key) {
            return Err(self.reject(VerifyError::InvalidSignature));
        }

        if options.hmac() {
            let secret = options.hmac_secret().unwrap_or(&self.hmac_secret[..]);
            if !verify_hmac(&self.raw_payload, &self.hmac_signature, secret) {
                return Err(self.reject(VerifyError::InvalidHmacSignature));
            }
        }

        if !options.allows_origin(&self.provider) {
            return Err(self.reject(VerifyError::InvalidProvider));
        }

        if !options.connect() && !options.allows_origin(&self.client) {
            return Err(self.reject(VerifyError::InvalidClient));
        }

        if options.expire() && self.is_expired() {
            return Err(self.reject(VerifyError::ExpiredToken));
        }

        verify_scope(options, &self.scope).map_err(|e| self.reject(e))?;

        tracing::trace!(provider = %self.provider, client = %self.client, "Token verified");
        Ok(())
    }

    /// Check if the token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expire_at
    }

    /// Get time until expiration (negative once expired).
    pub fn time_until_expiration(&self) -> Duration {
        self.expire_at - Utc::now()
    }

    fn reject(&self, reason: VerifyError) -> VerifyError {
        tracing::debug!(
            provider = %self.provider,
            client = %self.client,
            reason = %reason,
            "Token verification failed"
        );
        reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expire_at: DateTime<Utc>) -> Token {
        Token {
            raw_payload: b"https://a.com,https://a.com,,0".to_vec(),
            provider: "https://a.com".into(),
            client: "https://a.com".into(),
            scope: Scope::new(),
            expire_at,
            public_key: Vec::new(),
            hmac_secret: Vec::new(),
            signature: Vec::new(),
            hmac_signature: Vec::new(),
            email: "user@a.com".into(),
        }
    }

    #[test]
    fn test_expiration() {
        let alive = token(Utc::now() + Duration::hours(1));
        assert!(!alive.is_expired());
        assert!(alive.time_until_expiration() > Duration::zero());

        let expired = token(Utc::now() - Duration::hours(1));
        assert!(expired.is_expired());
        assert!(expired.time_until_expiration() < Duration::zero());
    }

    #[test]
    fn test_missing_key_is_invalid_signature() {
        let t = token(Utc::now() + Duration::hours(1));
        let options = VerifyOptions::new().with_origins(["https://a.com"]);
        assert_eq!(t.verify(&options), Err(VerifyError::InvalidSignature));
    }
}
