//! Signature, HMAC and scope checks.

use crate::error::{Error, VerifyError};
use crate::options::VerifyOptions;
use crate::scope::Scope;
use crate::token::Token;
use ed25519_dalek::{PUBLIC_KEY_LENGTH, Signature, Verifier, VerifyingKey};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;

type HmacSha512 = Hmac<Sha512>;

/// Ed25519 public key size in bytes.
pub const PUBLIC_KEY_SIZE: usize = PUBLIC_KEY_LENGTH;

/// Bytes of the HMAC-SHA-512 output carried in a token.
///
/// Only the first half of the 64-byte MAC is compared. This is what issuers
/// produce today and must stay as is for compatibility.
pub const HMAC_SIGNATURE_SIZE: usize = 32;

/// Parse `data` as a token and verify it.
///
/// Returns the token if it passes every check.
pub fn verify(data: &[u8], options: &VerifyOptions) -> Result<Token, Error> {
    let token = Token::unmarshal(data)?;
    token.verify(options)?;
    Ok(token)
}

/// Check an Ed25519 signature. Any malformed input simply fails.
pub(crate) fn verify_signature(message: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
    let Ok(key_bytes) = <[u8; PUBLIC_KEY_SIZE]>::try_from(public_key) else {
        return false;
    };
    let Ok(key) = VerifyingKey::from_bytes(&key_bytes) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };

    key.verify(message, &signature).is_ok()
}

/// Check a truncated HMAC-SHA-512 in constant time.
pub(crate) fn verify_hmac(message: &[u8], signature: &[u8], secret: &[u8]) -> bool {
    let Ok(mut mac) = HmacSha512::new_from_slice(secret) else {
        return false;
    };
    mac.update(message);
    let digest = mac.finalize().into_bytes();

    digest[..HMAC_SIGNATURE_SIZE].ct_eq(signature).into()
}

pub(crate) fn verify_scope(options: &VerifyOptions, scope: &Scope) -> Result<(), VerifyError> {
    if options.change() {
        if !is_change_scope(scope) {
            return Err(VerifyError::NotModeChange);
        }
    } else if scope != options.scope() {
        return Err(VerifyError::InvalidScope);
    }

    Ok(())
}

/// Exactly two keys: `to` (any value) and `mode` containing `change`.
fn is_change_scope(scope: &Scope) -> bool {
    scope.len() == 2 && scope.contains_key("to") && scope.contains_value("mode", "change")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    #[test]
    fn test_verify_signature() {
        let key = SigningKey::from_bytes(&[9u8; 32]);
        let signature = key.sign(b"payload").to_bytes();
        let public = key.verifying_key().to_bytes();

        assert!(verify_signature(b"payload", &signature, &public));
        assert!(!verify_signature(b"payload!", &signature, &public));
        assert!(!verify_signature(b"payload", &signature, &public[..30]));
        assert!(!verify_signature(b"payload", &signature[..63], &public));
        assert!(!verify_signature(b"payload", &[], &[]));
    }

    #[test]
    fn test_verify_hmac_uses_first_half() {
        let mut mac = HmacSha512::new_from_slice(b"secret").unwrap();
        mac.update(b"payload");
        let full = mac.finalize().into_bytes();

        assert!(verify_hmac(b"payload", &full[..32], b"secret"));
        assert!(!verify_hmac(b"payload", &full, b"secret"));
        assert!(!verify_hmac(b"payload", &full[..31], b"secret"));
        assert!(!verify_hmac(b"payload", &full[..32], b"other"));
    }

    fn scope(query: &str) -> Scope {
        Scope::parse_query(query).unwrap()
    }

    #[test]
    fn test_change_scope_grammar() {
        let options = VerifyOptions::new().with_change();
        let check = |query: &str| verify_scope(&options, &scope(query));
        let not_change: Result<(), _> = Err(VerifyError::NotModeChange);

        assert_eq!(check("to=...&mode=change"), Ok(()));
        assert_eq!(check("to=...&mode=nochange&mode=change"), Ok(()));
        assert_eq!(check("to=...&mode=nochange"), not_change);
        assert_eq!(check("to=...&nomode=change"), not_change);
        assert_eq!(check("mode=change"), not_change);
        assert_eq!(check("to=...&mode=change&x=y"), not_change);
    }

    #[test]
    fn test_scope_must_match_exactly() {
        let options = VerifyOptions::new().with_scope(scope("access=all"));
        let doubled = scope("access=all&access=all");
        let invalid: Result<(), _> = Err(VerifyError::InvalidScope);

        assert_eq!(verify_scope(&options, &scope("access=all")), Ok(()));
        assert_eq!(verify_scope(&options, &Scope::new()), invalid);
        assert_eq!(verify_scope(&options, &doubled), invalid);
        assert_eq!(verify_scope(&VerifyOptions::new(), &Scope::new()), Ok(()));
    }
}
