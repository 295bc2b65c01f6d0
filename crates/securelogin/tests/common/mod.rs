//! Shared helpers for signing test tokens.

#![allow(dead_code)]

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ed25519_dalek::{Signer, SigningKey};
use hmac::{Hmac, Mac};
use securelogin::escape::escape_join;
use sha2::Sha512;

pub const DOMAIN: &str = "https://cobased.com";

/// Token issued by cobased.com for homakov@gmail.com, expired in 2017.
pub const COBASED_TOKEN: &str = "https://cobased.com%2Chttps://cobased.com%2C%2C1498731060,\
    E5faDp1F3F4AGN2z5NgwZ/e0WB+ukZO3eMRWvTTZc4erts8mMzSy+CxGdz3OW1Xff8p6m\
    DAPfnSK0QqSAAHmAA==%2CcIZjUTqMWYgzYGrsYEHptNiaaLapWiqgPPsG1PI/Rsw=,\
    kdbjcc08YBKWdCY56lQJIi92wcGOW+KcMvbSgHN6WbU=%2C1OVh/+xHRCaebQ9Lz6k\
    OTkTRrVm1xgvxGthABCwCQ8k=,homakov@gmail.com";

pub const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

/// Fields of a token to be signed.
pub struct Claims<'a> {
    pub provider: &'a str,
    pub client: &'a str,
    pub scope: &'a str,
    pub expire: i64,
    pub email: &'a str,
}

impl Default for Claims<'_> {
    fn default() -> Self {
        Self {
            provider: DOMAIN,
            client: DOMAIN,
            scope: "",
            expire: chrono::Utc::now().timestamp() + 3600,
            email: "user@example.com",
        }
    }
}

pub fn signing_key() -> SigningKey {
    SigningKey::from_bytes(&[7u8; 32])
}

pub fn hmac_signature(payload: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut mac = Hmac::<Sha512>::new_from_slice(secret).unwrap();
    mac.update(payload);
    mac.finalize().into_bytes()[..32].to_vec()
}

/// Sign `claims` and encode them in the wire format.
pub fn sign(claims: &Claims) -> String {
    let expire = claims.expire.to_string();
    let payload = escape_join(&[
        claims.provider,
        claims.client,
        claims.scope,
        expire.as_str(),
    ]);

    let key = signing_key();
    let signature = key.sign(payload.as_bytes()).to_bytes();
    let hmac = hmac_signature(payload.as_bytes(), SECRET);

    let signatures = escape_join(&[STANDARD.encode(signature), STANDARD.encode(hmac)]);
    let keys = escape_join(&[
        STANDARD.encode(key.verifying_key().to_bytes()),
        STANDARD.encode(SECRET),
    ]);

    escape_join(&[
        payload.as_str(),
        signatures.as_str(),
        keys.as_str(),
        claims.email,
    ])
}
