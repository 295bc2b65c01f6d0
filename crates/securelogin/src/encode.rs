//! Writing tokens back to the wire format.

use crate::error::Error;
use crate::escape::escape_join;
use crate::token::Token;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::io::Write;

/// Writes encoded tokens to an output stream.
pub struct Encoder<W> {
    writer: W,
}

impl<W: Write> Encoder<W> {
    /// Create an encoder that writes to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write `token` in a single call.
    pub fn encode(&mut self, token: &Token) -> Result<(), Error> {
        self.writer.write_all(&token.marshal())?;
        Ok(())
    }

    /// Unwrap the encoder, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl Token {
    /// Encode the token to its wire bytes.
    pub fn marshal(&self) -> Vec<u8> {
        self.marshal_string().into_bytes()
    }

    /// Encode the token to its wire string.
    ///
    /// The stored raw payload is written as is, so the output carries the
    /// exact bytes the signatures were made over even if the structured
    /// fields were changed after parsing.
    pub fn marshal_string(&self) -> String {
        let raw_payload = String::from_utf8_lossy(&self.raw_payload);
        let signatures = escape_join(&[
            STANDARD.encode(&self.signature),
            STANDARD.encode(&self.hmac_signature),
        ]);
        let keys = escape_join(&[
            STANDARD.encode(&self.public_key),
            STANDARD.encode(&self.hmac_secret),
        ]);

        escape_join(&[
            &*raw_payload,
            signatures.as_str(),
            keys.as_str(),
            self.email.as_str(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TOKEN: &str = "https://cobased.com%2Chttps://cobased.com%2C%2C1498731060,\
        E5faDp1F3F4AGN2z5NgwZ/e0WB+ukZO3eMRWvTTZc4erts8mMzSy+CxGdz3OW1Xff8p6m\
        DAPfnSK0QqSAAHmAA==%2CcIZjUTqMWYgzYGrsYEHptNiaaLapWiqgPPsG1PI/Rsw=,\
        kdbjcc08YBKWdCY56lQJIi92wcGOW+KcMvbSgHN6WbU=%2C1OVh/+xHRCaebQ9Lz6k\
        OTkTRrVm1xgvxGthABCwCQ8k=,homakov@gmail.com";

    #[test]
    fn test_marshal_unmarshal() {
        let token: Token = TOKEN.parse().unwrap();
        assert_eq!(token.marshal_string(), TOKEN);
        assert_eq!(Token::unmarshal(&token.marshal()).unwrap(), token);
    }

    #[test]
    fn test_marshal_keeps_raw_payload() {
        let mut token: Token = TOKEN.parse().unwrap();
        token.provider = "https://evil.com".into();
        token.email = "someone,else@example.com".into();

        let encoded = token.marshal_string();
        assert!(encoded.starts_with("https://cobased.com%2Chttps://cobased.com%2C%2C1498731060,"));
        assert!(encoded.ends_with(",someone%2Celse@example.com"));

        let decoded = Token::unmarshal(encoded.as_bytes()).unwrap();
        assert_eq!(decoded.raw_payload(), token.raw_payload());
        assert_eq!(decoded.provider, "https://cobased.com");
        assert_eq!(decoded.email, "someone,else@example.com");
    }

    #[test]
    fn test_encoder_writes_token() {
        let token: Token = TOKEN.parse().unwrap();
        let mut encoder = Encoder::new(Vec::new());
        encoder.encode(&token).unwrap();
        assert_eq!(String::from_utf8(encoder.into_inner()).unwrap(), TOKEN);
    }
}
