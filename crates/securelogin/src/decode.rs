//! Parsing the SecureLogin wire format.
//!
//! ```text
//! <payload>,<b64 signature>%2C<b64 hmac signature>,<b64 public key>%2C<b64 hmac secret>,<email>
//! payload = <provider>,<client>,<urlencoded scope>,<expire unix seconds>
//! ```

use crate::error::{Error, Group};
use crate::escape::unescape_split_n;
use crate::scope::Scope;
use crate::token::Token;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::DateTime;
use std::io::Read;
use std::str::FromStr;

/// Reads a whole token from an input stream and parses it.
pub struct Decoder<R> {
    reader: R,
}

impl<R: Read> Decoder<R> {
    /// Create a decoder that reads from `reader`.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read the reader to the end and parse the result as a token.
    pub fn decode(&mut self) -> Result<Token, Error> {
        let mut data = Vec::new();
        self.reader.read_to_end(&mut data)?;
        Token::unmarshal(&data)
    }

    /// Unwrap the decoder, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl Token {
    /// Parse a token from its wire bytes.
    pub fn unmarshal(data: &[u8]) -> Result<Token, Error> {
        let s = std::str::from_utf8(data).map_err(|_| Error::Utf8 {
            group: Group::Token,
        })?;
        unmarshal_str(s)
    }
}

impl FromStr for Token {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        unmarshal_str(s)
    }
}

/// Parse a token from its wire string.
///
/// Either every field is populated or an error naming the failing group is
/// returned.
pub fn unmarshal_str(s: &str) -> Result<Token, Error> {
    let result = parse(s);
    if let Err(e) = &result {
        tracing::debug!(group = ?e.group(), error = %e, "Token unmarshal failed");
    }
    result
}

fn parse(s: &str) -> Result<Token, Error> {
    let [raw_payload, signatures, keys, email] =
        unescape_split_n(s).map_err(|e| Error::frame(Group::Token, e))?;

    let [provider, client, scope, expire] =
        unescape_split_n(&raw_payload).map_err(|e| Error::frame(Group::Payload, e))?;

    let scope = Scope::parse_query(&scope).map_err(|_| Error::ScopeParse {
        group: Group::Payload,
    })?;

    let expire_at = expire
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or(Error::ExpiryParse {
            group: Group::Payload,
        })?;

    let [signature, hmac_signature] = decode_pair(&signatures, Group::Signatures)?;
    let [public_key, hmac_secret] = decode_pair(&keys, Group::Keys)?;

    Ok(Token {
        raw_payload: raw_payload.into_bytes(),
        provider,
        client,
        scope,
        expire_at,
        public_key,
        hmac_secret,
        signature,
        hmac_signature,
        email,
    })
}

/// Split a `%2C`-joined pair and base64-decode both halves.
fn decode_pair(s: &str, group: Group) -> Result<[Vec<u8>; 2], Error> {
    let [first, second] = unescape_split_n(s).map_err(|e| Error::frame(group, e))?;

    let decode = |value: &str| {
        STANDARD
            .decode(value)
            .map_err(|source| Error::Decode { group, source })
    };

    Ok([decode(&first)?, decode(&second)?])
}
