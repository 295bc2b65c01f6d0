//! Error types for the SecureLogin crate.

use std::fmt;
use thiserror::Error;

/// The part of the wire token a parse error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    /// The whole token.
    Token,
    /// The signed payload (provider, client, scope, expiry).
    Payload,
    /// The Ed25519 signature and HMAC signature pair.
    Signatures,
    /// The public key and HMAC secret pair.
    Keys,
}

impl Group {
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Token => "token",
            Group::Payload => "payload",
            Group::Signatures => "signatures",
            Group::Keys => "keys",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wrong number of fields after splitting an escaped list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected {expected} elements, got {actual}")]
pub struct FrameError {
    pub expected: usize,
    pub actual: usize,
}

/// Reasons a parsed token is rejected.
///
/// Verification stops at the first failing check, so exactly one of these is
/// ever reported for a given call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// Ed25519 signature did not verify (including malformed key or signature).
    #[error("invalid signature")]
    InvalidSignature,

    /// HMAC over the payload did not match.
    #[error("invalid HMAC signature")]
    InvalidHmacSignature,

    /// Provider is not an allowed origin.
    #[error("invalid provider")]
    InvalidProvider,

    /// Client is not an allowed origin.
    #[error("invalid client")]
    InvalidClient,

    /// Token is past its expiry.
    #[error("expired token")]
    ExpiredToken,

    /// Change mode was requested but the scope is not `to` + `mode=change`.
    #[error("not mode=change token")]
    NotModeChange,

    /// Scope differs from the expected scope.
    #[error("invalid scope")]
    InvalidScope,
}

/// Errors that can occur while reading, writing or verifying a token.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrong field count at one of the splitting levels.
    #[error("token unmarshal failed: in {group} expected {expected} elements, got {actual}")]
    Frame {
        group: Group,
        expected: usize,
        actual: usize,
    },

    /// Scope is not a valid query string.
    #[error("token unmarshal failed: in {group} parsing scope failed")]
    ScopeParse { group: Group },

    /// Expiry is not a valid Unix timestamp.
    #[error("token unmarshal failed: in {group} invalid expire time")]
    ExpiryParse { group: Group },

    /// Base64 decoding of a key or signature failed.
    #[error("token unmarshal failed: in {group} {source}")]
    Decode {
        group: Group,
        #[source]
        source: base64::DecodeError,
    },

    /// Input bytes are not UTF-8 text.
    #[error("token unmarshal failed: in {group} invalid UTF-8")]
    Utf8 { group: Group },

    /// Token parsed but failed verification.
    #[error(transparent)]
    Verify(#[from] VerifyError),

    /// IO error (stream adapters).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn frame(group: Group, err: FrameError) -> Self {
        Error::Frame {
            group,
            expected: err.expected,
            actual: err.actual,
        }
    }

    /// The token group a parse error refers to, if any.
    pub fn group(&self) -> Option<Group> {
        match self {
            Error::Frame { group, .. }
            | Error::ScopeParse { group }
            | Error::ExpiryParse { group }
            | Error::Utf8 { group }
            | Error::Decode { group, .. } => Some(*group),
            Error::Verify(_) | Error::Io(_) => None,
        }
    }

    /// The verification failure, if this error is one.
    pub fn verify_error(&self) -> Option<VerifyError> {
        match self {
            Error::Verify(kind) => Some(*kind),
            _ => None,
        }
    }
}

/// Errors that can occur while loading a verifier configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse the YAML document.
    #[error("failed to parse verifier config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A configured key is not valid base64.
    #[error("invalid {what} encoding: {source}")]
    KeyEncoding {
        what: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    /// A key source is configured but yields no key.
    #[error("{what} is configured but no value was found")]
    MissingKey { what: &'static str },

    /// IO error (reading config or key files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
