//! # securelogin
//!
//! Verification side of the SecureLogin authentication protocol.
//!
//! This crate provides functionality for:
//! - Parsing the comma-delimited, `%2C`-escaped token wire format
//! - Re-encoding tokens byte-for-byte
//! - Verifying the Ed25519 signature and optional HMAC over the signed payload
//! - Checking provider/client origins, expiry and scope against [`VerifyOptions`]
//!
//! ## Verification order
//!
//! | Step | Check | Skipped when | Error |
//! |------|-------|--------------|-------|
//! | 1 | Ed25519 signature | never | `invalid signature` |
//! | 2 | HMAC-SHA-512 (first 32 bytes) | HMAC not enabled | `invalid HMAC signature` |
//! | 3 | provider in origins | never | `invalid provider` |
//! | 4 | client in origins | connect mode | `invalid client` |
//! | 5 | not expired | expiry disabled | `expired token` |
//! | 6 | scope | never | `not mode=change token` / `invalid scope` |
//!
//! The first failing step is returned.
//!
//! ```no_run
//! use securelogin::VerifyOptions;
//!
//! # fn run(wire: &[u8]) -> Result<(), securelogin::Error> {
//! let options = VerifyOptions::new().with_origins(["https://example.com"]);
//! let token = securelogin::verify(wire, &options)?;
//! println!("logged in as {}", token.email);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod escape;
pub mod options;
pub mod scope;
pub mod token;
pub mod verify;

pub use config::VerifierConfig;
pub use decode::{Decoder, unmarshal_str};
pub use encode::Encoder;
pub use error::{ConfigError, Error, FrameError, Group, VerifyError};
pub use options::VerifyOptions;
pub use scope::{Scope, ScopeError};
pub use token::Token;
pub use verify::{HMAC_SIGNATURE_SIZE, PUBLIC_KEY_SIZE, verify};
