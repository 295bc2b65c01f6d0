//! Verification options.

use crate::scope::Scope;
use std::collections::HashSet;

/// Parameters for a single token verification.
///
/// Starts with no allowed origins, an empty expected scope and expiry
/// checking on. Builder calls apply in order: origins accumulate, scopes
/// merge key by key, everything else is last-write-wins. Nothing is
/// validated here; contradictory settings just produce whatever the
/// verification steps yield.
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    public_key: Option<Vec<u8>>,
    hmac_secret: Option<Vec<u8>>,
    origins: HashSet<String>,
    scope: Scope,
    change: bool,
    connect: bool,
    hmac: bool,
    expire: bool,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            public_key: None,
            hmac_secret: None,
            origins: HashSet::new(),
            scope: Scope::new(),
            change: false,
            connect: false,
            hmac: false,
            expire: true,
        }
    }
}

impl VerifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add allowed origins for provider and client.
    pub fn with_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.origins.extend(origins.into_iter().map(Into::into));
        self
    }

    /// Add keys to the expected scope, replacing values of keys already set.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope.merge(scope);
        self
    }

    /// Override the token's public key. An empty key is ignored.
    pub fn with_public_key(mut self, public_key: impl Into<Vec<u8>>) -> Self {
        let public_key: Vec<u8> = public_key.into();
        self.public_key = (!public_key.is_empty()).then_some(public_key);
        self
    }

    /// Override the token's HMAC secret. An empty secret is ignored.
    pub fn with_secret(mut self, secret: impl Into<Vec<u8>>) -> Self {
        let secret: Vec<u8> = secret.into();
        self.hmac_secret = (!secret.is_empty()).then_some(secret);
        self
    }

    /// Require a `to` + `mode=change` scope instead of the expected scope.
    pub fn with_change(mut self) -> Self {
        self.change = true;
        self
    }

    /// Connect request: skip the client origin check.
    pub fn with_connect(mut self) -> Self {
        self.connect = true;
        self
    }

    /// Enable HMAC verification.
    pub fn with_hmac(mut self) -> Self {
        self.hmac = true;
        self
    }

    /// Disable expiry checks.
    pub fn without_expire(mut self) -> Self {
        self.expire = false;
        self
    }

    pub fn public_key(&self) -> Option<&[u8]> {
        self.public_key.as_deref()
    }

    pub fn hmac_secret(&self) -> Option<&[u8]> {
        self.hmac_secret.as_deref()
    }

    pub fn allows_origin(&self, origin: &str) -> bool {
        self.origins.contains(origin)
    }

    pub fn origins(&self) -> &HashSet<String> {
        &self.origins
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn change(&self) -> bool {
        self.change
    }

    pub fn connect(&self) -> bool {
        self.connect
    }

    pub fn hmac(&self) -> bool {
        self.hmac
    }

    pub fn expire(&self) -> bool {
        self.expire
    }
}
