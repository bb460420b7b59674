//! Anti-forgery gating for POST and PUT.
//!
//! Handlers for guarded methods receive a [`Guarded`] exchange. The first
//! form or query read triggers validation of the request's anti-forgery
//! token; until it succeeds no field value leaves the wrapper.

use std::cell::OnceCell;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, warn};

use crate::route::context::{Context, Exchange};
use crate::route::signal::Signal;

pub const TOKEN_HEADER: &str = "X-Request-Verification-Token";
pub const TOKEN_FIELD: &str = "__RequestVerificationToken";

/// Verifies anti-forgery tokens.
pub trait Protector: Send + Sync {
    fn verify(&self, token: &str) -> bool;
}

/// Rejects every token. Used when no key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct RejectAll;

impl Protector for RejectAll {
    fn verify(&self, _token: &str) -> bool {
        false
    }
}

type HmacSha256 = Hmac<Sha256>;

/// Tokens of the form `nonce.tag` with `tag = hex(hmac_sha256(key, nonce))`.
#[derive(Clone)]
pub struct KeyedProtector {
    key: Vec<u8>,
}

impl KeyedProtector {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    pub fn issue(&self, nonce: &str) -> String {
        let tag = self
            .keyed(nonce)
            .map(|mac| hex::encode(mac.finalize().into_bytes()))
            .unwrap_or_default();
        format!("{nonce}.{tag}")
    }

    fn keyed(&self, nonce: &str) -> Option<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.key).ok()?;
        mac.update(nonce.as_bytes());
        Some(mac)
    }
}

impl Protector for KeyedProtector {
    /// The tag comparison runs in constant time.
    fn verify(&self, token: &str) -> bool {
        let Some((nonce, tag)) = token.rsplit_once('.') else {
            return false;
        };
        if nonce.is_empty() {
            return false;
        }
        let Ok(tag) = hex::decode(tag) else {
            return false;
        };

        self.keyed(nonce)
            .is_some_and(|mac| mac.verify_slice(&tag).is_ok())
    }
}

/// Exchange wrapper that withholds fields until the token checks out.
pub struct Guarded<'a, 'r> {
    inner: &'a Context<'r>,
    protector: &'a dyn Protector,
    verdict: OnceCell<bool>,
}

impl<'a, 'r> Guarded<'a, 'r> {
    pub fn new(inner: &'a Context<'r>, protector: &'a dyn Protector) -> Self {
        Self {
            inner,
            protector,
            verdict: OnceCell::new(),
        }
    }

    /// Whether validation has run yet.
    pub fn is_checked(&self) -> bool {
        self.verdict.get().is_some()
    }

    fn release(&self) -> Result<(), Signal> {
        let valid = *self.verdict.get_or_init(|| self.validate());
        if valid {
            Ok(())
        } else {
            Err(Signal::forbidden("anti-forgery token missing or invalid"))
        }
    }

    fn validate(&self) -> bool {
        let token = self
            .inner
            .header(TOKEN_HEADER)
            .or_else(|| self.inner.raw_form(TOKEN_FIELD));

        match token {
            Some(token) if self.protector.verify(token) => {
                debug!(path = %self.inner.path(), "anti-forgery token accepted");
                true
            }
            Some(_) => {
                warn!(path = %self.inner.path(), "anti-forgery token rejected");
                false
            }
            None => {
                warn!(path = %self.inner.path(), "anti-forgery token missing");
                false
            }
        }
    }
}

impl Exchange for Guarded<'_, '_> {
    fn method_name(&self) -> &str {
        self.inner.method_name()
    }

    fn path(&self) -> &str {
        self.inner.path()
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.inner.header(name)
    }

    fn form(&self, key: &str) -> Result<Option<&str>, Signal> {
        self.release()?;
        Ok(self.inner.raw_form(key))
    }

    fn query(&self, key: &str) -> Result<Option<&str>, Signal> {
        self.release()?;
        Ok(self.inner.raw_query(key))
    }
}
