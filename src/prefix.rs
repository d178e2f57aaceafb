//! Prefix Decorator Module
//!
//! Namespaces every key of a wrapped driver under a fixed string prefix.

use std::any::Any;
use std::time::Duration;

use crate::driver::{Counter, Driver};
use crate::error::Result;

// == Prefixed ==
/// Key-namespacing decorator over any [`Driver`].
///
/// Every operation prepends the prefix and delegates unchanged, so
/// `Prefixed::new(base, "app_").set("k", ..)` is observable in `base`
/// under `"app_k"`. Compose decorators with [`Prefixed::nest`], which
/// concatenates prefixes instead of stacking another indirection layer:
///
/// ```
/// use anycache::{Cache, Driver, Memory, Prefixed, FOREVER};
///
/// let p2 = Prefixed::new(Memory::new(), "a").nest("b");
/// p2.set("k", &1u64, FOREVER).unwrap();
/// assert!(p2.inner().exists("abk"));
/// ```
///
/// `clean`, `close` and `native` act on the whole inner driver; a clean
/// through a prefixed handle empties every namespace, not just its own.
pub struct Prefixed<C> {
    prefix: String,
    inner: C,
}

impl<C: Driver> Prefixed<C> {
    // == Constructor ==
    /// Wraps `inner`, namespacing keys under `prefix`.
    pub fn new(inner: C, prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            inner,
        }
    }

    // == Nest ==
    /// Composes a further namespace onto this decorator.
    ///
    /// The new prefix is appended after the existing one ("a" nested
    /// with "b" yields "ab") and the result still delegates directly to
    /// the innermost driver.
    pub fn nest(mut self, prefix: &str) -> Self {
        self.prefix.push_str(prefix);
        self
    }

    /// The wrapped driver.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// The effective key prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl<C: Driver> Driver for Prefixed<C> {
    fn get_raw(&self, key: &str) -> Result<Vec<u8>> {
        self.inner.get_raw(&self.full_key(key))
    }

    fn set_raw(&self, key: &str, payload: Vec<u8>, ttl: Duration) -> Result<()> {
        self.inner.set_raw(&self.full_key(key), payload, ttl)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.inner.delete(&self.full_key(key))
    }

    fn exists(&self, key: &str) -> bool {
        self.inner.exists(&self.full_key(key))
    }

    fn touch(&self, key: &str, ttl: Duration) -> Result<()> {
        self.inner.touch(&self.full_key(key), ttl)
    }

    fn counter(&self, key: &str, ttl: Duration) -> Result<(u64, Box<dyn Counter>, bool)> {
        self.inner.counter(&self.full_key(key), ttl)
    }

    fn clean(&self) -> Result<()> {
        self.inner.clean()
    }

    fn close(&self) -> Result<()> {
        self.inner.close()
    }

    fn native(&self) -> &dyn Any {
        self.inner.native()
    }
}
