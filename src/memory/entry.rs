//! Cache Entry Module
//!
//! Defines the record the in-memory store keeps per key.

use std::time::{Duration, Instant};

// == Entry ==
/// A single stored record: payload bytes plus expiry bookkeeping.
///
/// A zero ttl is the "forever" sentinel: the entry never expires and
/// `expires_at` is ignored.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The stored payload
    payload: Vec<u8>,
    /// Configured time-to-live, zero = forever
    ttl: Duration,
    /// Absolute expiry instant, meaningless when ttl is zero
    expires_at: Instant,
}

impl Entry {
    // == Constructor ==
    /// Creates an entry expiring `ttl` from now.
    pub fn new(payload: Vec<u8>, ttl: Duration) -> Self {
        Self {
            payload,
            ttl,
            expires_at: Instant::now() + ttl,
        }
    }

    /// Returns the stored payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns the configured ttl, zero meaning forever.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Is Expired ==
    /// Checks whether the entry has expired as of `now`.
    ///
    /// An entry is expired once `now` reaches its expiry instant; the
    /// forever sentinel never expires.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        !self.ttl.is_zero() && now >= self.expires_at
    }

    /// Checks whether the entry has expired as of the current instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Refresh ==
    /// Resets the expiry clock to `now + ttl`, replacing the stored ttl.
    pub fn refresh(&mut self, ttl: Duration) {
        self.ttl = ttl;
        self.expires_at = Instant::now() + ttl;
    }
}
