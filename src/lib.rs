//! anycache - a pluggable key-value cache abstraction
//!
//! Drivers implement the byte-level [`Driver`] contract; the [`Cache`]
//! extension trait layers typed, serializer-dispatched access on top, so
//! the in-process [`Memory`] driver and remote backends are
//! interchangeable. The memory driver offers TTL expiration (lazy plus an
//! optional background reaper), atomic counters, and key namespacing
//! through [`Prefixed`].
//!
//! ```
//! use std::time::Duration;
//! use anycache::{Cache, Counter, Driver, Memory, FOREVER};
//!
//! let cache = Memory::new();
//! cache.set("greeting", &"hello".to_string(), FOREVER).unwrap();
//! assert_eq!(cache.get::<String>("greeting").unwrap(), "hello");
//!
//! let (value, hits, existed) = cache.counter("hits", Duration::from_secs(60)).unwrap();
//! assert_eq!((value, existed), (0, false));
//! assert_eq!(hits.apply(1).unwrap(), 1);
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod memory;
pub mod prefix;
pub mod serialize;

mod tasks;

pub use config::MemoryConfig;
pub use driver::{Cache, Counter, Driver, FOREVER};
pub use error::{CacheError, Result, SerializeError};
pub use memory::Memory;
pub use prefix::Prefixed;
pub use serialize::{BinaryCodec, CacheValue, TextCodec};
