//! Background Tasks Module
//!
//! Tasks that run alongside the cache, sharing its store.

mod reaper;

pub(crate) use reaper::spawn_reaper;
