//! Filesystem-backed cache for converted PDFs.
//!
//! Entries live in a flat directory as `<sha256-hex>.pdf`, one per distinct
//! source URL. Freshness is judged from the file's modification time:
//!
//! - Content-addressed naming using SHA-256 of the source URL
//! - TTL expiry against last-write time
//! - No locking; concurrent writers for the same URL race and the last one wins

pub mod hash;
pub mod store;

pub use crate::Error;

pub use hash::compute_cache_key;
pub use store::{CacheStore, EntryStatus};
