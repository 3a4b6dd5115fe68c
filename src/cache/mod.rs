//! Redis-backed cache for filtered subject lists.
//!
//! Every cached entry is one serialized list result keyed by the
//! canonical rendering of its filter, under a shared `subject:` prefix
//! so mutations can invalidate the whole family in one sweep.
//!
//! The cache is strictly best-effort: a Redis that is down, slow, or
//! holding garbage is treated as a cache miss, never as an error.
//!
//! ## Configuration
//!
//! Cache behavior is controlled via `misura.toml`:
//!
//! ```toml
//! [cache]
//! enabled = true
//! url = "redis://127.0.0.1:6379/1"
//! ttl_seconds = 300
//! ```

mod config;
mod keys;
mod store;

pub use config::CacheConfig;
pub use keys::{LIST_KEY_PREFIX, list_key};
pub use store::{ListCache, RedisListCache};
