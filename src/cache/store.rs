//! Redis store for cached list results.
//!
//! All operations are best-effort. A missing, unreachable, or corrupt
//! cache degrades to a miss; it never fails a request.

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error, info, warn};

use crate::cache::config::CacheConfig;
use crate::cache::keys::{LIST_KEY_PREFIX, list_key};
use crate::domain::entities::SubjectRecord;
use crate::domain::filter::SubjectFilter;

const CONNECT_ATTEMPTS: u32 = 3;
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Read-through cache for filtered subject lists.
#[async_trait]
pub trait ListCache: Send + Sync {
    /// Returns the cached result for `filter`, or `None` on a miss or
    /// any cache failure.
    async fn get_list(&self, filter: &SubjectFilter) -> Option<Vec<SubjectRecord>>;

    /// Stores one list result under the filter's key.
    async fn put_list(&self, filter: &SubjectFilter, subjects: &[SubjectRecord]);

    /// Drops every cached list entry.
    async fn invalidate_lists(&self);
}

pub struct RedisListCache {
    client: redis::Client,
    config: CacheConfig,
}

impl RedisListCache {
    /// Connects to Redis and verifies it answers, retrying a few times
    /// before giving up. `None` means run without a cache.
    pub async fn connect(config: CacheConfig) -> Option<Self> {
        let client = match redis::Client::open(config.url.as_str()) {
            Ok(client) => client,
            Err(error) => {
                error!(
                    target = "misura::cache",
                    error = %error,
                    "invalid cache url, running without cache"
                );
                return None;
            }
        };

        for attempt in 1..=CONNECT_ATTEMPTS {
            match client.get_multiplexed_async_connection().await {
                Ok(mut conn) => {
                    let pong: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;
                    match pong {
                        Ok(_) => {
                            info!(
                                target = "misura::cache",
                                attempt, "cache connection established"
                            );
                            return Some(Self { client, config });
                        }
                        Err(error) => {
                            warn!(
                                target = "misura::cache",
                                attempt,
                                error = %error,
                                "cache ping failed"
                            );
                        }
                    }
                }
                Err(error) => {
                    warn!(
                        target = "misura::cache",
                        attempt,
                        error = %error,
                        "cache connection failed"
                    );
                }
            }
            if attempt < CONNECT_ATTEMPTS {
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
            }
        }

        error!(
            target = "misura::cache",
            attempts = CONNECT_ATTEMPTS,
            "cache unreachable, running without cache"
        );
        None
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => Some(conn),
            Err(error) => {
                debug!(
                    target = "misura::cache",
                    error = %error,
                    "cache connection unavailable"
                );
                None
            }
        }
    }
}

#[async_trait]
impl ListCache for RedisListCache {
    async fn get_list(&self, filter: &SubjectFilter) -> Option<Vec<SubjectRecord>> {
        let key = list_key(filter);
        let mut conn = self.connection().await?;

        let cached: Option<String> = match conn.get(&key).await {
            Ok(value) => value,
            Err(error) => {
                debug!(target = "misura::cache", error = %error, "cache read failed");
                None
            }
        };

        match serde_json::from_str::<Vec<SubjectRecord>>(&cached?) {
            Ok(subjects) => Some(subjects),
            Err(error) => {
                warn!(
                    target = "misura::cache",
                    error = %error,
                    "discarding undecodable cache entry"
                );
                None
            }
        }
    }

    async fn put_list(&self, filter: &SubjectFilter, subjects: &[SubjectRecord]) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let payload = match serde_json::to_string(subjects) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(
                    target = "misura::cache",
                    error = %error,
                    "failed to serialize list for cache"
                );
                return;
            }
        };

        let key = list_key(filter);
        let stored: Result<(), _> = conn.set_ex(&key, payload, self.config.ttl_seconds).await;
        if let Err(error) = stored {
            debug!(target = "misura::cache", error = %error, "cache write failed");
        }
    }

    async fn invalidate_lists(&self) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let pattern = format!("{LIST_KEY_PREFIX}*");
        let mut cursor: u64 = 0;
        let mut removed: usize = 0;

        loop {
            let reply: Result<(u64, Vec<String>), _> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(self.config.scan_count)
                .query_async(&mut conn)
                .await;

            let (next, keys) = match reply {
                Ok(reply) => reply,
                Err(error) => {
                    debug!(
                        target = "misura::cache",
                        error = %error,
                        "cache invalidation scan failed"
                    );
                    return;
                }
            };

            if !keys.is_empty() {
                removed += keys.len();
                let deleted: Result<(), _> = conn.del(&keys).await;
                if let Err(error) = deleted {
                    debug!(
                        target = "misura::cache",
                        error = %error,
                        "cache invalidation delete failed"
                    );
                    return;
                }
            }

            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        debug!(target = "misura::cache", removed, "cache lists invalidated");
    }
}
