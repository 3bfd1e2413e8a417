use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Default lifetime of a cached match list
pub const DEFAULT_MATCH_TTL_SECS: u64 = 3600;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache write timed out after {0:?}")]
    Timeout(Duration),

    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

/// Best-effort key/value store with expiry
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn put(&self, key: &str, payload: String, ttl: Duration) -> Result<(), CacheError>;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Short label for health reporting
    fn mode(&self) -> &'static str;
}

/// L1 entry carrying the lifetime it was written with
#[derive(Debug, Clone)]
struct L1Entry {
    payload: String,
    ttl: Duration,
}

/// Expires each L1 entry after its own `ttl`
struct PerEntryTtl;

impl moka::Expiry<String, L1Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &L1Entry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &L1Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Multi-tier cache manager
///
/// L1 is an in-process moka cache, L2 is Redis shared across instances.
/// Both tiers expire an entry after the `ttl` given to `put`.
/// When Redis cannot be reached at startup the manager runs L1-only.
pub struct CacheManager {
    redis: Option<ConnectionManager>,
    l1_cache: moka::future::Cache<String, L1Entry>,
    default_ttl: Duration,
}

impl CacheManager {
    /// Create a cache manager backed by Redis
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Some(redis),
            l1_cache: Self::build_l1(l1_size),
            default_ttl: Duration::from_secs(ttl_secs),
        })
    }

    /// Create an L1-only cache manager
    pub fn memory_only(l1_size: u64, ttl_secs: u64) -> Self {
        Self {
            redis: None,
            l1_cache: Self::build_l1(l1_size),
            default_ttl: Duration::from_secs(ttl_secs),
        }
    }

    /// Connect to Redis, falling back to L1-only on failure
    pub async fn connect_or_degrade(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Self {
        match Self::new(redis_url, l1_size, ttl_secs).await {
            Ok(cache) => cache,
            Err(e) => {
                tracing::error!("Failed to connect to Redis ({}), running with in-process cache only", e);
                Self::memory_only(l1_size, ttl_secs)
            }
        }
    }

    fn build_l1(l1_size: u64) -> moka::future::Cache<String, L1Entry> {
        moka::future::CacheBuilder::new(l1_size)
            .expire_after(PerEntryTtl)
            .build()
    }

    async fn insert_l1(&self, key: &str, payload: String, ttl: Duration) {
        self.l1_cache
            .insert(key.to_string(), L1Entry { payload, ttl })
            .await;
    }
}

#[async_trait]
impl ResultCache for CacheManager {
    /// Set a value in both tiers
    ///
    /// L1 is only written once Redis has accepted the value, so a failed
    /// put leaves neither tier holding it.
    async fn put(&self, key: &str, payload: String, ttl: Duration) -> Result<(), CacheError> {
        if let Some(redis) = &self.redis {
            let mut conn = redis.clone();
            let _: () = redis::cmd("SETEX")
                .arg(key)
                .arg(ttl.as_secs().max(1))
                .arg(&payload)
                .query_async(&mut conn)
                .await?;
        }

        self.insert_l1(key, payload, ttl).await;

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Get a value from cache (L1 first, then L2)
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        if let Some(entry) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(Some(entry.payload));
        }

        let Some(redis) = &self.redis else {
            tracing::trace!("Cache miss: {}", key);
            return Ok(None);
        };

        let mut conn = redis.clone();
        let (value, pttl_ms): (Option<String>, i64) = redis::pipe()
            .cmd("GET")
            .arg(key)
            .cmd("PTTL")
            .arg(key)
            .query_async(&mut conn)
            .await?;

        if let Some(json) = &value {
            tracing::trace!("L2 cache hit: {}", key);
            // L1 must not outlive the Redis entry it was copied from
            let remaining = u64::try_from(pttl_ms)
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(self.default_ttl);
            self.insert_l1(key, json.clone(), remaining).await;
        } else {
            tracing::trace!("Cache miss: {}", key);
        }

        Ok(value)
    }

    fn mode(&self) -> &'static str {
        if self.redis.is_some() { "redis" } else { "memory" }
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a client's ranked matches
    pub fn matches(client_id: &str) -> String {
        format!("client:{}:matches", client_id)
    }
}
