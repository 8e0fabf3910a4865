use thiserror::Error;

/// Cache backend failures. Callers on the read path log these and move on.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid cache url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: redis::RedisError,
    },
}
