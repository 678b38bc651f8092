/// Storage-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[cfg(feature = "rocks")]
    #[error("rocksdb error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value is not valid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stored value is not valid utf-8 at key {0}")]
    Encoding(String),

    #[error("stored value is not a counter at key {0}")]
    NotACounter(String),
}
