/// Errors raised while loading or saving indexer configuration.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
