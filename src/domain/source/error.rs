/// Invariant violations detected while building the registry.
/// These are raised at startup and abort the process.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate source key: {0}")]
    DuplicateKey(String),
    #[error("source {key} has an invalid listing URL: {url}")]
    InvalidListingUrl { key: String, url: String },
    #[error("no sources registered")]
    Empty,
    #[error("failed to load sources: {0}")]
    Load(String),
}
