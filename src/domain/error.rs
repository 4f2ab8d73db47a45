use super::metadata::MetadataError;

pub type LoadBalancerResult<T> = Result<T, LoadBalancerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoadBalancerError {
    #[error("{0}")]
    ConfigError(String),
    #[error("Unable to parse command flags.")]
    InvalidFlags,
    #[error("Unable to determine AWS instance ID.")]
    InstanceIdUnavailable(#[source] MetadataError),
    /// Error string reported by the load balancing API.
    #[error("{0}")]
    ApiError(String),
}
