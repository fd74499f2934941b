/// A failed call to one of the external vendors.
#[derive(thiserror::Error, Debug, Clone, serde::Deserialize, serde::Serialize)]
#[error("{vendor} {operation} request failed: {message}")]
pub struct ProviderRequestError {
    pub vendor: String,
    pub operation: String,
    pub message: String,
}

impl ProviderRequestError {
    pub fn new(vendor: &str, operation: &str, message: impl std::fmt::Display) -> Self {
        Self {
            vendor: vendor.to_string(),
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("{0}")]
    Generic(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Provider(#[from] ProviderRequestError),
}

pub type SeoResult<T> = std::result::Result<T, Error>;
