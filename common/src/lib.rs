use aws_sdk_s3::primitives::ByteStreamError;
use aws_smithy_runtime_api::client::result::CreateUnhandledError;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_runtime_api::http::Response;
use thiserror::Error;

pub mod config;
pub mod env;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Transfer error: {0}")]
    Transfer(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Warehouse error: {0}")]
    Warehouse(#[from] sqlx::Error),

    #[error("AWS SDK error: {0}")]
    AwsSdk(String),

    #[error("ByteStream error: {0}")]
    ByteStream(#[from] ByteStreamError),

    #[error("{0}")]
    Other(String),
}

// Implement From for various SdkError types
impl<E: std::fmt::Debug + CreateUnhandledError> From<SdkError<E, Response>> for Error {
    fn from(err: SdkError<E, Response>) -> Self {
        Error::AwsSdk(format!("{:?}", err))
    }
}

impl Error {
    /// True for errors that invalidate the whole run rather than a single file.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_) | Error::Config(_))
    }
}
