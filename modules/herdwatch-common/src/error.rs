use thiserror::Error;

#[derive(Error, Debug)]
pub enum HerdwatchError {
    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("no usable outbreak data in the configured files")]
    NoData,

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
