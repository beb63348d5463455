use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Data of type '{0}' was not recognised")]
    UnrecognizedSourceType(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Cannot round '{0}': value needs exponent notation")]
    RoundingOverflow(String),

    #[error("Not a decimal number: '{0}'")]
    InvalidNumber(String),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
