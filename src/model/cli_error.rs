use super::AssemblyError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("failure reading run configuration: {0}")]
    ConfigurationError(String),
    #[error("failure assembling areas: {source}")]
    AssemblyError {
        #[from]
        source: AssemblyError,
    },
    #[error("failure reading file: {source}")]
    StdIoError {
        #[from]
        source: std::io::Error,
    },
    #[error("failure decoding JSON: {source}")]
    SerdeJsonError {
        #[from]
        source: serde_json::Error,
    },
    #[error("failure writing to file {0}: {1}")]
    CsvWriteError(String, csv::Error),
}
