use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectorError {
    #[error("No data available - load a roster before selecting winners")]
    NoData,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T> = std::result::Result<T, SelectorError>;
