use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read the CSV source: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse the CSV structure: {0}")]
    Csv(#[from] csv::Error),
}
