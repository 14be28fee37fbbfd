use sna_graph_core::GraphError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IoError>;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("CSV file is empty")]
    EmptyFile,

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}
