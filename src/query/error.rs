use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Invalid column name: {0}")]
    InvalidColumn(String),

    #[error("Query execution failed: {0}")]
    Execution(#[from] sqlx::Error),

    #[error("Row serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
