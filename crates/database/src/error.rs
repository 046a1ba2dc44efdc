use chrono::NaiveDate;
use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Database operation failed: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Property {0} was not found.")]
    NotFound(i64),

    #[error("Sale date {date_sold} for property {id} is earlier than its publication date {date_published}.")]
    InvalidSaleDate {
        id: i64,
        date_sold: NaiveDate,
        date_published: NaiveDate,
    },

    #[error("View count of property {0} is already at its maximum.")]
    ViewCountOverflow(i64),

    #[error("Invalid property: {0}")]
    Validation(#[from] CoreError),
}
