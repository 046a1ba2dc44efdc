use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Unknown grouping '{0}' (expected one of: city, zone, city_zone)")]
    UnknownGrouping(String),
}
