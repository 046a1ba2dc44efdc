use crate::error::DbError;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{NewProperty, Property};

/// The data-access contract for property rows.
///
/// Reads return the full current table (or one zone of it); nothing is cached.
/// Every mutation touches exactly one row and is atomic with respect to that row.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Returns every property, or only those in `zone` when a filter is given.
    async fn list_properties(&self, zone: Option<&str>) -> Result<Vec<Property>, DbError>;

    async fn get_property(&self, id: i64) -> Result<Property, DbError>;

    /// Validates and inserts a new property, returning it with its assigned id.
    async fn create_property(&self, property: NewProperty) -> Result<Property, DbError>;

    /// Records the sale date of a property.
    ///
    /// Fails with `NotFound` for an unknown id and `InvalidSaleDate` when the
    /// date precedes the publication date.
    async fn set_sale_date(&self, id: i64, date_sold: NaiveDate) -> Result<Property, DbError>;

    /// Adds exactly one view to a property. A property with no recorded views
    /// goes to 1.
    async fn increment_view(&self, id: i64) -> Result<Property, DbError>;
}
