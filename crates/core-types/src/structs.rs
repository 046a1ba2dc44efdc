use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single listed property, as stored in the `properties` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Property {
    pub id: i64,
    pub date_published: NaiveDate,
    /// Set exactly once, when the unit sells.
    pub date_sold: Option<NaiveDate>,
    pub price: i64,
    pub bedrooms: i32,
    pub bathrooms: f64,
    pub sqm_living: i32,
    pub sqm_lot: i32,
    pub floors: f64,
    /// Number of recorded views. `None` means views were never tracked.
    pub view_count: Option<i32>,
    pub condition: i32,
    pub grade: i32,
    pub sqm_above: i32,
    pub sqm_basement: i32,
    pub yr_built: i32,
    pub yr_renovated: Option<i32>,
    pub lat: f64,
    pub long: f64,
    pub city: String,
    pub zone: String,
}

impl Property {
    pub fn is_sold(&self) -> bool {
        self.date_sold.is_some()
    }

    /// A property counts towards conversion only once it has been viewed.
    pub fn is_viewed(&self) -> bool {
        self.view_count.is_some_and(|v| v > 0)
    }

    /// Whole days between publication and sale, if sold.
    pub fn days_on_market(&self) -> Option<i64> {
        self.date_sold.map(|sold| (sold - self.date_published).num_days())
    }
}

/// The payload used to create a new property. The identifier is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProperty {
    pub date_published: NaiveDate,
    #[serde(default)]
    pub date_sold: Option<NaiveDate>,
    pub price: i64,
    pub bedrooms: i32,
    pub bathrooms: f64,
    pub sqm_living: i32,
    pub sqm_lot: i32,
    pub floors: f64,
    #[serde(default)]
    pub view_count: Option<i32>,
    pub condition: i32,
    pub grade: i32,
    pub sqm_above: i32,
    pub sqm_basement: i32,
    pub yr_built: i32,
    #[serde(default)]
    pub yr_renovated: Option<i32>,
    pub lat: f64,
    pub long: f64,
    pub city: String,
    pub zone: String,
}

impl NewProperty {
    /// Checks the invariants a property must satisfy before it is stored.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.price < 0 {
            return Err(invalid("price", "must not be negative"));
        }
        for (field, value) in [
            ("sqm_living", self.sqm_living),
            ("sqm_lot", self.sqm_lot),
            ("sqm_above", self.sqm_above),
            ("sqm_basement", self.sqm_basement),
        ] {
            if value < 0 {
                return Err(invalid(field, "must not be negative"));
            }
        }
        if self.view_count.is_some_and(|v| v < 0) {
            return Err(invalid("view_count", "must not be negative"));
        }
        if self.city.trim().is_empty() {
            return Err(invalid("city", "must not be empty"));
        }
        if self.zone.trim().is_empty() {
            return Err(invalid("zone", "must not be empty"));
        }
        if let Some(sold) = self.date_sold {
            if sold < self.date_published {
                return Err(invalid("date_sold", "must not be earlier than date_published"));
            }
        }
        Ok(())
    }

    /// Materialises the payload into a stored row with the given identifier.
    pub fn into_property(self, id: i64) -> Property {
        Property {
            id,
            date_published: self.date_published,
            date_sold: self.date_sold,
            price: self.price,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            sqm_living: self.sqm_living,
            sqm_lot: self.sqm_lot,
            floors: self.floors,
            view_count: self.view_count,
            condition: self.condition,
            grade: self.grade,
            sqm_above: self.sqm_above,
            sqm_basement: self.sqm_basement,
            yr_built: self.yr_built,
            yr_renovated: self.yr_renovated,
            lat: self.lat,
            long: self.long,
            city: self.city,
            zone: self.zone,
        }
    }
}

fn invalid(field: &str, reason: &str) -> CoreError {
    CoreError::InvalidInput(field.to_string(), reason.to_string())
}
