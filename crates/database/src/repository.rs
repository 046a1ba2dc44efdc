use crate::error::DbError;
use crate::store::PropertyStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{NewProperty, Property};
use sqlx::postgres::PgPool;

/// SQLSTATE raised when `view_count + 1` leaves the `INTEGER` range.
const NUMERIC_OUT_OF_RANGE: &str = "22003";

// Kept as a macro so every statement below is a `&'static str`.
macro_rules! property_columns {
    () => {
        r#"id, date_published, date_sold, price, bedrooms, bathrooms, sqm_living, sqm_lot,
           floors, view_count, "condition", grade, sqm_above, sqm_basement, yr_built,
           yr_renovated, lat, "long", city, zone"#
    };
}

/// The `DbRepository` provides the PostgreSQL implementation of `PropertyStore`.
/// It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Distinguishes why a guarded update touched no row.
    async fn explain_rejected_sale(&self, id: i64, date_sold: NaiveDate) -> DbError {
        let probe = sqlx::query_scalar::<_, NaiveDate>("SELECT date_published FROM properties WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;

        match probe {
            Ok(Some(date_published)) => DbError::InvalidSaleDate { id, date_sold, date_published },
            Ok(None) => DbError::NotFound(id),
            Err(e) => e.into(),
        }
    }
}

#[async_trait]
impl PropertyStore for DbRepository {
    async fn list_properties(&self, zone: Option<&str>) -> Result<Vec<Property>, DbError> {
        let rows = sqlx::query_as::<_, Property>(concat!(
            "SELECT ",
            property_columns!(),
            " FROM properties WHERE ($1::TEXT IS NULL OR zone = $1) ORDER BY id"
        ))
        .bind(zone)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(rows = rows.len(), zone = ?zone, "Fetched properties.");
        Ok(rows)
    }

    async fn get_property(&self, id: i64) -> Result<Property, DbError> {
        sqlx::query_as::<_, Property>(concat!("SELECT ", property_columns!(), " FROM properties WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::NotFound(id))
    }

    async fn create_property(&self, property: NewProperty) -> Result<Property, DbError> {
        property.validate()?;

        let created = sqlx::query_as::<_, Property>(concat!(
            r#"
            INSERT INTO properties (
                date_published, date_sold, price, bedrooms, bathrooms, sqm_living, sqm_lot,
                floors, view_count, "condition", grade, sqm_above, sqm_basement, yr_built,
                yr_renovated, lat, "long", city, zone
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19
            )
            RETURNING "#,
            property_columns!()
        ))
        .bind(property.date_published)
        .bind(property.date_sold)
        .bind(property.price)
        .bind(property.bedrooms)
        .bind(property.bathrooms)
        .bind(property.sqm_living)
        .bind(property.sqm_lot)
        .bind(property.floors)
        .bind(property.view_count)
        .bind(property.condition)
        .bind(property.grade)
        .bind(property.sqm_above)
        .bind(property.sqm_basement)
        .bind(property.yr_built)
        .bind(property.yr_renovated)
        .bind(property.lat)
        .bind(property.long)
        .bind(&property.city)
        .bind(&property.zone)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(id = created.id, city = %created.city, zone = %created.zone, "Created property.");
        Ok(created)
    }

    async fn set_sale_date(&self, id: i64, date_sold: NaiveDate) -> Result<Property, DbError> {
        // The publication guard lives in the statement itself, so the check and the write are one step.
        let updated = sqlx::query_as::<_, Property>(concat!(
            "UPDATE properties SET date_sold = $2 WHERE id = $1 AND date_published <= $2 RETURNING ",
            property_columns!()
        ))
        .bind(id)
        .bind(date_sold)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(property) => {
                tracing::info!(id, %date_sold, "Recorded sale date.");
                Ok(property)
            }
            None => {
                let err = self.explain_rejected_sale(id, date_sold).await;
                tracing::warn!(id, %date_sold, error = %err, "Sale date rejected.");
                Err(err)
            }
        }
    }

    async fn increment_view(&self, id: i64) -> Result<Property, DbError> {
        let updated = sqlx::query_as::<_, Property>(concat!(
            "UPDATE properties SET view_count = COALESCE(view_count, 0) + 1 WHERE id = $1 RETURNING ",
            property_columns!()
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.code().as_deref() == Some(NUMERIC_OUT_OF_RANGE) => {
                DbError::ViewCountOverflow(id)
            }
            other => DbError::from(other),
        })?;

        match updated {
            Some(property) => {
                tracing::debug!(id, view_count = ?property.view_count, "Incremented view count.");
                Ok(property)
            }
            None => {
                tracing::warn!(id, "View increment for unknown property.");
                Err(DbError::NotFound(id))
            }
        }
    }
}
