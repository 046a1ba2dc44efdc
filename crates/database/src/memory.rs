//! In-memory `PropertyStore`.
//!
//! Rows live in a `tokio::sync::RwLock` and are lost when the process exits.
//! Each mutation runs under one write guard, which gives it the same
//! single-row atomicity as the PostgreSQL statements.

use crate::error::DbError;
use crate::store::PropertyStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{NewProperty, Property};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Property>,
    next_id: i64,
}

impl Table {
    fn find_mut(&mut self, id: i64) -> Result<&mut Property, DbError> {
        self.rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DbError::NotFound(id))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    table: Arc<RwLock<Table>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated with `rows`. Later inserts continue after the highest id.
    pub fn with_properties(rows: Vec<Property>) -> Self {
        let next_id = rows.iter().map(|p| p.id).max().unwrap_or(0);
        Self {
            table: Arc::new(RwLock::new(Table { rows, next_id })),
        }
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PropertyStore for InMemoryRepository {
    async fn list_properties(&self, zone: Option<&str>) -> Result<Vec<Property>, DbError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|p| zone.is_none_or(|z| p.zone == z))
            .cloned()
            .collect())
    }

    async fn get_property(&self, id: i64) -> Result<Property, DbError> {
        let table = self.table.read().await;
        table
            .rows
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(DbError::NotFound(id))
    }

    async fn create_property(&self, property: NewProperty) -> Result<Property, DbError> {
        property.validate()?;

        let mut table = self.table.write().await;
        table.next_id += 1;
        let created = property.into_property(table.next_id);
        table.rows.push(created.clone());
        Ok(created)
    }

    async fn set_sale_date(&self, id: i64, date_sold: NaiveDate) -> Result<Property, DbError> {
        let mut table = self.table.write().await;
        let row = table.find_mut(id)?;
        if date_sold < row.date_published {
            return Err(DbError::InvalidSaleDate {
                id,
                date_sold,
                date_published: row.date_published,
            });
        }
        row.date_sold = Some(date_sold);
        Ok(row.clone())
    }

    async fn increment_view(&self, id: i64) -> Result<Property, DbError> {
        let mut table = self.table.write().await;
        let row = table.find_mut(id)?;
        let views = row.view_count.unwrap_or(0).checked_add(1).ok_or(DbError::ViewCountOverflow(id))?;
        row.view_count = Some(views);
        Ok(row.clone())
    }
}
