use crate::{error::AppError, AppState};
use analytics::{
    ChartPoint, ConversionRateRow, DaysOnMarketReport, PricePerAreaRow, PropertyCount,
    SalesSummary, SoldVsUnsold, ZonePricePerArea, ZoneRow,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use core_types::{GroupBy, NewProperty, Property};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ZoneFilter {
    pub zone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Grouping {
    pub group_by: Option<String>,
}

impl Grouping {
    fn resolve(&self, default: GroupBy) -> Result<GroupBy, AppError> {
        match self.group_by.as_deref() {
            None | Some("") => Ok(default),
            Some(raw) => Ok(raw.parse()?),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SaleDateBody {
    pub date_sold: NaiveDate,
}

// ==============================================================================
// Properties
// ==============================================================================

/// # GET /api/properties
pub async fn list_properties(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ZoneFilter>,
) -> Result<Json<Vec<Property>>, AppError> {
    let properties = state.analyzer.list_properties(filter.zone.as_deref()).await?;
    Ok(Json(properties))
}

/// # GET /api/properties/:id
pub async fn get_property(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Property>, AppError> {
    let property = state.store.get_property(id).await?;
    Ok(Json(property))
}

/// # POST /api/properties
pub async fn create_property(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewProperty>,
) -> Result<(StatusCode, Json<Property>), AppError> {
    let created = state.store.create_property(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// # PUT /api/properties/:id/sale-date
pub async fn set_sale_date(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<SaleDateBody>,
) -> Result<Json<Property>, AppError> {
    let updated = state.store.set_sale_date(id, body.date_sold).await?;
    Ok(Json(updated))
}

/// # POST /api/properties/:id/views
pub async fn increment_view(
    Path(id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Property>, AppError> {
    let updated = state.store.increment_view(id).await?;
    Ok(Json(updated))
}

// ==============================================================================
// Analytics
// ==============================================================================

/// # GET /api/analytics/price-per-area?group_by=city|zone|city_zone
pub async fn price_per_area(
    State(state): State<Arc<AppState>>,
    Query(grouping): Query<Grouping>,
) -> Result<Json<Vec<PricePerAreaRow>>, AppError> {
    let group_by = grouping.resolve(GroupBy::CityZone)?;
    Ok(Json(state.analyzer.price_per_area(group_by).await?))
}

/// # GET /api/analytics/charts
pub async fn charts_data(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ChartPoint>>, AppError> {
    Ok(Json(state.analyzer.charts_data().await?))
}

/// # GET /api/analytics/conversion-rate
pub async fn conversion_rate(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ConversionRateRow>>, AppError> {
    Ok(Json(state.analyzer.conversion_rate().await?))
}

/// # GET /api/analytics/days-on-market?group_by=city|zone|city_zone
/// Whole days for `city`, two decimals for the zone-level groupings.
pub async fn days_on_market(
    State(state): State<Arc<AppState>>,
    Query(grouping): Query<Grouping>,
) -> Result<Json<DaysOnMarketReport>, AppError> {
    let group_by = grouping.resolve(GroupBy::City)?;
    Ok(Json(state.analyzer.days_on_market(group_by).await?))
}

/// # GET /api/analytics/zones/:zone/sold-vs-unsold
pub async fn sold_vs_unsold(
    Path(zone): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SoldVsUnsold>, AppError> {
    Ok(Json(state.analyzer.sold_vs_unsold(&zone).await?))
}

/// # GET /api/analytics/zones/:zone/price-per-area
pub async fn zone_price_per_area(
    Path(zone): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ZonePricePerArea>, AppError> {
    Ok(Json(state.analyzer.zone_price_per_area(&zone).await?))
}

/// # GET /api/analytics/zones
pub async fn distinct_zones(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ZoneRow>>, AppError> {
    Ok(Json(state.analyzer.distinct_zones().await?))
}

/// # GET /api/analytics/property-counts
pub async fn property_counts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PropertyCount>>, AppError> {
    Ok(Json(state.analyzer.property_counts().await?))
}

/// # GET /api/analytics/sales-summary
pub async fn sales_summary(State(state): State<Arc<AppState>>) -> Result<Json<SalesSummary>, AppError> {
    Ok(Json(state.analyzer.sales_summary().await?))
}
