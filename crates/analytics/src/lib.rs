//! # Realty Analytics Engine
//!
//! This crate computes the aggregate metrics served by the listings backend:
//! price per square meter, conversion rate, days on market, counts and
//! time-series sales summaries.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of the
//!   datastore or the HTTP layer. It depends only on `core-types` (Layer 0).
//! - **One Engine, Many Metrics:** Every grouped metric goes through the same
//!   `aggregate` function. A metric is a `Reducer`; the grouping keys are a
//!   `GroupBy`. Adding a metric means adding a reducer, not a new code path.
//! - **Stateless Calculation:** `AnalyticsEngine` recomputes every answer from
//!   the rows it is handed. Nothing is cached between calls.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: one method per analytics operation, returning report records.
//! - `aggregate` / `reduce` and the `Reducer` trait: the generic grouping engine.
//! - `report`: the output record shapes.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod grouping;
pub mod reducers;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use grouping::{aggregate, reduce, GroupKey, Reducer};
pub use report::{
    ChartPoint, CityDaysOnMarket, ConversionRateRow, DaysOnMarketReport, GroupDaysOnMarket,
    PricePerAreaRow, PropertyCount, SalesPoint, SalesSummary, SoldVsUnsold, ZonePricePerArea,
    ZoneRow,
};
