use crate::error::AnalyzerError;
use analytics::{
    AnalyticsEngine, ChartPoint, ConversionRateRow, DaysOnMarketReport, PricePerAreaRow,
    PropertyCount, SalesSummary, SoldVsUnsold, ZonePricePerArea, ZoneRow,
};
use core_types::{GroupBy, Property};
use database::PropertyStore;
use std::sync::Arc;

pub mod error;

/// Runs the analytics operations against a property store.
///
/// Every call fetches the rows it needs, hands them to the stateless
/// `AnalyticsEngine` and returns the shaped records. No snapshot is kept between calls.
#[derive(Clone)]
pub struct Analyzer {
    store: Arc<dyn PropertyStore>,
    engine: AnalyticsEngine,
}

impl Analyzer {
    pub fn new(store: Arc<dyn PropertyStore>) -> Self {
        Self {
            store,
            engine: AnalyticsEngine::new(),
        }
    }

    async fn fetch(&self, zone: Option<&str>) -> Result<Vec<Property>, AnalyzerError> {
        let rows = self.store.list_properties(zone).await?;
        if rows.is_empty() {
            tracing::debug!(zone = ?zone, "No properties matched; returning an empty result.");
        }
        Ok(rows)
    }

    pub async fn list_properties(&self, zone: Option<&str>) -> Result<Vec<Property>, AnalyzerError> {
        self.fetch(zone).await
    }

    pub async fn price_per_area(&self, group_by: GroupBy) -> Result<Vec<PricePerAreaRow>, AnalyzerError> {
        let rows = self.fetch(None).await?;
        Ok(self.engine.price_per_area(&rows, group_by))
    }

    pub async fn charts_data(&self) -> Result<Vec<ChartPoint>, AnalyzerError> {
        let rows = self.fetch(None).await?;
        Ok(self.engine.charts_data(&rows))
    }

    pub async fn conversion_rate(&self) -> Result<Vec<ConversionRateRow>, AnalyzerError> {
        let rows = self.fetch(None).await?;
        Ok(self.engine.conversion_rate(&rows))
    }

    pub async fn days_on_market(&self, group_by: GroupBy) -> Result<DaysOnMarketReport, AnalyzerError> {
        let rows = self.fetch(None).await?;
        Ok(self.engine.days_on_market(&rows, group_by))
    }

    pub async fn sold_vs_unsold(&self, zone: &str) -> Result<SoldVsUnsold, AnalyzerError> {
        let rows = self.fetch(Some(zone)).await?;
        Ok(self.engine.sold_vs_unsold(zone, &rows))
    }

    pub async fn zone_price_per_area(&self, zone: &str) -> Result<ZonePricePerArea, AnalyzerError> {
        let rows = self.fetch(Some(zone)).await?;
        Ok(self.engine.zone_price_per_area(zone, &rows))
    }

    pub async fn distinct_zones(&self) -> Result<Vec<ZoneRow>, AnalyzerError> {
        let rows = self.fetch(None).await?;
        Ok(self.engine.distinct_zones(&rows))
    }

    pub async fn property_counts(&self) -> Result<Vec<PropertyCount>, AnalyzerError> {
        let rows = self.fetch(None).await?;
        Ok(self.engine.property_counts(&rows))
    }

    pub async fn sales_summary(&self) -> Result<SalesSummary, AnalyzerError> {
        let rows = self.fetch(None).await?;
        Ok(self.engine.sales_summary(&rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::NewProperty;
    use database::InMemoryRepository;
    use rust_decimal_macros::dec;

    fn listing(zone: &str, price: i64, sqm_living: i32) -> NewProperty {
        NewProperty {
            date_published: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            date_sold: None,
            price,
            bedrooms: 2,
            bathrooms: 1.0,
            sqm_living,
            sqm_lot: 200,
            floors: 1.0,
            view_count: None,
            condition: 3,
            grade: 7,
            sqm_above: sqm_living.max(0),
            sqm_basement: 0,
            yr_built: 1990,
            yr_renovated: None,
            lat: 47.0,
            long: -122.0,
            city: "Renton".to_string(),
            zone: zone.to_string(),
        }
    }

    async fn seeded() -> (Arc<InMemoryRepository>, Analyzer) {
        let store = Arc::new(InMemoryRepository::new());
        for (zone, price, area) in [("A", 100_000, 50), ("A", 200_000, 0), ("A", 150_000, 30), ("B", 90_000, 45)] {
            store.create_property(listing(zone, price, area)).await.unwrap();
        }
        let analyzer = Analyzer::new(store.clone());
        (store, analyzer)
    }

    #[tokio::test]
    async fn zone_price_per_area_uses_only_that_zone() {
        let (_, analyzer) = seeded().await;
        let out = analyzer.zone_price_per_area("A").await.unwrap();
        assert_eq!(out.avg_price_per_area, Some(dec!(3500.00)));

        let empty = analyzer.zone_price_per_area("Z").await.unwrap();
        assert_eq!(empty.zone, "Z");
        assert_eq!(empty.avg_price_per_area, None);
    }

    #[tokio::test]
    async fn sold_vs_unsold_reflects_writes_immediately() {
        let (store, analyzer) = seeded().await;
        assert_eq!(analyzer.sold_vs_unsold("A").await.unwrap().sold_count, 0);

        store
            .set_sale_date(1, NaiveDate::from_ymd_opt(2023, 3, 1).unwrap())
            .await
            .unwrap();

        let out = analyzer.sold_vs_unsold("A").await.unwrap();
        assert_eq!((out.sold_count, out.unsold_count), (1, 2));
    }

    #[tokio::test]
    async fn conversion_rate_follows_views_and_sales() {
        let (store, analyzer) = seeded().await;
        assert!(analyzer.conversion_rate().await.unwrap().is_empty());

        store.increment_view(1).await.unwrap();
        store.increment_view(2).await.unwrap();
        store
            .set_sale_date(1, NaiveDate::from_ymd_opt(2023, 2, 1).unwrap())
            .await
            .unwrap();

        let out = analyzer.conversion_rate().await.unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].city, "Renton");
        assert_eq!(out[0].conversion_rate_percent, dec!(50));
    }

    #[tokio::test]
    async fn distinct_zones_is_idempotent() {
        let (_, analyzer) = seeded().await;
        let first = analyzer.distinct_zones().await.unwrap();
        let second = analyzer.distinct_zones().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[tokio::test]
    async fn days_on_market_shape_follows_grouping() {
        let (store, analyzer) = seeded().await;
        store
            .set_sale_date(4, NaiveDate::from_ymd_opt(2023, 1, 16).unwrap())
            .await
            .unwrap();

        match analyzer.days_on_market(GroupBy::City).await.unwrap() {
            DaysOnMarketReport::Whole(rows) => assert_eq!(rows[0].avg_days, 15),
            other => panic!("unexpected shape: {other:?}"),
        }
        match analyzer.days_on_market(GroupBy::CityZone).await.unwrap() {
            DaysOnMarketReport::Rounded(rows) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].zone.as_deref(), Some("B"));
                assert_eq!(rows[0].avg_days, dec!(15));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[tokio::test]
    async fn counts_and_summary_over_full_table() {
        let (store, analyzer) = seeded().await;
        store
            .set_sale_date(3, NaiveDate::from_ymd_opt(2023, 7, 4).unwrap())
            .await
            .unwrap();

        let counts = analyzer.property_counts().await.unwrap();
        assert_eq!(counts.iter().map(|c| c.count).sum::<u64>(), 4);

        let summary = analyzer.sales_summary().await.unwrap();
        assert_eq!(summary.monthly.len(), 1);
        assert_eq!(summary.monthly[0].date, "2023-07");
        assert_eq!(summary.yearly[0].total, 150_000);

        assert_eq!(analyzer.list_properties(Some("B")).await.unwrap().len(), 1);
        assert_eq!(analyzer.price_per_area(GroupBy::Zone).await.unwrap().len(), 2);
        assert_eq!(analyzer.charts_data().await.unwrap().len(), 2);
    }
}
