use crate::grouping::{aggregate, reduce};
use crate::reducers::{
    ConversionRate, Count, DaysOnMarketRounded, DaysOnMarketWhole, PricePerArea, SoldUnsold,
};
use crate::report::{
    ChartPoint, CityDaysOnMarket, ConversionRateRow, DaysOnMarketReport, GroupDaysOnMarket,
    PricePerAreaRow, PropertyCount, SalesPoint, SalesSummary, SoldVsUnsold, ZonePricePerArea,
    ZoneRow,
};
use chrono::Datelike;
use core_types::{GroupBy, Property};
use std::collections::{BTreeMap, BTreeSet};

/// A stateless calculator for deriving listing metrics from property rows.
///
/// Every method takes the full row set it should work on and recomputes from
/// scratch. Zone-scoped methods expect rows already filtered to that zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Average price per square meter, grouped by `group_by`.
    pub fn price_per_area(&self, properties: &[Property], group_by: GroupBy) -> Vec<PricePerAreaRow> {
        aggregate::<PricePerArea>(properties, group_by)
            .into_iter()
            .map(PricePerAreaRow::from)
            .collect()
    }

    /// Price per square meter by city and zone, in the shape the dashboard charts consume.
    pub fn charts_data(&self, properties: &[Property]) -> Vec<ChartPoint> {
        aggregate::<PricePerArea>(properties, GroupBy::CityZone)
            .into_iter()
            .map(ChartPoint::from)
            .collect()
    }

    /// Percentage of viewed properties that sold, per city.
    ///
    /// Cities without any viewed property are left out.
    pub fn conversion_rate(&self, properties: &[Property]) -> Vec<ConversionRateRow> {
        aggregate::<ConversionRate>(properties, GroupBy::City)
            .into_iter()
            .filter_map(|(key, rate)| {
                Some(ConversionRateRow {
                    city: key.city?,
                    conversion_rate_percent: rate?,
                })
            })
            .collect()
    }

    /// Average days on market per city, truncated to whole days.
    pub fn days_on_market_by_city(&self, properties: &[Property]) -> Vec<CityDaysOnMarket> {
        aggregate::<DaysOnMarketWhole>(properties, GroupBy::City)
            .into_iter()
            .filter_map(|(key, avg_days)| {
                Some(CityDaysOnMarket {
                    city: key.city?,
                    avg_days: avg_days?,
                })
            })
            .collect()
    }

    /// Average days on market rounded to two decimals, grouped by `group_by`.
    pub fn days_on_market_rounded(&self, properties: &[Property], group_by: GroupBy) -> Vec<GroupDaysOnMarket> {
        aggregate::<DaysOnMarketRounded>(properties, group_by)
            .into_iter()
            .filter_map(|(key, avg_days)| {
                Some(GroupDaysOnMarket {
                    city: key.city,
                    zone: key.zone,
                    avg_days: avg_days?,
                })
            })
            .collect()
    }

    /// Days on market for the requested grouping. Grouping by city alone yields
    /// whole days; any grouping that includes the zone yields two decimals.
    pub fn days_on_market(&self, properties: &[Property], group_by: GroupBy) -> DaysOnMarketReport {
        match group_by {
            GroupBy::City => DaysOnMarketReport::Whole(self.days_on_market_by_city(properties)),
            GroupBy::Zone | GroupBy::CityZone => {
                DaysOnMarketReport::Rounded(self.days_on_market_rounded(properties, group_by))
            }
        }
    }

    /// Sold and unsold counts for the rows of one zone.
    pub fn sold_vs_unsold(&self, zone: &str, properties: &[Property]) -> SoldVsUnsold {
        let counts = reduce::<SoldUnsold>(properties);
        SoldVsUnsold {
            zone: zone.to_string(),
            sold_count: counts.sold,
            unsold_count: counts.unsold,
        }
    }

    /// Average price per square meter over the rows of one zone.
    pub fn zone_price_per_area(&self, zone: &str, properties: &[Property]) -> ZonePricePerArea {
        ZonePricePerArea {
            zone: zone.to_string(),
            avg_price_per_area: reduce::<PricePerArea>(properties),
        }
    }

    /// Every zone present in the dataset, in ascending order.
    pub fn distinct_zones(&self, properties: &[Property]) -> Vec<ZoneRow> {
        properties
            .iter()
            .map(|p| p.zone.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|zone| ZoneRow { zone: zone.to_string() })
            .collect()
    }

    pub fn property_counts(&self, properties: &[Property]) -> Vec<PropertyCount> {
        aggregate::<Count>(properties, GroupBy::CityZone)
            .into_iter()
            .map(|(key, count)| PropertyCount {
                city: key.city.unwrap_or_default(),
                zone: key.zone.unwrap_or_default(),
                count,
            })
            .collect()
    }

    /// Total sold price per sale month and per sale year, in calendar order.
    ///
    /// Only buckets with at least one sale appear; missing months are not filled.
    /// Totals are widened to `i128` so summing valid `i64` prices cannot overflow.
    pub fn sales_summary(&self, properties: &[Property]) -> SalesSummary {
        let mut monthly: BTreeMap<(i32, u32), i128> = BTreeMap::new();
        let mut yearly: BTreeMap<i32, i128> = BTreeMap::new();

        for (sold, price) in properties
            .iter()
            .filter_map(|p| p.date_sold.map(|d| (d, i128::from(p.price))))
        {
            *monthly.entry((sold.year(), sold.month())).or_default() += price;
            *yearly.entry(sold.year()).or_default() += price;
        }

        SalesSummary {
            monthly: monthly
                .into_iter()
                .map(|((year, month), total)| SalesPoint {
                    date: format!("{:04}-{:02}", year, month),
                    total,
                })
                .collect(),
            yearly: yearly
                .into_iter()
                .map(|(year, total)| SalesPoint {
                    date: format!("{:04}", year),
                    total,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn property(id: i64, city: &str, zone: &str, price: i64, area: i32) -> Property {
        Property {
            id,
            date_published: date(2022, 12, 1),
            date_sold: None,
            price,
            bedrooms: 3,
            bathrooms: 2.0,
            sqm_living: area,
            sqm_lot: 300,
            floors: 2.0,
            view_count: None,
            condition: 3,
            grade: 8,
            sqm_above: area,
            sqm_basement: 0,
            yr_built: 1999,
            yr_renovated: None,
            lat: 47.6,
            long: -122.3,
            city: city.to_string(),
            zone: zone.to_string(),
        }
    }

    fn sold_on(mut p: Property, d: NaiveDate) -> Property {
        p.date_sold = Some(d);
        p
    }

    fn dataset() -> Vec<Property> {
        let mut viewed = property(6, "Seattle", "98103", 300_000, 100);
        viewed.view_count = Some(5);
        vec![
            sold_on(property(1, "Seattle", "98103", 100_000, 50), date(2023, 1, 10)),
            property(2, "Seattle", "98103", 200_000, 0),
            sold_on(property(3, "Seattle", "98115", 150_000, 30), date(2023, 1, 20)),
            sold_on(property(4, "Bellevue", "98004", 200_000, 100), date(2023, 2, 3)),
            property(5, "Bellevue", "98004", 1_000, 0),
            viewed,
        ]
    }

    #[test]
    fn zone_price_per_area_matches_documented_example() {
        let zone_a = vec![
            property(1, "X", "A", 100_000, 50),
            property(2, "X", "A", 200_000, 0),
            property(3, "X", "A", 150_000, 30),
        ];
        let out = AnalyticsEngine::new().zone_price_per_area("A", &zone_a);
        assert_eq!(out.zone, "A");
        assert_eq!(out.avg_price_per_area, Some(dec!(3500.00)));
    }

    #[test]
    fn zone_price_per_area_without_rows_is_null() {
        let out = AnalyticsEngine::new().zone_price_per_area("nowhere", &[]);
        assert_eq!(out.avg_price_per_area, None);
    }

    #[test]
    fn price_per_area_by_city_keeps_null_groups() {
        let rows = vec![property(1, "Kent", "98030", 100, 0), property(2, "Auburn", "98001", 1000, 10)];
        let out = AnalyticsEngine::new().price_per_area(&rows, GroupBy::City);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].city.as_deref(), Some("Auburn"));
        assert_eq!(out[0].avg_price_per_area, Some(dec!(100)));
        assert_eq!(out[1].city.as_deref(), Some("Kent"));
        assert_eq!(out[1].avg_price_per_area, None);
        assert!(out.iter().all(|r| r.zone.is_none()));
    }

    #[test]
    fn charts_data_groups_by_city_and_zone() {
        let out = AnalyticsEngine::new().charts_data(&dataset());
        let seattle_103 = out
            .iter()
            .find(|p| p.city == "Seattle" && p.zone == "98103")
            .unwrap();
        // (2000 + 3000) / 2, the zero-area row is excluded.
        assert_eq!(seattle_103.avg_price_per_area, Some(dec!(2500)));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn conversion_rate_only_reports_cities_with_views() {
        let out = AnalyticsEngine::new().conversion_rate(&dataset());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].city, "Seattle");
        assert_eq!(out[0].conversion_rate_percent, dec!(0));
        assert!(out.iter().all(|r| r.conversion_rate_percent >= dec!(0) && r.conversion_rate_percent <= dec!(100)));
    }

    #[test]
    fn days_on_market_by_city_is_whole() {
        let out = AnalyticsEngine::new().days_on_market(&dataset(), GroupBy::City);
        // Seattle: 40 and 50 days -> 45. Bellevue: 64 days.
        assert_eq!(
            out,
            DaysOnMarketReport::Whole(vec![
                CityDaysOnMarket { city: "Bellevue".to_string(), avg_days: 64 },
                CityDaysOnMarket { city: "Seattle".to_string(), avg_days: 45 },
            ])
        );
    }

    #[test]
    fn days_on_market_by_zone_is_rounded() {
        let out = AnalyticsEngine::new().days_on_market(&dataset(), GroupBy::Zone);
        let DaysOnMarketReport::Rounded(rows) = out else {
            panic!("zone grouping must use the rounded shape");
        };
        let zones: Vec<_> = rows.iter().map(|r| r.zone.as_deref().unwrap()).collect();
        assert_eq!(zones, vec!["98004", "98103", "98115"]);
        assert!(rows.iter().all(|r| r.city.is_none()));
        assert_eq!(rows[1].avg_days, dec!(40));
    }

    #[test]
    fn sold_vs_unsold_adds_up_to_zone_total() {
        let rows: Vec<_> = dataset().into_iter().filter(|p| p.zone == "98103").collect();
        let out = AnalyticsEngine::new().sold_vs_unsold("98103", &rows);
        assert_eq!(out.sold_count, 1);
        assert_eq!(out.unsold_count, 2);
        assert_eq!(out.sold_count + out.unsold_count, rows.len() as u64);
    }

    #[test]
    fn distinct_zones_is_stable() {
        let engine = AnalyticsEngine::new();
        let rows = dataset();
        let first = engine.distinct_zones(&rows);
        assert_eq!(first, engine.distinct_zones(&rows));
        let zones: Vec<_> = first.into_iter().map(|z| z.zone).collect();
        assert_eq!(zones, vec!["98004", "98103", "98115"]);
    }

    #[test]
    fn property_counts_cover_every_row() {
        let rows = dataset();
        let out = AnalyticsEngine::new().property_counts(&rows);
        assert_eq!(out.iter().map(|c| c.count).sum::<u64>(), rows.len() as u64);
        assert!(out.contains(&PropertyCount {
            city: "Seattle".to_string(),
            zone: "98103".to_string(),
            count: 3
        }));
    }

    #[test]
    fn sales_summary_matches_documented_example() {
        let rows = vec![
            sold_on(property(1, "X", "A", 100_000, 10), date(2023, 1, 5)),
            sold_on(property(2, "X", "A", 50_000, 10), date(2023, 1, 28)),
            sold_on(property(3, "X", "B", 200_000, 10), date(2023, 2, 14)),
            property(4, "X", "B", 999_999, 10),
        ];
        let summary = AnalyticsEngine::new().sales_summary(&rows);
        assert_eq!(
            summary.monthly,
            vec![
                SalesPoint { date: "2023-01".to_string(), total: 150_000 },
                SalesPoint { date: "2023-02".to_string(), total: 200_000 },
            ]
        );
        assert_eq!(summary.yearly, vec![SalesPoint { date: "2023".to_string(), total: 350_000 }]);
    }

    #[test]
    fn sales_summary_is_in_calendar_order_without_gaps() {
        let rows = vec![
            sold_on(property(1, "X", "A", 1, 10), date(2024, 3, 1)),
            sold_on(property(2, "X", "A", 2, 10), date(2023, 11, 1)),
        ];
        let summary = AnalyticsEngine::new().sales_summary(&rows);
        let months: Vec<_> = summary.monthly.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(months, vec!["2023-11", "2024-03"]);
        let years: Vec<_> = summary.yearly.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(years, vec!["2023", "2024"]);
    }

    #[test]
    fn sales_summary_sums_prices_beyond_i64() {
        let big = i64::MAX / 2 + 1;
        let rows = vec![
            sold_on(property(1, "X", "A", big, 10), date(2024, 5, 2)),
            sold_on(property(2, "X", "A", big, 10), date(2024, 5, 9)),
        ];
        let summary = AnalyticsEngine::new().sales_summary(&rows);
        let expected = i128::from(big) * 2;
        assert!(expected > i128::from(i64::MAX));
        assert_eq!(summary.monthly, vec![SalesPoint { date: "2024-05".to_string(), total: expected }]);
        assert_eq!(summary.yearly, vec![SalesPoint { date: "2024".to_string(), total: expected }]);
    }

    #[test]
    fn empty_dataset_gives_empty_results() {
        let engine = AnalyticsEngine::new();
        assert!(engine.price_per_area(&[], GroupBy::CityZone).is_empty());
        assert!(engine.conversion_rate(&[]).is_empty());
        assert!(engine.days_on_market(&[], GroupBy::City).is_empty());
        assert_eq!(engine.sales_summary(&[]), SalesSummary::default());
        let counts = engine.sold_vs_unsold("A", &[]);
        assert_eq!((counts.sold_count, counts.unsold_count), (0, 0));
    }
}
