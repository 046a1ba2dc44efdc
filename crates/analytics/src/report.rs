use crate::grouping::GroupKey;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Grouping columns that are not part of the request are omitted from the record.
// Metric values are never omitted: an undefined average is reported as `null`.

/// Average price per square meter for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePerAreaRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub avg_price_per_area: Option<Decimal>,
}

impl From<(GroupKey, Option<Decimal>)> for PricePerAreaRow {
    fn from((key, avg_price_per_area): (GroupKey, Option<Decimal>)) -> Self {
        Self {
            city: key.city,
            zone: key.zone,
            avg_price_per_area,
        }
    }
}

/// One point of the dashboard chart (price per square meter by city and zone).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub zone: String,
    pub city: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub avg_price_per_area: Option<Decimal>,
}

impl From<(GroupKey, Option<Decimal>)> for ChartPoint {
    fn from((key, avg_price_per_area): (GroupKey, Option<Decimal>)) -> Self {
        Self {
            zone: key.zone.unwrap_or_default(),
            city: key.city.unwrap_or_default(),
            avg_price_per_area,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRateRow {
    pub city: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub conversion_rate_percent: Decimal,
}

/// Average days on market per city, in whole days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityDaysOnMarket {
    pub city: String,
    pub avg_days: i64,
}

/// Average days on market per zone (optionally per city and zone), to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDaysOnMarket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_days: Decimal,
}

/// The two output shapes of the days-on-market query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DaysOnMarketReport {
    Whole(Vec<CityDaysOnMarket>),
    Rounded(Vec<GroupDaysOnMarket>),
}

impl DaysOnMarketReport {
    pub fn len(&self) -> usize {
        match self {
            DaysOnMarketReport::Whole(rows) => rows.len(),
            DaysOnMarketReport::Rounded(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoldVsUnsold {
    pub zone: String,
    pub sold_count: u64,
    pub unsold_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonePricePerArea {
    pub zone: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub avg_price_per_area: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRow {
    pub zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyCount {
    pub city: String,
    pub zone: String,
    pub count: u64,
}

/// Total sold price for one calendar bucket (`YYYY-MM` or `YYYY`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesPoint {
    pub date: String,
    pub total: i128,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub monthly: Vec<SalesPoint>,
    pub yearly: Vec<SalesPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn null_average_keeps_the_field() {
        let row = ZonePricePerArea {
            zone: "A".to_string(),
            avg_price_per_area: None,
        };
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({ "zone": "A", "avg_price_per_area": null })
        );
    }

    #[test]
    fn unused_group_columns_are_omitted() {
        let row = PricePerAreaRow::from((
            GroupKey {
                city: Some("Seattle".to_string()),
                zone: None,
            },
            Some(dec!(3500.00)),
        ));
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            json!({ "city": "Seattle", "avg_price_per_area": 3500.0 })
        );
    }

    #[test]
    fn days_on_market_shapes_serialize_differently() {
        let whole = DaysOnMarketReport::Whole(vec![CityDaysOnMarket {
            city: "Kent".to_string(),
            avg_days: 12,
        }]);
        let rounded = DaysOnMarketReport::Rounded(vec![GroupDaysOnMarket {
            city: None,
            zone: Some("98032".to_string()),
            avg_days: dec!(12.5),
        }]);
        assert_eq!(serde_json::to_value(&whole).unwrap(), json!([{ "city": "Kent", "avg_days": 12 }]));
        assert_eq!(serde_json::to_value(&rounded).unwrap(), json!([{ "zone": "98032", "avg_days": 12.5 }]));
        assert_eq!(whole.len(), 1);
        assert!(!rounded.is_empty());
    }
}
