use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The grouping keys an aggregate can be computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    City,
    Zone,
    #[serde(alias = "city+zone")]
    CityZone,
}

impl GroupBy {
    /// Whether the city column is part of the grouping key.
    pub fn includes_city(&self) -> bool {
        matches!(self, GroupBy::City | GroupBy::CityZone)
    }

    /// Whether the zone column is part of the grouping key.
    pub fn includes_zone(&self) -> bool {
        matches!(self, GroupBy::Zone | GroupBy::CityZone)
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GroupBy::City => "city",
            GroupBy::Zone => "zone",
            GroupBy::CityZone => "city_zone",
        };
        f.write_str(s)
    }
}

impl FromStr for GroupBy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "city" => Ok(GroupBy::City),
            "zone" => Ok(GroupBy::Zone),
            "city_zone" | "city+zone" | "city-zone" => Ok(GroupBy::CityZone),
            other => Err(CoreError::UnknownGrouping(other.to_string())),
        }
    }
}
