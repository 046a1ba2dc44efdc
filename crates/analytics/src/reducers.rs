//! The metric reducers fed to the grouping engine.

use crate::grouping::Reducer;
use core_types::Property;
use rust_decimal::Decimal;

/// Decimal places kept by every rounded aggregate.
pub const ROUNDING_DP: u32 = 2;

/// Running arithmetic mean.
#[derive(Debug, Default, Clone)]
struct Mean {
    sum: Decimal,
    count: u64,
}

impl Mean {
    fn push(&mut self, value: Decimal) {
        self.sum += value;
        self.count += 1;
    }

    fn value(&self) -> Option<Decimal> {
        if self.count == 0 {
            return None;
        }
        self.sum.checked_div(Decimal::from(self.count))
    }
}

/// Mean of `price / sqm_living`, rounded at the end.
///
/// Rows without a positive living area are skipped, so they neither add a zero
/// nor count towards the denominator. A group with no usable row yields `None`.
#[derive(Debug, Default)]
pub struct PricePerArea {
    mean: Mean,
}

impl Reducer for PricePerArea {
    type Output = Option<Decimal>;

    fn observe(&mut self, property: &Property) {
        if property.sqm_living <= 0 {
            return;
        }
        if let Some(per_area) = Decimal::from(property.price).checked_div(Decimal::from(property.sqm_living)) {
            self.mean.push(per_area);
        }
    }

    fn finish(self) -> Self::Output {
        self.mean.value().map(|v| v.round_dp(ROUNDING_DP))
    }
}

/// Share of viewed properties that sold, as a percentage.
#[derive(Debug, Default)]
pub struct ConversionRate {
    viewed: u64,
    sold: u64,
}

impl Reducer for ConversionRate {
    type Output = Option<Decimal>;

    fn admits(property: &Property) -> bool {
        property.is_viewed()
    }

    fn observe(&mut self, property: &Property) {
        self.viewed += 1;
        if property.is_sold() {
            self.sold += 1;
        }
    }

    fn finish(self) -> Self::Output {
        if self.viewed == 0 {
            return None;
        }
        let ratio = Decimal::from(self.sold).checked_div(Decimal::from(self.viewed))?;
        Some((ratio * Decimal::ONE_HUNDRED).round_dp(ROUNDING_DP))
    }
}

/// Sum and count of non-negative day spans over sold rows.
#[derive(Debug, Default, Clone, Copy)]
struct DaySpan {
    total: i64,
    count: i64,
}

impl DaySpan {
    fn observe(&mut self, property: &Property) {
        match property.days_on_market() {
            Some(days) if days >= 0 => {
                self.total += days;
                self.count += 1;
            }
            Some(days) => {
                tracing::warn!(id = property.id, days, "Skipping property sold before it was published.");
            }
            None => {}
        }
    }
}

/// Average days on market as whole days. The mean is truncated toward zero.
#[derive(Debug, Default)]
pub struct DaysOnMarketWhole {
    span: DaySpan,
}

impl Reducer for DaysOnMarketWhole {
    type Output = Option<i64>;

    fn admits(property: &Property) -> bool {
        property.is_sold()
    }

    fn observe(&mut self, property: &Property) {
        self.span.observe(property);
    }

    fn finish(self) -> Self::Output {
        (self.span.count > 0).then(|| self.span.total / self.span.count)
    }
}

/// Average days on market rounded to two decimal places.
#[derive(Debug, Default)]
pub struct DaysOnMarketRounded {
    span: DaySpan,
}

impl Reducer for DaysOnMarketRounded {
    type Output = Option<Decimal>;

    fn admits(property: &Property) -> bool {
        property.is_sold()
    }

    fn observe(&mut self, property: &Property) {
        self.span.observe(property);
    }

    fn finish(self) -> Self::Output {
        if self.span.count == 0 {
            return None;
        }
        Decimal::from(self.span.total)
            .checked_div(Decimal::from(self.span.count))
            .map(|v| v.round_dp(ROUNDING_DP))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SoldUnsold {
    pub sold: u64,
    pub unsold: u64,
}

impl Reducer for SoldUnsold {
    type Output = SoldUnsold;

    fn observe(&mut self, property: &Property) {
        if property.is_sold() {
            self.sold += 1;
        } else {
            self.unsold += 1;
        }
    }

    fn finish(self) -> Self::Output {
        self
    }
}

#[derive(Debug, Default)]
pub struct Count(u64);

impl Reducer for Count {
    type Output = u64;

    fn observe(&mut self, _property: &Property) {
        self.0 += 1;
    }

    fn finish(self) -> Self::Output {
        self.0
    }
}
