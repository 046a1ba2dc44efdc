use core_types::{GroupBy, Property};
use std::collections::BTreeMap;

/// The grouping-key tuple of one aggregate row. Columns that are not part of the
/// requested `GroupBy` are left as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub city: Option<String>,
    pub zone: Option<String>,
}

impl GroupKey {
    pub fn for_property(property: &Property, group_by: GroupBy) -> Self {
        Self {
            city: group_by.includes_city().then(|| property.city.clone()),
            zone: group_by.includes_zone().then(|| property.zone.clone()),
        }
    }
}

/// A metric folded over the rows of one group.
///
/// `admits` decides whether a row takes part in the metric at all. A group whose
/// rows are all rejected never appears in the output.
pub trait Reducer: Default {
    type Output;

    fn admits(_property: &Property) -> bool {
        true
    }

    fn observe(&mut self, property: &Property);

    fn finish(self) -> Self::Output;
}

/// Groups `properties` by `group_by` and folds each group with `R`.
///
/// Groups are returned in ascending key order.
pub fn aggregate<R: Reducer>(properties: &[Property], group_by: GroupBy) -> Vec<(GroupKey, R::Output)> {
    let mut groups: BTreeMap<GroupKey, R> = BTreeMap::new();

    for property in properties.iter().filter(|p| R::admits(p)) {
        groups
            .entry(GroupKey::for_property(property, group_by))
            .or_default()
            .observe(property);
    }

    tracing::debug!(rows = properties.len(), groups = groups.len(), %group_by, "Aggregated rows.");

    groups
        .into_iter()
        .map(|(key, reducer)| (key, reducer.finish()))
        .collect()
}

/// Folds every admitted row into a single value, without grouping.
pub fn reduce<R: Reducer>(properties: &[Property]) -> R::Output {
    let mut reducer = R::default();
    for property in properties.iter().filter(|p| R::admits(p)) {
        reducer.observe(property);
    }
    reducer.finish()
}
