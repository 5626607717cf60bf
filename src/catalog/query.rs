use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

use crate::state::{Asset, CreatureType, Rarity};

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    PriceAsc,
    PriceDesc,
    /// Catalog order. Generated assets carry no listing date.
    #[default]
    Newest,
}

/// Marketplace filter bar state. `None` filters mean "All".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Case-insensitive substring of the asset name; empty matches all
    pub term: String,
    pub creature_type: Option<CreatureType>,
    pub rarity: Option<Rarity>,
    pub sort: SortMode,
}

impl Query {
    /// Clear search and filters. Sort mode is kept.
    pub fn reset_filters(&mut self) {
        self.term.clear();
        self.creature_type = None;
        self.rarity = None;
    }

    fn matches(&self, asset: &Asset, needle: &str) -> bool {
        (needle.is_empty() || asset.name.to_lowercase().contains(needle))
            && self.creature_type.map_or(true, |t| asset.creature_type == t)
            && self.rarity.map_or(true, |r| asset.rarity == r)
    }
}

/// Parse a filter value where "All" (any case) disables the filter.
pub fn parse_filter<T: FromStr>(value: &str) -> Result<Option<T>, T::Err> {
    if value.eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

/// Filter then sort. Pure and deterministic.
///
/// Price sorts are stable, so equal prices keep input order.
/// `Newest` keeps input order.
pub fn query<'a>(assets: &'a [Asset], q: &Query) -> Vec<&'a Asset> {
    let needle = q.term.to_lowercase();
    let mut result: Vec<&Asset> = assets.iter().filter(|a| q.matches(a, &needle)).collect();

    match q.sort {
        SortMode::PriceAsc => result.sort_by(|a, b| a.price.cmp(&b.price)),
        SortMode::PriceDesc => result.sort_by(|a, b| b.price.cmp(&a.price)),
        SortMode::Newest => {}
    }

    result
}
