mod generator;
mod query;

pub use generator::generate;
pub use query::{parse_filter, query, Query, SortMode};

use crate::state::{Asset, Session, SessionView};

/// The full asset collection for the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    assets: Vec<Asset>,
}

impl Catalog {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self { assets }
    }

    /// Seeded mock catalog.
    pub fn generate(seed: u64, now_ms: i64) -> Self {
        Self::new(generate(seed, now_ms))
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Look up by id. Unknown ids are `None`; the shell shows not-found.
    pub fn get(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn query(&self, q: &Query) -> Vec<&Asset> {
        query(&self.assets, q)
    }

    /// Assets in the session's inventory, catalog order.
    /// Empty for a locked session.
    pub fn owned_by(&self, session: &Session) -> Vec<&Asset> {
        match session.view() {
            SessionView::Connected { inventory_ids, .. } => self
                .assets
                .iter()
                .filter(|a| inventory_ids.contains(&a.id))
                .collect(),
            SessionView::Locked { .. } => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn session(connected: bool, ids: &[&str]) -> Session {
        Session {
            is_connected: connected,
            address: Some("Hu3k...9Xm2".to_string()),
            balance: dec!(10),
            inventory_ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_get() {
        let catalog = Catalog::generate(42, 0);
        assert_eq!(catalog.len(), 40);
        assert_eq!(catalog.get("pokemarket-2").map(|a| a.name.as_str()), Some("Charizard"));
        assert!(catalog.get("pokemarket-999").is_none());
    }

    #[test]
    fn test_owned_by_connected() {
        let catalog = Catalog::generate(42, 0);
        // Inventory order differs from catalog order; unknown ids ignored
        let owned = catalog.owned_by(&session(true, &["pokemarket-5", "pokemarket-1", "gone"]));
        let ids: Vec<&str> = owned.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["pokemarket-1", "pokemarket-5"]);
    }

    #[test]
    fn test_owned_by_locked_is_empty() {
        let catalog = Catalog::generate(42, 0);
        assert!(catalog.owned_by(&session(false, &["pokemarket-1"])).is_empty());
    }

    #[test]
    fn test_query_through_catalog() {
        let catalog = Catalog::generate(42, 0);
        let q = Query {
            term: "char".to_string(),
            sort: SortMode::PriceAsc,
            ..Default::default()
        };
        let result = catalog.query(&q);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Charizard");
    }
}
