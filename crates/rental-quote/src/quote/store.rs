use super::seasonal::SeasonalPriceTable;
use tracing::warn;

/// Persisted key-value capability injected by the hosting layer.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&self, key: &str, value: String) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("key-value store unavailable: {0}")]
    Unavailable(String),
}

pub fn seasonal_key(year: i32) -> String {
    format!("seasonal_prices:{year}")
}

/// Seasonal tables stored per calendar year.
pub struct SeasonalPriceSnapshots<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> SeasonalPriceSnapshots<'a, S>
where
    S: KeyValueStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Never fails: a missing, unreadable or malformed table is an empty one.
    pub fn load(&self, year: i32) -> SeasonalPriceTable {
        match self.store.get(&seasonal_key(year)) {
            Ok(Some(raw)) => SeasonalPriceTable::parse_lenient(&raw),
            Ok(None) => SeasonalPriceTable::default(),
            Err(err) => {
                warn!(year, error = %err, "seasonal price table unavailable");
                SeasonalPriceTable::default()
            }
        }
    }

    /// Persist the raw payload as-is and return the entries that will be honoured.
    pub fn save(&self, year: i32, raw: String) -> Result<SeasonalPriceTable, StoreError> {
        let table = SeasonalPriceTable::parse_lenient(&raw);
        self.store.put(&seasonal_key(year), raw)?;
        Ok(table)
    }
}
