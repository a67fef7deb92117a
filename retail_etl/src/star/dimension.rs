use tracing::warn;

use crate::keys::{KeyLookup, KeyMap, SurrogateKey};
use crate::models::cleaned::{CleanCustomer, CleanProduct, CleanStore};
use crate::models::star::{DimCustomer, DimProduct, DimStore, DimensionRow};

/// A cleaned row that carries a natural identifier.
pub trait NaturalKey {
    fn natural_key(&self) -> &str;
}

impl NaturalKey for CleanProduct {
    fn natural_key(&self) -> &str {
        &self.product_id
    }
}

impl NaturalKey for CleanCustomer {
    fn natural_key(&self) -> &str {
        &self.customer_id
    }
}

impl NaturalKey for CleanStore {
    fn natural_key(&self) -> &str {
        &self.store_id
    }
}

/// Dimension rows together with the key map built alongside them.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension<R> {
    pub rows: Vec<R>,
    pub keys: KeyMap,
}

impl<R> Default for Dimension<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            keys: KeyMap::default(),
        }
    }
}

impl<R: DimensionRow> Dimension<R> {
    /// Rebuild the key map from rows that already carry surrogate keys.
    pub fn from_rows(rows: Vec<R>) -> Self {
        let mut keys = KeyMap::with_capacity(rows.len());
        for row in &rows {
            keys.insert(row.natural_key(), row.surrogate_key());
        }
        Self { rows, keys }
    }

    pub fn lookup(&self, natural: Option<&str>) -> KeyLookup<SurrogateKey> {
        self.keys.lookup(natural)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Assign surrogate keys `1..=N` in input order and project each source row.
///
/// Rows with duplicate natural keys are all kept; lookups resolve to the last one.
pub fn build_dimension<S, R, F>(source: &[S], project: F) -> Dimension<R>
where
    S: NaturalKey,
    R: DimensionRow,
    F: Fn(SurrogateKey, &S) -> R,
{
    let mut keys = KeyMap::with_capacity(source.len());
    let rows = source
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let key = SurrogateKey::from_position(i);
            keys.insert(s.natural_key(), key);
            project(key, s)
        })
        .collect();
    if keys.duplicates() > 0 {
        warn!(
            table = R::NAME,
            column = R::NATURAL_KEY_COLUMN,
            duplicates = keys.duplicates(),
            "duplicate natural keys; lookups resolve to the last occurrence"
        );
    }
    Dimension { rows, keys }
}

pub fn build_product_dimension(products: &[CleanProduct]) -> Dimension<DimProduct> {
    build_dimension(products, |key, p| DimProduct {
        product_key: key,
        product_id: p.product_id.clone(),
        product_name: p.product_name.clone(),
        category: p.category.clone(),
        subcategory: p.subcategory.clone(),
        energy_rating: p.energy_rating.clone(),
        price: p.price,
        manufacturing_cost: p.manufacturing_cost,
        warranty_years: p.warranty_years,
        weight_kg: p.weight_kg,
        profit_margin: p.profit_margin,
        launch_date: p.launch_date,
    })
}

pub fn build_customer_dimension(customers: &[CleanCustomer]) -> Dimension<DimCustomer> {
    build_dimension(customers, |key, c| DimCustomer {
        customer_key: key,
        customer_id: c.customer_id.clone(),
        customer_name: c.customer_name.clone(),
        country: c.country.clone(),
        segment: c.segment.clone(),
        acquisition_date: c.acquisition_date,
        lifetime_value: c.lifetime_value,
        acquisition_year: c.acquisition_year,
        acquisition_month: c.acquisition_month,
    })
}

pub fn build_store_dimension(stores: &[CleanStore]) -> Dimension<DimStore> {
    build_dimension(stores, |key, s| DimStore {
        store_key: key,
        store_id: s.store_id.clone(),
        store_name: s.store_name.clone(),
        country: s.country.clone(),
        store_type: s.store_type.clone(),
        opening_date: s.opening_date,
        size_sqm: s.size_sqm,
        opening_year: s.opening_year,
    })
}
