use crate::keys::{DateKey, KeyLookup, SurrogateKey};
use crate::models::cleaned::{CleanPerformance, CleanSale};
use crate::models::star::{DimCustomer, DimProduct, DimStore, PerformanceFact, SalesFact};
use crate::star::date_dim::DateDimension;
use crate::star::dimension::Dimension;

/// Dimensions that `fact_sales` references.
#[derive(Debug, Clone, Copy)]
pub struct SalesDimensions<'a> {
    pub date: &'a DateDimension,
    pub product: &'a Dimension<DimProduct>,
    pub customer: &'a Dimension<DimCustomer>,
    pub store: &'a Dimension<DimStore>,
}

/// One fact row per sale, in input order. Unresolved keys stay on the row as
/// [`KeyLookup::Unmatched`].
pub fn build_sales_fact(sales: &[CleanSale], dims: SalesDimensions<'_>) -> Vec<SalesFact> {
    sales
        .iter()
        .enumerate()
        .map(|(i, s)| SalesFact {
            sales_key: SurrogateKey::from_position(i),
            transaction_id: s.transaction_id.clone(),
            date_key: dims.date.resolve(s.transaction_date),
            product_key: dims.product.lookup(s.product_id.as_deref()),
            customer_key: dims.customer.lookup(s.customer_id.as_deref()),
            store_key: dims.store.lookup(s.store_id.as_deref()),
            quantity: s.quantity,
            unit_price: s.unit_price,
            discount: s.discount,
            final_price: s.final_price,
            total_amount: s.total_amount,
            payment_method: s.payment_method.clone(),
        })
        .collect()
}

/// Date key for a performance row: the first day of its `(year, month)`.
fn month_key(date: &DateDimension, row: &CleanPerformance) -> KeyLookup<DateKey> {
    match row
        .year
        .zip(row.month)
        .and_then(|(y, m)| DateKey::first_of_month(y, m))
    {
        Some(key) => date.resolve_key(key),
        None => KeyLookup::Unmatched,
    }
}

/// One fact row per (product, month) performance record, in input order.
pub fn build_performance_fact(
    performance: &[CleanPerformance],
    date: &DateDimension,
    product: &Dimension<DimProduct>,
) -> Vec<PerformanceFact> {
    performance
        .iter()
        .enumerate()
        .map(|(i, p)| PerformanceFact {
            performance_key: SurrogateKey::from_position(i),
            date_key: month_key(date, p),
            product_key: product.lookup(p.product_id.as_deref()),
            energy_consumption_kwh: p.energy_consumption_kwh,
            failure_rate: p.failure_rate,
            customer_satisfaction: p.customer_satisfaction,
            return_rate: p.return_rate,
            warranty_claims: p.warranty_claims,
        })
        .collect()
}
