//! Read side: denormalize a loaded star schema, filter it, and summarize it.
//!
//! Sales facts join to date, product, customer and store; performance facts
//! join to date and product. All joins are left joins on the surrogate or
//! date keys, so unmatched facts stay in the view with absent attributes.

pub mod join;
pub mod render;
pub mod summary;

pub use join::{Denormalized, Filter, PerformanceLine, SalesLine, denormalize};
pub use render::to_json;
pub use summary::{
    CategoryPerformance, GroupTotal, MonthTotal, SubcategoryFailure, Summary, summarize,
};
