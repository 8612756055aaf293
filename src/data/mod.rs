/// Data layer: the record store, filtering, and the aggregate catalog.
///
/// Architecture:
/// ```text
///  sales .csv
///      │
///      ▼
///  ┌──────────┐
///  │  loader   │  parse file → Dataset (fail-fast, all-or-nothing)
///  └──────────┘
///      │
///      ▼
///  ┌──────────┐
///  │  Dataset  │  Vec<Record>, per-column domains, date bounds
///  └──────────┘
///      │
///      ▼
///  ┌──────────┐
///  │  filter   │  FilterSpec → FilteredView (AND of all predicates)
///  └──────────┘
///      │
///      ▼
///  ┌───────────┐
///  │ aggregate  │  sums, time series, describe, Pearson, cross-tabs
///  └───────────┘
/// ```
///
/// The `Dataset` is loaded once and never mutated; everything downstream
/// works on shared references, so independent UI sessions can share one
/// store safely.

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
