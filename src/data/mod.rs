/// Data layer: loading, caching, year reconciliation and series.
///
/// Architecture:
/// ```text
///  budget.csv / housing.csv / investments.csv   (`;`, unknown encoding)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  detect encoding → decode cascade → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  one Arc<Dataset> per path, process lifetime
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  years    │  common year columns → [lo, hi] YearAxis
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  series   │  region row → (year, value) points, summaries
///   └──────────┘
/// ```

pub mod cache;
pub mod error;
pub mod loader;
pub mod model;
pub mod series;
pub mod years;
