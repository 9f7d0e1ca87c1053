/// Data layer: core table types, loading, and categorical filtering.
///
/// Architecture:
/// ```text
///  .csv / .xlsx / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  wide Table + unique-value index (picklists)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterSpec → filtered Table
///   └──────────┘
/// ```
pub mod filter;
pub mod loader;
pub mod model;
