//! Data layer: core types, loading, and aggregation.
//!
//! Architecture:
//! ```text
//!  final_merged_dataset.csv  simulation_results.csv  factor_analysis_loadings.csv
//!        │                          │                          │
//!        └──────────────────────────┼──────────────────────────┘
//!                                   ▼
//!                             ┌──────────┐
//!                             │  loader   │  all three or nothing → Datasets
//!                             └──────────┘
//!                                   │
//!                                   ▼
//!                             ┌──────────┐
//!                             │ Datasets  │  traffic rows, runs, loading matrix
//!                             └──────────┘
//!                                   │
//!                                   ▼
//!                             ┌───────────┐
//!                             │ aggregate  │  means, buckets, CDF, factor strength
//!                             └───────────┘
//! ```

pub mod aggregate;
pub mod loader;
pub mod model;
