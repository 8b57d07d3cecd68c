//! Crop Planner
//!
//! Turns a plant catalog and a gardener's constraints (capacity, budget,
//! savings/carbon weighting, allowed categories) into a planting plan.
//!
//! Layout:
//! - `types`: shared data contracts (plants, requests, results)
//! - `catalog/`: catalog model, file loaders, climate filter, providers
//! - `optimizer/`: scoring, quota split, greedy filling, aggregation
//! - `planner`: request-level facade (area → capacity, catalog fetch, optimize)
//! - `report`: text summary and JSON persistence of results
//! - `api_server`: HTTP surface (feature `api`)

pub mod types;
pub mod error;
pub mod catalog;
pub mod optimizer;
pub mod planner;
pub mod report;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use types::{
    AllocationEntry, AllocationRequest, AllocationResult, Location, PlantOption, ScoredPlant,
    WeatherConditions,
};
pub use error::{CatalogError, OptimizeError, PlanError};
pub use catalog::{load_catalog, Catalog, CatalogProvider, StaticCatalogProvider};
pub use optimizer::{Optimizer, OptimizerConfig};
pub use planner::{Planner, PlantingArea, RecommendRequest};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
