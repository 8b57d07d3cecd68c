//! Recommendation Planner
//!
//! Request-level facade: converts a terrace area into plant capacity, fetches
//! the (optionally climate-filtered) catalog for the site, and runs the
//! optimizer. Field names of `RecommendRequest` follow the public
//! `/recommend_crops` request body.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogProvider;
use crate::error::{OptimizeError, PlanError};
use crate::optimizer::Optimizer;
use crate::types::{AllocationRequest, AllocationResult, Location, WeatherConditions};

/// Area taken by one pot unless a request says otherwise
pub const DEFAULT_POT_SIZE: f64 = 1.0;

/// Largest number of pots a single request may plan for
pub const MAX_CAPACITY: u32 = 1_000_000;

/// Growing area and the area one plant occupies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlantingArea {
    pub terrace_size: f64,
    pub pot_size: f64,
}

impl PlantingArea {
    pub fn new(terrace_size: f64) -> Self {
        Self {
            terrace_size,
            pot_size: DEFAULT_POT_SIZE,
        }
    }

    pub fn with_pot_size(mut self, pot_size: f64) -> Self {
        self.pot_size = pot_size;
        self
    }

    /// Whole pots that fit on the terrace
    pub fn capacity(&self) -> Result<u32, OptimizeError> {
        if !self.terrace_size.is_finite() || self.terrace_size < 0.0 {
            return Err(OptimizeError::validation(format!(
                "terrace size must be a non-negative number, got {}",
                self.terrace_size
            )));
        }
        if !self.pot_size.is_finite() || self.pot_size <= 0.0 {
            return Err(OptimizeError::validation(format!(
                "pot size must be positive, got {}",
                self.pot_size
            )));
        }
        let pots = (self.terrace_size / self.pot_size).floor();
        if pots > f64::from(MAX_CAPACITY) {
            return Err(OptimizeError::validation(format!(
                "terrace of {} holds {} pots of size {}, more than the maximum {}",
                self.terrace_size, pots, self.pot_size, MAX_CAPACITY
            )));
        }
        Ok(pots as u32)
    }
}

fn default_pot_size() -> f64 {
    DEFAULT_POT_SIZE
}

/// A gardener's recommendation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub terrace_size: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub savings_weight: f64,
    pub weight_carbon_absorption: f64,
    pub budget: f64,
    /// Selected plant categories
    pub types: Vec<String>,
    #[serde(default = "default_pot_size")]
    pub pot_size: f64,
    /// Site weather; when present the catalog is climate-filtered
    #[serde(default)]
    pub weather: Option<WeatherConditions>,
}

impl RecommendRequest {
    pub fn location(&self) -> Location {
        Location {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub fn area(&self) -> PlantingArea {
        PlantingArea::new(self.terrace_size).with_pot_size(self.pot_size)
    }

    /// Optimizer input for this request
    pub fn allocation_request(&self) -> Result<AllocationRequest, OptimizeError> {
        Ok(AllocationRequest {
            total_capacity: self.area().capacity()?,
            budget: self.budget,
            weight_savings: self.savings_weight,
            weight_carbon: self.weight_carbon_absorption,
            selected_categories: self.types.clone(),
        })
    }
}

/// Catalog provider + optimizer
#[derive(Clone)]
pub struct Planner {
    provider: Arc<dyn CatalogProvider>,
    optimizer: Optimizer,
}

impl Planner {
    pub fn new(provider: Arc<dyn CatalogProvider>, optimizer: Optimizer) -> Self {
        Self { provider, optimizer }
    }

    pub fn recommend(&self, request: &RecommendRequest) -> Result<AllocationResult, PlanError> {
        let allocation = request.allocation_request()?;
        let catalog = self
            .provider
            .catalog(&request.location(), request.weather.as_ref())?;

        tracing::debug!(
            "Planning {} pots at ({}, {}) for categories {:?}",
            allocation.total_capacity,
            request.latitude,
            request.longitude,
            allocation.selected_categories
        );

        Ok(self.optimizer.optimize(&catalog, &allocation)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::plant;
    use crate::catalog::{Catalog, StaticCatalogProvider};

    fn planner() -> Planner {
        let catalog = Catalog::from_plants(vec![
            plant("Vegetables", "Tomato", 10.0, 15.0, 2.0),
            plant("Vegetables", "Spinach", 5.0, 8.0, 1.0),
            plant("Fruits", "Mango", 50.0, 60.0, 5.0),
        ])
        .unwrap();
        Planner::new(Arc::new(StaticCatalogProvider::new(catalog)), Optimizer::default())
    }

    fn request_json() -> serde_json::Value {
        serde_json::json!({
            "terrace_size": 10,
            "latitude": 12.0,
            "longitude": 71.0,
            "savings_weight": 0.5,
            "weight_carbon_absorption": 0.5,
            "budget": 100,
            "types": ["Vegetables", "Fruits"]
        })
    }

    #[test]
    fn test_capacity_from_area() {
        assert_eq!(PlantingArea::new(100.0).capacity().unwrap(), 100);
        assert_eq!(PlantingArea::new(10.0).with_pot_size(3.0).capacity().unwrap(), 3);
        assert!(PlantingArea::new(10.0).with_pot_size(0.0).capacity().is_err());
        assert!(PlantingArea::new(-1.0).capacity().is_err());
    }

    #[test]
    fn test_capacity_upper_bound() {
        let at_limit = PlantingArea::new(f64::from(MAX_CAPACITY));
        assert_eq!(at_limit.capacity().unwrap(), MAX_CAPACITY);

        // Tiny pots would otherwise saturate to u32::MAX
        let tiny_pots = PlantingArea::new(10.0).with_pot_size(1e-9);
        assert!(matches!(tiny_pots.capacity(), Err(OptimizeError::Validation(_))));

        let huge_terrace = PlantingArea::new(1e12);
        assert!(huge_terrace.capacity().is_err());
    }

    #[test]
    fn test_recommend_rejects_oversized_area() {
        let mut json = request_json();
        json["pot_size"] = serde_json::json!(1e-9);
        let request: RecommendRequest = serde_json::from_value(json).unwrap();

        let err = planner().recommend(&request).unwrap_err();
        assert!(matches!(err, PlanError::Optimize(OptimizeError::Validation(_))));
    }

    #[test]
    fn test_request_defaults() {
        let request: RecommendRequest = serde_json::from_value(request_json()).unwrap();
        assert_eq!(request.pot_size, DEFAULT_POT_SIZE);
        assert!(request.weather.is_none());
        assert_eq!(request.allocation_request().unwrap().total_capacity, 10);
    }

    #[test]
    fn test_recommend() {
        let request: RecommendRequest = serde_json::from_value(request_json()).unwrap();
        let result = planner().recommend(&request).unwrap();
        assert_eq!(result.total_plants_used, 3);
        assert!(result.total_budget_used <= 100.0);
    }

    #[test]
    fn test_weather_filter_can_empty_the_selection() {
        let mut json = request_json();
        json["weather"] = serde_json::json!({
            "temp_min": -20.0, "temp_max": -10.0, "rainfall": 100.0, "sunlight": 2.0
        });
        let request: RecommendRequest = serde_json::from_value(json).unwrap();

        // Nothing survives the filter: nothing left to normalize against
        let err = planner().recommend(&request).unwrap_err();
        assert!(matches!(err, PlanError::Optimize(OptimizeError::Validation(_))));
    }
}
