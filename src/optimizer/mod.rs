//! Planting Optimizer - coordinator for one allocation run
//!
//! Pipeline:
//! 1. `normalizer` - maxima over the selected categories, weighted scores,
//!    per-category descending sort
//! 2. `quota` - even split of capacity across the selected categories
//! 3. `filler` - multi-round greedy fill per category over shared
//!    budget/capacity pools, with per-label caps
//! 4. `aggregator` - merged entries and totals
//!
//! This is a bounded heuristic, not an exact solver. Every run owns its
//! state; the catalog is only read, so independent requests can run in
//! parallel (`optimize_batch`).

pub mod normalizer;
pub mod quota;
pub mod filler;
pub mod aggregator;

pub use normalizer::{Maxima, ScoreNormalizer, ScoredCategory};
pub use quota::split_capacity;
pub use filler::{CategoryFill, FillPolicy, GreedyFiller, StopReason};
pub use aggregator::{round6, ResultAggregator};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CategoryPlants};
use crate::error::OptimizeError;
use crate::types::{AllocationRequest, AllocationResult};

/// Scoring options
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Score multiplier for perennial plants; `None` keeps the canonical
    /// savings/carbon score
    #[serde(default)]
    pub perennial_multiplier: Option<f64>,
}

/// Entry point for allocation runs
#[derive(Debug, Clone, Copy, Default)]
pub struct Optimizer {
    config: OptimizerConfig,
}

impl Optimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Compute a planting plan for `request` from `catalog`
    ///
    /// All validation happens before any arithmetic. A request that is valid
    /// but leaves nothing affordable returns an empty result, not an error.
    pub fn optimize(
        &self,
        catalog: &Catalog,
        request: &AllocationRequest,
    ) -> Result<AllocationResult, OptimizeError> {
        self.validate_request(request)?;

        let groups = ScoreNormalizer::eligible(catalog, &request.selected_categories);
        for missing in request
            .selected_categories
            .iter()
            .filter(|name| !groups.iter().any(|g| &g.name == *name))
        {
            tracing::warn!("Selected category '{}' has no plants in the catalog", missing);
        }
        validate_plants(&groups)?;

        let scored = ScoreNormalizer::new(request.weight_savings, request.weight_carbon)
            .with_perennial_multiplier(self.config.perennial_multiplier)
            .score_catalog(&groups)?;

        let quotas = split_capacity(request.total_capacity, scored.len());
        let mut filler = GreedyFiller::new(
            FillPolicy::for_capacity(request.total_capacity),
            request.budget,
        );

        for (category, quota) in scored.iter().zip(quotas) {
            filler.fill_category(category, quota);
        }

        let (aggregator, remaining_budget) = filler.into_aggregator();
        let result = aggregator.finish(request.budget, remaining_budget);

        tracing::info!(
            "Allocated {} of {} plants across {} categories, budget used {:.2} of {:.2}",
            result.total_plants_used,
            request.total_capacity,
            scored.len(),
            result.total_budget_used,
            request.budget
        );

        Ok(result)
    }

    /// Run independent requests against one catalog in parallel
    ///
    /// Results come back in request order.
    pub fn optimize_batch(
        &self,
        catalog: &Catalog,
        requests: &[AllocationRequest],
    ) -> Vec<Result<AllocationResult, OptimizeError>> {
        requests
            .par_iter()
            .map(|request| self.optimize(catalog, request))
            .collect()
    }

    fn validate_request(&self, request: &AllocationRequest) -> Result<(), OptimizeError> {
        // Empty selection is rejected rather than answered with an empty plan
        if request.selected_categories.is_empty() {
            return Err(OptimizeError::validation("no plant categories selected"));
        }
        if !request.budget.is_finite() || request.budget < 0.0 {
            return Err(OptimizeError::validation(format!(
                "budget must be a non-negative number, got {}",
                request.budget
            )));
        }
        if request.total_capacity == 0 {
            return Err(OptimizeError::validation("planting capacity must be positive"));
        }
        for (name, weight) in [
            ("weight_savings", request.weight_savings),
            ("weight_carbon", request.weight_carbon),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(OptimizeError::validation(format!(
                    "{} must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }
        if let Some(multiplier) = self.config.perennial_multiplier {
            if !multiplier.is_finite() || multiplier <= 0.0 {
                return Err(OptimizeError::validation(format!(
                    "perennial multiplier must be positive, got {}",
                    multiplier
                )));
            }
        }
        Ok(())
    }
}

/// Every considered plant needs a positive price and finite yields
fn validate_plants(groups: &[&CategoryPlants]) -> Result<(), OptimizeError> {
    for plant in groups.iter().flat_map(|g| g.plants.iter()) {
        if !plant.growing_price.is_finite() || plant.growing_price <= 0.0 {
            return Err(OptimizeError::validation(format!(
                "plant '{}' in '{}' has non-positive growing price {}",
                plant.label, plant.category, plant.growing_price
            )));
        }
        if !plant.savings_per_unit.is_finite() || !plant.carbon_absorption_per_unit.is_finite() {
            return Err(OptimizeError::validation(format!(
                "plant '{}' in '{}' has a non-numeric savings or carbon value",
                plant.label, plant.category
            )));
        }
    }
    Ok(())
}

/// Optimize with the default configuration
pub fn optimize(
    catalog: &Catalog,
    request: &AllocationRequest,
) -> Result<AllocationResult, OptimizeError> {
    Optimizer::default().optimize(catalog, request)
}
