//! Score Normalization
//!
//! Savings and carbon absorption live on unrelated scales (currency vs kg),
//! so each is divided by its maximum across the eligible plants before the
//! weighted blend:
//!
//! ```text
//! score = w_savings × (savings / max_savings) + w_carbon × (carbon / max_carbon)
//! ```
//!
//! Maxima are taken over every plant in the selected categories (not per
//! category), so scores are comparable across categories.

use crate::catalog::{Catalog, CategoryPlants};
use crate::error::OptimizeError;
use crate::types::{PlantOption, ScoredPlant};

/// Per-selection maxima used as normalization denominators
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Maxima {
    pub max_savings: f64,
    pub max_carb_absorption: f64,
}

/// Score-sorted plants of one category
#[derive(Debug, Clone)]
pub struct ScoredCategory<'a> {
    pub name: &'a str,
    pub plants: Vec<ScoredPlant<'a>>,
}

impl ScoredCategory<'_> {
    /// Lowest growing price in the category (infinity when empty)
    pub fn cheapest_price(&self) -> f64 {
        self.plants
            .iter()
            .map(|s| s.plant.growing_price)
            .fold(f64::INFINITY, f64::min)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreNormalizer {
    weight_savings: f64,
    weight_carbon: f64,
    perennial_multiplier: Option<f64>,
}

impl ScoreNormalizer {
    pub fn new(weight_savings: f64, weight_carbon: f64) -> Self {
        Self {
            weight_savings,
            weight_carbon,
            perennial_multiplier: None,
        }
    }

    /// Scale perennial plants' scores by `multiplier` (None = canonical score)
    pub fn with_perennial_multiplier(mut self, multiplier: Option<f64>) -> Self {
        self.perennial_multiplier = multiplier;
        self
    }

    /// Selected categories present in the catalog, in catalog order
    pub fn eligible<'a>(catalog: &'a Catalog, selected: &[String]) -> Vec<&'a CategoryPlants> {
        catalog
            .categories()
            .filter(|group| !group.plants.is_empty())
            .filter(|group| selected.iter().any(|s| s == &group.name))
            .collect()
    }

    /// Maxima of per-unit savings and carbon across the eligible plants
    ///
    /// Fails when there is nothing to normalize against: no plants, or a
    /// maximum that is not positive.
    pub fn maxima(groups: &[&CategoryPlants]) -> Result<Maxima, OptimizeError> {
        let mut plants = groups.iter().flat_map(|g| g.plants.iter()).peekable();
        if plants.peek().is_none() {
            return Err(OptimizeError::validation(
                "catalog has no plants in the selected categories",
            ));
        }

        let (max_savings, max_carb_absorption) = plants.fold(
            (f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(s, c), p| (s.max(p.savings_per_unit), c.max(p.carbon_absorption_per_unit)),
        );

        if max_savings <= 0.0 {
            return Err(OptimizeError::validation(format!(
                "cannot normalize savings: maximum savings per unit is {}",
                max_savings
            )));
        }
        if max_carb_absorption <= 0.0 {
            return Err(OptimizeError::validation(format!(
                "cannot normalize carbon absorption: maximum absorption per unit is {}",
                max_carb_absorption
            )));
        }

        Ok(Maxima {
            max_savings,
            max_carb_absorption,
        })
    }

    pub fn score(&self, plant: &PlantOption, maxima: &Maxima) -> f64 {
        let base = self.weight_savings * (plant.savings_per_unit / maxima.max_savings)
            + self.weight_carbon * (plant.carbon_absorption_per_unit / maxima.max_carb_absorption);

        match self.perennial_multiplier {
            Some(multiplier) if plant.perennial => base * multiplier,
            _ => base,
        }
    }

    /// Score every eligible plant and sort each category by descending score
    ///
    /// The sort is stable: equal scores keep catalog order.
    pub fn score_catalog<'a>(
        &self,
        groups: &[&'a CategoryPlants],
    ) -> Result<Vec<ScoredCategory<'a>>, OptimizeError> {
        let maxima = Self::maxima(groups)?;
        tracing::debug!(
            "Normalization maxima: savings={}, carbon={}",
            maxima.max_savings,
            maxima.max_carb_absorption
        );

        Ok(groups
            .iter()
            .map(|group| {
                let mut plants: Vec<ScoredPlant<'a>> = group
                    .plants
                    .iter()
                    .map(|plant| ScoredPlant {
                        plant,
                        score: self.score(plant, &maxima),
                    })
                    .collect();
                plants.sort_by(|a, b| b.score.total_cmp(&a.score));

                ScoredCategory {
                    name: group.name.as_str(),
                    plants,
                }
            })
            .collect())
    }
}
