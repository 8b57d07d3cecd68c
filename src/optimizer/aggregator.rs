//! Result aggregation
//!
//! Collects allocations into one entry per (category, label), in the order
//! plants were first allocated, and keeps the running totals.

use rustc_hash::FxHashMap;

use crate::types::{AllocationEntry, AllocationResult, PlantOption};

/// Round to 6 decimal digits (reporting precision for carbon totals)
pub fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Run-local accumulator; never shared between runs
#[derive(Debug, Default)]
pub struct ResultAggregator {
    entries: Vec<AllocationEntry>,
    index: FxHashMap<(String, String), usize>,
    total_savings: f64,
    total_carbon: f64,
    total_plants: u32,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` units of `plant`, merging into its existing entry if any
    pub fn record(&mut self, plant: &PlantOption, count: u32) {
        if count == 0 {
            return;
        }

        let savings = count as f64 * plant.savings_per_unit;
        let carbon = count as f64 * plant.carbon_absorption_per_unit;

        let key = (plant.category.clone(), plant.label.clone());
        match self.index.get(&key) {
            Some(&idx) => {
                let entry = &mut self.entries[idx];
                entry.quantity += count;
                entry.savings_total += savings;
                entry.carbon_total += carbon;
            }
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(AllocationEntry {
                    label: plant.label.clone(),
                    category: plant.category.clone(),
                    growing_price: plant.growing_price,
                    quantity: count,
                    savings_total: savings,
                    carbon_total: carbon,
                });
            }
        }

        self.total_savings += savings;
        self.total_carbon += carbon;
        self.total_plants += count;
    }

    /// Produce the final result; budget used is `budget - remaining_budget`
    pub fn finish(self, budget: f64, remaining_budget: f64) -> AllocationResult {
        AllocationResult {
            entries: self.entries,
            total_savings: self.total_savings,
            total_carbon_absorbed: round6(self.total_carbon),
            total_plants_used: self.total_plants,
            total_budget_used: (budget - remaining_budget).max(0.0).min(budget),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::plant;
    use approx::assert_relative_eq;

    #[test]
    fn test_repeated_label_merges() {
        let tomato = plant("Vegetables", "Tomato", 10.0, 15.0, 2.0);
        let spinach = plant("Vegetables", "Spinach", 5.0, 8.0, 1.0);

        let mut agg = ResultAggregator::new();
        agg.record(&tomato, 2);
        agg.record(&spinach, 2);
        agg.record(&tomato, 1);

        let result = agg.finish(100.0, 60.0);
        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.entries[0].label, "Tomato");
        assert_eq!(result.entries[0].quantity, 3);
        assert_relative_eq!(result.entries[0].savings_total, 45.0);
        assert_relative_eq!(result.entries[0].carbon_total, 6.0);
        assert_eq!(result.total_plants_used, 5);
        assert_relative_eq!(result.total_savings, 61.0);
        assert_relative_eq!(result.total_carbon_absorbed, 8.0);
        assert_relative_eq!(result.total_budget_used, 40.0);
    }

    #[test]
    fn test_same_label_in_two_categories_kept_apart() {
        let mut agg = ResultAggregator::new();
        agg.record(&plant("Herbs", "Basil", 2.0, 3.0, 0.5), 1);
        agg.record(&plant("Vegetables", "Basil", 2.0, 3.0, 0.5), 1);
        assert_eq!(agg.finish(10.0, 6.0).entries.len(), 2);
    }

    #[test]
    fn test_zero_count_ignored() {
        let mut agg = ResultAggregator::new();
        agg.record(&plant("Herbs", "Mint", 2.0, 3.0, 0.5), 0);
        assert!(agg.finish(10.0, 10.0).is_empty());
    }

    #[test]
    fn test_carbon_rounded_to_six_decimals() {
        assert_relative_eq!(round6(0.1 + 0.2), 0.3);
        assert_relative_eq!(round6(1.23456789), 1.234568);
    }
}
