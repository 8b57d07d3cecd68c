//! Greedy Filling
//!
//! Fills each category's quota from its score-sorted plant list while drawing
//! on one budget and one capacity pool shared by all categories.
//!
//! Each category is filled in rounds. In a round every plant, best score
//! first, may receive
//!
//! ```text
//! count = min(diversify_limit, category_quota, floor(budget / price),
//!             remaining_capacity, cap_per_label - already_allocated)
//! ```
//!
//! units. `diversify_limit` is 2 while the category still holds more than a
//! fifth of total capacity, then 1, so early rounds spread units across
//! plants and later rounds top up one unit at a time. A round that assigns
//! nothing ends the category; every productive round lowers the quota, so
//! filling always terminates.

use rustc_hash::FxHashMap;

use super::aggregator::ResultAggregator;
use super::normalizer::ScoredCategory;
use crate::types::PlantOption;

/// Diversification limits derived from the requested capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillPolicy {
    pub total_capacity: u32,
    /// Maximum units of any single plant: max(1, floor(capacity / 10))
    pub cap_per_label: u32,
}

impl FillPolicy {
    pub fn for_capacity(total_capacity: u32) -> Self {
        Self {
            total_capacity,
            cap_per_label: (total_capacity / 10).max(1),
        }
    }

    /// Units a plant may receive per round given the category's remaining quota
    pub fn diversify_limit(&self, category_quota: u32) -> u32 {
        // quota > capacity / 5, without the real division
        if u64::from(category_quota) * 5 > u64::from(self.total_capacity) {
            2
        } else {
            1
        }
    }
}

/// Why a category stopped filling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    QuotaFilled,
    CapacityExhausted,
    /// Remaining budget cannot pay for the category's cheapest plant
    BudgetExhausted,
    /// A full round assigned nothing (caps reached or nothing affordable)
    NoProgress,
}

/// Outcome of filling one category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryFill {
    pub assigned: u32,
    pub rounds: usize,
    pub stop: StopReason,
}

/// Budget/capacity pools and per-label counters for one optimization run
pub struct GreedyFiller<'a> {
    policy: FillPolicy,
    remaining_budget: f64,
    remaining_capacity: u32,
    allocated: FxHashMap<(&'a str, &'a str), u32>,
    aggregator: ResultAggregator,
}

impl<'a> GreedyFiller<'a> {
    pub fn new(policy: FillPolicy, budget: f64) -> Self {
        Self {
            policy,
            remaining_budget: budget.max(0.0),
            remaining_capacity: policy.total_capacity,
            allocated: FxHashMap::default(),
            aggregator: ResultAggregator::new(),
        }
    }

    pub fn remaining_budget(&self) -> f64 {
        self.remaining_budget
    }

    pub fn remaining_capacity(&self) -> u32 {
        self.remaining_capacity
    }

    /// Fill one category with up to `quota` units
    pub fn fill_category(&mut self, category: &ScoredCategory<'a>, quota: u32) -> CategoryFill {
        let cheapest = category.cheapest_price();
        let mut quota = quota;
        let mut assigned = 0;
        let mut rounds = 0;

        let stop = loop {
            if quota == 0 {
                break StopReason::QuotaFilled;
            }
            if self.remaining_capacity == 0 {
                break StopReason::CapacityExhausted;
            }
            if self.remaining_budget <= 0.0 || cheapest > self.remaining_budget {
                break StopReason::BudgetExhausted;
            }

            rounds += 1;
            let mut progressed = false;

            for scored in &category.plants {
                if quota == 0 || self.remaining_capacity == 0 {
                    break;
                }

                // Budget spent mid-round: later plants get count 0 here and the
                // round-start check stops the category
                let count = self.count_for(scored.plant, quota);
                if count == 0 {
                    continue;
                }

                self.assign(scored.plant, count);
                quota -= count;
                assigned += count;
                progressed = true;
            }

            if !progressed {
                break StopReason::NoProgress;
            }
        };

        tracing::debug!(
            "Category '{}': assigned {} units in {} rounds ({:?}), budget left {:.2}, capacity left {}",
            category.name,
            assigned,
            rounds,
            stop,
            self.remaining_budget,
            self.remaining_capacity
        );

        CategoryFill { assigned, rounds, stop }
    }

    /// Units `plant` may receive now (0 = skip)
    fn count_for(&self, plant: &'a PlantOption, category_quota: u32) -> u32 {
        // Saturating float → int: NaN and negatives give 0
        let affordable = (self.remaining_budget / plant.growing_price).floor() as u32;
        let already = self
            .allocated
            .get(&(plant.category.as_str(), plant.label.as_str()))
            .copied()
            .unwrap_or(0);
        let headroom = self.policy.cap_per_label.saturating_sub(already);

        [
            self.policy.diversify_limit(category_quota),
            category_quota,
            affordable,
            self.remaining_capacity,
            headroom,
        ]
        .into_iter()
        .min()
        .unwrap_or(0)
    }

    fn assign(&mut self, plant: &'a PlantOption, count: u32) {
        let cost = count as f64 * plant.growing_price;
        self.remaining_budget = (self.remaining_budget - cost).max(0.0);
        self.remaining_capacity -= count;
        *self
            .allocated
            .entry((plant.category.as_str(), plant.label.as_str()))
            .or_insert(0) += count;
        self.aggregator.record(plant, count);
    }

    /// Hand the accumulated entries and totals to the caller
    pub fn into_aggregator(self) -> (ResultAggregator, f64) {
        (self.aggregator, self.remaining_budget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::plant;
    use crate::types::ScoredPlant;
    use approx::assert_relative_eq;

    fn category<'a>(name: &'a str, plants: &'a [PlantOption]) -> ScoredCategory<'a> {
        // Already in the desired order; scores only need to descend
        ScoredCategory {
            name,
            plants: plants
                .iter()
                .enumerate()
                .map(|(idx, plant)| ScoredPlant {
                    plant,
                    score: 1.0 - idx as f64 * 0.1,
                })
                .collect(),
        }
    }

    #[test]
    fn test_policy_limits() {
        let policy = FillPolicy::for_capacity(100);
        assert_eq!(policy.cap_per_label, 10);
        assert_eq!(policy.diversify_limit(21), 2);
        assert_eq!(policy.diversify_limit(20), 1);

        // Small capacities still allow one unit per plant
        assert_eq!(FillPolicy::for_capacity(7).cap_per_label, 1);
    }

    #[test]
    fn test_spreads_across_plants_in_rounds() {
        let plants = vec![
            plant("Vegetables", "Tomato", 1.0, 10.0, 1.0),
            plant("Vegetables", "Spinach", 1.0, 8.0, 1.0),
            plant("Vegetables", "Okra", 1.0, 6.0, 1.0),
        ];
        let cat = category("Vegetables", &plants);

        // capacity 30 → cap 3 per label; quota 9 → limit 2 while quota > 6
        let mut filler = GreedyFiller::new(FillPolicy::for_capacity(30), 1000.0);
        let fill = filler.fill_category(&cat, 9);

        assert_eq!(fill.assigned, 9);
        assert_eq!(fill.stop, StopReason::QuotaFilled);

        let (agg, _) = filler.into_aggregator();
        let result = agg.finish(1000.0, 991.0);
        let quantities: Vec<u32> = result.entries.iter().map(|e| e.quantity).collect();
        assert_eq!(quantities, vec![3, 3, 3]);
    }

    #[test]
    fn test_label_cap_ends_category_without_progress() {
        let plants = vec![plant("Fruits", "Mango", 1.0, 10.0, 1.0)];
        let cat = category("Fruits", &plants);

        // cap = 2, quota 8: Mango can never take more than 2
        let mut filler = GreedyFiller::new(FillPolicy::for_capacity(20), 1000.0);
        let fill = filler.fill_category(&cat, 8);

        assert_eq!(fill.assigned, 2);
        assert_eq!(fill.stop, StopReason::NoProgress);
        assert_eq!(filler.remaining_capacity(), 18);
    }

    #[test]
    fn test_unaffordable_plant_skipped() {
        let plants = vec![
            plant("Fruits", "Mango", 50.0, 60.0, 5.0),
            plant("Fruits", "Guava", 5.0, 10.0, 1.0),
        ];
        let cat = category("Fruits", &plants);

        let mut filler = GreedyFiller::new(FillPolicy::for_capacity(10), 12.0);
        let fill = filler.fill_category(&cat, 5);

        // Guava takes its single-unit cap; Mango never fits the budget
        assert_eq!(fill.assigned, 1);
        let (agg, remaining) = filler.into_aggregator();
        let result = agg.finish(12.0, remaining);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].label, "Guava");
        assert_relative_eq!(result.total_budget_used, 5.0);
    }

    #[test]
    fn test_budget_exhaustion_stops_category() {
        let plants = vec![plant("Fruits", "Mango", 50.0, 60.0, 5.0)];
        let cat = category("Fruits", &plants);

        let mut filler = GreedyFiller::new(FillPolicy::for_capacity(10), 40.0);
        let fill = filler.fill_category(&cat, 5);

        assert_eq!(fill.assigned, 0);
        assert_eq!(fill.rounds, 0);
        assert_eq!(fill.stop, StopReason::BudgetExhausted);
    }

    #[test]
    fn test_shared_pools_across_categories() {
        let vegetables = vec![plant("Vegetables", "Tomato", 10.0, 15.0, 2.0)];
        let fruits = vec![plant("Fruits", "Mango", 10.0, 60.0, 5.0)];

        // capacity 40 → cap 4; budget covers 5 units in total
        let mut filler = GreedyFiller::new(FillPolicy::for_capacity(40), 50.0);
        let first = filler.fill_category(&category("Vegetables", &vegetables), 20);
        let second = filler.fill_category(&category("Fruits", &fruits), 20);

        assert_eq!(first.assigned, 4);
        assert_eq!(second.assigned, 1);
        assert_eq!(second.stop, StopReason::BudgetExhausted);
        assert_relative_eq!(filler.remaining_budget(), 0.0);
    }
}
