//! Shared data contracts
//!
//! Catalog records (`PlantOption`), the optimizer's input (`AllocationRequest`)
//! and output (`AllocationResult`). Result field names are stable: downstream
//! clients read `total_plants_grown`, `recommended_plants`, `no_of_plants`, etc.

use serde::{Deserialize, Serialize};

/// Climate envelope a plant is known to grow in
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClimateProfile {
    /// Minimum tolerated temperature (°C)
    pub temp_min: f64,
    /// Maximum tolerated temperature (°C)
    pub temp_max: f64,
    /// Rainfall needed (mm)
    pub rainfall: f64,
    /// Minimum daily sunlight (hours)
    pub sunlight_min: f64,
}

/// One candidate plant from the catalog. Read-only during optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantOption {
    /// Identifier, unique within its category
    pub label: String,
    pub category: String,
    /// Cost to grow one unit (always > 0 for plants the optimizer accepts)
    pub growing_price: f64,
    pub savings_per_unit: f64,
    pub carbon_absorption_per_unit: f64,
    pub climate: ClimateProfile,
    pub perennial: bool,
    pub market_price: f64,
}

/// A catalog plant with its normalized weighted score for one run
#[derive(Debug, Clone, Copy)]
pub struct ScoredPlant<'a> {
    pub plant: &'a PlantOption,
    pub score: f64,
}

/// Gardener's constraints for one optimization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// Plant units the available area can hold
    pub total_capacity: u32,
    pub budget: f64,
    pub weight_savings: f64,
    pub weight_carbon: f64,
    pub selected_categories: Vec<String>,
}

impl AllocationRequest {
    pub fn new(
        total_capacity: u32,
        budget: f64,
        weight_savings: f64,
        weight_carbon: f64,
        selected_categories: &[&str],
    ) -> Self {
        Self {
            total_capacity,
            budget,
            weight_savings,
            weight_carbon,
            selected_categories: selected_categories.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Quantity of one plant in the final plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub label: String,
    pub category: String,
    pub growing_price: f64,
    #[serde(rename = "no_of_plants")]
    pub quantity: u32,
    #[serde(rename = "savings")]
    pub savings_total: f64,
    #[serde(rename = "total_carbon_absorption")]
    pub carbon_total: f64,
}

/// Planting plan produced by one optimizer run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AllocationResult {
    /// Entries in first-allocation order
    #[serde(rename = "recommended_plants")]
    pub entries: Vec<AllocationEntry>,
    pub total_savings: f64,
    /// Rounded to 6 decimal digits
    pub total_carbon_absorbed: f64,
    #[serde(rename = "total_plants_grown")]
    pub total_plants_used: u32,
    pub total_budget_used: f64,
}

impl AllocationResult {
    /// Zero-entry result with zeroed totals
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no plant could be allocated (a valid outcome, not an error)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by category and label
    pub fn entry(&self, category: &str, label: &str) -> Option<&AllocationEntry> {
        self.entries
            .iter()
            .find(|e| e.category == category && e.label == label)
    }
}

/// Observed or forecast conditions at the planting site
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherConditions {
    pub temp_min: f64,
    pub temp_max: f64,
    pub rainfall: f64,
    pub sunlight: f64,
}

/// Planting site coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}
