//! Climate Compatibility
//!
//! Compares site weather against a plant's climate profile. A plant is kept
//! when the site's mean temperature sits inside the plant's tolerated range
//! and the site supplies at least the rainfall and sunlight the plant needs.

use crate::types::{PlantOption, WeatherConditions};

/// Where a site value falls relative to a plant's tolerated range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClimateFit {
    /// Site value is below the plant's range
    BelowRange,
    /// Site value is within the plant's range (inclusive)
    WithinRange,
    /// Site value exceeds the plant's range
    AboveRange,
}

impl ClimateFit {
    pub fn from_range(value: f64, min: f64, max: f64) -> Self {
        if value < min {
            ClimateFit::BelowRange
        } else if value > max {
            ClimateFit::AboveRange
        } else {
            ClimateFit::WithinRange
        }
    }
}

/// Temperature fit using the midpoint of the site's temperature range
pub fn temperature_fit(plant: &PlantOption, weather: &WeatherConditions) -> ClimateFit {
    let site_mean = (weather.temp_min + weather.temp_max) / 2.0;
    ClimateFit::from_range(site_mean, plant.climate.temp_min, plant.climate.temp_max)
}

pub fn is_climate_compatible(plant: &PlantOption, weather: &WeatherConditions) -> bool {
    temperature_fit(plant, weather) == ClimateFit::WithinRange
        && weather.rainfall >= plant.climate.rainfall
        && weather.sunlight >= plant.climate.sunlight_min
}
