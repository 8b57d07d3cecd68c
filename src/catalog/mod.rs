//! Plant Catalog
//!
//! Read-only plant options grouped by category. Categories keep the order in
//! which they first appear in the source, which is the iteration order the
//! optimizer uses when distributing capacity.
//!
//! - `loader.rs` - JSON / CSV / Parquet catalog files
//! - `climate.rs` - weather-based compatibility filter

pub mod loader;
pub mod climate;

pub use loader::{load_catalog, load_csv, load_json, load_parquet};
pub use climate::{is_climate_compatible, ClimateFit};

use crate::error::CatalogError;
use crate::types::{Location, PlantOption, WeatherConditions};

/// Plants of one category, in catalog order
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPlants {
    pub name: String,
    pub plants: Vec<PlantOption>,
}

/// Ordered mapping category → plants
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    categories: Vec<CategoryPlants>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from plants in order; fails on a label repeated within a category
    pub fn from_plants(plants: impl IntoIterator<Item = PlantOption>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for plant in plants {
            catalog.push(plant)?;
        }
        Ok(catalog)
    }

    /// Append a plant to its category, creating the category on first sight
    pub fn push(&mut self, plant: PlantOption) -> Result<(), CatalogError> {
        match self.categories.iter_mut().find(|c| c.name == plant.category) {
            Some(group) => {
                if group.plants.iter().any(|p| p.label == plant.label) {
                    return Err(CatalogError::DuplicateLabel {
                        category: plant.category,
                        label: plant.label,
                    });
                }
                group.plants.push(plant);
            }
            None => self.categories.push(CategoryPlants {
                name: plant.category.clone(),
                plants: vec![plant],
            }),
        }
        Ok(())
    }

    pub fn categories(&self) -> impl Iterator<Item = &CategoryPlants> {
        self.categories.iter()
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn category(&self, name: &str) -> Option<&[PlantOption]> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.plants.as_slice())
    }

    /// Total number of plants across categories
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.plants.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keep only plants matching `keep`; categories left empty are dropped
    pub fn retain_plants<F>(&self, mut keep: F) -> Catalog
    where
        F: FnMut(&PlantOption) -> bool,
    {
        let categories = self
            .categories
            .iter()
            .filter_map(|group| {
                let plants: Vec<PlantOption> =
                    group.plants.iter().filter(|p| keep(p)).cloned().collect();
                (!plants.is_empty()).then(|| CategoryPlants {
                    name: group.name.clone(),
                    plants,
                })
            })
            .collect();
        Catalog { categories }
    }

    /// Plants compatible with the given weather (see `climate::is_climate_compatible`)
    pub fn filter_by_climate(&self, weather: &WeatherConditions) -> Catalog {
        self.retain_plants(|plant| is_climate_compatible(plant, weather))
    }
}

/// Source of plant catalogs for a planting site
///
/// Implementations do their I/O up front; the optimizer only ever sees the
/// returned, immutable `Catalog`.
pub trait CatalogProvider: Send + Sync {
    fn catalog(
        &self,
        location: &Location,
        climate_filter: Option<&WeatherConditions>,
    ) -> Result<Catalog, CatalogError>;
}

/// Serves one in-memory catalog regardless of location
#[derive(Debug, Clone)]
pub struct StaticCatalogProvider {
    catalog: Catalog,
}

impl StaticCatalogProvider {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Load the catalog file once (see `load_catalog`)
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, CatalogError> {
        Ok(Self::new(load_catalog(path)?))
    }

    pub fn inner(&self) -> &Catalog {
        &self.catalog
    }
}

impl CatalogProvider for StaticCatalogProvider {
    fn catalog(
        &self,
        _location: &Location,
        climate_filter: Option<&WeatherConditions>,
    ) -> Result<Catalog, CatalogError> {
        Ok(match climate_filter {
            Some(weather) => {
                let filtered = self.catalog.filter_by_climate(weather);
                tracing::debug!(
                    "Climate filter kept {} of {} plants",
                    filtered.len(),
                    self.catalog.len()
                );
                filtered
            }
            None => self.catalog.clone(),
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::types::{ClimateProfile, PlantOption};

    pub fn plant(category: &str, label: &str, price: f64, savings: f64, carbon: f64) -> PlantOption {
        PlantOption {
            label: label.to_string(),
            category: category.to_string(),
            growing_price: price,
            savings_per_unit: savings,
            carbon_absorption_per_unit: carbon,
            climate: ClimateProfile {
                temp_min: 10.0,
                temp_max: 35.0,
                rainfall: 500.0,
                sunlight_min: 4.0,
            },
            perennial: false,
            market_price: price + savings,
        }
    }
}
