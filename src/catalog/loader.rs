//! Catalog Loading
//!
//! Reads plant catalogs from disk. Three layouts are accepted, picked by file
//! extension:
//!
//! - `.json`: an array of `{ "<category>": [plant, ...] }` objects (or a single
//!   such object). Plant keys: `label`, `temp_min`, `temp_max`, `rainfall`,
//!   `sunlight_min`, `perennial`, `market_price`, `growing_price`, `savings`,
//!   `carbon_absorption`.
//! - `.csv` / `.parquet`: one row per plant with the columns listed in
//!   `TABLE_COLUMNS`, scanned lazily with Polars.
//!
//! A plant without a savings figure gets `market_price - growing_price`
//! (floored at zero): growing it at home saves what buying it would cost.

use std::fs;
use std::path::Path;

use polars::prelude::*;
use serde::Deserialize;

use super::Catalog;
use crate::error::CatalogError;
use crate::types::{ClimateProfile, PlantOption};

/// (source column, normalized name) for tabular catalogs
const TABLE_COLUMNS: [(&str, &str); 11] = [
    ("Category", "category"),
    ("Label", "label"),
    ("Temp Min", "temp_min"),
    ("Temp Max", "temp_max"),
    ("Rainfall", "rainfall"),
    ("Sunlight Min", "sunlight_min"),
    ("Perennial", "perennial"),
    ("Market Price", "market_price"),
    ("Growing Price", "growing_price"),
    ("Savings", "savings"),
    ("Carbon Absorption", "carbon_absorption"),
];

/// Load a catalog, choosing the reader from the file extension
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let catalog = match extension.as_str() {
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        "parquet" => load_parquet(path)?,
        other => {
            return Err(CatalogError::UnsupportedFormat(format!(
                "'{}' (expected .json, .csv or .parquet)",
                other
            )))
        }
    };

    tracing::info!(
        "Loaded catalog {:?}: {} plants in {} categories",
        path,
        catalog.len(),
        catalog.category_names().len()
    );
    Ok(catalog)
}

// ============================================================================
// JSON
// ============================================================================

#[derive(Debug, Deserialize)]
struct PlantRecord {
    label: String,
    temp_min: f64,
    temp_max: f64,
    rainfall: f64,
    sunlight_min: f64,
    #[serde(default)]
    perennial: bool,
    #[serde(default)]
    market_price: f64,
    growing_price: f64,
    #[serde(default)]
    savings: Option<f64>,
    carbon_absorption: f64,
}

impl PlantRecord {
    fn into_option(self, category: &str) -> PlantOption {
        PlantOption {
            savings_per_unit: self
                .savings
                .unwrap_or_else(|| derive_savings(self.market_price, self.growing_price)),
            label: self.label,
            category: category.to_string(),
            growing_price: self.growing_price,
            carbon_absorption_per_unit: self.carbon_absorption,
            climate: ClimateProfile {
                temp_min: self.temp_min,
                temp_max: self.temp_max,
                rainfall: self.rainfall,
                sunlight_min: self.sunlight_min,
            },
            perennial: self.perennial,
            market_price: self.market_price,
        }
    }
}

pub fn load_json(path: &Path) -> Result<Catalog, CatalogError> {
    let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_json(&contents)
}

/// Parse a JSON catalog document, keeping category order as written
pub fn parse_json(contents: &str) -> Result<Catalog, CatalogError> {
    let document: serde_json::Value = serde_json::from_str(contents)?;

    let groups = match document {
        serde_json::Value::Array(items) => items,
        object @ serde_json::Value::Object(_) => vec![object],
        _ => {
            return Err(CatalogError::UnsupportedFormat(
                "JSON catalog must be an object or an array of objects".to_string(),
            ))
        }
    };

    let mut catalog = Catalog::new();
    for group in groups {
        let serde_json::Value::Object(categories) = group else {
            return Err(CatalogError::UnsupportedFormat(
                "JSON catalog entries must be objects keyed by category".to_string(),
            ));
        };
        for (category, plants) in categories {
            let records: Vec<PlantRecord> = serde_json::from_value(plants)?;
            for record in records {
                catalog.push(record.into_option(&category))?;
            }
        }
    }
    Ok(catalog)
}

// ============================================================================
// CSV / Parquet
// ============================================================================

pub fn load_csv(path: &Path) -> Result<Catalog, CatalogError> {
    let lazy = LazyCsvReader::new(path).with_has_header(true).finish()?;
    catalog_from_frame(lazy)
}

pub fn load_parquet(path: &Path) -> Result<Catalog, CatalogError> {
    let lazy = LazyFrame::scan_parquet(path, Default::default())?;
    catalog_from_frame(lazy)
}

/// Project and cast the catalog columns, then build plants row by row
fn catalog_from_frame(lazy: LazyFrame) -> Result<Catalog, CatalogError> {
    let columns: Vec<Expr> = TABLE_COLUMNS
        .iter()
        .map(|(source, name)| {
            let dtype = match *name {
                "category" | "label" | "perennial" => DataType::String,
                _ => DataType::Float64,
            };
            col(*source).cast(dtype).alias(*name)
        })
        .collect();

    let df = lazy.select(columns).collect()?;

    let categories = df.column("category")?.str()?;
    let labels = df.column("label")?.str()?;
    let perennials = df.column("perennial")?.str()?;
    let temp_min = df.column("temp_min")?.f64()?;
    let temp_max = df.column("temp_max")?.f64()?;
    let rainfall = df.column("rainfall")?.f64()?;
    let sunlight_min = df.column("sunlight_min")?.f64()?;
    let market_price = df.column("market_price")?.f64()?;
    let growing_price = df.column("growing_price")?.f64()?;
    let savings = df.column("savings")?.f64()?;
    let carbon = df.column("carbon_absorption")?.f64()?;

    let required = |value: Option<f64>, row: usize, column: &'static str| {
        value.ok_or(CatalogError::MissingValue { row, column })
    };

    let mut catalog = Catalog::new();
    for row in 0..df.height() {
        let category = categories
            .get(row)
            .ok_or(CatalogError::MissingValue { row, column: "Category" })?;
        let label = labels
            .get(row)
            .ok_or(CatalogError::MissingValue { row, column: "Label" })?;
        let growing = required(growing_price.get(row), row, "Growing Price")?;
        let market = market_price.get(row).unwrap_or(0.0);

        catalog.push(PlantOption {
            label: label.trim().to_string(),
            category: category.trim().to_string(),
            growing_price: growing,
            savings_per_unit: savings
                .get(row)
                .unwrap_or_else(|| derive_savings(market, growing)),
            carbon_absorption_per_unit: required(carbon.get(row), row, "Carbon Absorption")?,
            climate: ClimateProfile {
                temp_min: required(temp_min.get(row), row, "Temp Min")?,
                temp_max: required(temp_max.get(row), row, "Temp Max")?,
                rainfall: required(rainfall.get(row), row, "Rainfall")?,
                sunlight_min: required(sunlight_min.get(row), row, "Sunlight Min")?,
            },
            perennial: perennials.get(row).map(parse_flag).unwrap_or(false),
            market_price: market,
        })?;
    }
    Ok(catalog)
}

/// "Yes"/"No" as written by spreadsheet exports, or true/false, 1/0
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "yes" | "y" | "true" | "1"
    )
}

fn derive_savings(market_price: f64, growing_price: f64) -> f64 {
    (market_price - growing_price).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    const JSON_CATALOG: &str = r#"[
        {
            "Vegetables": [
                {"label": "Tomato", "temp_min": 18, "temp_max": 32, "rainfall": 600,
                 "sunlight_min": 6, "perennial": false, "market_price": 40,
                 "growing_price": 10, "savings": 15, "carbon_absorption": 2.0},
                {"label": "Spinach", "temp_min": 10, "temp_max": 28, "rainfall": 400,
                 "sunlight_min": 4, "perennial": false, "market_price": 30,
                 "growing_price": 5, "carbon_absorption": 1.0}
            ],
            "Fruits": [
                {"label": "Mango", "temp_min": 20, "temp_max": 40, "rainfall": 900,
                 "sunlight_min": 8, "perennial": true, "market_price": 120,
                 "growing_price": 50, "savings": 60, "carbon_absorption": 5.0}
            ]
        }
    ]"#;

    #[test]
    fn test_parse_json_keeps_category_order() {
        let catalog = parse_json(JSON_CATALOG).unwrap();
        assert_eq!(catalog.category_names(), vec!["Vegetables", "Fruits"]);

        let mango = &catalog.category("Fruits").unwrap()[0];
        assert!(mango.perennial);
        assert_relative_eq!(mango.savings_per_unit, 60.0);
        assert_relative_eq!(mango.climate.rainfall, 900.0);
    }

    #[test]
    fn test_missing_savings_derived_from_prices() {
        let catalog = parse_json(JSON_CATALOG).unwrap();
        let spinach = &catalog.category("Vegetables").unwrap()[1];
        assert_relative_eq!(spinach.savings_per_unit, 25.0);
    }

    #[test]
    fn test_single_object_document() {
        let json = r#"{"Herbs": [{"label": "Mint", "temp_min": 5, "temp_max": 30,
            "rainfall": 300, "sunlight_min": 3, "growing_price": 2,
            "savings": 4, "carbon_absorption": 0.3}]}"#;
        let catalog = parse_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.category("Herbs").unwrap()[0].perennial);
    }

    #[test]
    fn test_rejects_non_object_document() {
        assert!(matches!(
            parse_json("42"),
            Err(CatalogError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_csv() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(
            file,
            "Category,Label,Temp Min,Temp Max,Rainfall,Sunlight Min,Perennial,Market Price,Growing Price,Savings,Carbon Absorption"
        )
        .unwrap();
        writeln!(file, "Vegetables,Tomato,18,32,600,6,No,40,10,15,2.0").unwrap();
        writeln!(file, "Fruits,Mango,20,40,900,8,Yes,120,50,60,5.5").unwrap();
        writeln!(file, "Vegetables,Spinach,10,28,400,4,No,30,5,,1.0").unwrap();
        file.flush().unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.category_names(), vec!["Vegetables", "Fruits"]);

        let mango = &catalog.category("Fruits").unwrap()[0];
        assert!(mango.perennial);
        assert_relative_eq!(mango.carbon_absorption_per_unit, 5.5);

        let spinach = &catalog.category("Vegetables").unwrap()[1];
        assert_relative_eq!(spinach.savings_per_unit, 25.0);
    }

    #[test]
    fn test_unknown_extension() {
        let err = load_catalog("plants.xlsx").unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("Yes"));
        assert!(parse_flag("true"));
        assert!(!parse_flag("No"));
        assert!(!parse_flag(""));
    }
}
