// Recommend Binary
//
// Purpose: One planning run from the command line; prints the summary and
// writes the plan as JSON
// Usage: cargo run --bin recommend [-- <terrace_size> <budget>]

use anyhow::Context;
use crop_planner::report::save_json;
use crop_planner::{Optimizer, Planner, RecommendRequest, StaticCatalogProvider};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crop_planner=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let catalog_path = std::env::var("CATALOG_PATH")
        .unwrap_or_else(|_| "data/plants.json".to_string());
    let output_path = std::env::var("OUTPUT_PATH")
        .unwrap_or_else(|_| "optimized_plants.json".to_string());
    let pot_size: f64 = std::env::var("POT_SIZE")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(crop_planner::planner::DEFAULT_POT_SIZE);

    // Positional overrides: terrace size, budget
    let args: Vec<String> = std::env::args().skip(1).collect();
    let terrace_size: f64 = match args.first() {
        Some(arg) => arg.parse().with_context(|| format!("Invalid terrace size: {}", arg))?,
        None => 100.0,
    };
    let budget: f64 = match args.get(1) {
        Some(arg) => arg.parse().with_context(|| format!("Invalid budget: {}", arg))?,
        None => 2000.0,
    };

    let provider = StaticCatalogProvider::from_path(&catalog_path)
        .with_context(|| format!("Failed to load catalog: {}", catalog_path))?;
    let planner = Planner::new(Arc::new(provider), Optimizer::default());

    let request = RecommendRequest {
        terrace_size,
        latitude: 12.0,
        longitude: 71.0,
        savings_weight: 0.2,
        weight_carbon_absorption: 0.8,
        budget,
        types: vec!["Vegetables".to_string(), "Fruits".to_string()],
        pot_size,
        weather: None,
    };

    let result = planner.recommend(&request)?;
    print!("{}", result);

    save_json(&result, &output_path)
        .with_context(|| format!("Failed to write {}", output_path))?;
    println!();
    println!("Results saved to {}", output_path);

    Ok(())
}
