//! Result Reporting
//!
//! Plain-text summary of a plan (`Display`) and JSON persistence. Neither is
//! used by the optimizer itself.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::types::AllocationResult;

impl fmt::Display for AllocationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== Optimized Crop Selection Results =====")?;
        writeln!(f)?;
        writeln!(f, "    Total Savings = {:.2}", self.total_savings)?;
        writeln!(f, "    Total Carbon Absorbed = {}", self.total_carbon_absorbed)?;
        writeln!(f, "    Total Plants Grown = {}", self.total_plants_used)?;
        writeln!(f, "    Total Budget Used = {:.2}", self.total_budget_used)?;
        writeln!(f)?;

        if self.entries.is_empty() {
            return writeln!(f, "No plants fit the given budget and capacity.");
        }

        writeln!(f, "Recommended Plants:")?;
        for entry in &self.entries {
            writeln!(f)?;
            writeln!(f, "  {} ({}):", entry.label, entry.category)?;
            writeln!(f, "    Plants: {}", entry.quantity)?;
            writeln!(f, "    Growing Price: {:.2}", entry.growing_price)?;
            writeln!(f, "    Carbon Absorption: {}", entry.carbon_total)?;
            writeln!(f, "    Savings: {:.2}", entry.savings_total)?;
        }
        Ok(())
    }
}

/// Write the result as pretty-printed JSON (stable field names)
pub fn save_json(result: &AllocationResult, path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, result)?;
    writeln!(writer)?;
    writer.flush()?;
    tracing::info!("Saved plan to {:?}", path);
    Ok(())
}
