//! File and stream export for solve results

use crate::pricing::MarginalPrices;
use crate::solution::UcSolution;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

impl UcSolution {
    /// Export the full result as pretty JSON.
    pub fn to_json(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("serializing UcSolution to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing JSON to {}", path.display()))?;
        Ok(())
    }

    /// Convert to JSON value (for stdout)
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).context("converting UcSolution to JSON value")
    }

    /// Export the tidy dispatch table (`unit,hour,variable,value`).
    pub fn to_csv(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating CSV file at {}", path.display()))?;
        self.write_csv(file)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for record in self.records() {
            wtr.serialize(&record).context("writing CSV record")?;
        }
        wtr.flush().context("flushing CSV writer")?;
        Ok(())
    }
}

impl MarginalPrices {
    /// Write `hour,price` rows with 1-based hours.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["hour", "price"])
            .context("writing CSV header")?;
        for (t, price) in self.hourly.iter().enumerate() {
            wtr.write_record([(t + 1).to_string(), price.to_string()])
                .context("writing CSV record")?;
        }
        wtr.flush().context("flushing CSV writer")?;
        Ok(())
    }

    pub fn to_csv(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating CSV file at {}", path.display()))?;
        self.write_csv(file)
    }
}
