//! Hourly demand table loader.
//!
//! **Expected CSV format:** `hour,demand` with hours numbered `1..=T` in
//! order and no gaps. Extra columns are ignored.

use crate::headers::{normalized_reader, require_columns};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use ucs_core::{DemandSeries, UcsError, UcsResult};

const TABLE: &str = "demand";

#[derive(Debug, Deserialize)]
struct DemandRecord {
    hour: usize,
    demand: f64,
}

/// Load the hourly demand series from a CSV file.
pub fn load_demand(path: impl AsRef<Path>) -> UcsResult<DemandSeries> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        UcsError::Io(std::io::Error::new(
            e.kind(),
            format!("opening demand table {}: {e}", path.display()),
        ))
    })?;
    read_demand(file)
}

/// Read the hourly demand series from any reader.
pub fn read_demand<R: Read>(input: R) -> UcsResult<DemandSeries> {
    let mut rdr = normalized_reader(input, TABLE)?;
    require_columns(&mut rdr, TABLE, &["hour", "demand"])?;

    let mut values = Vec::new();
    for (row, result) in rdr.deserialize::<DemandRecord>().enumerate() {
        let line = row + 2;
        let record =
            result.map_err(|e| UcsError::Parse(format!("{TABLE} table line {line}: {e}")))?;
        let expected = values.len() + 1;
        if record.hour != expected {
            return Err(UcsError::validation(
                format!("{TABLE}.hour (line {line})"),
                format!("expected hour {expected}, got {}", record.hour),
            ));
        }
        values.push(record.demand);
    }
    DemandSeries::new(values)
}
