//! Generator table loader.
//!
//! **Expected CSV format** (header names case-insensitive, column order free):
//!
//! ```csv
//! id,bus,p_min,p_max,var_om_cost_per_mwh,heat_rate_mmbtu_per_mwh,fuel_cost,start_cost,min_up,min_down,is_storage,existing_cap_mw,battery_eff,start_charge
//! coal,1,150,600,4.5,10.0,2.0,9000,4,4,0,,,
//! gas_ct,1,0,300,8.0,11.0,4.0,500,1,1,0,,,
//! pumped_hydro,1,,,,,,,,,1,100,0.84,200
//! ```
//!
//! Required columns: `id`, `p_min`, `p_max`, `var_om_cost_per_mwh`. Values in
//! those columns may be blank on storage rows. Everything else is optional:
//!
//! - variable cost = `var_om_cost_per_mwh + heat_rate_mmbtu_per_mwh × fuel_cost`
//! - `start_cost` ($ per start, default 0), `min_up` / `min_down` (hours, default 1)
//! - `committable` and `initial_status` flags accept `1/0`, `true/false`, `yes/no`
//! - storage rows take their power rating from `existing_cap_mw` (falling back to
//!   `p_max`); `battery_eff` and `start_charge` default to the conventions in
//!   [`ucs_core::storage`]

use crate::headers::{normalized_reader, require_columns};
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use ucs_core::{Generator, StorageUnit, UcsError, UcsResult};

const TABLE: &str = "generators";
const REQUIRED: [&str; 4] = ["id", "p_min", "p_max", "var_om_cost_per_mwh"];

/// Units loaded from a generator table, split by kind.
#[derive(Debug, Clone, Default)]
pub struct GeneratorTable {
    pub generators: Vec<Generator>,
    pub storage: Vec<StorageUnit>,
}

/// CSV record for one generator row.
#[derive(Debug, Deserialize)]
struct GeneratorRecord {
    id: String,
    #[serde(default)]
    bus: Option<String>,
    #[serde(default)]
    p_min: Option<f64>,
    #[serde(default)]
    p_max: Option<f64>,
    #[serde(default)]
    var_om_cost_per_mwh: Option<f64>,
    #[serde(default)]
    heat_rate_mmbtu_per_mwh: Option<f64>,
    #[serde(default)]
    fuel_cost: Option<f64>,
    #[serde(default)]
    start_cost: Option<f64>,
    #[serde(default)]
    min_up: Option<usize>,
    #[serde(default)]
    min_down: Option<usize>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    committable: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    initial_status: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    is_storage: Option<bool>,
    #[serde(default)]
    existing_cap_mw: Option<f64>,
    #[serde(default)]
    battery_eff: Option<f64>,
    #[serde(default)]
    start_charge: Option<f64>,
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(|s| s.trim().to_lowercase()) {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => match s.as_str() {
            "1" | "true" | "yes" | "y" => Ok(Some(true)),
            "0" | "false" | "no" | "n" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "expected a 0/1 or true/false flag, got '{other}'"
            ))),
        },
    }
}

/// Load a generator table from a CSV file.
pub fn load_generators(path: impl AsRef<Path>) -> UcsResult<GeneratorTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        UcsError::Io(std::io::Error::new(
            e.kind(),
            format!("opening generator table {}: {e}", path.display()),
        ))
    })?;
    read_generators(file)
}

/// Read a generator table from any reader.
pub fn read_generators<R: Read>(input: R) -> UcsResult<GeneratorTable> {
    let mut rdr = normalized_reader(input, TABLE)?;
    require_columns(&mut rdr, TABLE, &REQUIRED)?;

    let mut table = GeneratorTable::default();
    for (row, result) in rdr.deserialize::<GeneratorRecord>().enumerate() {
        // Header is line 1
        let line = row + 2;
        let record = result
            .map_err(|e| UcsError::Parse(format!("{TABLE} table line {line}: {e}")))?;
        if record.is_storage.unwrap_or(false) {
            table.storage.push(storage_from_record(record)?);
        } else {
            table.generators.push(generator_from_record(record)?);
        }
    }
    Ok(table)
}

fn required(value: Option<f64>, id: &str, column: &str) -> UcsResult<f64> {
    value.ok_or_else(|| {
        UcsError::validation(
            format!("{TABLE}[{id}].{column}"),
            "value is required for non-storage units",
        )
    })
}

fn generator_from_record(record: GeneratorRecord) -> UcsResult<Generator> {
    let id = record.id.as_str();
    let p_min = required(record.p_min, id, "p_min")?;
    let p_max = required(record.p_max, id, "p_max")?;
    let var_om = required(record.var_om_cost_per_mwh, id, "var_om_cost_per_mwh")?;
    let fuel = record.heat_rate_mmbtu_per_mwh.unwrap_or(0.0) * record.fuel_cost.unwrap_or(0.0);

    let mut gen = Generator::new(id, p_min, p_max, var_om + fuel)
        .with_startup_cost(record.start_cost.unwrap_or(0.0))
        .with_min_up_down(record.min_up.unwrap_or(1), record.min_down.unwrap_or(1));
    if let Some(bus) = record.bus.filter(|b| !b.is_empty()) {
        gen = gen.with_bus(bus);
    }
    if let Some(on) = record.initial_status {
        gen = gen.with_initial_status(on);
    }
    if record.committable == Some(false) {
        gen = gen.non_committable();
    }
    gen.validate()?;
    Ok(gen)
}

fn storage_from_record(record: GeneratorRecord) -> UcsResult<StorageUnit> {
    let id = record.id.as_str();
    let capacity = record.existing_cap_mw.or(record.p_max).ok_or_else(|| {
        UcsError::validation(
            format!("{TABLE}[{id}].existing_cap_mw"),
            "storage units need a power capacity",
        )
    })?;

    let mut unit = StorageUnit::new(id, capacity);
    if let Some(eff) = record.battery_eff {
        unit = unit.with_efficiency(eff);
    }
    if let Some(start) = record.start_charge {
        unit = unit.with_start_charge(start);
    }
    if let Some(bus) = record.bus.filter(|b| !b.is_empty()) {
        unit = unit.with_bus(bus);
    }
    unit.validate()?;
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use ucs_core::MegawattHours;

    const TABLE_CSV: &str = "\
ID,Bus,P_Min,P_Max,Var_OM_Cost_per_MWh,Heat_Rate_MMBTU_per_MWh,Fuel_Cost,Start_Cost,Min_Up,Min_Down,Is_Storage,Existing_Cap_MW,Battery_Eff,Start_Charge
coal,1,150,600,4.5,10.0,2.0,9000,4,4,0,,,
gas_ct,1,0,300,8.0,11.0,4.0,500,,,0,,,
pumped_hydro,1,,,,,,,,,1,100,0.84,200
";

    #[test]
    fn test_read_mixed_table() {
        let table = read_generators(TABLE_CSV.as_bytes()).unwrap();
        assert_eq!(table.generators.len(), 2);
        assert_eq!(table.storage.len(), 1);

        let coal = &table.generators[0];
        assert_eq!(coal.id.as_str(), "coal");
        assert!((coal.variable_cost - 24.5).abs() < 1e-12);
        assert_eq!(coal.startup_cost, 9000.0);
        assert_eq!(coal.min_up_hours, 4);
        assert_eq!(coal.bus.as_deref(), Some("1"));

        let ct = &table.generators[1];
        assert_eq!(ct.min_down_hours, 1);
        assert!((ct.variable_cost - 52.0).abs() < 1e-12);

        let hydro = &table.storage[0];
        assert_eq!(hydro.energy_capacity, MegawattHours(400.0));
        assert_eq!(hydro.start_charge, MegawattHours(200.0));
        assert_eq!(hydro.charge_efficiency, 0.84);
    }

    #[test]
    fn test_storage_defaults_when_columns_blank() {
        let data = "id,p_min,p_max,var_om_cost_per_mwh,is_storage,existing_cap_mw\nph,,,,true,50\n";
        let table = read_generators(data.as_bytes()).unwrap();
        let unit = &table.storage[0];
        assert_eq!(unit.start_charge, MegawattHours(100.0));
        assert_eq!(unit.discharge_efficiency, 0.84);
    }

    #[test]
    fn test_missing_required_column() {
        let data = "id,p_min,var_om_cost_per_mwh\ncoal,0,5\n";
        let err = read_generators(data.as_bytes()).unwrap_err();
        assert_eq!(err.field(), Some("generators.p_max"));
    }

    #[test]
    fn test_blank_required_value_on_generator_row() {
        let data = "id,p_min,p_max,var_om_cost_per_mwh\ncoal,0,,5\n";
        let err = read_generators(data.as_bytes()).unwrap_err();
        assert_eq!(err.field(), Some("generators[coal].p_max"));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let data = "id,p_min,p_max,var_om_cost_per_mwh\ncoal,700,600,5\n";
        let err = read_generators(data.as_bytes()).unwrap_err();
        assert_eq!(err.field(), Some("generators[coal].p_min"));
    }

    #[test]
    fn test_flags() {
        let data = "id,p_min,p_max,var_om_cost_per_mwh,committable,initial_status\n\
                    wind,0,80,0,no,\n\
                    coal,100,500,20,yes,1\n";
        let table = read_generators(data.as_bytes()).unwrap();
        assert!(!table.generators[0].committable);
        assert!(table.generators[0].initial_status.is_none());
        assert!(table.generators[1].committable);
        assert_eq!(table.generators[1].initial_status, Some(true));
    }

    #[test]
    fn test_bad_flag_is_parse_error() {
        let data = "id,p_min,p_max,var_om_cost_per_mwh,is_storage\ncoal,0,10,5,maybe\n";
        let err = read_generators(data.as_bytes()).unwrap_err();
        assert!(matches!(err, UcsError::Parse(_)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{TABLE_CSV}").unwrap();
        let table = load_generators(file.path()).unwrap();
        assert_eq!(table.generators.len() + table.storage.len(), 3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_generators("/nonexistent/generators.csv").unwrap_err();
        assert!(matches!(err, UcsError::Io(_)));
    }
}
