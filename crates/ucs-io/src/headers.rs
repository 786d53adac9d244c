use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use ucs_core::{UcsError, UcsResult};

/// Open a CSV reader with trimmed fields and lowercased header names.
pub(crate) fn normalized_reader<R: Read>(input: R, table: &str) -> UcsResult<Reader<R>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(input);
    let headers: StringRecord = rdr
        .headers()
        .map_err(|e| UcsError::Parse(format!("reading {table} header row: {e}")))?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    rdr.set_headers(headers);
    Ok(rdr)
}

/// Fail with the first required column absent from the header row.
pub(crate) fn require_columns<R: Read>(
    rdr: &mut Reader<R>,
    table: &str,
    required: &[&str],
) -> UcsResult<()> {
    let headers = rdr
        .headers()
        .map_err(|e| UcsError::Parse(format!("reading {table} header row: {e}")))?;
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(UcsError::validation(
                format!("{table}.{column}"),
                format!("missing required column '{column}'"),
            ));
        }
    }
    Ok(())
}
