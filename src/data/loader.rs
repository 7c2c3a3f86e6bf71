use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeStringArray, StringArray,
};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, RawRow, known_columns};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a rankings dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the source column names
/// * `.json`    – `[{ "Institution Name": "...", "Overall SCORE": 98.1, ... }, ...]`
/// * `.parquet` – one field per column, string or numeric
///
/// Columns the normalizer knows but the file lacks are null on every row.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)?
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text)?
        }
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    warn_missing_columns(&rows);
    let dataset = Dataset::from_raw_rows(&rows);
    log::info!(
        "Loaded {} records from {} ({} regions, {} countries)",
        dataset.len(),
        path.display(),
        dataset.regions.len(),
        dataset.countries.len()
    );
    Ok(dataset)
}

fn warn_missing_columns(rows: &[RawRow]) {
    if rows.is_empty() {
        return;
    }
    let present: BTreeSet<&str> = rows.iter().flat_map(|r| r.keys().map(String::as_str)).collect();
    for col in known_columns().filter(|c| !present.contains(c)) {
        log::warn!("column '{col}' missing from dataset; treating as null");
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read CSV rows keyed by header. Empty cells are left out of the row.
pub fn read_csv<R: Read>(input: R) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .filter(|(_, value)| !value.is_empty())
            .map(|(h, value)| (h.clone(), value.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Numbers and booleans are kept as their text form; nulls are dropped.
pub fn parse_json(text: &str) -> Result<Vec<RawRow>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| -> Result<RawRow> {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            Ok(obj
                .iter()
                .filter_map(|(key, val)| Some((key.clone(), json_cell(val)?)))
                .collect())
        })
        .collect()
}

fn json_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`), as well as our own exporter.
fn load_parquet(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let columns = batch
            .columns()
            .iter()
            .map(plain_strings)
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let mut raw = RawRow::new();
            for (col, field) in columns.iter().zip(schema.fields().iter()) {
                if let Some(cell) = cell_text(col, row) {
                    raw.insert(field.name().clone(), cell);
                }
            }
            rows.push(raw);
        }
    }
    Ok(rows)
}

/// Polars writes text as view or dictionary-encoded columns; flatten those to
/// plain `Utf8`.
fn plain_strings(col: &ArrayRef) -> Result<ArrayRef> {
    match col.data_type() {
        DataType::Utf8View | DataType::Dictionary(_, _) => {
            cast(col, &DataType::Utf8).context("decoding parquet string column")
        }
        _ => Ok(Arc::clone(col)),
    }
}

/// Render one Arrow cell as text for the normalizer. Nulls and unsupported
/// types yield `None`.
fn cell_text(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => any.downcast_ref::<StringArray>().map(|a| a.value(row).to_string()),
        DataType::LargeUtf8 => any
            .downcast_ref::<LargeStringArray>()
            .map(|a| a.value(row).to_string()),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row).to_string()),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row).to_string()),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(row).to_string()),
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row).to_string()),
        DataType::Boolean => any.downcast_ref::<BooleanArray>().map(|a| a.value(row).to_string()),
        other => {
            log::debug!("skipping parquet cell of unsupported type {other:?}");
            None
        }
    }
}
