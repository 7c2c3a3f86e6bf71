use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rust_xlsxwriter::Workbook;
use serde_json::{Map, Number, Value as JsonValue};

use super::model::{
    COL_COUNTRY, COL_FOCUS, COL_NAME, COL_REGION, COL_RESEARCH, COL_SIZE, COL_STATUS, Record,
    ScoreField,
};

// ---------------------------------------------------------------------------
// Export formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Spreadsheet,
    Parquet,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Csv,
        ExportFormat::Json,
        ExportFormat::Spreadsheet,
        ExportFormat::Parquet,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Spreadsheet => "xlsx",
            ExportFormat::Parquet => "parquet",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV (Excel Compatible)",
            ExportFormat::Json => "JSON (Data Format)",
            ExportFormat::Spreadsheet => "Excel (Workbook)",
            ExportFormat::Parquet => "Parquet",
        }
    }
}

// ---------------------------------------------------------------------------
// Column layout shared by every format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Column {
    Name,
    Country,
    Region,
    Size,
    Status,
    Focus,
    Research,
    Score(ScoreField),
}

enum Cell<'a> {
    Text(Option<&'a str>),
    Number(Option<f64>),
}

impl Column {
    fn all() -> Vec<Column> {
        let mut cols = vec![
            Column::Name,
            Column::Country,
            Column::Region,
            Column::Size,
            Column::Status,
            Column::Focus,
            Column::Research,
        ];
        cols.extend(ScoreField::ALL.into_iter().map(Column::Score));
        cols
    }

    fn header(self) -> &'static str {
        match self {
            Column::Name => COL_NAME,
            Column::Country => COL_COUNTRY,
            Column::Region => COL_REGION,
            Column::Size => COL_SIZE,
            Column::Status => COL_STATUS,
            Column::Focus => COL_FOCUS,
            Column::Research => COL_RESEARCH,
            Column::Score(field) => field.column(),
        }
    }

    fn is_numeric(self) -> bool {
        matches!(self, Column::Research | Column::Score(_))
    }

    fn cell(self, rec: &Record) -> Cell<'_> {
        match self {
            Column::Name => Cell::Text(rec.name.as_deref()),
            Column::Country => Cell::Text(rec.country.as_deref()),
            Column::Region => Cell::Text(rec.region.as_deref()),
            Column::Size => Cell::Text(rec.size.as_deref()),
            Column::Status => Cell::Text(rec.status.as_deref()),
            Column::Focus => Cell::Text(rec.focus.as_deref()),
            Column::Research => Cell::Number(rec.research),
            Column::Score(field) => Cell::Number(rec.score(field)),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Serialize a filtered collection into the bytes of the requested format.
pub fn format_for_export(records: &[Record], format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => to_csv(records),
        ExportFormat::Json => to_json(records),
        ExportFormat::Spreadsheet => to_xlsx(records),
        ExportFormat::Parquet => to_parquet(records),
    }
}

pub fn export_to_path(records: &[Record], format: ExportFormat, path: &Path) -> Result<()> {
    let bytes = format_for_export(records, format)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!(
        "Exported {} records as {} to {}",
        records.len(),
        format.extension(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

fn to_csv(records: &[Record]) -> Result<Vec<u8>> {
    let columns = Column::all();
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(columns.iter().map(|c| c.header()))
        .context("writing CSV header")?;

    for rec in records {
        let fields = columns.iter().map(|c| match c.cell(rec) {
            Cell::Text(t) => t.unwrap_or("").to_string(),
            Cell::Number(n) => n.map(|v| v.to_string()).unwrap_or_default(),
        });
        writer.write_record(fields).context("writing CSV row")?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV: {}", e.error()))
}

fn to_json(records: &[Record]) -> Result<Vec<u8>> {
    let columns = Column::all();
    let rows: Vec<JsonValue> = records
        .iter()
        .map(|rec| {
            let obj: Map<String, JsonValue> = columns
                .iter()
                .map(|c| {
                    let value = match c.cell(rec) {
                        Cell::Text(t) => t.map_or(JsonValue::Null, |s| JsonValue::String(s.to_string())),
                        Cell::Number(n) => n
                            .and_then(Number::from_f64)
                            .map_or(JsonValue::Null, JsonValue::Number),
                    };
                    (c.header().to_string(), value)
                })
                .collect();
            JsonValue::Object(obj)
        })
        .collect();
    serde_json::to_vec_pretty(&rows).context("serializing JSON")
}

fn to_xlsx(records: &[Record]) -> Result<Vec<u8>> {
    let columns = Column::all();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Rankings").context("naming worksheet")?;

    for (col, column) in columns.iter().enumerate() {
        sheet
            .write_string(0, col as u16, column.header())
            .context("writing spreadsheet header")?;
    }
    for (i, rec) in records.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, column) in columns.iter().enumerate() {
            let col = col as u16;
            // null cells stay blank
            match column.cell(rec) {
                Cell::Text(Some(s)) => {
                    sheet.write_string(row, col, s).context("writing spreadsheet cell")?;
                }
                Cell::Number(Some(v)) => {
                    sheet.write_number(row, col, v).context("writing spreadsheet cell")?;
                }
                Cell::Text(None) | Cell::Number(None) => {}
            }
        }
    }

    workbook.save_to_buffer().context("building workbook")
}

fn to_parquet(records: &[Record]) -> Result<Vec<u8>> {
    let columns = Column::all();
    let fields: Vec<Field> = columns
        .iter()
        .map(|c| {
            let dt = if c.is_numeric() { DataType::Float64 } else { DataType::Utf8 };
            Field::new(c.header(), dt, true)
        })
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let arrays: Vec<ArrayRef> = columns
        .iter()
        .map(|c| -> ArrayRef {
            if c.is_numeric() {
                let values: Vec<Option<f64>> = records
                    .iter()
                    .map(|rec| match c.cell(rec) {
                        Cell::Number(n) => n,
                        Cell::Text(_) => None,
                    })
                    .collect();
                Arc::new(Float64Array::from(values))
            } else {
                let values: Vec<Option<&str>> = records
                    .iter()
                    .map(|rec| match c.cell(rec) {
                        Cell::Text(t) => t,
                        Cell::Number(_) => None,
                    })
                    .collect();
                Arc::new(StringArray::from(values))
            }
        })
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let mut buf = Vec::new();
    let mut writer =
        ArrowWriter::try_new(&mut buf, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{load_file, parse_json, read_csv};
    use crate::data::model::Dataset;

    fn sample() -> Vec<Record> {
        let mut a = Record {
            name: Some("Ecole, \"Polytechnique\"".into()),
            region: Some("Europe".into()),
            status: Some("Public".into()),
            ..Default::default()
        }
        .with_score(ScoreField::Overall, 91.25)
        .with_score(ScoreField::Ar, 88.0);
        a.research = Some(3.0);
        let b = Record {
            name: Some("Nameless Scores".into()),
            ..Default::default()
        };
        vec![a, b]
    }

    #[test]
    fn csv_output_reloads_to_same_records() {
        let bytes = format_for_export(&sample(), ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("Institution Name,Country/Territory,Region"));

        let reloaded = Dataset::from_raw_rows(&read_csv(text.as_bytes()).unwrap());
        assert_eq!(reloaded.records, sample());
    }

    #[test]
    fn json_output_uses_nulls_for_missing_values() {
        let bytes = format_for_export(&sample(), ExportFormat::Json).unwrap();
        let value: JsonValue = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value[1]["Overall SCORE"], JsonValue::Null);
        assert_eq!(value[0]["Overall SCORE"], serde_json::json!(91.25));

        let text = String::from_utf8(bytes).unwrap();
        let reloaded = Dataset::from_raw_rows(&parse_json(&text).unwrap());
        assert_eq!(reloaded.records, sample());
    }

    #[test]
    fn spreadsheet_output_is_a_zip_container() {
        let bytes = format_for_export(&sample(), ExportFormat::Spreadsheet).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn parquet_file_reloads() {
        let path = std::env::temp_dir().join(format!(
            "rankings-explorer-export-{}.parquet",
            std::process::id()
        ));
        export_to_path(&sample(), ExportFormat::Parquet, &path).unwrap();
        let reloaded = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(reloaded.records, sample());
    }

    #[test]
    fn empty_collection_still_has_header() {
        let bytes = format_for_export(&[], ExportFormat::Csv).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
