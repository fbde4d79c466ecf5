use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, Value, REQUIRED_COLUMNS};
use crate::error::DataLoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a retail dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one transaction per line (recommended)
/// * `.json`    – `[{ "customer_id": 1, "region": "US", ... }, ...]`
/// * `.parquet` – flat string / integer / float / boolean columns
///
/// The result must carry every column in [`REQUIRED_COLUMNS`].
pub fn load_file(path: &Path) -> Result<Dataset, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    };

    check_required_columns(&dataset)?;
    log::info!(
        "Loaded {} rows with {} columns from {}",
        dataset.len(),
        dataset.columns().len(),
        path.display()
    );
    Ok(dataset)
}

fn check_required_columns(dataset: &Dataset) -> Result<(), DataLoadError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !dataset.has_column(c))
        .map(|c| c.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataLoadError::MissingColumns(missing))
    }
}

fn open(path: &Path) -> Result<File, DataLoadError> {
    File::open(path).map_err(|source| DataLoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, every other row a transaction.
/// Each column gets one type, see [`ColumnType::infer`]; empty cells are
/// `Null`.
fn load_csv(path: &Path) -> Result<Dataset, DataLoadError> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut raw: Vec<csv::StringRecord> = Vec::new();
    for result in reader.records() {
        raw.push(result?);
    }

    let types: Vec<ColumnType> = (0..headers.len())
        .map(|c| ColumnType::infer(raw.iter().filter_map(|r| r.get(c))))
        .collect();
    let rows = raw
        .iter()
        .map(|record| {
            record
                .iter()
                .zip(&types)
                .map(|(cell, ty)| ty.parse(cell))
                .collect()
        })
        .collect();

    Ok(Dataset::new(headers, rows))
}

/// The single type shared by every cell of a CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Bool,
    String,
}

impl ColumnType {
    /// Narrowest type that every non-empty cell parses as: integer, then
    /// float, then boolean (`true`/`false` in any case), falling back to
    /// text. A column with no non-empty cell is text.
    pub fn infer<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnType {
        let (mut int, mut float, mut boolean, mut any) = (true, true, true, false);
        for cell in cells.filter(|c| !c.is_empty()) {
            any = true;
            let t = cell.trim();
            int &= t.parse::<i64>().is_ok();
            float &= t.parse::<f64>().is_ok();
            boolean &= t.eq_ignore_ascii_case("true") || t.eq_ignore_ascii_case("false");
            if !(int || float || boolean) {
                return ColumnType::String;
            }
        }
        match (any, int, float, boolean) {
            (false, ..) => ColumnType::String,
            (_, true, ..) => ColumnType::Integer,
            (_, _, true, _) => ColumnType::Float,
            (_, _, _, true) => ColumnType::Bool,
            _ => ColumnType::String,
        }
    }

    /// Convert one cell. Empty cells, and cells that do not parse as the
    /// column type, are `Null`. Text is kept exactly as read.
    pub fn parse(self, cell: &str) -> Value {
        if cell.is_empty() {
            return Value::Null;
        }
        let t = cell.trim();
        match self {
            ColumnType::Integer => t.parse().map(Value::Integer).unwrap_or(Value::Null),
            ColumnType::Float => t.parse().map(Value::Float).unwrap_or(Value::Null),
            ColumnType::Bool => Value::Bool(t.eq_ignore_ascii_case("true")),
            ColumnType::String => Value::String(cell.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "customer_id": 1, "item_purchased": "Blouse", "total_revenue": 53.0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset, DataLoadError> {
    let root: JsonValue = serde_json::from_reader(std::io::BufReader::new(open(path)?))?;

    let records = root.as_array().ok_or_else(|| DataLoadError::InvalidRow {
        row: 0,
        reason: "expected a top-level JSON array".to_string(),
    })?;

    let mut order: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| DataLoadError::InvalidRow {
            row: i,
            reason: "not a JSON object".to_string(),
        })?;
        if order.is_empty() {
            order = obj.keys().cloned().collect();
        }
        let row: BTreeMap<String, Value> = obj
            .iter()
            .map(|(key, val)| (key.clone(), json_to_value(val)))
            .collect();
        rows.push(row);
    }

    Ok(Dataset::from_named_rows(rows, order))
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`), and by the `generate_sample` binary.
fn load_parquet(path: &Path) -> Result<Dataset, DataLoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows: Vec<Vec<Value>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let n_rows = batch.num_rows();
        let start = rows.len();
        rows.extend((0..n_rows).map(|_| Vec::with_capacity(columns.len())));

        for col_array in batch.columns() {
            for row in 0..n_rows {
                rows[start + row].push(extract_value(col_array, row));
            }
        }
    }

    Ok(Dataset::new(columns, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_value(col: &ArrayRef, row: usize) -> Value {
    if col.is_null(row) {
        return Value::Null;
    }
    match col.data_type() {
        DataType::Utf8 => Value::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => Value::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => Value::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => Value::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Value::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Value::Bool(col.as_boolean().value(row)),
        other => Value::String(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_type_per_column() {
        let infer = |cells: &[&str]| ColumnType::infer(cells.iter().copied());
        assert_eq!(infer(&["1", "", "42"]), ColumnType::Integer);
        assert_eq!(infer(&["4.5", "4", "4.0"]), ColumnType::Float);
        assert_eq!(infer(&["True", "false"]), ColumnType::Bool);
        assert_eq!(infer(&["1", "Winter"]), ColumnType::String);
        assert_eq!(infer(&["", ""]), ColumnType::String);
    }

    #[test]
    fn cells_follow_their_column_type() {
        assert_eq!(ColumnType::Float.parse("4"), Value::Float(4.0));
        assert_eq!(ColumnType::Integer.parse("42"), Value::Integer(42));
        assert_eq!(ColumnType::Bool.parse("True"), Value::Bool(true));
        assert_eq!(ColumnType::Float.parse(""), Value::Null);
        assert_eq!(ColumnType::String.parse(" Winter "), Value::from(" Winter "));
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(matches!(err, DataLoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_file(Path::new("/nonexistent/shop.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
    }
}
