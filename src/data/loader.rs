use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Record, RecordSet, Stat, StatLine};
use crate::error::{CoercionKind, DatasetError, ParseWarning};

/// One raw row: column header → cell text.
pub type RawRow = BTreeMap<String, String>;

pub const NAME_COLUMN: &str = "Name";
pub const TYPE1_COLUMN: &str = "Type_1";
pub const TYPE2_COLUMN: &str = "Type_2";
pub const TOTAL_COLUMN: &str = "Total";
pub const GENERATION_COLUMN: &str = "Generation";
pub const LEGENDARY_COLUMN: &str = "Legendary";

/// Cell text that marks a legendary creature.
/// Largest count kept from a cell. Anything above is capped with a warning so
/// histogram bins and radar scales stay bounded.
pub const MAX_COUNT: u32 = 100_000;

const TRUE_TOKEN: &str = "True";
const FALSE_TOKEN: &str = "False";

/// A normalized dataset together with every coercion made on the way.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub records: RecordSet,
    pub warnings: Vec<ParseWarning>,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one creature per line
/// * `.json`    – `[{ "Name": "...", "Type_1": "...", ... }, ...]`
/// * `.parquet` – one column per field (strings, ints, floats, bools)
pub fn load_file(path: &Path) -> Result<LoadedDataset> {
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
            read_json(&text)?
        }
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(DatasetError::UnsupportedExtension(other.to_string()).into()),
    };

    let loaded = normalize(rows)?;
    log::info!(
        "Loaded {} records from {} ({} types, generations {:?})",
        loaded.records.len(),
        path.display(),
        loaded.records.types.len(),
        loaded.records.generations
    );
    Ok(loaded)
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Turn raw rows into a [`RecordSet`], preserving input order.
///
/// Numeric cells never fail the load: they fall back to 0 and produce a
/// [`ParseWarning`]. Missing `Name`/`Type_1` cells and duplicate names do fail it.
pub fn normalize(rows: Vec<RawRow>) -> Result<LoadedDataset, DatasetError> {
    let mut records = Vec::with_capacity(rows.len());
    let mut warnings = Vec::new();

    for (row_no, row) in rows.iter().enumerate() {
        for required in [NAME_COLUMN, TYPE1_COLUMN] {
            if !row.contains_key(required) {
                return Err(DatasetError::MissingColumn(required.to_string()));
            }
        }
        let (record, row_warnings) = parse_record(row_no, row);
        for w in &row_warnings {
            log::debug!("{w}");
        }
        warnings.extend(row_warnings);
        records.push(record);
    }

    if !warnings.is_empty() {
        log::warn!(
            "{} cell(s) coerced while normalizing {} rows",
            warnings.len(),
            rows.len()
        );
    }

    Ok(LoadedDataset {
        records: RecordSet::from_records(records)?,
        warnings,
    })
}

/// Parse one raw row. `row_no` is only used to label warnings.
pub fn parse_record(row_no: usize, row: &RawRow) -> (Record, Vec<ParseWarning>) {
    let mut warnings = Vec::new();

    let mut stats = StatLine::default();
    for stat in Stat::ALL {
        let cell = stat
            .column_names()
            .iter()
            .find_map(|&col| row.get(col).map(|raw| (col, raw)));
        let value = match cell {
            Some((col, raw)) => match parse_count(raw) {
                Ok(v) => capped(row_no, col, raw, v, &mut warnings),
                Err(kind) => {
                    warnings.push(warning(row_no, col, raw, kind));
                    0
                }
            },
            None => {
                warnings.push(warning(row_no, stat.column_names()[0], "", CoercionKind::Missing));
                0
            }
        };
        stats.set(stat, value);
    }

    let raw_total = row.get(TOTAL_COLUMN).map(String::as_str);
    let total = match raw_total.map(|raw| (raw, parse_count(raw))) {
        Some((raw, Ok(total))) => capped(row_no, TOTAL_COLUMN, raw, total, &mut warnings),
        _ => {
            let raw = raw_total.unwrap_or("");
            warnings.push(warning(row_no, TOTAL_COLUMN, raw, CoercionKind::TotalFromStats));
            stats.sum()
        }
    };

    let generation = match row.get(GENERATION_COLUMN) {
        Some(raw) => match parse_count(raw) {
            Ok(v) => capped(row_no, GENERATION_COLUMN, raw, v, &mut warnings),
            Err(kind) => {
                warnings.push(warning(row_no, GENERATION_COLUMN, raw, kind));
                0
            }
        },
        None => {
            warnings.push(warning(row_no, GENERATION_COLUMN, "", CoercionKind::Missing));
            0
        }
    };

    let record = Record {
        name: row.get(NAME_COLUMN).cloned().unwrap_or_default(),
        type1: row.get(TYPE1_COLUMN).cloned().unwrap_or_default(),
        type2: row
            .get(TYPE2_COLUMN)
            .map(String::as_str)
            .and_then(normalize_type2),
        stats,
        total,
        generation,
        legendary: row.get(LEGENDARY_COLUMN).is_some_and(|v| v == TRUE_TOKEN),
    };
    (record, warnings)
}

/// Empty and `"None"` mean "no secondary type".
fn normalize_type2(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "None" {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Read a non-negative count. Decimals are truncated.
fn parse_count(raw: &str) -> std::result::Result<u64, CoercionKind> {
    let s = raw.trim();
    if let Ok(v) = s.parse::<u64>() {
        return Ok(v);
    }
    match s.parse::<f64>() {
        // `as` saturates at u64::MAX.
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v as u64),
        Ok(v) if v.is_finite() => Err(CoercionKind::Negative),
        _ => Err(CoercionKind::NotANumber),
    }
}

/// Narrow a parsed count to at most [`MAX_COUNT`], warning when it was capped.
fn capped(
    row_no: usize,
    column: &str,
    raw: &str,
    value: u64,
    warnings: &mut Vec<ParseWarning>,
) -> u32 {
    match u32::try_from(value) {
        Ok(v) if v <= MAX_COUNT => v,
        _ => {
            warnings.push(warning(row_no, column, raw, CoercionKind::Capped));
            MAX_COUNT
        }
    }
}

fn warning(row: usize, column: &str, raw: &str, kind: CoercionKind) -> ParseWarning {
    ParseWarning {
        row,
        column: column.to_string(),
        raw: raw.to_string(),
        kind,
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Read every row of a CSV stream with a header line.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: RawRow = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Name": "Bulbasaur", "Type_1": "Grass", "Type_2": "Poison", "HP": 45, ... },
///   ...
/// ]
/// ```
pub fn read_json(text: &str) -> Result<Vec<RawRow>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            Ok(obj
                .iter()
                .map(|(key, val)| (key.clone(), json_to_cell(val)))
                .collect())
        })
        .collect()
}

fn json_to_cell(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => bool_cell(*b),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn bool_cell(b: bool) -> String {
    let token = if b { TRUE_TOKEN } else { FALSE_TOKEN };
    token.to_string()
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Read a Parquet file with one column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`), as well as the `generate_sample` binary.
pub fn read_parquet(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let columns: Vec<(String, &Arc<dyn Array>)> = schema
            .fields()
            .iter()
            .zip(batch.columns())
            .map(|(f, col)| (f.name().clone(), col))
            .collect();

        for row in 0..batch.num_rows() {
            let mut raw = RawRow::new();
            for (name, col) in &columns {
                let cell = arrow_cell_to_string(col, row)
                    .with_context(|| format!("Row {row}: failed to read '{name}'"))?;
                raw.insert(name.clone(), cell);
            }
            rows.push(raw);
        }
    }

    Ok(rows)
}

/// Stringify one Arrow cell the same way the CSV reader would see it.
fn arrow_cell_to_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    let cell = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row).to_string(),
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row).to_string(),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row).to_string(),
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row).to_string(),
        DataType::Boolean => bool_cell(col.as_boolean().value(row)),
        _ => array_value_to_string(&**col, row)?,
    };
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn bulbasaur_row() -> RawRow {
        row(&[
            ("Name", "Bulbasaur"),
            ("Type_1", "Grass"),
            ("Type_2", "Poison"),
            ("Total", "318"),
            ("HP", "45"),
            ("Attack", "49"),
            ("Defense", "49"),
            ("Sp. Atk", "65"),
            ("Sp. Def", "65"),
            ("Speed", "45"),
            ("Generation", "1"),
            ("Legendary", "False"),
        ])
    }

    #[test]
    fn parses_a_clean_row_without_warnings() {
        let (rec, warnings) = parse_record(0, &bulbasaur_row());

        assert!(warnings.is_empty());
        assert_eq!(rec.name, "Bulbasaur");
        assert_eq!(rec.type2.as_deref(), Some("Poison"));
        assert_eq!(rec.stats.sp_atk, 65);
        assert_eq!(rec.total, 318);
        assert_eq!(rec.generation, 1);
        assert!(!rec.legendary);
    }

    #[test]
    fn none_and_empty_type2_become_absent() {
        let mut r = bulbasaur_row();
        r.insert("Type_2".into(), "None".into());
        assert_eq!(parse_record(0, &r).0.type2, None);

        r.insert("Type_2".into(), "".into());
        assert_eq!(parse_record(0, &r).0.type2, None);

        r.remove("Type_2");
        assert_eq!(parse_record(0, &r).0.type2, None);
    }

    #[test]
    fn bad_numbers_fall_back_to_zero_with_warnings() {
        let mut r = bulbasaur_row();
        r.insert("Speed".into(), "fast".into());
        r.insert("HP".into(), "-3".into());
        r.insert("Attack".into(), "49.9".into());

        let (rec, warnings) = parse_record(7, &r);

        assert_eq!(rec.stats.speed, 0);
        assert_eq!(rec.stats.hp, 0);
        assert_eq!(rec.stats.attack, 49);
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].column, "HP");
        assert_eq!(warnings[0].kind, CoercionKind::Negative);
        assert_eq!(warnings[1].column, "Speed");
        assert_eq!(warnings[1].kind, CoercionKind::NotANumber);
        assert_eq!(warnings[1].row, 7);
    }

    #[test]
    fn missing_total_uses_stat_sum() {
        let mut r = bulbasaur_row();
        r.insert("Total".into(), "".into());
        let (rec, warnings) = parse_record(0, &r);

        assert_eq!(rec.total, 318);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, CoercionKind::TotalFromStats);
    }

    #[test]
    fn oversized_counts_are_capped_with_warnings() {
        let mut r = bulbasaur_row();
        r.insert("Total".into(), "1e12".into());
        r.insert("HP".into(), "4000000000".into());

        let (rec, warnings) = parse_record(3, &r);

        assert_eq!(rec.total, MAX_COUNT);
        assert_eq!(rec.stats.hp, MAX_COUNT);
        let capped: Vec<&str> = warnings
            .iter()
            .filter(|w| w.kind == CoercionKind::Capped)
            .map(|w| w.column.as_str())
            .collect();
        assert_eq!(capped, vec!["HP", "Total"]);
    }

    #[test]
    fn stat_sum_fallback_stays_bounded() {
        let mut r = bulbasaur_row();
        r.insert("Total".into(), "".into());
        r.insert("HP".into(), "4000000000".into());
        r.insert("Attack".into(), "4000000000".into());

        let (rec, warnings) = parse_record(0, &r);

        assert_eq!(rec.stats.hp, MAX_COUNT);
        assert_eq!(rec.total, rec.stats.sum());
        assert_eq!(warnings.len(), 3);
        assert_eq!(warnings[2].kind, CoercionKind::TotalFromStats);
    }

    #[test]
    fn legendary_requires_exact_token() {
        let mut r = bulbasaur_row();
        r.insert("Legendary".into(), "True".into());
        assert!(parse_record(0, &r).0.legendary);

        r.insert("Legendary".into(), "true".into());
        assert!(!parse_record(0, &r).0.legendary);
    }

    #[test]
    fn underscore_stat_headers_are_accepted() {
        let mut r = bulbasaur_row();
        r.remove("Sp. Atk");
        r.insert("Sp_Atk".into(), "70".into());
        let (rec, warnings) = parse_record(0, &r);

        assert!(warnings.is_empty());
        assert_eq!(rec.stats.sp_atk, 70);
    }

    #[test]
    fn normalize_requires_name_and_type1() {
        let mut r = bulbasaur_row();
        r.remove("Type_1");
        let err = normalize(vec![r]).unwrap_err();
        assert_eq!(err, DatasetError::MissingColumn("Type_1".to_string()));
    }

    #[test]
    fn csv_rows_keep_input_order() {
        let text = "Name,Type_1,Type_2,Total,HP,Attack,Defense,Sp. Atk,Sp. Def,Speed,Generation,Legendary\n\
                    Squirtle,Water,,314,44,48,65,50,64,43,1,False\n\
                    Bulbasaur,Grass,Poison,318,45,49,49,65,65,45,1,False\n";
        let rows = read_csv(text.as_bytes()).unwrap();
        let loaded = normalize(rows).unwrap();

        let names: Vec<&str> = loaded.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Squirtle", "Bulbasaur"]);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn json_values_are_stringified() {
        let text = r#"[{"Name": "Mewtwo", "Type_1": "Psychic", "Type_2": null,
                        "Total": 680, "HP": 106, "Attack": 110, "Defense": 90,
                        "Sp. Atk": 154, "Sp. Def": 90, "Speed": 130,
                        "Generation": 1, "Legendary": true}]"#;
        let rows = read_json(text).unwrap();
        assert_eq!(rows[0]["Legendary"], "True");
        assert_eq!(rows[0]["Type_2"], "");

        let loaded = normalize(rows).unwrap();
        let mewtwo = loaded.records.get("Mewtwo").unwrap();
        assert!(mewtwo.legendary);
        assert_eq!(mewtwo.type2, None);
        assert_eq!(mewtwo.stats.sp_atk, 154);
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(read_json(r#"{"Name": "Mew"}"#).is_err());
        assert!(read_json(r#"[1, 2]"#).is_err());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("pokemon.xlsx")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DatasetError>(),
            Some(&DatasetError::UnsupportedExtension("xlsx".to_string()))
        );
    }
}
