//! In-process structured-data conversion (the "data" pseudo-tool).
//!
//! Deterministic JSON <-> CSV conversion with no external process. Fails
//! closed: any pair this module does not handle returns a typed error
//! instead of guessing, and nothing is written for inputs that cannot
//! produce a well-formed output file.

use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("No built-in converter for {from} -> .{to}")]
    Unsupported { from: String, to: String },

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Convert `input` (dotted extension `ext`) into `target` at `output`.
pub fn convert_data(input: &Path, ext: &str, target: &str, output: &Path) -> Result<(), DataError> {
    info!("Data conversion: {}->.{}", ext, target);
    match (ext, target) {
        (".json", "csv") => json_to_csv(input, output),
        (".csv", "json") => csv_to_json(input, output),
        _ => Err(DataError::Unsupported {
            from: ext.to_string(),
            to: target.to_string(),
        }),
    }
}

fn json_to_csv(input: &Path, output: &Path) -> Result<(), DataError> {
    let value: Value = serde_json::from_reader(BufReader::new(File::open(input)?))?;

    // A single object is treated as a one-row table.
    let rows = match value {
        Value::Object(obj) => vec![Value::Object(obj)],
        Value::Array(items) => items,
        _ => {
            return Err(DataError::Invalid(
                "JSON must be an array or object for CSV conversion".to_string(),
            ))
        }
    };
    if rows.is_empty() {
        return Err(DataError::Invalid(
            "JSON array is empty; nothing to convert".to_string(),
        ));
    }

    let mut writer = csv::Writer::from_writer(BufWriter::new(File::create(output)?));

    match rows[0].as_object() {
        Some(first) => {
            // Header comes from the first row; later rows fill missing
            // fields with empty cells and extra fields are dropped.
            let headers: Vec<String> = first.keys().cloned().collect();
            writer.write_record(&headers)?;
            for row in &rows {
                let obj = row.as_object().ok_or_else(|| {
                    DataError::Invalid("Mixed JSON array: expected objects in every row".to_string())
                })?;
                let record: Vec<String> = headers
                    .iter()
                    .map(|h| obj.get(h).map(cell_value).unwrap_or_default())
                    .collect();
                writer.write_record(&record)?;
            }
        }
        None => {
            // List of primitives becomes a single-column table.
            writer.write_record(["value"])?;
            for row in &rows {
                writer.write_record([cell_value(row)])?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

fn cell_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // Nested structures are stringified into the cell.
        other => other.to_string(),
    }
}

fn csv_to_json(input: &Path, output: &Path) -> Result<(), DataError> {
    let mut reader = csv::Reader::from_reader(BufReader::new(File::open(input)?));

    let headers: Vec<String> = match reader.headers() {
        Ok(h) => h.iter().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    };

    let mut rows: Vec<Value> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut obj = serde_json::Map::new();
        for (header, field) in headers.iter().zip(record.iter()) {
            obj.insert(header.clone(), Value::String(field.to_string()));
        }
        rows.push(Value::Object(obj));
    }

    let file = BufWriter::new(File::create(output)?);
    serde_json::to_writer_pretty(file, &Value::Array(rows))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let p = dir.path().join(name);
        std::fs::write(&p, content).unwrap();
        p
    }

    #[test]
    fn test_json_array_of_flat_objects_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(
            &dir,
            "input.json",
            r#"[{"name":"Alice","age":30,"city":"NYC"},{"name":"Bob","age":25,"city":"SF"}]"#,
        );
        let output = dir.path().join("output.csv");

        convert_data(&input, ".json", "csv", &output).unwrap();

        let mut reader = csv::Reader::from_path(&output).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert!(headers.iter().any(|h| h == "name"));
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_single_object_auto_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(&dir, "input.json", r#"{"name":"Alice","age":30}"#);
        let output = dir.path().join("output.csv");

        convert_data(&input, ".json", "csv", &output).unwrap();

        let mut reader = csv::Reader::from_path(&output).unwrap();
        assert_eq!(reader.records().count(), 1);
    }

    #[test]
    fn test_empty_array_fails_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(&dir, "input.json", "[]");
        let output = dir.path().join("output.csv");

        let err = convert_data(&input, ".json", "csv", &output);
        assert!(matches!(err, Err(DataError::Invalid(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_list_of_primitives_becomes_value_column() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(&dir, "input.json", r#"["string1","string2"]"#);
        let output = dir.path().join("output.csv");

        convert_data(&input, ".json", "csv", &output).unwrap();

        let mut reader = csv::Reader::from_path(&output).unwrap();
        assert_eq!(reader.headers().unwrap().iter().next(), Some("value"));
        assert_eq!(reader.records().count(), 2);
    }

    #[test]
    fn test_nested_objects_are_stringified() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(
            &dir,
            "input.json",
            r#"[{"name":"Alice","address":{"city":"NYC"}}]"#,
        );
        let output = dir.path().join("output.csv");

        convert_data(&input, ".json", "csv", &output).unwrap();
        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("NYC"));
    }

    #[test]
    fn test_utf8_survives_json_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(&dir, "input.json", r#"[{"name":"José","emoji":"🎉"}]"#);
        let output = dir.path().join("output.csv");

        convert_data(&input, ".json", "csv", &output).unwrap();
        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("José"));
        assert!(content.contains("🎉"));
    }

    #[test]
    fn test_csv_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(&dir, "input.csv", "name,age,city\nAlice,30,NYC\nBob,25,SF");
        let output = dir.path().join("output.json");

        convert_data(&input, ".csv", "json", &output).unwrap();

        let data: Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        let rows = data.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "Alice");
        // CSV carries no types; everything is a string.
        assert_eq!(rows[0]["age"], "30");
        assert_eq!(rows[1]["name"], "Bob");
    }

    #[test]
    fn test_empty_csv_becomes_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(&dir, "input.csv", "");
        let output = dir.path().join("output.json");

        convert_data(&input, ".csv", "json", &output).unwrap();

        let data: Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(data, Value::Array(vec![]));
    }

    #[test]
    fn test_csv_quoting_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(
            &dir,
            "input.csv",
            "name,description\nAlice,\"Has, commas\"\nBob,\"Has \"\"quotes\"\"\"",
        );
        let output = dir.path().join("output.json");

        convert_data(&input, ".csv", "json", &output).unwrap();

        let data: Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(data[0]["description"], "Has, commas");
        assert_eq!(data[1]["description"], "Has \"quotes\"");
    }

    #[test]
    fn test_unsupported_pairs_fail_closed() {
        let dir = tempfile::tempdir().unwrap();
        let json = write(&dir, "input.json", r#"{"key":"value"}"#);
        let csv_file = write(&dir, "input.csv", "name,value\ntest,123");
        let xml = write(&dir, "input.xml", "<root><item>test</item></root>");

        assert!(matches!(
            convert_data(&json, ".json", "yaml", &dir.path().join("o.yaml")),
            Err(DataError::Unsupported { .. })
        ));
        assert!(matches!(
            convert_data(&csv_file, ".csv", "xml", &dir.path().join("o.xml")),
            Err(DataError::Unsupported { .. })
        ));
        assert!(matches!(
            convert_data(&xml, ".xml", "json", &dir.path().join("o.json")),
            Err(DataError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_round_trip_preserves_records_and_values() {
        let dir = tempfile::tempdir().unwrap();
        let original = write(
            &dir,
            "original.json",
            r#"[{"name":"Alice","age":"30"},{"name":"Bob","age":"25"}]"#,
        );
        let csv_mid = dir.path().join("intermediate.csv");
        let final_json = dir.path().join("final.json");

        convert_data(&original, ".json", "csv", &csv_mid).unwrap();
        convert_data(&csv_mid, ".csv", "json", &final_json).unwrap();

        let before: Value =
            serde_json::from_str(&std::fs::read_to_string(&original).unwrap()).unwrap();
        let after: Value =
            serde_json::from_str(&std::fs::read_to_string(&final_json).unwrap()).unwrap();

        let before = before.as_array().unwrap();
        let after = after.as_array().unwrap();
        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(after.iter()) {
            for (key, value) in b.as_object().unwrap() {
                assert_eq!(a[key], *value, "field {} changed in round trip", key);
            }
        }
    }
}
