/*!
This module decodes record collections from json and csv. Decoding is not part of the engine itself, but the cli and the tests need a way to get records from a file.
*/

use super::*;
use std::path::Path;
use tally_util::{err, error::Result};

/// These cell values are read as null.
const DEFAULT_NULL_VALUES: &[&str] = &[
	"null", "NULL", "n/a", "N/A", "nan", "-nan", "NaN", "-NaN", "?",
];

/// Load records from a `.json` or `.csv` file.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
	let extension = path
		.extension()
		.and_then(|extension| extension.to_str())
		.map(|extension| extension.to_lowercase());
	match extension.as_deref() {
		Some("json") => {
			let text = std::fs::read_to_string(path)?;
			records_from_json(&text)
		}
		Some("csv") => records_from_csv(&mut csv::Reader::from_path(path)?),
		_ => Err(err!(
			"unsupported file {}, expected a .json or .csv file",
			path.display()
		)),
	}
}

/// Decode records from a json array of objects. An object whose `data` or `records` field holds the array is accepted too, which is how most remote apis wrap their rows.
pub fn records_from_json(text: &str) -> Result<Vec<Record>> {
	let value: serde_json::Value = serde_json::from_str(text)?;
	let rows = match value {
		serde_json::Value::Array(rows) => rows,
		serde_json::Value::Object(mut object) => {
			match object.remove("data").or_else(|| object.remove("records")) {
				Some(serde_json::Value::Array(rows)) => rows,
				_ => return Err(err!("expected an array of records")),
			}
		}
		_ => return Err(err!("expected an array of records")),
	};
	rows.into_iter()
		.enumerate()
		.map(|(index, row)| match row {
			serde_json::Value::Object(object) => Ok(object
				.into_iter()
				.map(|(name, value)| (name, value_from_json(value)))
				.collect()),
			_ => Err(err!("record {} is not an object", index)),
		})
		.collect()
}

fn value_from_json(value: serde_json::Value) -> Value {
	match value {
		serde_json::Value::Null => Value::Null,
		serde_json::Value::Bool(value) => Value::Bool(value),
		serde_json::Value::Number(value) => value.as_f64().map(Value::Number).unwrap_or(Value::Null),
		serde_json::Value::String(value) => Value::Text(value),
		// Nested values are not scalars, so keep their json text.
		value => Value::Text(value.to_string()),
	}
}

/// Decode records from csv. The header row names the fields. Cells that parse as finite numbers become numbers, empty cells are left out of the record.
pub fn records_from_csv<R>(reader: &mut csv::Reader<R>) -> Result<Vec<Record>>
where
	R: std::io::Read,
{
	let column_names: Vec<String> = reader
		.headers()?
		.into_iter()
		.map(|column_name| column_name.to_owned())
		.collect();
	let mut records = Vec::new();
	let mut row = csv::StringRecord::new();
	while reader.read_record(&mut row)? {
		let mut record = Record::new();
		for (column_name, cell) in column_names.iter().zip(row.iter()) {
			if cell.is_empty() {
				continue;
			}
			let value = if DEFAULT_NULL_VALUES.contains(&cell) {
				Value::Null
			} else {
				match lexical::parse::<f64, &str>(cell) {
					Ok(value) if value.is_finite() => Value::Number(value),
					_ => Value::Text(cell.to_owned()),
				}
			};
			record.insert(column_name.as_str(), value);
		}
		records.push(record);
	}
	Ok(records)
}

#[test]
fn test_records_from_json() {
	let text = r#"[
		{"region": "Seoul", "amount": 10, "tags": ["a"]},
		{"amount": "1,234원", "region": null, "active": false}
	]"#;
	let records = records_from_json(text).unwrap();
	assert_eq!(
		records,
		vec![
			record! { "region" => "Seoul", "amount" => 10, "tags" => r#"["a"]"# },
			record! { "amount" => "1,234원", "region" => Value::Null, "active" => false },
		]
	);
}

#[test]
fn test_records_from_wrapped_json() {
	let text = r#"{"total": 1, "data": [{"region": "Busan"}]}"#;
	let records = records_from_json(text).unwrap();
	assert_eq!(records, vec![record! { "region" => "Busan" }]);
	assert!(records_from_json(r#"{"total": 1}"#).is_err());
	assert!(records_from_json(r#"[1, 2]"#).is_err());
}

#[test]
fn test_records_from_csv() {
	let csv = "region,amount,note\nSeoul,10,n/a\nBusan,,hello\n";
	let records =
		records_from_csv(&mut csv::Reader::from_reader(std::io::Cursor::new(csv))).unwrap();
	assert_eq!(
		records,
		vec![
			record! { "region" => "Seoul", "amount" => 10, "note" => Value::Null },
			record! { "region" => "Busan", "note" => "hello" },
		]
	);
}
