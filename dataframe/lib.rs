/*!
This crate defines the loosely typed records the engine works on. A [`Record`](struct.Record.html) is an ordered mapping from field names to scalar [`Value`](enum.Value.html)s, and records in one collection are free to have different fields. The [`catalog`](catalog/index.html) module infers which fields are numeric and the [`load`](load/index.html) module decodes records from json and csv.
*/

use serde::ser::{Serialize, SerializeMap, Serializer};
use tally_util::number::{format_number, parse_loose_number};

/// Build a [`Record`](struct.Record.html) from `name => value` pairs.
#[macro_export]
macro_rules! record {
	($($name:expr => $value:expr),* $(,)?) => {{
		#[allow(unused_mut)]
		let mut record = $crate::Record::new();
		$(record.insert($name, $value);)*
		record
	}};
}

pub mod catalog;
pub mod load;

pub use self::catalog::*;
pub use self::load::*;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
	Number(f64),
	Text(String),
	Bool(bool),
	Null,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
	fields: Vec<(String, Value)>,
}

impl Value {
	/// Return the value as a number, parsing decorated text such as `"1,234원"`.
	pub fn to_number_loose(&self) -> Option<f64> {
		match self {
			Self::Number(value) if value.is_finite() => Some(*value),
			Self::Number(_) => None,
			_ => parse_loose_number(&self.to_string()),
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}
}

impl std::fmt::Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Number(value) => write!(f, "{}", format_number(*value)),
			Self::Text(value) => write!(f, "{}", value),
			Self::Bool(value) => write!(f, "{}", value),
			Self::Null => write!(f, "null"),
		}
	}
}

impl Serialize for Value {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match self {
			// Integral numbers serialize without a fractional part so that `10` does not become `10.0`.
			Self::Number(value) if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 => {
				serializer.serialize_i64(*value as i64)
			}
			Self::Number(value) => serializer.serialize_f64(*value),
			Self::Text(value) => serializer.serialize_str(value),
			Self::Bool(value) => serializer.serialize_bool(*value),
			Self::Null => serializer.serialize_unit(),
		}
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::Number(value.into())
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl Record {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the value of a field. A field that already exists keeps its position.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
		let name = name.into();
		let value = value.into();
		match self.fields.iter_mut().find(|(field, _)| *field == name) {
			Some((_, existing)) => *existing = value,
			None => self.fields.push((name, value)),
		}
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.fields
			.iter()
			.find(|(field, _)| field == name)
			.map(|(_, value)| value)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.fields
			.iter()
			.map(|(name, value)| (name.as_str(), value))
	}

	pub fn field_names(&self) -> impl Iterator<Item = &str> {
		self.fields.iter().map(|(name, _)| name.as_str())
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Serialize the record as a json object in field order.
	pub fn to_json(&self) -> String {
		serde_json::to_string(self).unwrap_or_default()
	}
}

impl std::iter::FromIterator<(String, Value)> for Record {
	fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
		let mut record = Record::new();
		for (name, value) in iter {
			record.insert(name, value);
		}
		record
	}
}

impl Serialize for Record {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut map = serializer.serialize_map(Some(self.fields.len()))?;
		for (name, value) in self.fields.iter() {
			map.serialize_entry(name, value)?;
		}
		map.end()
	}
}

#[test]
fn test_record_insert_keeps_position() {
	let mut record = record! { "region" => "Seoul", "amount" => 10 };
	record.insert("region", "Busan");
	record.insert("age", 31);
	let names: Vec<&str> = record.field_names().collect();
	assert_eq!(names, vec!["region", "amount", "age"]);
	assert_eq!(record.get("region"), Some(&Value::from("Busan")));
	assert_eq!(record.get("missing"), None);
}

#[test]
fn test_record_to_json() {
	let record = record! {
		"region" => "Seoul",
		"amount" => 10,
		"rate" => 0.5,
		"active" => true,
		"note" => Value::Null,
	};
	assert_eq!(
		record.to_json(),
		r#"{"region":"Seoul","amount":10,"rate":0.5,"active":true,"note":null}"#
	);
}

#[test]
fn test_value_to_number_loose() {
	assert_eq!(Value::from(20).to_number_loose(), Some(20.0));
	assert_eq!(Value::from("1,234원").to_number_loose(), Some(1234.0));
	assert_eq!(Value::from("Seoul").to_number_loose(), None);
	assert_eq!(Value::from(true).to_number_loose(), None);
	assert_eq!(Value::Null.to_number_loose(), None);
}
