/*!
This module builds the field catalog: the list of fields found in a record collection, each classified as numeric or categorical. There is no declared schema, so the kind of a field is inferred from sampled values.

By default only the first record is inspected, which means a collection whose first record disagrees with the rest will be misclassified. That is a known tradeoff and is not repaired here, because changing the kind of a field changes which charts are offered. [`InferenceMode::Majority`](enum.InferenceMode.html) is available for callers who prefer a wider sample.
*/

use super::*;
use fnv::FnvHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
	Numeric,
	Categorical,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FieldDescriptor {
	pub name: String,
	pub kind: FieldKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceMode {
	/// Take the field set and the kinds from the first record.
	FirstRecord,
	/// Take the union of the field sets of all sampled records and classify each field by a majority vote of its non-null values.
	Majority,
}

#[derive(Clone, Debug)]
pub struct CatalogOptions {
	/// The maximum number of leading records to sample.
	pub sample_size: usize,
	pub mode: InferenceMode,
}

impl Default for CatalogOptions {
	fn default() -> Self {
		Self {
			sample_size: 100,
			mode: InferenceMode::FirstRecord,
		}
	}
}

impl FieldKind {
	/// Classify a single value. Native numbers are numeric, and so is text that still parses as a finite number after stripping everything but digits, `.` and `-`.
	pub fn of(value: &Value) -> Self {
		match value {
			Value::Number(value) if value.is_finite() => FieldKind::Numeric,
			Value::Number(_) => FieldKind::Categorical,
			value => {
				if value.to_number_loose().is_some() {
					FieldKind::Numeric
				} else {
					FieldKind::Categorical
				}
			}
		}
	}
}

impl FieldDescriptor {
	pub fn is_numeric(&self) -> bool {
		self.kind == FieldKind::Numeric
	}
}

/// Build the field catalog for `records`.
pub fn build_catalog(records: &[Record], options: &CatalogOptions) -> Vec<FieldDescriptor> {
	let sample = &records[..records.len().min(options.sample_size)];
	match options.mode {
		InferenceMode::FirstRecord => match sample.first() {
			Some(record) => record
				.iter()
				.map(|(name, value)| FieldDescriptor {
					name: name.to_owned(),
					kind: FieldKind::of(value),
				})
				.collect(),
			None => Vec::new(),
		},
		InferenceMode::Majority => {
			let mut names: Vec<&str> = Vec::new();
			let mut infer_stats: Vec<InferStats> = Vec::new();
			let mut positions: FnvHashMap<&str, usize> = FnvHashMap::default();
			for record in sample {
				for (name, value) in record.iter() {
					let position = *positions.entry(name).or_insert_with(|| {
						names.push(name);
						infer_stats.push(InferStats::default());
						names.len() - 1
					});
					infer_stats[position].update(value);
				}
			}
			names
				.into_iter()
				.zip(infer_stats.into_iter())
				.map(|(name, infer_stats)| FieldDescriptor {
					name: name.to_owned(),
					kind: infer_stats.finalize(),
				})
				.collect()
		}
	}
}

/// Return the first numeric field in the catalog.
pub fn first_numeric_field(catalog: &[FieldDescriptor]) -> Option<&FieldDescriptor> {
	catalog.iter().find(|field| field.is_numeric())
}

#[derive(Clone, Debug, Default)]
struct InferStats {
	numeric_count: usize,
	categorical_count: usize,
}

impl InferStats {
	fn update(&mut self, value: &Value) {
		if value.is_null() {
			return;
		}
		match FieldKind::of(value) {
			FieldKind::Numeric => self.numeric_count += 1,
			FieldKind::Categorical => self.categorical_count += 1,
		}
	}

	fn finalize(self) -> FieldKind {
		if self.numeric_count > 0 && self.numeric_count >= self.categorical_count {
			FieldKind::Numeric
		} else {
			FieldKind::Categorical
		}
	}
}

#[test]
fn test_first_record() {
	let records = vec![
		record! { "region" => "Seoul", "amount" => 10, "price" => "1,234원" },
		record! { "region" => "Busan", "amount" => "n/a", "extra" => 1 },
	];
	let catalog = build_catalog(&records, &CatalogOptions::default());
	insta::assert_debug_snapshot!(catalog, @r###"
 [
     FieldDescriptor {
         name: "region",
         kind: Categorical,
     },
     FieldDescriptor {
         name: "amount",
         kind: Numeric,
     },
     FieldDescriptor {
         name: "price",
         kind: Numeric,
     },
 ]
 "###);
}

#[test]
fn test_first_record_misclassifies() {
	let records = vec![
		record! { "score" => "unknown" },
		record! { "score" => 10 },
		record! { "score" => 20 },
	];
	let catalog = build_catalog(&records, &CatalogOptions::default());
	assert_eq!(catalog[0].kind, FieldKind::Categorical);
}

#[test]
fn test_majority() {
	let records = vec![
		record! { "score" => "unknown" },
		record! { "score" => 10, "region" => "Seoul" },
		record! { "score" => 20, "region" => Value::Null },
	];
	let options = CatalogOptions {
		mode: InferenceMode::Majority,
		..Default::default()
	};
	let catalog = build_catalog(&records, &options);
	assert_eq!(
		catalog,
		vec![
			FieldDescriptor {
				name: "score".to_owned(),
				kind: FieldKind::Numeric,
			},
			FieldDescriptor {
				name: "region".to_owned(),
				kind: FieldKind::Categorical,
			},
		]
	);
}

#[test]
fn test_sample_size() {
	let records = vec![
		record! { "a" => "x" },
		record! { "a" => 1, "b" => 2 },
	];
	let options = CatalogOptions {
		sample_size: 1,
		mode: InferenceMode::Majority,
	};
	let catalog = build_catalog(&records, &options);
	assert_eq!(catalog.len(), 1);
	assert_eq!(catalog[0].kind, FieldKind::Categorical);
}

#[test]
fn test_empty() {
	assert!(build_catalog(&[], &CatalogOptions::default()).is_empty());
	assert!(first_numeric_field(&[]).is_none());
}
