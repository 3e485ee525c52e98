/*!
The aggregator buckets records by the value of a grouping field and accumulates a numeric field per bucket. Every record given to it lands in exactly one bucket, so bucket counts always add up to the number of matched records.
*/

use std::borrow::Cow;
use tally_dataframe::{Record, Value};
use tally_metrics::{Buckets, StreamingMetric};

/// The key of the single bucket used when no grouping field is chosen.
pub const ALL_KEY: &str = "All";
/// The key of the bucket for records that do not have the grouping field.
pub const MISSING_KEY: &str = "undefined";
/// The key of the bucket for records whose grouping field is null.
pub const NULL_KEY: &str = "null";

/// Return the bucket key of `record` when grouping by `group_field`.
pub fn group_key<'a>(record: &'a Record, group_field: Option<&str>) -> Cow<'a, str> {
	let group_field = match group_field {
		Some(group_field) => group_field,
		None => return Cow::Borrowed(ALL_KEY),
	};
	match record.get(group_field) {
		None => Cow::Borrowed(MISSING_KEY),
		Some(Value::Null) => Cow::Borrowed(NULL_KEY),
		Some(Value::Text(text)) => Cow::Borrowed(text.as_str()),
		Some(value) => Cow::Owned(value.to_string()),
	}
}

/// Resolve the numeric value of `value_field` in `record`. Native numbers are used as they are, text is parsed loosely, and anything else counts as zero so that the record is still counted.
pub fn resolve_value(record: &Record, value_field: &str) -> f64 {
	record
		.get(value_field)
		.and_then(|value| value.to_number_loose())
		.unwrap_or(0.0)
}

/// Accumulate `value_field` per group. Buckets iterate in the order their keys were first seen.
pub fn aggregate<'a, I>(records: I, value_field: &str, group_field: Option<&str>) -> Buckets
where
	I: IntoIterator<Item = &'a Record>,
{
	let mut buckets = Buckets::new();
	for record in records {
		let key = group_key(record, group_field);
		buckets
			.entry(&key)
			.update(resolve_value(record, value_field));
	}
	buckets
}

/// Count records per group. Each record contributes a value of one, so the bucket sums are the value counts.
pub fn count_by<'a, I>(records: I, group_field: Option<&str>) -> Buckets
where
	I: IntoIterator<Item = &'a Record>,
{
	let mut buckets = Buckets::new();
	for record in records {
		let key = group_key(record, group_field);
		buckets.entry(&key).update(1.0);
	}
	buckets
}

#[cfg(test)]
use tally_dataframe::record;

#[test]
fn test_aggregate_by_group() {
	let records = vec![
		record! { "region" => "Seoul", "amount" => 10 },
		record! { "region" => "Busan", "amount" => 20 },
		record! { "region" => "Seoul", "amount" => 30 },
	];
	let buckets = aggregate(&records, "amount", Some("region"));
	let buckets: Vec<(&str, f64, u64)> = buckets
		.iter()
		.map(|(key, bucket)| (key, bucket.sum, bucket.count))
		.collect();
	assert_eq!(buckets, vec![("Seoul", 40.0, 2), ("Busan", 20.0, 1)]);
}

#[test]
fn test_aggregate_without_group() {
	let records = vec![
		record! { "amount" => 10 },
		record! { "amount" => "1,234원" },
		record! { "amount" => "unknown" },
		record! { "other" => 1 },
	];
	let buckets = aggregate(&records, "amount", None);
	let all = buckets.get(ALL_KEY).unwrap();
	assert_eq!(all.count, 4);
	assert_eq!(all.values, vec![10.0, 1234.0, 0.0, 0.0]);
}

#[test]
fn test_aggregate_missing_and_null_groups() {
	let records = vec![
		record! { "region" => "Seoul", "amount" => 1 },
		record! { "amount" => 2 },
		record! { "region" => tally_dataframe::Value::Null, "amount" => 3 },
		record! { "region" => 7, "amount" => 4 },
	];
	let buckets = aggregate(&records, "amount", Some("region"));
	let keys: Vec<&str> = buckets.keys().collect();
	assert_eq!(keys, vec!["Seoul", MISSING_KEY, NULL_KEY, "7"]);
	assert_eq!(buckets.total_count(), 4);
}

#[test]
fn test_count_by() {
	let records = vec![
		record! { "status" => "미혼" },
		record! { "status" => "기혼" },
		record! { "status" => "미혼" },
	];
	let buckets = count_by(&records, Some("status"));
	assert_eq!(buckets.get("미혼").map(|bucket| bucket.sum), Some(2.0));
	assert_eq!(buckets.get("기혼").map(|bucket| bucket.sum), Some(1.0));
}

#[test]
fn test_aggregate_empty() {
	let records: Vec<Record> = Vec::new();
	assert!(aggregate(&records, "amount", Some("region")).is_empty());
}
