/*!
The query matcher. There is no language understanding here: a query is a bag of lowercase substrings, and a record matches when any of them appears anywhere in it. This favors recall over precision.
*/

use tally_dataframe::Record;

/// Split a query into lowercase tokens on whitespace.
pub fn tokenize(query: &str) -> Vec<String> {
	query
		.to_lowercase()
		.split_whitespace()
		.map(|token| token.to_owned())
		.collect()
}

/**
Select the records that match `query`, keeping at most `limit` of them in input order.

A record matches if any token is a substring of the record's json text, of one of its field names or of one of its values. A query with no tokens selects the first `limit` records. No match at all returns an empty vector, which callers report as "no data".
*/
pub fn match_records<'a, I>(query: &str, records: I, limit: usize) -> Vec<&'a Record>
where
	I: IntoIterator<Item = &'a Record>,
{
	let tokens = tokenize(query);
	let records = records.into_iter();
	if tokens.is_empty() {
		return records.take(limit).collect();
	}
	records
		.filter(|record| record_matches(record, &tokens))
		.take(limit)
		.collect()
}

/// Return true if any of the lowercase `tokens` appears in `record`.
pub fn record_matches(record: &Record, tokens: &[String]) -> bool {
	let json = record.to_json().to_lowercase();
	if tokens.iter().any(|token| json.contains(token.as_str())) {
		return true;
	}
	record.iter().any(|(name, value)| {
		let name = name.to_lowercase();
		let value = value.to_string().to_lowercase();
		tokens
			.iter()
			.any(|token| name.contains(token.as_str()) || value.contains(token.as_str()))
	})
}

#[cfg(test)]
fn dataset() -> Vec<Record> {
	use tally_dataframe::record;
	vec![
		record! { "region" => "Seoul", "amount" => 10 },
		record! { "region" => "Busan", "amount" => 20 },
		record! { "region" => "Seoul", "amount" => 30 },
	]
}

#[test]
fn test_tokenize() {
	assert_eq!(tokenize("  Busan   SALES\tby region "), vec!["busan", "sales", "by", "region"]);
	assert!(tokenize("   ").is_empty());
}

#[test]
fn test_empty_query_passes_through() {
	let records = dataset();
	assert_eq!(match_records("", &records, 10).len(), 3);
	assert_eq!(match_records("   ", &records, 2).len(), 2);
}

#[test]
fn test_match_any_token() {
	let records = dataset();
	let matched = match_records("busan", &records, 10);
	assert_eq!(matched, vec![&records[1]]);
	// Tokens are OR'ed.
	let matched = match_records("daegu BUSAN", &records, 10);
	assert_eq!(matched.len(), 1);
	// Field names match too, so every record matches.
	let matched = match_records("amount", &records, 10);
	assert_eq!(matched.len(), 3);
	// Values match by their string form.
	let matched = match_records("30", &records, 10);
	assert_eq!(matched, vec![&records[2]]);
}

#[test]
fn test_limit_keeps_input_order() {
	let records = dataset();
	let matched = match_records("seoul", &records, 1);
	assert_eq!(matched, vec![&records[0]]);
}

#[test]
fn test_no_match() {
	let records = dataset();
	assert!(match_records("incheon", &records, 10).is_empty());
	let empty: Vec<Record> = Vec::new();
	assert!(match_records("seoul", &empty, 10).is_empty());
}
