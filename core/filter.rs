/*!
Structured filters such as `age>=30` or `region LIKE 서울%`. They narrow a record collection before the query matcher runs.
*/

use crate::Error;
use tally_dataframe::{Record, Value};
use tally_util::number::parse_loose_number;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FilterOp {
	#[serde(rename = "=")]
	Eq,
	#[serde(rename = "!=")]
	NotEq,
	#[serde(rename = ">")]
	Gt,
	#[serde(rename = ">=")]
	Gte,
	#[serde(rename = "<")]
	Lt,
	#[serde(rename = "<=")]
	Lte,
	#[serde(rename = "LIKE")]
	Like,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Filter {
	pub field: String,
	pub op: FilterOp,
	pub value: String,
}

impl Filter {
	/**
	Return true if `record` passes the filter. A record without the field never passes.

	Ordering operators compare loosely parsed numbers and fail if either side is not numeric. `=` and `!=` compare numbers when the filter value is a plain number and the record value parses as one, and compare text otherwise. `LIKE` matches SQL patterns where `%` is any run of characters and `_` is one character, ignoring case.
	*/
	pub fn matches(&self, record: &Record) -> bool {
		let value = match record.get(&self.field) {
			Some(value) => value,
			None => return false,
		};
		match self.op {
			FilterOp::Eq => self.equals(value),
			FilterOp::NotEq => !self.equals(value),
			FilterOp::Gt => self.compare(value, |a, b| a > b),
			FilterOp::Gte => self.compare(value, |a, b| a >= b),
			FilterOp::Lt => self.compare(value, |a, b| a < b),
			FilterOp::Lte => self.compare(value, |a, b| a <= b),
			FilterOp::Like => like(&value.to_string(), &self.value),
		}
	}

	fn equals(&self, value: &Value) -> bool {
		match (self.value.trim().parse::<f64>(), value.to_number_loose()) {
			(Ok(expected), Some(actual)) => expected == actual,
			_ => value.to_string() == self.value,
		}
	}

	fn compare(&self, value: &Value, f: impl Fn(f64, f64) -> bool) -> bool {
		match (value.to_number_loose(), parse_loose_number(&self.value)) {
			(Some(actual), Some(expected)) => f(actual, expected),
			_ => false,
		}
	}
}

impl std::str::FromStr for Filter {
	type Err = Error;

	/// Parse `field op value`, for example `age>=30`, `gender = 남성` or `region LIKE '서울%'`.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = || Error::InvalidFilter(s.to_owned());
		let (field, op, value) = if let Some(index) = find_like(s) {
			(&s[..index], FilterOp::Like, &s[index + " like ".len()..])
		} else {
			let index = s.find(|c| matches!(c, '=' | '!' | '<' | '>')).ok_or_else(invalid)?;
			let rest = &s[index..];
			let (op, len) = if rest.starts_with(">=") {
				(FilterOp::Gte, 2)
			} else if rest.starts_with("<=") {
				(FilterOp::Lte, 2)
			} else if rest.starts_with("!=") {
				(FilterOp::NotEq, 2)
			} else if rest.starts_with("<>") {
				(FilterOp::NotEq, 2)
			} else if rest.starts_with('>') {
				(FilterOp::Gt, 1)
			} else if rest.starts_with('<') {
				(FilterOp::Lt, 1)
			} else if rest.starts_with('=') {
				(FilterOp::Eq, 1)
			} else {
				return Err(invalid());
			};
			(&s[..index], op, &s[index + len..])
		};
		let field = field.trim();
		let value = unquote(value.trim());
		if field.is_empty() || value.is_empty() {
			return Err(invalid());
		}
		Ok(Filter {
			field: field.to_owned(),
			op,
			value: value.to_owned(),
		})
	}
}

/// Find the byte index of a whitespace delimited `LIKE`, in any case.
fn find_like(s: &str) -> Option<usize> {
	// Lowercasing ascii keeps byte offsets intact.
	s.to_ascii_lowercase().find(" like ")
}

fn unquote(value: &str) -> &str {
	for quote in &['\'', '"'] {
		if value.len() >= 2 && value.starts_with(*quote) && value.ends_with(*quote) {
			return &value[1..value.len() - 1];
		}
	}
	value
}

/// Match `text` against a SQL `LIKE` pattern, ignoring case.
fn like(text: &str, pattern: &str) -> bool {
	let text: Vec<char> = text.to_lowercase().chars().collect();
	let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
	let (mut t, mut p) = (0, 0);
	// The position of the last `%` in the pattern and the text position it was tried at.
	let mut backtrack: Option<(usize, usize)> = None;
	while t < text.len() {
		if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
			t += 1;
			p += 1;
		} else if p < pattern.len() && pattern[p] == '%' {
			backtrack = Some((p, t));
			p += 1;
		} else if let Some((star_p, star_t)) = backtrack {
			p = star_p + 1;
			t = star_t + 1;
			backtrack = Some((star_p, star_t + 1));
		} else {
			return false;
		}
	}
	pattern[p..].iter().all(|c| *c == '%')
}

/// Apply every filter to `records`, keeping the records that pass all of them.
pub fn apply_filters<'a>(records: &'a [Record], filters: &[Filter]) -> Vec<&'a Record> {
	records
		.iter()
		.filter(|record| filters.iter().all(|filter| filter.matches(record)))
		.collect()
}

#[cfg(test)]
use tally_dataframe::record;

#[test]
fn test_parse() {
	let filter: Filter = "age>=30".parse().unwrap();
	assert_eq!(
		filter,
		Filter {
			field: "age".to_owned(),
			op: FilterOp::Gte,
			value: "30".to_owned(),
		}
	);
	let filter: Filter = "region LIKE '서울%'".parse().unwrap();
	assert_eq!(filter.op, FilterOp::Like);
	assert_eq!(filter.value, "서울%");
	let filter: Filter = " gender = 남성 ".parse().unwrap();
	assert_eq!(filter.field, "gender");
	assert_eq!(filter.op, FilterOp::Eq);
	assert_eq!(filter.value, "남성");
	let filter: Filter = "age <> 30".parse().unwrap();
	assert_eq!(filter.op, FilterOp::NotEq);
	assert!("age".parse::<Filter>().is_err());
	assert!(">= 30".parse::<Filter>().is_err());
	assert!("age >=".parse::<Filter>().is_err());
}

#[test]
fn test_like() {
	assert!(like("서울특별시 동대문구", "서울%"));
	assert!(like("Seoul", "s%L"));
	assert!(like("Seoul", "se_ul"));
	assert!(like("abc", "%"));
	assert!(like("", "%"));
	assert!(like("mississippi", "%iss%ppi"));
	assert!(!like("경기도 광주시", "서울%"));
	assert!(!like("Seoul", "se_"));
}

#[test]
fn test_matches() {
	let record = record! { "region" => "서울특별시 동대문구", "age" => "34세", "gender" => "남성" };
	assert!("region LIKE 서울%".parse::<Filter>().unwrap().matches(&record));
	assert!("age>=30".parse::<Filter>().unwrap().matches(&record));
	assert!("age<40".parse::<Filter>().unwrap().matches(&record));
	assert!(!"age>40".parse::<Filter>().unwrap().matches(&record));
	assert!("age=34".parse::<Filter>().unwrap().matches(&record));
	assert!("gender=남성".parse::<Filter>().unwrap().matches(&record));
	assert!("gender!=여성".parse::<Filter>().unwrap().matches(&record));
	assert!(!"income>0".parse::<Filter>().unwrap().matches(&record));
	assert!(!"income!=0".parse::<Filter>().unwrap().matches(&record));
}

#[test]
fn test_apply_filters() {
	let records = vec![
		record! { "region" => "Seoul", "age" => 25 },
		record! { "region" => "Busan", "age" => 35 },
		record! { "region" => "Seoul", "age" => 45 },
	];
	let filters = vec![
		"region=Seoul".parse::<Filter>().unwrap(),
		"age>=30".parse::<Filter>().unwrap(),
	];
	assert_eq!(apply_filters(&records, &filters), vec![&records[2]]);
	assert_eq!(apply_filters(&records, &[]).len(), 3);
}
