/*!
The table view sorts and paginates records for display. It works on the matcher's output directly and never aggregates.
*/

use std::cmp::Ordering;
use tally_dataframe::{Record, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
	Asc,
	Desc,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SortKey {
	pub field: String,
	pub direction: SortDirection,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Page<'a> {
	pub rows: Vec<&'a Record>,
	/// The 1-based index of the page, after clamping.
	pub page: usize,
	pub total_pages: usize,
	pub total_rows: usize,
}

/**
Sort `records` by `sort` and return page `page` of them.

Pages are 1-based. A page index past either end is clamped to the first or last page. Without a sort key records keep their order.
*/
pub fn paginate<'a>(
	records: &[&'a Record],
	sort: Option<&SortKey>,
	page: usize,
	page_size: usize,
) -> Page<'a> {
	let page_size = page_size.max(1);
	let mut rows = records.to_vec();
	if let Some(sort) = sort {
		rows.sort_by(|a, b| compare_fields(a.get(&sort.field), b.get(&sort.field), sort.direction));
	}
	let total_rows = rows.len();
	let total_pages = (total_rows + page_size - 1) / page_size;
	let page = page.max(1).min(total_pages.max(1));
	let start = (page - 1) * page_size;
	let rows = rows.into_iter().skip(start).take(page_size).collect();
	Page {
		rows,
		page,
		total_pages,
		total_rows,
	}
}

/// Compare two possibly missing field values. Missing values sort last in either direction.
fn compare_fields(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
	match (a, b) {
		(None, None) => Ordering::Equal,
		(None, Some(_)) => Ordering::Greater,
		(Some(_), None) => Ordering::Less,
		(Some(a), Some(b)) => {
			let ordering = compare_values(a, b);
			match direction {
				SortDirection::Asc => ordering,
				SortDirection::Desc => ordering.reverse(),
			}
		}
	}
}

/// Numbers compare numerically and text lexicographically. Values of different kinds order as number, text, boolean, null.
fn compare_values(a: &Value, b: &Value) -> Ordering {
	fn rank(value: &Value) -> u8 {
		match value {
			Value::Number(_) => 0,
			Value::Text(_) => 1,
			Value::Bool(_) => 2,
			Value::Null => 3,
		}
	}
	match (a, b) {
		(Value::Number(a), Value::Number(b)) => a.total_cmp(b),
		(Value::Text(a), Value::Text(b)) => a.cmp(b),
		(Value::Bool(a), Value::Bool(b)) => a.cmp(b),
		_ => rank(a).cmp(&rank(b)),
	}
}

#[cfg(test)]
use tally_dataframe::record;

#[cfg(test)]
fn labels(page: &Page) -> Vec<String> {
	page.rows
		.iter()
		.map(|row| row.get("name").map(|v| v.to_string()).unwrap_or_default())
		.collect()
}

#[test]
fn test_paginate_without_sort() {
	let records: Vec<Record> = (1..=25).map(|i| record! { "name" => format!("r{}", i) }).collect();
	let refs: Vec<&Record> = records.iter().collect();
	let page = paginate(&refs, None, 1, 10);
	assert_eq!(page.total_pages, 3);
	assert_eq!(page.total_rows, 25);
	assert_eq!(labels(&page)[0], "r1");
	let page = paginate(&refs, None, 3, 10);
	assert_eq!(page.rows.len(), 5);
	assert_eq!(labels(&page)[0], "r21");
}

#[test]
fn test_paginate_clamps() {
	let records: Vec<Record> = (1..=25).map(|i| record! { "name" => format!("r{}", i) }).collect();
	let refs: Vec<&Record> = records.iter().collect();
	let page = paginate(&refs, None, 99, 10);
	assert_eq!(page.page, 3);
	assert_eq!(labels(&page)[0], "r21");
	let page = paginate(&refs, None, 0, 10);
	assert_eq!(page.page, 1);
	let page = paginate(&[], None, 2, 10);
	assert_eq!(page.page, 1);
	assert_eq!(page.total_pages, 0);
	assert!(page.rows.is_empty());
}

#[test]
fn test_paginate_sorts() {
	let records = vec![
		record! { "name" => "a", "amount" => 30 },
		record! { "name" => "b" },
		record! { "name" => "c", "amount" => 5 },
		record! { "name" => "d", "amount" => 100 },
		record! { "name" => "e", "amount" => "n/a" },
	];
	let refs: Vec<&Record> = records.iter().collect();
	let asc = SortKey {
		field: "amount".to_owned(),
		direction: SortDirection::Asc,
	};
	let page = paginate(&refs, Some(&asc), 1, 10);
	assert_eq!(labels(&page), vec!["c", "a", "d", "e", "b"]);
	let desc = SortKey {
		field: "amount".to_owned(),
		direction: SortDirection::Desc,
	};
	let page = paginate(&refs, Some(&desc), 1, 10);
	assert_eq!(labels(&page), vec!["e", "d", "a", "c", "b"]);
	let by_name = SortKey {
		field: "name".to_owned(),
		direction: SortDirection::Desc,
	};
	let page = paginate(&refs, Some(&by_name), 1, 2);
	assert_eq!(labels(&page), vec!["e", "d"]);
}
