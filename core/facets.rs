/*!
The facet extractor discovers filter values for the filter panel: product categories, regions and age groups. Fields are recognized by hints in their names, and some well known category and region names are recognized in any field.
*/

use fnv::FnvHashSet;
use tally_dataframe::{Record, Value};

const MAX_CATEGORIES: usize = 10;
const MAX_REGIONS: usize = 15;
const MAX_AGE_GROUPS: usize = 8;

pub const AGE_GROUPS: &[&str] = &["Under 20", "20s", "30s", "40s", "50s", "60+"];

const KNOWN_REGIONS: &[&str] = &[
	"서울", "부산", "대구", "인천", "광주", "대전", "울산", "세종", "경기", "강원", "충북", "충남",
	"전북", "전남", "경북", "경남", "제주", "Seoul", "Busan", "Daegu", "Incheon", "Gwangju",
	"Daejeon", "Ulsan", "Sejong", "Gyeonggi", "Gangwon", "Jeju",
];

const KNOWN_CATEGORIES: &[&str] = &[
	"전자제품",
	"의류",
	"식품",
	"가구",
	"도서",
	"화장품",
	"스포츠",
	"Electronics",
	"Clothing",
	"Food",
	"Furniture",
	"Books",
	"Beauty",
	"Sports",
];

const FALLBACK_CATEGORIES: &[&str] = &["전자제품", "의류", "식품", "가구", "도서"];
const FALLBACK_REGIONS: &[&str] = &["서울", "경기", "부산", "인천", "대구"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetSource {
	/// The facets were found in the records.
	Discovered,
	/// There were no records, so the facets are a static list.
	Fallback,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Facets {
	pub categories: Vec<String>,
	pub regions: Vec<String>,
	pub age_groups: Vec<String>,
	pub source: FacetSource,
}

/// The facet a field contributes to, decided by its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FacetRole {
	Category,
	Region,
	Age,
}

impl FacetRole {
	/**
	Recognize a facet field by a hint anywhere in its name, ignoring case. The one exception is `average`, which contains `age` but is never an age field.

	| name             | role     |
	|------------------|----------|
	| product_category | Category |
	| subregion        | Region   |
	| 지역              | Region   |
	| customerage      | Age      |
	| 연령대            | Age      |
	| average_score    | None     |
	*/
	pub fn from_field_name(name: &str) -> Option<Self> {
		let name = name.to_lowercase();
		if name.contains("categor") || name.contains("카테고리") || name.contains("분류") {
			Some(FacetRole::Category)
		} else if name.contains("region") || name.contains("지역") {
			Some(FacetRole::Region)
		} else if (name.contains("age") && !name.contains("average"))
			|| name.contains("나이")
			|| name.contains("연령")
		{
			Some(FacetRole::Age)
		} else {
			None
		}
	}
}

/// Return the label of the age group `age` falls in.
pub fn age_group(age: f64) -> &'static str {
	let index = if age < 20.0 {
		0
	} else if age >= 60.0 {
		5
	} else {
		(age / 10.0).floor() as usize - 1
	};
	AGE_GROUPS[index]
}

fn known_region(text: &str) -> Option<&'static str> {
	KNOWN_REGIONS.iter().copied().find(|region| {
		text.get(..region.len())
			.map(|prefix| prefix.eq_ignore_ascii_case(region))
			.unwrap_or(false)
	})
}

fn known_category(text: &str) -> Option<&'static str> {
	KNOWN_CATEGORIES
		.iter()
		.copied()
		.find(|category| text.trim().eq_ignore_ascii_case(category))
}

/// A set that remembers insertion order and stops growing at its capacity.
struct CappedSet {
	values: Vec<String>,
	seen: FnvHashSet<String>,
	capacity: usize,
}

impl CappedSet {
	fn new(capacity: usize) -> Self {
		Self {
			values: Vec::new(),
			seen: FnvHashSet::default(),
			capacity,
		}
	}

	fn insert(&mut self, value: &str) {
		if self.values.len() >= self.capacity || value.is_empty() || self.seen.contains(value) {
			return;
		}
		self.seen.insert(value.to_owned());
		self.values.push(value.to_owned());
	}
}

/// Scan up to `sample_size` leading records for facet values.
pub fn extract_facets(records: &[Record], sample_size: usize) -> Facets {
	if records.is_empty() {
		return Facets {
			categories: to_strings(FALLBACK_CATEGORIES),
			regions: to_strings(FALLBACK_REGIONS),
			age_groups: to_strings(AGE_GROUPS),
			source: FacetSource::Fallback,
		};
	}
	let mut categories = CappedSet::new(MAX_CATEGORIES);
	let mut regions = CappedSet::new(MAX_REGIONS);
	let mut age_groups = [false; 6];
	for record in records.iter().take(sample_size) {
		for (name, value) in record.iter() {
			if value.is_null() {
				continue;
			}
			match FacetRole::from_field_name(name) {
				Some(FacetRole::Category) => categories.insert(value.to_string().trim()),
				Some(FacetRole::Region) => regions.insert(value.to_string().trim()),
				Some(FacetRole::Age) => {
					if let Some(age) = value.to_number_loose() {
						let group = age_group(age);
						if let Some(index) = AGE_GROUPS.iter().position(|g| *g == group) {
							age_groups[index] = true;
						}
					}
				}
				None => {}
			}
			// Known region and category names count in any field.
			if let Value::Text(text) = value {
				if let Some(region) = known_region(text.trim()) {
					regions.insert(region);
				} else if let Some(category) = known_category(text) {
					categories.insert(category);
				}
			}
		}
	}
	let age_groups = AGE_GROUPS
		.iter()
		.zip(age_groups.iter())
		.filter(|(_, present)| **present)
		.map(|(group, _)| group.to_string())
		.take(MAX_AGE_GROUPS)
		.collect();
	Facets {
		categories: categories.values,
		regions: regions.values,
		age_groups,
		source: FacetSource::Discovered,
	}
}

fn to_strings(values: &[&str]) -> Vec<String> {
	values.iter().map(|value| value.to_string()).collect()
}

/// The facet values selected in the filter panel. Empty lists select everything.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FacetSelection {
	#[serde(default)]
	pub categories: Vec<String>,
	#[serde(default)]
	pub regions: Vec<String>,
	#[serde(default)]
	pub age_groups: Vec<String>,
}

impl FacetSelection {
	pub fn is_empty(&self) -> bool {
		self.categories.is_empty() && self.regions.is_empty() && self.age_groups.is_empty()
	}

	/// Return true if, for every non empty selection list, `record` has a value in that facet which is selected.
	pub fn matches(&self, record: &Record) -> bool {
		let mut category_hit = self.categories.is_empty();
		let mut region_hit = self.regions.is_empty();
		let mut age_hit = self.age_groups.is_empty();
		for (name, value) in record.iter() {
			if value.is_null() {
				continue;
			}
			let text = value.to_string();
			let text = text.trim();
			match FacetRole::from_field_name(name) {
				Some(FacetRole::Category) => {
					category_hit |= self.categories.iter().any(|c| c == text);
				}
				Some(FacetRole::Region) => {
					region_hit |= self.regions.iter().any(|r| r == text);
				}
				Some(FacetRole::Age) => {
					if let Some(age) = value.to_number_loose() {
						let group = age_group(age);
						age_hit |= self.age_groups.iter().any(|g| g == group);
					}
				}
				None => {}
			}
			if let Value::Text(_) = value {
				if let Some(region) = known_region(text) {
					region_hit |= self.regions.iter().any(|r| r == region);
				} else if let Some(category) = known_category(text) {
					category_hit |= self.categories.iter().any(|c| c == category);
				}
			}
		}
		category_hit && region_hit && age_hit
	}

	/// Keep the records that match the selection.
	pub fn apply<'a, I>(&self, records: I) -> Vec<&'a Record>
	where
		I: IntoIterator<Item = &'a Record>,
	{
		records
			.into_iter()
			.filter(|record| self.matches(record))
			.collect()
	}
}

#[cfg(test)]
use tally_dataframe::record;

#[test]
fn test_from_field_name() {
	assert_eq!(FacetRole::from_field_name("product_category"), Some(FacetRole::Category));
	assert_eq!(FacetRole::from_field_name("Categories"), Some(FacetRole::Category));
	assert_eq!(FacetRole::from_field_name("상품분류"), Some(FacetRole::Category));
	assert_eq!(FacetRole::from_field_name("region"), Some(FacetRole::Region));
	assert_eq!(FacetRole::from_field_name("거주지역"), Some(FacetRole::Region));
	assert_eq!(FacetRole::from_field_name("customerAge"), Some(FacetRole::Age));
	assert_eq!(FacetRole::from_field_name("연령대"), Some(FacetRole::Age));
	assert_eq!(FacetRole::from_field_name("average_score"), None);
	assert_eq!(FacetRole::from_field_name("amount"), None);
}

#[test]
fn test_from_field_name_compound() {
	assert_eq!(FacetRole::from_field_name("subcategory"), Some(FacetRole::Category));
	assert_eq!(FacetRole::from_field_name("productcategory"), Some(FacetRole::Category));
	assert_eq!(FacetRole::from_field_name("subregion"), Some(FacetRole::Region));
	assert_eq!(FacetRole::from_field_name("agegroup"), Some(FacetRole::Age));
	assert_eq!(FacetRole::from_field_name("customerage"), Some(FacetRole::Age));
	let records = vec![record! { "subcategory" => "c1", "subregion" => "r1", "customerage" => 34 }];
	let facets = extract_facets(&records, 100);
	assert_eq!(facets.categories, vec!["c1"]);
	assert_eq!(facets.regions, vec!["r1"]);
	assert_eq!(facets.age_groups, vec!["30s"]);
}

#[test]
fn test_age_group() {
	assert_eq!(age_group(5.0), "Under 20");
	assert_eq!(age_group(19.9), "Under 20");
	assert_eq!(age_group(20.0), "20s");
	assert_eq!(age_group(34.0), "30s");
	assert_eq!(age_group(59.5), "50s");
	assert_eq!(age_group(60.0), "60+");
	assert_eq!(age_group(87.0), "60+");
}

#[test]
fn test_extract_facets() {
	let records = vec![
		record! { "category" => "의류", "region" => "Seoul", "age" => 34, "city" => "부산광역시 해운대구" },
		record! { "category" => "식품", "region" => "Busan", "age" => "21세", "item" => "Books" },
		record! { "category" => "의류", "age" => 67, "note" => "nothing" },
		record! { "age" => 33 },
	];
	let facets = extract_facets(&records, 100);
	insta::assert_debug_snapshot!(facets, @r###"
 Facets {
     categories: [
         "의류",
         "식품",
         "Books",
     ],
     regions: [
         "Seoul",
         "부산",
         "Busan",
     ],
     age_groups: [
         "20s",
         "30s",
         "60+",
     ],
     source: Discovered,
 }
 "###);
}

#[test]
fn test_extract_facets_caps() {
	let records: Vec<Record> = (0..30)
		.map(|i| record! { "category" => format!("c{}", i), "region" => format!("r{}", i) })
		.collect();
	let facets = extract_facets(&records, 100);
	assert_eq!(facets.categories.len(), 10);
	assert_eq!(facets.regions.len(), 15);
	assert_eq!(facets.categories[0], "c0");
	let facets = extract_facets(&records, 3);
	assert_eq!(facets.categories, vec!["c0", "c1", "c2"]);
}

#[test]
fn test_extract_facets_fallback() {
	let facets = extract_facets(&[], 100);
	assert_eq!(facets.source, FacetSource::Fallback);
	assert!(!facets.categories.is_empty());
	assert!(!facets.regions.is_empty());
	assert_eq!(facets.age_groups.len(), 6);
}

#[test]
fn test_selection() {
	let records = vec![
		record! { "category" => "의류", "region" => "서울특별시 동대문구", "age" => 34 },
		record! { "category" => "식품", "region" => "부산광역시", "age" => 25 },
		record! { "category" => "의류", "address" => "서울 강남구", "age" => 45 },
	];
	let selection = FacetSelection {
		categories: vec!["의류".to_owned()],
		regions: vec!["서울".to_owned()],
		age_groups: Vec::new(),
	};
	assert_eq!(selection.apply(&records), vec![&records[0], &records[2]]);
	let selection = FacetSelection {
		age_groups: vec!["20s".to_owned(), "40s".to_owned()],
		..Default::default()
	};
	assert_eq!(selection.apply(&records), vec![&records[1], &records[2]]);
	assert!(FacetSelection::default().is_empty());
	assert_eq!(FacetSelection::default().apply(&records).len(), 3);
}

#[test]
fn test_known_names_in_any_field() {
	let records = vec![
		record! { "category" => "서울", "region" => "Electronics" },
		record! { "category" => "도서" },
	];
	let facets = extract_facets(&records, 100);
	assert_eq!(facets.categories, vec!["서울", "Electronics", "도서"]);
	assert_eq!(facets.regions, vec!["서울", "Electronics"]);
	let selection = FacetSelection {
		regions: vec!["서울".to_owned()],
		..Default::default()
	};
	assert!(selection.matches(&records[0]));
	assert!(!selection.matches(&records[1]));
	let selection = FacetSelection {
		categories: vec!["Electronics".to_owned()],
		..Default::default()
	};
	assert!(selection.matches(&records[0]));
}
