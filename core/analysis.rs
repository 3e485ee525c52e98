/*!
The analysis pipeline: catalog, filters, query matcher, aggregator, series builder and summary, in that order. Everything is recomputed from the full record collection on every call, and nothing is kept between calls.
*/

use crate::{
	aggregate::{aggregate, count_by},
	config::Options,
	facets::FacetSelection,
	filter::{apply_filters, Filter},
	query::match_records,
	Error,
};
use itertools::Itertools;
use tally_charts::{build_count_series, build_series, summarize, ChartKind, Series, Summary};
use tally_dataframe::{build_catalog, first_numeric_field, FieldDescriptor, FieldKind, Record};

/// What each bucket accumulates.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
	/// Use the first numeric field in the catalog.
	Auto,
	/// Use the named numeric field.
	Field(String),
	/// Count records.
	Count,
}

impl Default for Measure {
	fn default() -> Self {
		Measure::Auto
	}
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
pub struct AnalysisRequest {
	#[serde(default)]
	pub query: String,
	#[serde(default)]
	pub measure: Measure,
	pub group_field: Option<String>,
	/// The chart kind. When absent it is inferred from the query.
	pub chart: Option<ChartKind>,
	#[serde(default)]
	pub filters: Vec<Filter>,
	#[serde(default)]
	pub facets: FacetSelection,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Analysis {
	Ready(Report),
	/// No record matched. Render a "no data" state.
	Empty,
	/// The catalog has no numeric field to aggregate.
	FieldUnavailable,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Report {
	pub kind: ChartKind,
	/// The aggregated field, or `None` when counting records.
	pub value_field: Option<String>,
	pub group_field: Option<String>,
	/// The number of records that matched the filters and the query.
	pub matched: usize,
	/// The number of buckets left out of the series by the cap.
	pub dropped: usize,
	pub series: Series,
	/// Describes the points in `series`, not every matched record.
	pub summary: Summary,
}

impl Analysis {
	pub fn report(&self) -> Option<&Report> {
		match self {
			Analysis::Ready(report) => Some(report),
			_ => None,
		}
	}
}

/// Run the whole pipeline over `records`.
pub fn analyze(
	records: &[Record],
	request: &AnalysisRequest,
	options: &Options,
) -> Result<Analysis, Error> {
	if records.is_empty() {
		log::debug!("no records to analyze");
		return Ok(Analysis::Empty);
	}
	let catalog = build_catalog(records, &options.catalog);
	log::debug!("catalog has {} fields", catalog.len());
	if let Some(group_field) = request.group_field.as_deref() {
		find_field(&catalog, group_field)?;
	}
	let value_field = match &request.measure {
		Measure::Auto => match first_numeric_field(&catalog) {
			Some(field) => Some(field.name.clone()),
			None => {
				log::debug!("no numeric field in catalog");
				return Ok(Analysis::FieldUnavailable);
			}
		},
		Measure::Field(name) => {
			let field = find_field(&catalog, name)?;
			if field.kind != FieldKind::Numeric {
				return Err(Error::NotNumeric(name.clone()));
			}
			Some(name.clone())
		}
		Measure::Count => None,
	};
	let mut candidates = apply_filters(records, &request.filters);
	if !request.facets.is_empty() {
		candidates = request.facets.apply(candidates);
	}
	log::debug!("{} records passed the filters", candidates.len());
	let matched = match_records(&request.query, candidates, options.match_limit);
	log::debug!("{} records matched {:?}", matched.len(), request.query);
	if matched.is_empty() {
		return Ok(Analysis::Empty);
	}
	let group_field = request.group_field.as_deref();
	let kind = request
		.chart
		.unwrap_or_else(|| ChartKind::infer(&request.query));
	let (buckets, series) = match value_field.as_deref() {
		Some(value_field) => {
			let buckets = aggregate(matched.iter().copied(), value_field, group_field);
			let series = build_series(&buckets, kind, &options.series);
			(buckets, series)
		}
		None => {
			let buckets = count_by(matched.iter().copied(), group_field);
			let series = build_count_series(&buckets, kind, &options.series);
			(buckets, series)
		}
	};
	let summary = match summarize(&series) {
		Some(summary) => summary,
		None => return Ok(Analysis::Empty),
	};
	log::info!(
		"{} chart with {} of {} buckets over {} records",
		kind,
		series.len(),
		buckets.len(),
		buckets.total_count()
	);
	Ok(Analysis::Ready(Report {
		kind,
		value_field,
		group_field: group_field.map(|group_field| group_field.to_owned()),
		matched: matched.len(),
		dropped: buckets.len() - series.len(),
		series,
		summary,
	}))
}

/// Look up `name` in the catalog, failing with the list of known fields.
pub fn find_field<'a>(catalog: &'a [FieldDescriptor], name: &str) -> Result<&'a FieldDescriptor, Error> {
	catalog
		.iter()
		.find(|field| field.name == name)
		.ok_or_else(|| Error::UnknownField {
			name: name.to_owned(),
			known: catalog.iter().map(|field| field.name.as_str()).join(", "),
		})
}

#[cfg(test)]
use tally_dataframe::record;

#[cfg(test)]
fn dataset() -> Vec<Record> {
	vec![
		record! { "region" => "Seoul", "amount" => 10 },
		record! { "region" => "Busan", "amount" => 20 },
		record! { "region" => "Seoul", "amount" => 30 },
	]
}

#[cfg(test)]
fn request(query: &str, chart: Option<ChartKind>) -> AnalysisRequest {
	AnalysisRequest {
		query: query.to_owned(),
		measure: Measure::Field("amount".to_owned()),
		group_field: Some("region".to_owned()),
		chart,
		..Default::default()
	}
}

#[cfg(test)]
fn points(analysis: &Analysis) -> Vec<(String, f64, Option<f64>)> {
	analysis
		.report()
		.unwrap()
		.series
		.iter()
		.map(|point| (point.label.clone(), point.value, point.percentage))
		.collect()
}

#[test]
fn test_bar_mean_per_region() {
	let analysis = analyze(&dataset(), &request("", Some(ChartKind::Bar)), &Options::default()).unwrap();
	assert_eq!(
		points(&analysis),
		vec![("Seoul".to_owned(), 20.0, None), ("Busan".to_owned(), 20.0, None)]
	);
	let report = analysis.report().unwrap();
	assert_eq!(report.matched, 3);
	assert_eq!(report.dropped, 0);
	let count: u64 = report.series.iter().map(|point| point.count).sum();
	assert_eq!(count, 3);
}

#[test]
fn test_pie_sum_per_region() {
	let analysis = analyze(&dataset(), &request("", Some(ChartKind::Pie)), &Options::default()).unwrap();
	assert_eq!(
		points(&analysis),
		vec![
			("Seoul".to_owned(), 40.0, Some(67.0)),
			("Busan".to_owned(), 20.0, Some(33.0)),
		]
	);
}

#[test]
fn test_query_selects_one_region() {
	let analysis = analyze(&dataset(), &request("busan", None), &Options::default()).unwrap();
	let report = analysis.report().unwrap();
	assert_eq!(report.kind, ChartKind::Bar);
	assert_eq!(report.matched, 1);
	assert_eq!(report.series.len(), 1);
	insta::assert_debug_snapshot!(report.summary, @r###"
 Summary {
     count: 1,
     total: 20.0,
     average: 20.0,
     max: 20.0,
     min: 20.0,
     top_label: "Busan",
 }
 "###);
}

#[test]
fn test_chart_kind_inferred_from_query() {
	let analysis = analyze(&dataset(), &request("seoul share", None), &Options::default()).unwrap();
	assert_eq!(analysis.report().unwrap().kind, ChartKind::Pie);
}

#[test]
fn test_empty_states() {
	let options = Options::default();
	assert_eq!(analyze(&[], &request("", None), &options), Ok(Analysis::Empty));
	assert_eq!(
		analyze(&dataset(), &request("incheon", None), &options),
		Ok(Analysis::Empty)
	);
	let records = vec![record! { "region" => "Seoul" }];
	let request = AnalysisRequest {
		group_field: Some("region".to_owned()),
		..Default::default()
	};
	assert_eq!(
		analyze(&records, &request, &options),
		Ok(Analysis::FieldUnavailable)
	);
}

#[test]
fn test_misuse() {
	let options = Options::default();
	let mut bad_value = request("", None);
	bad_value.measure = Measure::Field("price".to_owned());
	assert_eq!(
		analyze(&dataset(), &bad_value, &options),
		Err(Error::UnknownField {
			name: "price".to_owned(),
			known: "region, amount".to_owned(),
		})
	);
	let mut categorical = request("", None);
	categorical.measure = Measure::Field("region".to_owned());
	assert_eq!(
		analyze(&dataset(), &categorical, &options),
		Err(Error::NotNumeric("region".to_owned()))
	);
	let mut bad_group = request("", None);
	bad_group.group_field = Some("city".to_owned());
	assert!(analyze(&dataset(), &bad_group, &options).is_err());
}

#[test]
fn test_auto_measure_and_no_group() {
	let request = AnalysisRequest::default();
	let analysis = analyze(&dataset(), &request, &Options::default()).unwrap();
	let report = analysis.report().unwrap();
	assert_eq!(report.value_field.as_deref(), Some("amount"));
	assert_eq!(report.series.len(), 1);
	assert_eq!(report.series[0].label, "All");
	assert_eq!(report.series[0].value, 20.0);
}

#[test]
fn test_count_measure() {
	let records = vec![
		record! { "status" => "미혼", "region" => "서울" },
		record! { "status" => "기혼", "region" => "서울" },
		record! { "status" => "미혼", "region" => "부산" },
	];
	let request = AnalysisRequest {
		query: "결혼 여부 분포".to_owned(),
		measure: Measure::Count,
		group_field: Some("status".to_owned()),
		..Default::default()
	};
	let analysis = analyze(&records, &request, &Options::default()).unwrap();
	// The query words are not in the records, so nothing matches.
	assert_eq!(analysis, Analysis::Empty);
	let request = AnalysisRequest {
		query: String::new(),
		chart: Some(ChartKind::Pie),
		..request
	};
	let analysis = analyze(&records, &request, &Options::default()).unwrap();
	assert_eq!(
		points(&analysis),
		vec![
			("미혼".to_owned(), 2.0, Some(67.0)),
			("기혼".to_owned(), 1.0, Some(33.0)),
		]
	);
	assert_eq!(analysis.report().unwrap().value_field, None);
}

#[test]
fn test_filters_and_facets_narrow_before_matching() {
	let records = vec![
		record! { "region" => "서울", "age" => 25, "amount" => 10 },
		record! { "region" => "서울", "age" => 35, "amount" => 20 },
		record! { "region" => "부산", "age" => 38, "amount" => 40 },
	];
	let request = AnalysisRequest {
		measure: Measure::Field("amount".to_owned()),
		group_field: Some("region".to_owned()),
		filters: vec!["age>=30".parse().unwrap()],
		facets: FacetSelection {
			regions: vec!["서울".to_owned()],
			..Default::default()
		},
		..Default::default()
	};
	let analysis = analyze(&records, &request, &Options::default()).unwrap();
	assert_eq!(points(&analysis), vec![("서울".to_owned(), 20.0, None)]);
	assert_eq!(analysis.report().unwrap().matched, 1);
}

#[test]
fn test_cap_reports_dropped() {
	let records: Vec<Record> = (0..12)
		.map(|i| record! { "group" => format!("g{}", i), "amount" => i })
		.collect();
	let request = AnalysisRequest {
		group_field: Some("group".to_owned()),
		chart: Some(ChartKind::Pie),
		..Default::default()
	};
	let report = analyze(&records, &request, &Options::default()).unwrap();
	let report = report.report().unwrap();
	assert_eq!(report.series.len(), 8);
	assert_eq!(report.dropped, 4);
}

#[test]
fn test_idempotent() {
	let records = dataset();
	let request = request("seoul busan", Some(ChartKind::Line));
	let options = Options::default();
	let a = serde_json::to_string(&analyze(&records, &request, &options).unwrap()).unwrap();
	let b = serde_json::to_string(&analyze(&records, &request, &options).unwrap()).unwrap();
	assert_eq!(a, b);
}
