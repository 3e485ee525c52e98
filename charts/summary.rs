use crate::SeriesPoint;
use num_traits::ToPrimitive;
use tally_metrics::{Extent, Metric};
use tally_util::number::round_half_up;

/**
The numbers shown beside a chart.

A summary is computed from a finished series, after sorting and capping, so it describes what is on screen and not the full record collection. For example, `count` is the number of points in the series and `total` is the sum of the shown points' values.
*/
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Summary {
	pub count: usize,
	pub total: f64,
	pub average: f64,
	pub max: f64,
	pub min: f64,
	/// The label of the first point whose value equals `max`.
	pub top_label: String,
}

/// Summarize `series`. An empty series has no summary.
pub fn summarize(series: &[SeriesPoint]) -> Option<Summary> {
	let values: Vec<f64> = series.iter().map(|point| point.value).collect();
	let extent = Extent::compute(&values)?;
	let count = series.len();
	Some(Summary {
		count,
		total: extent.total,
		average: round_half_up(extent.total / count.to_f64()?),
		max: extent.max,
		min: extent.min,
		top_label: series[extent.argmax].label.clone(),
	})
}

#[cfg(test)]
fn point(label: &str, value: f64) -> SeriesPoint {
	SeriesPoint {
		label: label.to_owned(),
		value,
		sum: value,
		count: 1,
		color: "#000000".to_owned(),
		percentage: None,
	}
}

#[test]
fn test_summarize() {
	let series = vec![point("Seoul", 30.0), point("Busan", 20.0), point("Daegu", 25.0)];
	insta::assert_debug_snapshot!(summarize(&series), @r###"
 Some(
     Summary {
         count: 3,
         total: 75.0,
         average: 25.0,
         max: 30.0,
         min: 20.0,
         top_label: "Seoul",
     },
 )
 "###);
}

#[test]
fn test_summarize_ties_take_first() {
	let series = vec![point("Seoul", 20.0), point("Busan", 20.0), point("Daegu", 5.0)];
	let summary = summarize(&series).unwrap();
	assert_eq!(summary.top_label, "Seoul");
	assert_eq!(summary.average, 15.0);
}

#[test]
fn test_summarize_single() {
	let summary = summarize(&[point("Busan", 20.0)]).unwrap();
	assert_eq!(summary.count, 1);
	assert_eq!(summary.total, 20.0);
	assert_eq!(summary.average, 20.0);
	assert_eq!(summary.max, 20.0);
	assert_eq!(summary.min, 20.0);
}

#[test]
fn test_summarize_empty() {
	assert_eq!(summarize(&[]), None);
}
