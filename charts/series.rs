use crate::ChartKind;
use num_traits::ToPrimitive;
use tally_metrics::{Bucket, Buckets};
use tally_util::{number::round_half_up, text::truncate_label};

/// The colors assigned to series points when no palette is configured.
pub const DEFAULT_PALETTE: &[&str] = &[
	"#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#06B6D4", "#84CC16",
	"#F97316", "#6366F1",
];

#[derive(Clone, Debug)]
pub struct SeriesOptions {
	/// Colors are assigned by rank after sorting, cycling through the palette.
	pub palette: Vec<String>,
	/// The maximum number of points in a bar or line series.
	pub bar_line_cap: usize,
	/// The maximum number of points in a pie series.
	pub pie_cap: usize,
	/// The maximum number of characters in a bar or line label.
	pub bar_line_label_width: usize,
	/// The maximum number of characters in a pie label.
	pub pie_label_width: usize,
}

impl Default for SeriesOptions {
	fn default() -> Self {
		Self {
			palette: DEFAULT_PALETTE.iter().map(|color| color.to_string()).collect(),
			bar_line_cap: 10,
			pie_cap: 8,
			bar_line_label_width: 15,
			pie_label_width: 20,
		}
	}
}

impl SeriesOptions {
	pub fn cap(&self, kind: ChartKind) -> usize {
		match kind {
			ChartKind::Bar | ChartKind::Line => self.bar_line_cap,
			ChartKind::Pie => self.pie_cap,
		}
	}

	pub fn label_width(&self, kind: ChartKind) -> usize {
		match kind {
			ChartKind::Bar | ChartKind::Line => self.bar_line_label_width,
			ChartKind::Pie => self.pie_label_width,
		}
	}
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SeriesPoint {
	pub label: String,
	/// The rounded mean of the bucket for bar and line charts, and the bucket's sum for pie charts.
	pub value: f64,
	pub sum: f64,
	pub count: u64,
	pub color: String,
	/// The rounded share of the total of all buckets, in percent. Only pie points have one.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub percentage: Option<f64>,
}

pub type Series = Vec<SeriesPoint>;

/**
Build the series for `kind` from `buckets`.

Bar and line points show the typical magnitude of a group, so their value is the rounded mean of the bucket. Pie points show a group's part of the whole, so their value is the bucket's sum and they carry a percentage of the sum of all buckets, including buckets that are cut by the cap. Points are sorted by value, largest first, with ties kept in bucket order, and then cut to the cap for `kind`. Colors follow rank, so a group can change color between two queries when its rank changes.
*/
pub fn build_series(buckets: &Buckets, kind: ChartKind, options: &SeriesOptions) -> Series {
	build(buckets, kind, options, |bucket| match kind {
		ChartKind::Bar | ChartKind::Line => bucket.mean().map(round_half_up).unwrap_or(0.0),
		ChartKind::Pie => bucket.sum,
	})
}

/// Build a series whose values are the number of records in each bucket, for every chart kind. This is the value counts view of a categorical field.
pub fn build_count_series(buckets: &Buckets, kind: ChartKind, options: &SeriesOptions) -> Series {
	build(buckets, kind, options, |bucket| bucket.count.to_f64().unwrap_or(0.0))
}

fn build(
	buckets: &Buckets,
	kind: ChartKind,
	options: &SeriesOptions,
	value: impl Fn(&Bucket) -> f64,
) -> Series {
	let label_width = options.label_width(kind);
	let mut series: Series = buckets
		.iter()
		.map(|(key, bucket)| SeriesPoint {
			label: truncate_label(key, label_width).into_owned(),
			value: value(bucket),
			sum: bucket.sum,
			count: bucket.count,
			color: String::new(),
			percentage: None,
		})
		.collect();
	if kind == ChartKind::Pie {
		let total: f64 = series.iter().map(|point| point.value).sum();
		for point in series.iter_mut() {
			point.percentage = Some(if total != 0.0 {
				round_half_up(point.value / total * 100.0)
			} else {
				0.0
			});
		}
	}
	// sort_by is stable, so ties keep bucket order.
	series.sort_by(|a, b| b.value.total_cmp(&a.value));
	series.truncate(options.cap(kind));
	let default_palette: Vec<String>;
	let palette = if options.palette.is_empty() {
		default_palette = DEFAULT_PALETTE.iter().map(|color| color.to_string()).collect();
		&default_palette
	} else {
		&options.palette
	};
	for (rank, point) in series.iter_mut().enumerate() {
		point.color = palette[rank % palette.len()].clone();
	}
	series
}

#[cfg(test)]
fn buckets(entries: &[(&str, &[f64])]) -> Buckets {
	use tally_metrics::StreamingMetric;
	let mut buckets = Buckets::new();
	for (key, values) in entries {
		for value in values.iter() {
			buckets.entry(key).update(*value);
		}
	}
	buckets
}

#[test]
fn test_bar_uses_rounded_mean() {
	let buckets = buckets(&[("Seoul", &[10.0, 30.0]), ("Busan", &[20.0])]);
	let series = build_series(&buckets, ChartKind::Bar, &SeriesOptions::default());
	insta::assert_debug_snapshot!(series, @r###"
 [
     SeriesPoint {
         label: "Seoul",
         value: 20.0,
         sum: 40.0,
         count: 2,
         color: "#3B82F6",
         percentage: None,
     },
     SeriesPoint {
         label: "Busan",
         value: 20.0,
         sum: 20.0,
         count: 1,
         color: "#10B981",
         percentage: None,
     },
 ]
 "###);
}

#[test]
fn test_pie_uses_sum_and_percentage() {
	let buckets = buckets(&[("Seoul", &[10.0, 30.0]), ("Busan", &[20.0])]);
	let series = build_series(&buckets, ChartKind::Pie, &SeriesOptions::default());
	let points: Vec<(&str, f64, Option<f64>)> = series
		.iter()
		.map(|point| (point.label.as_str(), point.value, point.percentage))
		.collect();
	assert_eq!(
		points,
		vec![("Seoul", 40.0, Some(67.0)), ("Busan", 20.0, Some(33.0))]
	);
}

#[test]
fn test_mean_rounds_half_up() {
	let buckets = buckets(&[("a", &[1.0, 2.0]), ("b", &[-1.0, -2.0])]);
	let series = build_series(&buckets, ChartKind::Line, &SeriesOptions::default());
	assert_eq!(series[0].value, 2.0);
	assert_eq!(series[1].value, -1.0);
}

#[test]
fn test_sorted_descending_and_capped() {
	let entries: Vec<(String, Vec<f64>)> = (0..12)
		.map(|i| (format!("group {}", i), vec![i as f64]))
		.collect();
	let entries: Vec<(&str, &[f64])> = entries
		.iter()
		.map(|(key, values)| (key.as_str(), values.as_slice()))
		.collect();
	let buckets = buckets(&entries);
	let options = SeriesOptions::default();
	let bar = build_series(&buckets, ChartKind::Bar, &options);
	assert_eq!(bar.len(), 10);
	assert_eq!(bar[0].label, "group 11");
	assert_eq!(bar[9].label, "group 2");
	let pie = build_series(&buckets, ChartKind::Pie, &options);
	assert_eq!(pie.len(), 8);
	// Percentages are shares of all twelve buckets, not only the eight shown.
	assert_eq!(pie[0].percentage, Some(17.0));
}

#[test]
fn test_colors_follow_rank() {
	let options = SeriesOptions {
		palette: vec!["red".to_owned(), "blue".to_owned()],
		..Default::default()
	};
	let a = build_series(
		&buckets(&[("x", &[1.0]), ("y", &[2.0]), ("z", &[3.0])]),
		ChartKind::Bar,
		&options,
	);
	let colors: Vec<(&str, &str)> = a
		.iter()
		.map(|point| (point.label.as_str(), point.color.as_str()))
		.collect();
	assert_eq!(colors, vec![("z", "red"), ("y", "blue"), ("x", "red")]);
	let b = build_series(
		&buckets(&[("x", &[5.0]), ("y", &[2.0])]),
		ChartKind::Bar,
		&options,
	);
	assert_eq!(b[0].label, "x");
	assert_eq!(b[0].color, "red");
}

#[test]
fn test_labels_truncated() {
	let long = "abcdefghijklmnopqrstuvwxy";
	assert_eq!(long.chars().count(), 25);
	let buckets = buckets(&[(long, &[1.0])]);
	let options = SeriesOptions::default();
	let pie = build_series(&buckets, ChartKind::Pie, &options);
	assert_eq!(pie[0].label, "abcdefghijklmnopqrst...");
	let bar = build_series(&buckets, ChartKind::Bar, &options);
	assert_eq!(bar[0].label, "abcdefghijklmno...");
}

#[test]
fn test_empty_buckets() {
	let series = build_series(&Buckets::new(), ChartKind::Pie, &SeriesOptions::default());
	assert!(series.is_empty());
}

#[test]
fn test_zero_total_pie() {
	let buckets = buckets(&[("a", &[0.0]), ("b", &[0.0])]);
	let series = build_series(&buckets, ChartKind::Pie, &SeriesOptions::default());
	assert!(series
		.iter()
		.all(|point| point.percentage == Some(0.0)));
}

#[test]
fn test_count_series() {
	let buckets = buckets(&[("미혼", &[1.0, 1.0, 1.0]), ("기혼", &[1.0])]);
	let options = SeriesOptions::default();
	let bar = build_count_series(&buckets, ChartKind::Bar, &options);
	assert_eq!(bar[0].value, 3.0);
	assert_eq!(bar[1].value, 1.0);
	let pie = build_count_series(&buckets, ChartKind::Pie, &options);
	assert_eq!(pie[0].percentage, Some(75.0));
	assert_eq!(pie[1].percentage, Some(25.0));
}
