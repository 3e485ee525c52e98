/*!
This module defines the `Config` struct, which is read from a json or yaml file, and the `Options` it resolves to. Every field of `Config` is optional and falls back to the default in [`Options::default`](struct.Options.html).
*/

use crate::Error;
use anyhow::Context;
use std::path::Path;
use tally_charts::SeriesOptions;
use tally_dataframe::{CatalogOptions, InferenceMode};
use tally_util::{err, error::Result};

#[derive(Debug, Default, serde::Deserialize)]
pub struct Config {
	pub match_limit: Option<usize>,
	pub catalog_sample_size: Option<usize>,
	pub catalog_inference: Option<InferenceMode>,
	pub facet_sample_size: Option<usize>,
	pub page_size: Option<usize>,
	pub palette: Option<Vec<String>>,
	pub bar_line_cap: Option<usize>,
	pub pie_cap: Option<usize>,
	pub label_widths: Option<LabelWidths>,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct LabelWidths {
	pub bar_line: Option<usize>,
	pub pie: Option<usize>,
	pub table: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct Options {
	/// The maximum number of records the query matcher keeps.
	pub match_limit: usize,
	pub catalog: CatalogOptions,
	/// The number of leading records scanned for facets.
	pub facet_sample_size: usize,
	pub page_size: usize,
	pub series: SeriesOptions,
	/// The maximum number of characters of a label derived from a table cell.
	pub table_label_width: usize,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			match_limit: 200,
			catalog: CatalogOptions::default(),
			facet_sample_size: 100,
			page_size: 10,
			series: SeriesOptions::default(),
			table_label_width: 30,
		}
	}
}

impl Config {
	/// Read a config from a `.json`, `.yaml` or `.yml` file.
	pub fn from_path(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path)
			.with_context(|| format!("failed to read config {}", path.display()))?;
		let extension = path
			.extension()
			.and_then(|extension| extension.to_str())
			.unwrap_or("");
		let config = match extension {
			"json" => serde_json::from_str(&text)?,
			"yaml" | "yml" => serde_yaml::from_str(&text)?,
			_ => {
				return Err(err!(
					"unsupported config file {}, expected .json or .yaml",
					path.display()
				))
			}
		};
		Ok(config)
	}

	/// Fill in defaults and validate.
	pub fn resolve(self) -> std::result::Result<Options, Error> {
		let defaults = Options::default();
		let label_widths = self.label_widths.unwrap_or_default();
		let options = Options {
			match_limit: self.match_limit.unwrap_or(defaults.match_limit),
			catalog: CatalogOptions {
				sample_size: self
					.catalog_sample_size
					.unwrap_or(defaults.catalog.sample_size),
				mode: self.catalog_inference.unwrap_or(defaults.catalog.mode),
			},
			facet_sample_size: self
				.facet_sample_size
				.unwrap_or(defaults.facet_sample_size),
			page_size: self.page_size.unwrap_or(defaults.page_size),
			series: SeriesOptions {
				palette: self.palette.unwrap_or(defaults.series.palette),
				bar_line_cap: self.bar_line_cap.unwrap_or(defaults.series.bar_line_cap),
				pie_cap: self.pie_cap.unwrap_or(defaults.series.pie_cap),
				bar_line_label_width: label_widths
					.bar_line
					.unwrap_or(defaults.series.bar_line_label_width),
				pie_label_width: label_widths
					.pie
					.unwrap_or(defaults.series.pie_label_width),
			},
			table_label_width: label_widths.table.unwrap_or(defaults.table_label_width),
		};
		if options.series.palette.is_empty() {
			return Err(Error::InvalidConfig("palette must not be empty".to_owned()));
		}
		if options.match_limit == 0 {
			return Err(Error::InvalidConfig("match_limit must be at least 1".to_owned()));
		}
		if options.catalog.sample_size == 0 {
			return Err(Error::InvalidConfig(
				"catalog_sample_size must be at least 1".to_owned(),
			));
		}
		if options.facet_sample_size == 0 {
			return Err(Error::InvalidConfig(
				"facet_sample_size must be at least 1".to_owned(),
			));
		}
		if options.page_size == 0 {
			return Err(Error::InvalidConfig("page_size must be at least 1".to_owned()));
		}
		if options.series.bar_line_cap == 0 || options.series.pie_cap == 0 {
			return Err(Error::InvalidConfig("caps must be at least 1".to_owned()));
		}
		Ok(options)
	}
}

#[test]
fn test_resolve_defaults() {
	let options = Config::default().resolve().unwrap();
	assert_eq!(options.match_limit, 200);
	assert_eq!(options.catalog.sample_size, 100);
	assert_eq!(options.catalog.mode, InferenceMode::FirstRecord);
	assert_eq!(options.page_size, 10);
	assert_eq!(options.series.bar_line_cap, 10);
	assert_eq!(options.series.pie_cap, 8);
	assert_eq!(options.series.pie_label_width, 20);
	assert_eq!(options.table_label_width, 30);
	assert!(options.series.palette.len() >= 8);
}

#[test]
fn test_resolve_json() {
	let config: Config = serde_json::from_str(
		r##"{
			"match_limit": 50,
			"catalog_inference": "majority",
			"palette": ["#111111", "#222222"],
			"label_widths": { "pie": 12 }
		}"##,
	)
	.unwrap();
	let options = config.resolve().unwrap();
	assert_eq!(options.match_limit, 50);
	assert_eq!(options.catalog.mode, InferenceMode::Majority);
	assert_eq!(options.series.palette, vec!["#111111", "#222222"]);
	assert_eq!(options.series.pie_label_width, 12);
	assert_eq!(options.series.bar_line_label_width, 15);
}

#[test]
fn test_resolve_yaml() {
	let config: Config = serde_yaml::from_str("page_size: 25\npie_cap: 5\n").unwrap();
	let options = config.resolve().unwrap();
	assert_eq!(options.page_size, 25);
	assert_eq!(options.series.pie_cap, 5);
}

#[test]
fn test_resolve_invalid() {
	let config = Config {
		palette: Some(Vec::new()),
		..Default::default()
	};
	assert_eq!(
		config.resolve().unwrap_err(),
		Error::InvalidConfig("palette must not be empty".to_owned())
	);
	let config = Config {
		page_size: Some(0),
		..Default::default()
	};
	assert!(config.resolve().is_err());
}

#[test]
fn test_resolve_rejects_zero_limits() {
	let config = Config {
		match_limit: Some(0),
		..Default::default()
	};
	assert_eq!(
		config.resolve().unwrap_err(),
		Error::InvalidConfig("match_limit must be at least 1".to_owned())
	);
	let config = Config {
		catalog_sample_size: Some(0),
		..Default::default()
	};
	assert_eq!(
		config.resolve().unwrap_err(),
		Error::InvalidConfig("catalog_sample_size must be at least 1".to_owned())
	);
	let config: Config = serde_yaml::from_str("facet_sample_size: 0\n").unwrap();
	assert!(config.resolve().is_err());
}
