//! This module contains the main entrypoint to the tally cli.

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tally_charts::ChartKind;
use tally_core::{
	analysis::Report, analyze, extract_facets, filter::apply_filters, paginate,
	query::match_records, Analysis, AnalysisRequest, Config, FacetSelection, Filter, Measure,
	Options, SortDirection, SortKey,
};
use tally_dataframe::{build_catalog, load_records, Record};
use tally_util::{
	error::Result,
	number::format_number,
	table::Table,
	text::truncate_label,
};

#[derive(Parser)]
#[clap(about = "Turn a file of records and a question into chart data.")]
struct Cli {
	#[clap(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	#[clap(about = "list the fields of a file and their kinds")]
	Fields(FieldsOptions),
	#[clap(about = "aggregate the records that match a query into a chart series")]
	Analyze(Box<AnalyzeOptions>),
	#[clap(about = "print one page of the records that match a query")]
	Table(TableOptions),
	#[clap(about = "list the categories, regions and age groups found in a file")]
	Facets(FacetsOptions),
}

#[derive(Args)]
struct InputOptions {
	#[clap(short, long, help = "the path to your .json or .csv file")]
	file: PathBuf,
	#[clap(short, long, env = "TALLY_CONFIG", help = "the path to a .json or .yaml config file")]
	config: Option<PathBuf>,
	#[clap(long, help = "print json instead of a table")]
	json: bool,
}

#[derive(Args)]
struct FieldsOptions {
	#[clap(flatten)]
	input: InputOptions,
}

#[derive(Args)]
struct AnalyzeOptions {
	#[clap(flatten)]
	input: InputOptions,
	#[clap(short, long, default_value = "", help = "the question to ask")]
	query: String,
	#[clap(short = 'w', long = "where", help = "a filter such as age>=30, may be repeated")]
	filters: Vec<String>,
	#[clap(long, help = "the numeric field to aggregate")]
	value: Option<String>,
	#[clap(long, conflicts_with = "value", help = "count records instead of aggregating a field")]
	count: bool,
	#[clap(short, long, help = "the field to group by")]
	group: Option<String>,
	#[clap(long, help = "bar, line or pie, inferred from the query when absent")]
	chart: Option<ChartKind>,
	#[clap(long = "category", help = "keep records in this category, may be repeated")]
	categories: Vec<String>,
	#[clap(long = "region", help = "keep records in this region, may be repeated")]
	regions: Vec<String>,
	#[clap(long = "age-group", help = "keep records in this age group, may be repeated")]
	age_groups: Vec<String>,
}

#[derive(Args)]
struct TableOptions {
	#[clap(flatten)]
	input: InputOptions,
	#[clap(short, long, default_value = "", help = "the question to ask")]
	query: String,
	#[clap(short = 'w', long = "where", help = "a filter such as age>=30, may be repeated")]
	filters: Vec<String>,
	#[clap(long, help = "the field to sort by")]
	sort: Option<String>,
	#[clap(long, requires = "sort", help = "sort in descending order")]
	desc: bool,
	#[clap(short, long, default_value = "1", help = "the page to print, starting at 1")]
	page: usize,
}

#[derive(Args)]
struct FacetsOptions {
	#[clap(flatten)]
	input: InputOptions,
}

fn main() {
	let env = env_logger::Env::default().default_filter_or("tally_core=info");
	env_logger::Builder::from_env(env)
		.format_level(false)
		.format_module_path(false)
		.format_timestamp(None)
		.init();
	let cli = Cli::parse();
	let result = match cli.command {
		Command::Fields(options) => cli_fields(options),
		Command::Analyze(options) => cli_analyze(*options),
		Command::Table(options) => cli_table(options),
		Command::Facets(options) => cli_facets(options),
	};
	if let Err(error) = result {
		eprintln!("{}: {}", "error".red().bold(), error);
		std::process::exit(1);
	}
}

/// Load the records and resolve the options named by `input`.
fn load(input: &InputOptions) -> Result<(Vec<Record>, Options)> {
	let options = match &input.config {
		Some(path) => Config::from_path(path)?.resolve()?,
		None => Options::default(),
	};
	let records = load_records(&input.file)?;
	log::debug!("loaded {} records from {}", records.len(), input.file.display());
	Ok((records, options))
}

fn parse_filters(filters: &[String]) -> Result<Vec<Filter>> {
	let filters = filters
		.iter()
		.map(|filter| filter.parse())
		.collect::<std::result::Result<Vec<Filter>, _>>()?;
	Ok(filters)
}

fn cli_fields(options: FieldsOptions) -> Result<()> {
	let (records, config) = load(&options.input)?;
	let catalog = build_catalog(&records, &config.catalog);
	if options.input.json {
		println!("{}", serde_json::to_string_pretty(&catalog)?);
		return Ok(());
	}
	let header = vec!["field".to_owned(), "kind".to_owned()];
	let rows: Vec<Vec<String>> = catalog
		.iter()
		.map(|field| {
			let kind = if field.is_numeric() {
				"numeric"
			} else {
				"categorical"
			};
			vec![field.name.clone(), kind.to_owned()]
		})
		.collect();
	print!(
		"{}",
		Table {
			padding: 2,
			header: &header,
			rows: &rows,
		}
	);
	Ok(())
}

fn cli_analyze(options: AnalyzeOptions) -> Result<()> {
	let (records, config) = load(&options.input)?;
	let measure = if options.count {
		Measure::Count
	} else {
		match options.value {
			Some(value) => Measure::Field(value),
			None => Measure::Auto,
		}
	};
	let request = AnalysisRequest {
		query: options.query,
		measure,
		group_field: options.group,
		chart: options.chart,
		filters: parse_filters(&options.filters)?,
		facets: FacetSelection {
			categories: options.categories,
			regions: options.regions,
			age_groups: options.age_groups,
		},
	};
	let analysis = analyze(&records, &request, &config)?;
	if options.input.json {
		println!("{}", serde_json::to_string_pretty(&analysis)?);
		return Ok(());
	}
	match analysis {
		Analysis::Ready(report) => print_report(&report),
		Analysis::Empty => eprintln!("No records matched."),
		Analysis::FieldUnavailable => eprintln!("There is no numeric field to aggregate."),
	}
	Ok(())
}

fn print_report(report: &Report) {
	let measure = match &report.value_field {
		Some(value_field) => value_field.as_str(),
		None => "records",
	};
	let group = report.group_field.as_deref().unwrap_or("all records");
	println!(
		"{} chart of {} by {}, {} records matched",
		report.kind, measure, group, report.matched
	);
	let header: Vec<String> = ["label", "value", "count", "share", "color"]
		.iter()
		.map(|column| column.to_string())
		.collect();
	let rows: Vec<Vec<String>> = report
		.series
		.iter()
		.map(|point| {
			vec![
				point.label.clone(),
				format_number(point.value),
				point.count.to_string(),
				point
					.percentage
					.map(|percentage| format!("{}%", format_number(percentage)))
					.unwrap_or_default(),
				point.color.clone(),
			]
		})
		.collect();
	print!(
		"{}",
		Table {
			padding: 2,
			header: &header,
			rows: &rows,
		}
	);
	if report.dropped > 0 {
		println!("{} more groups not shown", report.dropped);
	}
	let summary = &report.summary;
	println!(
		"total {}, average {}, max {}, min {}, top {}",
		format_number(summary.total),
		format_number(summary.average),
		format_number(summary.max),
		format_number(summary.min),
		summary.top_label,
	);
}

fn cli_table(options: TableOptions) -> Result<()> {
	let (records, config) = load(&options.input)?;
	let filters = parse_filters(&options.filters)?;
	let candidates = apply_filters(&records, &filters);
	let matched = match_records(&options.query, candidates, config.match_limit);
	let desc = options.desc;
	let sort = options.sort.map(|field| SortKey {
		field,
		direction: if desc {
			SortDirection::Desc
		} else {
			SortDirection::Asc
		},
	});
	let page = paginate(&matched, sort.as_ref(), options.page, config.page_size);
	if options.input.json {
		println!("{}", serde_json::to_string_pretty(&page)?);
		return Ok(());
	}
	// The columns are the field names of the page's rows, in order of first appearance.
	let mut header: Vec<String> = Vec::new();
	for row in page.rows.iter() {
		for name in row.field_names() {
			if !header.iter().any(|column| column == name) {
				header.push(name.to_owned());
			}
		}
	}
	let rows: Vec<Vec<String>> = page
		.rows
		.iter()
		.map(|row| {
			header
				.iter()
				.map(|column| match row.get(column) {
					Some(value) => {
						truncate_label(&value.to_string(), config.table_label_width).into_owned()
					}
					None => String::new(),
				})
				.collect()
		})
		.collect();
	print!(
		"{}",
		Table {
			padding: 2,
			header: &header,
			rows: &rows,
		}
	);
	println!(
		"page {} of {}, {} rows",
		page.page, page.total_pages, page.total_rows
	);
	Ok(())
}

fn cli_facets(options: FacetsOptions) -> Result<()> {
	let (records, config) = load(&options.input)?;
	let facets = extract_facets(&records, config.facet_sample_size);
	if options.input.json {
		println!("{}", serde_json::to_string_pretty(&facets)?);
		return Ok(());
	}
	println!("categories: {}", facets.categories.join(", "));
	println!("regions: {}", facets.regions.join(", "));
	println!("age groups: {}", facets.age_groups.join(", "));
	Ok(())
}
