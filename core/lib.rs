/*!
This crate turns a collection of loosely typed records and a free text query into chart series, summaries, facet lists and table pages.
*/

#![allow(clippy::tabs_in_doc_comments)]

pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod error;
pub mod facets;
pub mod filter;
pub mod query;
pub mod table;

pub use self::{
	analysis::{analyze, Analysis, AnalysisRequest, Measure, Report},
	config::{Config, Options},
	error::Error,
	facets::{extract_facets, FacetSelection, Facets},
	filter::Filter,
	table::{paginate, Page, SortDirection, SortKey},
};
