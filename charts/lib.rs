/*!
This crate turns aggregated buckets into chart-ready series for bar, line and pie charts and computes the summary shown next to a chart. It does not draw anything.
*/

mod kind;
mod series;
mod summary;

pub use self::kind::ChartKind;
pub use self::series::{
	build_count_series, build_series, Series, SeriesOptions, SeriesPoint, DEFAULT_PALETTE,
};
pub use self::summary::{summarize, Summary};
