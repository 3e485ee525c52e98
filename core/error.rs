use thiserror::Error;

/// The ways a caller can misuse the engine. An empty result is never an error.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
	#[error("unknown field {name:?}, the known fields are {known}")]
	UnknownField { name: String, known: String },
	#[error("field {0:?} is categorical and cannot be aggregated")]
	NotNumeric(String),
	#[error("invalid filter {0:?}")]
	InvalidFilter(String),
	#[error("invalid config: {0}")]
	InvalidConfig(String),
}
