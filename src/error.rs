//! Error types shared across the crate.

use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between loading records and mounting the graph.
#[derive(Error, Debug)]
pub enum Error {
	/// Input records or configuration were not valid JSON for the expected shape.
	#[error("Parse error: {0}")]
	Parse(#[from] serde_json::Error),

	/// Two contributors share a name and the merge policy rejects duplicates.
	#[error("Duplicate contributor: {0}")]
	DuplicateContributor(String),

	/// Two contribution-name entries share a name and the merge policy rejects duplicates.
	#[error("Duplicate contribution: {0}")]
	DuplicateContribution(String),

	/// A configuration value is out of its allowed range.
	#[error("Invalid config: {0}")]
	InvalidConfig(String),

	/// A color string in the style configuration could not be parsed.
	#[error("Invalid color: {0}")]
	InvalidColor(String),

	/// A browser API returned an error or an expected element was missing.
	#[error("DOM error: {0}")]
	Dom(String),

	/// Scheduling or cancelling a timer failed.
	#[error("Timer error: {0}")]
	Timer(String),
}
