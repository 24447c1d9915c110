//! Error types for query compilation.

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while compiling a query statement.
///
/// All variants are compile-time failures: a grammar was asked to render a
/// construct its dialect has no syntax for. Construction-time misuse of the
/// builder API (an illegal operator/value combination, a row-values arity
/// mismatch) panics immediately instead, and is documented under `# Panics`
/// on the respective builder method.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	/// The bound grammar declines to implement the requested feature.
	///
	/// Examples: JSON containment on SQLite, `insert or ignore` on SQL
	/// Server, index hints on PostgreSQL.
	#[error("{grammar} does not support {feature}")]
	UnsupportedFeature {
		/// Display name of the grammar that rejected the construct
		grammar: &'static str,
		/// Human-readable name of the rejected construct
		feature: &'static str,
	},

	/// A statement was compiled without a from-table.
	#[error("query has no from-table")]
	MissingFrom,

	/// An upsert was compiled with an empty row set.
	#[error("upsert requires at least one row of values")]
	EmptyUpsertValues,

	/// An upsert was compiled without any unique-by columns.
	#[error("upsert requires at least one unique-by column")]
	MissingUniqueBy,
}

impl Error {
	/// Shorthand for an [`Error::UnsupportedFeature`].
	#[must_use]
	pub fn unsupported(grammar: &'static str, feature: &'static str) -> Self {
		Self::UnsupportedFeature { grammar, feature }
	}
}
