//! Raw SQL fragments.

use std::fmt;

/// An opaque raw SQL fragment.
///
/// An `Expr` bypasses both identifier quoting and value parameterization:
/// wherever the compiler would wrap a column or emit a `?` placeholder, an
/// `Expr` is rendered verbatim. This is the escape hatch for literal SQL
/// (function calls, computed aliases) and the caller takes responsibility
/// for its contents.
///
/// # Examples
///
/// ```rust
/// use quarry::Expr;
///
/// let expr = Expr::new("count(*) as total");
/// assert_eq!(expr.as_str(), "count(*) as total");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expr(String);

impl Expr {
	/// Wrap a literal SQL fragment.
	pub fn new(sql: impl Into<String>) -> Self {
		Self(sql.into())
	}

	/// The fragment, unchanged.
	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Expr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Expr {
	fn from(sql: &str) -> Self {
		Self::new(sql)
	}
}

impl From<String> for Expr {
	fn from(sql: String) -> Self {
		Self(sql)
	}
}
