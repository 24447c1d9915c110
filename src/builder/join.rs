//! Join clauses.

use std::ops::{Deref, DerefMut};

use crate::builder::clause::TableRef;
use crate::builder::Builder;
use crate::types::{Dialect, JoinType};

/// One join: a [`Builder`] specialization holding the ON/WHERE predicate
/// tree for a single joined table.
///
/// `JoinClause` dereferences to its inner [`Builder`], so the full where-
/// API is available inside join closures; `on`/`or_on` are sugar for
/// column-to-column comparisons. Joins nest: calling `join` on the inner
/// builder compiles to a parenthesized `(table inner join other on ...)`
/// table expression.
///
/// # Examples
///
/// ```rust
/// use quarry::Builder;
///
/// let mut query = Builder::generic();
/// query.from("users").join_on("contacts", |join| {
/// 	join.on("users.id", "=", "contacts.user_id")
/// 		.or_on("users.email", "=", "contacts.email");
/// });
/// ```
#[derive(Clone, Debug)]
pub struct JoinClause {
	/// Join flavor
	pub join_type: JoinType,
	/// The joined table
	pub table: TableRef,
	/// Predicate tree; its wheres compile after the `on` keyword
	pub query: Builder,
}

impl JoinClause {
	/// Create an empty join clause bound to the same dialect as its
	/// parent query.
	#[must_use]
	pub fn new(dialect: Dialect, join_type: JoinType, table: TableRef) -> Self {
		Self {
			join_type,
			table,
			query: Builder::new(dialect),
		}
	}

	/// Add an `and`-joined column comparison to the ON clause.
	pub fn on(&mut self, first: &str, operator: &str, second: &str) -> &mut Self {
		self.query.where_column(first, operator, second);
		self
	}

	/// Add an `or`-joined column comparison to the ON clause.
	pub fn or_on(&mut self, first: &str, operator: &str, second: &str) -> &mut Self {
		self.query.or_where_column(first, operator, second);
		self
	}
}

impl Deref for JoinClause {
	type Target = Builder;

	fn deref(&self) -> &Self::Target {
		&self.query
	}
}

impl DerefMut for JoinClause {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.query
	}
}
