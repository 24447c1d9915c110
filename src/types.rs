//! Small value objects shared by the builder and the grammars.

use crate::grammar::{
	GenericGrammar, Grammar, MySqlGrammar, PostgresGrammar, SqlServerGrammar, SqliteGrammar,
};

/// Boolean connector between two predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Conjunction {
	/// `and`
	And,
	/// `or`
	Or,
	/// `and not`
	AndNot,
	/// `or not`
	OrNot,
}

impl Conjunction {
	/// SQL keyword(s) for this connector.
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::And => "and",
			Self::Or => "or",
			Self::AndNot => "and not",
			Self::OrNot => "or not",
		}
	}

	/// Build a connector from its `or` / `not` components.
	#[must_use]
	pub fn from_parts(or: bool, not: bool) -> Self {
		match (or, not) {
			(false, false) => Self::And,
			(true, false) => Self::Or,
			(false, true) => Self::AndNot,
			(true, true) => Self::OrNot,
		}
	}
}

/// Sort direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
	/// Ascending
	Asc,
	/// Descending
	Desc,
}

impl Direction {
	/// SQL keyword for this direction.
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Asc => "asc",
			Self::Desc => "desc",
		}
	}
}

/// Join flavor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinType {
	/// `inner join`
	Inner,
	/// `left join`
	Left,
	/// `right join`
	Right,
	/// `cross join`
	Cross,
}

impl JoinType {
	/// SQL keyword for this join flavor (the `join` keyword itself is
	/// appended by the compiler).
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Inner => "inner",
			Self::Left => "left",
			Self::Right => "right",
			Self::Cross => "cross",
		}
	}
}

/// Whether ordering and paging calls route to the query itself or to the
/// combined union result.
///
/// A builder starts [`Standalone`](Self::Standalone) and transitions to
/// [`Unioned`](Self::Unioned) on the first `union()` call; the transition is
/// one-way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnionState {
	/// No union branch has been added; orders/limit/offset apply to the
	/// query itself.
	#[default]
	Standalone,
	/// At least one union branch exists; orders/limit/offset apply to the
	/// combined result.
	Unioned,
}

/// Row-locking mode for a select.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lock {
	/// Exclusive lock (`for update` and dialect equivalents)
	Update,
	/// Shared lock (`lock in share mode`, `for share`, ...)
	Shared,
	/// A literal lock clause rendered as-is
	Raw(String),
}

/// Index-hint kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexHintKind {
	/// `use index`
	Use,
	/// `force index`
	Force,
	/// `ignore index`
	Ignore,
}

/// An index hint attached to the from-table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexHint {
	/// Hint kind
	pub kind: IndexHintKind,
	/// Index name, rendered unquoted
	pub index: String,
}

impl IndexHint {
	/// Create a hint.
	pub fn new(kind: IndexHintKind, index: impl Into<String>) -> Self {
		Self {
			kind,
			index: index.into(),
		}
	}
}

/// Which date part a date-based where extracts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateKind {
	/// Whole date
	Date,
	/// Time of day
	Time,
	/// Day of month
	Day,
	/// Month number
	Month,
	/// Year number
	Year,
}

impl DateKind {
	/// Lowercase name, used directly as a SQL function name by the
	/// dialects that have one per part.
	#[must_use]
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Date => "date",
			Self::Time => "time",
			Self::Day => "day",
			Self::Month => "month",
			Self::Year => "year",
		}
	}
}

/// Target SQL dialect.
///
/// A builder is bound to one dialect at construction and never changes it.
/// The dialect resolves to a statically allocated [`Grammar`] so builders
/// stay cheap to clone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dialect {
	/// The base grammar: double-quote identifiers, no dialect extensions
	#[default]
	Generic,
	/// MySQL / MariaDB
	MySql,
	/// PostgreSQL
	Postgres,
	/// SQLite
	Sqlite,
	/// Microsoft SQL Server
	SqlServer,
}

impl Dialect {
	/// The grammar compiling for this dialect.
	#[must_use]
	pub fn grammar(self) -> &'static dyn Grammar {
		match self {
			Self::Generic => &GenericGrammar,
			Self::MySql => &MySqlGrammar,
			Self::Postgres => &PostgresGrammar,
			Self::Sqlite => &SqliteGrammar,
			Self::SqlServer => &SqlServerGrammar,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Conjunction::And, "and")]
	#[case(Conjunction::Or, "or")]
	#[case(Conjunction::AndNot, "and not")]
	#[case(Conjunction::OrNot, "or not")]
	fn test_conjunction_as_str(#[case] conjunction: Conjunction, #[case] expected: &str) {
		assert_eq!(conjunction.as_str(), expected);
	}

	#[rstest]
	#[case(false, false, Conjunction::And)]
	#[case(true, false, Conjunction::Or)]
	#[case(false, true, Conjunction::AndNot)]
	#[case(true, true, Conjunction::OrNot)]
	fn test_conjunction_from_parts(#[case] or: bool, #[case] not: bool, #[case] expected: Conjunction) {
		assert_eq!(Conjunction::from_parts(or, not), expected);
	}

	#[rstest]
	#[case(JoinType::Inner, "inner")]
	#[case(JoinType::Left, "left")]
	#[case(JoinType::Right, "right")]
	#[case(JoinType::Cross, "cross")]
	fn test_join_type_as_str(#[case] join_type: JoinType, #[case] expected: &str) {
		assert_eq!(join_type.as_str(), expected);
	}

	#[rstest]
	fn test_union_state_default() {
		assert_eq!(UnionState::default(), UnionState::Standalone);
	}

	#[rstest]
	#[case(Dialect::Generic, "generic")]
	#[case(Dialect::MySql, "mysql")]
	#[case(Dialect::Postgres, "postgres")]
	#[case(Dialect::Sqlite, "sqlite")]
	#[case(Dialect::SqlServer, "sql server")]
	fn test_dialect_grammar_name(#[case] dialect: Dialect, #[case] expected: &str) {
		assert_eq!(dialect.grammar().name(), expected);
	}
}
