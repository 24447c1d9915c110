//! Fluent, dialect-aware SQL query builder.
//!
//! A [`Builder`] accumulates a structured representation of a query —
//! columns, from-target, joins, where/having predicate trees, grouping,
//! ordering, limit/offset, unions, locks, index hints — together with the
//! positional parameter bindings each clause contributes. A family of
//! [`Grammar`](grammar::Grammar) compilers renders that state into
//! parameterized SQL text for MySQL, PostgreSQL, SQLite and SQL Server,
//! each with its own quoting, JSON-path, locking, upsert and pagination
//! syntax.
//!
//! Compilation is pure: a builder holds no connection and never executes
//! anything. [`Builder::to_sql`] returns SQL with `?` placeholders and
//! [`Builder::get_bindings`] returns the matching ordered values, meant to
//! be handed verbatim to whatever executes the statement.
//!
//! # Examples
//!
//! ```rust
//! use quarry::Builder;
//!
//! let mut query = Builder::postgres();
//! query
//! 	.from("users")
//! 	.where_("votes", ">", 100)
//! 	.or_where_eq("name", "John")
//! 	.order_by("name")
//! 	.limit(10);
//!
//! let (sql, bindings) = query.build().unwrap();
//! assert_eq!(
//! 	sql,
//! 	r#"select * from "users" where "votes" > ? or "name" = ? order by "name" asc limit 10"#
//! );
//! assert_eq!(bindings.len(), 2);
//! ```
//!
//! Raw fragments opt out of quoting and parameterization through
//! [`Expr`]; everything else is wrapped and bound.

pub mod builder;
pub mod error;
pub mod expr;
pub mod grammar;
pub mod types;
pub mod value;

pub use builder::clause::{BindingKind, IntoOperand, IntoProjection, IntoTableRef, Operand};
pub use builder::join::JoinClause;
pub use builder::{Builder, QueryPart, UpsertUpdate};
pub use error::{Error, Result};
pub use expr::Expr;
pub use types::{
	Conjunction, DateKind, Dialect, Direction, IndexHint, IndexHintKind, JoinType, Lock,
	UnionState,
};
pub use value::{Value, Values};

/// Commonly used items.
pub mod prelude {
	pub use crate::builder::Builder;
	pub use crate::expr::Expr;
	pub use crate::types::Dialect;
	pub use crate::value::{Value, Values};
}
