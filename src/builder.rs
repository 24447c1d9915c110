//! The fluent query builder.
//!
//! A [`Builder`] accumulates a structured representation of a query and its
//! parameter bindings; it never touches SQL text itself. Compilation is
//! delegated to the [`Grammar`](crate::grammar::Grammar) bound at
//! construction through the builder's [`Dialect`].

pub mod clause;
pub mod join;


use std::fmt;
use std::sync::Arc;

use crate::builder::clause::{
	Aggregate, BindingKind, Bindings, HavingClause, IntoOperand, IntoProjection, IntoTableRef,
	Operand, Order, Projection, TableRef, Union, WhereClause,
};
use crate::builder::join::JoinClause;
use crate::error::Result;
use crate::expr::Expr;
use crate::types::{
	Conjunction, DateKind, Dialect, Direction, IndexHint, IndexHintKind, JoinType, Lock,
	UnionState,
};
use crate::value::{Value, Values};

/// One assignment in an upsert's update list.
#[derive(Clone, Debug)]
pub enum UpsertUpdate {
	/// Overwrite the column with the inserted row's value for it
	Column(String),
	/// Assign an explicit bound value
	Assign(String, Value),
}

/// Names a resettable part of the query state for
/// [`Builder::clone_without`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryPart {
	Aggregate,
	Columns,
	From,
	IndexHint,
	Joins,
	Wheres,
	Groups,
	Havings,
	Orders,
	Limit,
	Offset,
	Unions,
	UnionOrders,
	Lock,
}

type BeforeQueryCallback = Arc<dyn Fn(&mut Builder) + Send + Sync>;

/// The mutable query AST and its fluent construction API.
///
/// A builder is bound to one [`Dialect`] at construction; mutating calls
/// return `&mut Self` for chaining. No SQL is produced until
/// [`to_sql`](Self::to_sql) / [`build`](Self::build).
///
/// # Examples
///
/// ```rust
/// use quarry::Builder;
///
/// let mut query = Builder::generic();
/// query.from("users").where_("id", "=", 1);
/// let (sql, bindings) = query.build().unwrap();
/// assert_eq!(sql, r#"select * from "users" where "id" = ?"#);
/// assert_eq!(bindings.len(), 1);
/// ```
#[derive(Clone)]
pub struct Builder {
	/// Target dialect, fixed at construction
	pub dialect: Dialect,
	/// Aggregate projection; suppresses normal column compilation
	pub aggregate: Option<Aggregate>,
	/// Selected columns; empty means `*`
	pub columns: Vec<Projection>,
	/// `select distinct`
	pub distinct: bool,
	/// The from-target
	pub from: Option<TableRef>,
	/// Index hint attached to the from-table
	pub index_hint: Option<IndexHint>,
	/// Joins in declaration order
	pub joins: Vec<JoinClause>,
	/// Where-predicates in declaration order
	pub wheres: Vec<WhereClause>,
	/// Group-by keys
	pub groups: Vec<Projection>,
	/// Having-predicates
	pub havings: Vec<HavingClause>,
	/// Orders applying to this query alone
	pub orders: Vec<Order>,
	/// Row limit
	pub limit: Option<u64>,
	/// Row offset
	pub offset: Option<u64>,
	/// Union branches
	pub unions: Vec<Union>,
	/// Orders applying to the combined union result
	pub union_orders: Vec<Order>,
	/// Limit applying to the combined union result
	pub union_limit: Option<u64>,
	/// Offset applying to the combined union result
	pub union_offset: Option<u64>,
	/// Row-locking mode
	pub lock: Option<Lock>,
	/// Routing state for orders/limit/offset
	pub union_state: UnionState,
	/// Per-clause binding buckets
	pub bindings: Bindings,
	before_query: Vec<BeforeQueryCallback>,
}

impl Builder {
	/// Create an empty builder bound to a dialect.
	#[must_use]
	pub fn new(dialect: Dialect) -> Self {
		Self {
			dialect,
			aggregate: None,
			columns: Vec::new(),
			distinct: false,
			from: None,
			index_hint: None,
			joins: Vec::new(),
			wheres: Vec::new(),
			groups: Vec::new(),
			havings: Vec::new(),
			orders: Vec::new(),
			limit: None,
			offset: None,
			unions: Vec::new(),
			union_orders: Vec::new(),
			union_limit: None,
			union_offset: None,
			lock: None,
			union_state: UnionState::Standalone,
			bindings: Bindings::default(),
			before_query: Vec::new(),
		}
	}

	/// A builder for the base grammar.
	#[must_use]
	pub fn generic() -> Self {
		Self::new(Dialect::Generic)
	}

	/// A builder for MySQL.
	#[must_use]
	pub fn mysql() -> Self {
		Self::new(Dialect::MySql)
	}

	/// A builder for PostgreSQL.
	#[must_use]
	pub fn postgres() -> Self {
		Self::new(Dialect::Postgres)
	}

	/// A builder for SQLite.
	#[must_use]
	pub fn sqlite() -> Self {
		Self::new(Dialect::Sqlite)
	}

	/// A builder for SQL Server.
	#[must_use]
	pub fn sql_server() -> Self {
		Self::new(Dialect::SqlServer)
	}

	/// A fresh empty builder bound to the same dialect, for sub-queries.
	#[must_use]
	pub fn new_query(&self) -> Self {
		Self::new(self.dialect)
	}

	// ---------------------------------------------------------------------
	// Columns
	// ---------------------------------------------------------------------

	/// Replace the selected columns, clearing any select bindings.
	pub fn select<P: IntoProjection, I: IntoIterator<Item = P>>(&mut self, columns: I) -> &mut Self {
		self.columns = columns.into_iter().map(IntoProjection::into_projection).collect();
		self.bindings.clear(BindingKind::Select);
		self
	}

	/// Add a raw select fragment with its bindings.
	pub fn select_raw(&mut self, sql: &str, bindings: Vec<Value>) -> &mut Self {
		self.columns.push(Projection::Raw(Expr::new(sql)));
		self.bindings.select.extend(bindings);
		self
	}

	/// Select a compiled subquery under an alias.
	///
	/// The subquery is compiled eagerly; its bindings land in the select
	/// bucket.
	pub fn select_sub(
		&mut self,
		f: impl FnOnce(&mut Builder),
		alias: &str,
	) -> Result<&mut Self> {
		let mut sub = self.new_query();
		f(&mut sub);
		let sql = sub.to_sql()?;
		let alias = self.dialect.grammar().wrap(alias)?;
		self.columns.push(Projection::Raw(Expr::new(format!("({sql}) as {alias}"))));
		self.bindings.select.extend(sub.get_bindings());
		Ok(self)
	}

	/// Add a column to the selection unless an identical one is present.
	pub fn add_select<P: IntoProjection>(&mut self, column: P) -> &mut Self {
		let projection = column.into_projection();
		if !self.columns.contains(&projection) {
			self.columns.push(projection);
		}
		self
	}

	/// Mark the query `select distinct`.
	pub fn distinct(&mut self) -> &mut Self {
		self.distinct = true;
		self
	}

	/// Select an aggregate function instead of a column list.
	pub fn aggregate(&mut self, function: &str, columns: &[&str]) -> &mut Self {
		self.aggregate = Some(Aggregate {
			function: function.to_string(),
			columns: columns.iter().map(|c| Projection::Column((*c).to_string())).collect(),
		});
		self
	}

	// ---------------------------------------------------------------------
	// From
	// ---------------------------------------------------------------------

	/// Set the from-table.
	pub fn from<T: IntoTableRef>(&mut self, table: T) -> &mut Self {
		self.from = Some(table.into_table_ref());
		self
	}

	/// Set a raw from fragment with its bindings.
	pub fn from_raw(&mut self, sql: &str, bindings: Vec<Value>) -> &mut Self {
		self.from = Some(TableRef::Raw(Expr::new(sql)));
		self.bindings.from.extend(bindings);
		self
	}

	/// Select from a compiled subquery under an alias.
	pub fn from_sub(&mut self, f: impl FnOnce(&mut Builder), alias: &str) -> Result<&mut Self> {
		let mut sub = self.new_query();
		f(&mut sub);
		let sql = sub.to_sql()?;
		let alias = self.dialect.grammar().wrap(alias)?;
		self.from = Some(TableRef::Raw(Expr::new(format!("({sql}) as {alias}"))));
		self.bindings.from.extend(sub.get_bindings());
		Ok(self)
	}

	// ---------------------------------------------------------------------
	// Joins
	// ---------------------------------------------------------------------

	fn add_join(&mut self, join: JoinClause) -> &mut Self {
		self.bindings.join.extend(join.query.get_bindings());
		self.joins.push(join);
		self
	}

	fn simple_join(
		&mut self,
		join_type: JoinType,
		table: &str,
		first: &str,
		operator: &str,
		second: &str,
	) -> &mut Self {
		let mut join = JoinClause::new(self.dialect, join_type, table.into_table_ref());
		join.on(first, operator, second);
		self.add_join(join)
	}

	/// Inner join with a single `first operator second` ON condition.
	pub fn join(&mut self, table: &str, first: &str, operator: &str, second: &str) -> &mut Self {
		self.simple_join(JoinType::Inner, table, first, operator, second)
	}

	/// Inner join built through a closure receiving the [`JoinClause`].
	pub fn join_on(&mut self, table: &str, f: impl FnOnce(&mut JoinClause)) -> &mut Self {
		let mut join = JoinClause::new(self.dialect, JoinType::Inner, table.into_table_ref());
		f(&mut join);
		self.add_join(join)
	}

	/// Inner join constrained by a column-to-value comparison.
	pub fn join_where<V: IntoOperand>(
		&mut self,
		table: &str,
		column: &str,
		operator: &str,
		value: V,
	) -> &mut Self {
		let mut join = JoinClause::new(self.dialect, JoinType::Inner, table.into_table_ref());
		join.where_(column, operator, value);
		self.add_join(join)
	}

	/// Inner join against a compiled subquery under an alias.
	pub fn join_sub(
		&mut self,
		f: impl FnOnce(&mut Builder),
		alias: &str,
		first: &str,
		operator: &str,
		second: &str,
	) -> Result<&mut Self> {
		let mut sub = self.new_query();
		f(&mut sub);
		let sql = sub.to_sql()?;
		let wrapped = self.dialect.grammar().wrap(alias)?;
		self.bindings.join.extend(sub.get_bindings());
		let table = TableRef::Raw(Expr::new(format!("({sql}) as {wrapped}")));
		let mut join = JoinClause::new(self.dialect, JoinType::Inner, table);
		join.on(first, operator, second);
		self.joins.push(join);
		Ok(self)
	}

	/// Left join with a single ON condition.
	pub fn left_join(&mut self, table: &str, first: &str, operator: &str, second: &str) -> &mut Self {
		self.simple_join(JoinType::Left, table, first, operator, second)
	}

	/// Left join built through a closure.
	pub fn left_join_on(&mut self, table: &str, f: impl FnOnce(&mut JoinClause)) -> &mut Self {
		let mut join = JoinClause::new(self.dialect, JoinType::Left, table.into_table_ref());
		f(&mut join);
		self.add_join(join)
	}

	/// Left join constrained by a column-to-value comparison.
	pub fn left_join_where<V: IntoOperand>(
		&mut self,
		table: &str,
		column: &str,
		operator: &str,
		value: V,
	) -> &mut Self {
		let mut join = JoinClause::new(self.dialect, JoinType::Left, table.into_table_ref());
		join.where_(column, operator, value);
		self.add_join(join)
	}

	/// Left join against a compiled subquery under an alias.
	pub fn left_join_sub(
		&mut self,
		f: impl FnOnce(&mut Builder),
		alias: &str,
		first: &str,
		operator: &str,
		second: &str,
	) -> Result<&mut Self> {
		let mut sub = self.new_query();
		f(&mut sub);
		let sql = sub.to_sql()?;
		let wrapped = self.dialect.grammar().wrap(alias)?;
		self.bindings.join.extend(sub.get_bindings());
		let table = TableRef::Raw(Expr::new(format!("({sql}) as {wrapped}")));
		let mut join = JoinClause::new(self.dialect, JoinType::Left, table);
		join.on(first, operator, second);
		self.joins.push(join);
		Ok(self)
	}

	/// Right join with a single ON condition.
	pub fn right_join(&mut self, table: &str, first: &str, operator: &str, second: &str) -> &mut Self {
		self.simple_join(JoinType::Right, table, first, operator, second)
	}

	/// Right join built through a closure.
	pub fn right_join_on(&mut self, table: &str, f: impl FnOnce(&mut JoinClause)) -> &mut Self {
		let mut join = JoinClause::new(self.dialect, JoinType::Right, table.into_table_ref());
		f(&mut join);
		self.add_join(join)
	}

	/// Right join constrained by a column-to-value comparison.
	pub fn right_join_where<V: IntoOperand>(
		&mut self,
		table: &str,
		column: &str,
		operator: &str,
		value: V,
	) -> &mut Self {
		let mut join = JoinClause::new(self.dialect, JoinType::Right, table.into_table_ref());
		join.where_(column, operator, value);
		self.add_join(join)
	}

	/// Cross join with no condition.
	pub fn cross_join(&mut self, table: &str) -> &mut Self {
		let join = JoinClause::new(self.dialect, JoinType::Cross, table.into_table_ref());
		self.add_join(join)
	}

	/// Cross join built through a closure.
	pub fn cross_join_on(&mut self, table: &str, f: impl FnOnce(&mut JoinClause)) -> &mut Self {
		let mut join = JoinClause::new(self.dialect, JoinType::Cross, table.into_table_ref());
		f(&mut join);
		self.add_join(join)
	}

	// ---------------------------------------------------------------------
	// Wheres
	// ---------------------------------------------------------------------

	fn invalid_operator(&self, operator: &str) -> bool {
		let operator = operator.to_lowercase();
		!crate::grammar::BASE_OPERATORS.contains(&operator.as_str())
			&& !self.dialect.grammar().operators().contains(&operator.as_str())
	}

	fn push_basic_where(
		&mut self,
		column: &str,
		operator: &str,
		value: Operand,
		conjunction: Conjunction,
	) -> &mut Self {
		if let Operand::Value(v) = &value {
			self.bindings.where_.push(v.clone());
		}
		let bitwise = self
			.dialect
			.grammar()
			.bitwise_operators()
			.contains(&operator);
		let clause = if bitwise {
			WhereClause::Bitwise {
				conjunction,
				column: column.to_string(),
				operator: operator.to_string(),
				value,
			}
		} else {
			WhereClause::Basic {
				conjunction,
				column: column.to_string(),
				operator: operator.to_string(),
				value,
			}
		};
		self.wheres.push(clause);
		self
	}

	fn add_where(
		&mut self,
		column: &str,
		operator: &str,
		value: Operand,
		conjunction: Conjunction,
	) -> &mut Self {
		if self.invalid_operator(operator) {
			// Unknown operator: treat it as a mis-called two-argument form
			// where the "operator" is really the value.
			let value = Operand::Value(Value::from(operator));
			return self.push_basic_where(column, "=", value, conjunction);
		}
		let operator = operator.to_lowercase();
		if value.is_null() {
			return match operator.as_str() {
				"=" | "is" => self.add_where_null(&[column], conjunction, false),
				"<>" | "!=" | "is not" => self.add_where_null(&[column], conjunction, true),
				_ => panic!("null values require an equality operator, `{operator}` given"),
			};
		}
		if column.contains("->") {
			if let Operand::Value(Value::Bool(Some(boolean))) = value {
				self.wheres.push(WhereClause::JsonBoolean {
					conjunction,
					column: column.to_string(),
					operator,
					value: boolean,
				});
				return self;
			}
		}
		self.push_basic_where(column, &operator, value, conjunction)
	}

	/// Add an `and`-joined basic where.
	///
	/// An operator outside the grammar's known set is treated as a
	/// mis-called two-argument form: the operator string becomes the value,
	/// paired with `=`. A null value dispatches to an `is null` /
	/// `is not null` clause depending on the operator.
	///
	/// # Panics
	///
	/// Panics when a null value is paired with an operator other than
	/// `=`/`is`/`<>`/`!=`/`is not`.
	pub fn where_<V: IntoOperand>(&mut self, column: &str, operator: &str, value: V) -> &mut Self {
		self.add_where(column, operator, value.into_operand(), Conjunction::And)
	}

	/// `or`-joined variant of [`where_`](Self::where_).
	pub fn or_where_<V: IntoOperand>(&mut self, column: &str, operator: &str, value: V) -> &mut Self {
		self.add_where(column, operator, value.into_operand(), Conjunction::Or)
	}

	/// Shorthand for an equality where.
	pub fn where_eq<V: IntoOperand>(&mut self, column: &str, value: V) -> &mut Self {
		self.where_(column, "=", value)
	}

	/// `or`-joined equality where.
	pub fn or_where_eq<V: IntoOperand>(&mut self, column: &str, value: V) -> &mut Self {
		self.or_where_(column, "=", value)
	}

	/// Negate a predicate group: `and not (...)`.
	pub fn where_not(&mut self, f: impl FnOnce(&mut Builder)) -> &mut Self {
		self.add_where_nested(f, Conjunction::AndNot)
	}

	/// Negate a predicate group joined with `or`: `or not (...)`.
	pub fn or_where_not(&mut self, f: impl FnOnce(&mut Builder)) -> &mut Self {
		self.add_where_nested(f, Conjunction::OrNot)
	}

	fn add_where_column(
		&mut self,
		first: &str,
		operator: &str,
		second: &str,
		conjunction: Conjunction,
	) -> &mut Self {
		let (operator, second) = if self.invalid_operator(operator) {
			("=".to_string(), operator.to_string())
		} else {
			(operator.to_lowercase(), second.to_string())
		};
		self.wheres.push(WhereClause::Column {
			conjunction,
			first: first.to_string(),
			operator,
			second,
		});
		self
	}

	/// Compare two columns.
	pub fn where_column(&mut self, first: &str, operator: &str, second: &str) -> &mut Self {
		self.add_where_column(first, operator, second, Conjunction::And)
	}

	/// `or`-joined column comparison.
	pub fn or_where_column(&mut self, first: &str, operator: &str, second: &str) -> &mut Self {
		self.add_where_column(first, operator, second, Conjunction::Or)
	}

	/// Shorthand for an equality column comparison.
	pub fn where_column_eq(&mut self, first: &str, second: &str) -> &mut Self {
		self.where_column(first, "=", second)
	}

	fn add_where_in<V: IntoOperand, I: IntoIterator<Item = V>>(
		&mut self,
		column: &str,
		values: I,
		conjunction: Conjunction,
		not: bool,
	) -> &mut Self {
		let values: Vec<Operand> = values.into_iter().map(IntoOperand::into_operand).collect();
		for operand in &values {
			if let Operand::Value(v) = operand {
				self.bindings.where_.push(v.clone());
			}
		}
		self.wheres.push(WhereClause::In {
			conjunction,
			column: column.to_string(),
			values,
			not,
		});
		self
	}

	/// `column in (?, ...)`. An empty list compiles to the always-false
	/// tautology `0 = 1` and adds no binding.
	pub fn where_in<V: IntoOperand, I: IntoIterator<Item = V>>(
		&mut self,
		column: &str,
		values: I,
	) -> &mut Self {
		self.add_where_in(column, values, Conjunction::And, false)
	}

	/// `column not in (?, ...)`. An empty list compiles to `1 = 1`.
	pub fn where_not_in<V: IntoOperand, I: IntoIterator<Item = V>>(
		&mut self,
		column: &str,
		values: I,
	) -> &mut Self {
		self.add_where_in(column, values, Conjunction::And, true)
	}

	/// `or`-joined [`where_in`](Self::where_in).
	pub fn or_where_in<V: IntoOperand, I: IntoIterator<Item = V>>(
		&mut self,
		column: &str,
		values: I,
	) -> &mut Self {
		self.add_where_in(column, values, Conjunction::Or, false)
	}

	/// `or`-joined [`where_not_in`](Self::where_not_in).
	pub fn or_where_not_in<V: IntoOperand, I: IntoIterator<Item = V>>(
		&mut self,
		column: &str,
		values: I,
	) -> &mut Self {
		self.add_where_in(column, values, Conjunction::Or, true)
	}

	fn add_where_in_sub(
		&mut self,
		column: &str,
		f: impl FnOnce(&mut Builder),
		conjunction: Conjunction,
		not: bool,
	) -> &mut Self {
		let mut sub = self.new_query();
		f(&mut sub);
		self.bindings.where_.extend(sub.get_bindings());
		self.wheres.push(WhereClause::InSub {
			conjunction,
			column: column.to_string(),
			query: Box::new(sub),
			not,
		});
		self
	}

	/// `column in (subselect)`.
	pub fn where_in_sub(&mut self, column: &str, f: impl FnOnce(&mut Builder)) -> &mut Self {
		self.add_where_in_sub(column, f, Conjunction::And, false)
	}

	/// `column not in (subselect)`.
	pub fn where_not_in_sub(&mut self, column: &str, f: impl FnOnce(&mut Builder)) -> &mut Self {
		self.add_where_in_sub(column, f, Conjunction::And, true)
	}

	/// `column in (1, 2, 3)` with inline, unparameterized integers.
	pub fn where_integer_in_raw(&mut self, column: &str, values: &[i64]) -> &mut Self {
		self.wheres.push(WhereClause::InRaw {
			conjunction: Conjunction::And,
			column: column.to_string(),
			values: values.to_vec(),
			not: false,
		});
		self
	}

	/// `column not in (1, 2, 3)` with inline integers.
	pub fn where_integer_not_in_raw(&mut self, column: &str, values: &[i64]) -> &mut Self {
		self.wheres.push(WhereClause::InRaw {
			conjunction: Conjunction::And,
			column: column.to_string(),
			values: values.to_vec(),
			not: true,
		});
		self
	}

	fn add_where_null(&mut self, columns: &[&str], conjunction: Conjunction, not: bool) -> &mut Self {
		for column in columns {
			self.wheres.push(WhereClause::Null {
				conjunction,
				column: (*column).to_string(),
				not,
			});
		}
		self
	}

	/// `column is null`.
	pub fn where_null(&mut self, column: &str) -> &mut Self {
		self.add_where_null(&[column], Conjunction::And, false)
	}

	/// `column is not null`.
	pub fn where_not_null(&mut self, column: &str) -> &mut Self {
		self.add_where_null(&[column], Conjunction::And, true)
	}

	/// `or`-joined null check.
	pub fn or_where_null(&mut self, column: &str) -> &mut Self {
		self.add_where_null(&[column], Conjunction::Or, false)
	}

	/// `or`-joined not-null check.
	pub fn or_where_not_null(&mut self, column: &str) -> &mut Self {
		self.add_where_null(&[column], Conjunction::Or, true)
	}

	/// Null checks over several columns at once.
	pub fn where_null_columns(&mut self, columns: &[&str]) -> &mut Self {
		self.add_where_null(columns, Conjunction::And, false)
	}

	/// Not-null checks over several columns at once.
	pub fn where_not_null_columns(&mut self, columns: &[&str]) -> &mut Self {
		self.add_where_null(columns, Conjunction::And, true)
	}

	fn add_where_between<V: IntoOperand>(
		&mut self,
		column: &str,
		low: V,
		high: V,
		conjunction: Conjunction,
		not: bool,
	) -> &mut Self {
		let low = low.into_operand();
		let high = high.into_operand();
		for operand in [&low, &high] {
			if let Operand::Value(v) = operand {
				self.bindings.where_.push(v.clone());
			}
		}
		self.wheres.push(WhereClause::Between {
			conjunction,
			column: column.to_string(),
			low,
			high,
			not,
		});
		self
	}

	/// `column between ? and ?`.
	pub fn where_between<V: IntoOperand>(&mut self, column: &str, low: V, high: V) -> &mut Self {
		self.add_where_between(column, low, high, Conjunction::And, false)
	}

	/// `column not between ? and ?`.
	pub fn where_not_between<V: IntoOperand>(&mut self, column: &str, low: V, high: V) -> &mut Self {
		self.add_where_between(column, low, high, Conjunction::And, true)
	}

	/// `or`-joined between.
	pub fn or_where_between<V: IntoOperand>(&mut self, column: &str, low: V, high: V) -> &mut Self {
		self.add_where_between(column, low, high, Conjunction::Or, false)
	}

	/// `or`-joined not-between.
	pub fn or_where_not_between<V: IntoOperand>(
		&mut self,
		column: &str,
		low: V,
		high: V,
	) -> &mut Self {
		self.add_where_between(column, low, high, Conjunction::Or, true)
	}

	/// `column between low_column and high_column`.
	pub fn where_between_columns(&mut self, column: &str, low: &str, high: &str) -> &mut Self {
		self.wheres.push(WhereClause::BetweenColumns {
			conjunction: Conjunction::And,
			column: column.to_string(),
			low: low.to_string(),
			high: high.to_string(),
			not: false,
		});
		self
	}

	/// `column not between low_column and high_column`.
	pub fn where_not_between_columns(&mut self, column: &str, low: &str, high: &str) -> &mut Self {
		self.wheres.push(WhereClause::BetweenColumns {
			conjunction: Conjunction::And,
			column: column.to_string(),
			low: low.to_string(),
			high: high.to_string(),
			not: true,
		});
		self
	}

	fn add_where_exists(
		&mut self,
		f: impl FnOnce(&mut Builder),
		conjunction: Conjunction,
		not: bool,
	) -> &mut Self {
		let mut sub = self.new_query();
		f(&mut sub);
		self.bindings.where_.extend(sub.get_bindings());
		self.wheres.push(WhereClause::Exists {
			conjunction,
			query: Box::new(sub),
			not,
		});
		self
	}

	/// `exists (subselect)`.
	pub fn where_exists(&mut self, f: impl FnOnce(&mut Builder)) -> &mut Self {
		self.add_where_exists(f, Conjunction::And, false)
	}

	/// `not exists (subselect)`.
	pub fn where_not_exists(&mut self, f: impl FnOnce(&mut Builder)) -> &mut Self {
		self.add_where_exists(f, Conjunction::And, true)
	}

	/// `or`-joined exists.
	pub fn or_where_exists(&mut self, f: impl FnOnce(&mut Builder)) -> &mut Self {
		self.add_where_exists(f, Conjunction::Or, false)
	}

	/// `or`-joined not-exists.
	pub fn or_where_not_exists(&mut self, f: impl FnOnce(&mut Builder)) -> &mut Self {
		self.add_where_exists(f, Conjunction::Or, true)
	}

	fn add_where_nested(&mut self, f: impl FnOnce(&mut Builder), conjunction: Conjunction) -> &mut Self {
		let mut sub = self.new_query();
		f(&mut sub);
		// An empty group is elided, not rendered as `()`.
		if !sub.wheres.is_empty() {
			self.bindings.where_.extend(sub.bindings.where_.iter().cloned());
			self.wheres.push(WhereClause::Nested {
				conjunction,
				query: Box::new(sub),
			});
		}
		self
	}

	/// A parenthesized `and`-joined predicate group. Elided when the
	/// closure adds no predicates.
	pub fn where_nested(&mut self, f: impl FnOnce(&mut Builder)) -> &mut Self {
		self.add_where_nested(f, Conjunction::And)
	}

	/// `or`-joined predicate group.
	pub fn or_where_nested(&mut self, f: impl FnOnce(&mut Builder)) -> &mut Self {
		self.add_where_nested(f, Conjunction::Or)
	}

	/// Compare a column against a correlated subquery:
	/// `column operator (subselect)`.
	pub fn where_sub(
		&mut self,
		column: &str,
		operator: &str,
		f: impl FnOnce(&mut Builder),
	) -> &mut Self {
		let mut sub = self.new_query();
		f(&mut sub);
		self.bindings.where_.extend(sub.get_bindings());
		self.wheres.push(WhereClause::Sub {
			conjunction: Conjunction::And,
			column: column.to_string(),
			operator: operator.to_lowercase(),
			query: Box::new(sub),
		});
		self
	}

	/// Row-value comparison: `(col1, col2) < (?, ?)`.
	///
	/// # Panics
	///
	/// Panics when the column count and the value count differ.
	pub fn where_row_values(
		&mut self,
		columns: &[&str],
		operator: &str,
		values: Vec<Value>,
	) -> &mut Self {
		assert!(
			columns.len() == values.len(),
			"the number of columns must match the number of values"
		);
		self.bindings.where_.extend(values.iter().cloned());
		self.wheres.push(WhereClause::RowValues {
			conjunction: Conjunction::And,
			columns: columns.iter().map(|c| (*c).to_string()).collect(),
			operator: operator.to_lowercase(),
			values,
		});
		self
	}

	/// A literal predicate with its own bindings.
	pub fn where_raw(&mut self, sql: &str, bindings: Vec<Value>) -> &mut Self {
		self.bindings.where_.extend(bindings);
		self.wheres.push(WhereClause::Raw {
			conjunction: Conjunction::And,
			sql: sql.to_string(),
		});
		self
	}

	/// `or`-joined raw predicate.
	pub fn or_where_raw(&mut self, sql: &str, bindings: Vec<Value>) -> &mut Self {
		self.bindings.where_.extend(bindings);
		self.wheres.push(WhereClause::Raw {
			conjunction: Conjunction::Or,
			sql: sql.to_string(),
		});
		self
	}

	/// A raw fragment standing alone as a predicate, with no bindings.
	pub fn where_expr(&mut self, expr: Expr) -> &mut Self {
		self.wheres.push(WhereClause::Expression {
			conjunction: Conjunction::And,
			expr,
		});
		self
	}

	// ---------------------------------------------------------------------
	// Date-based wheres
	// ---------------------------------------------------------------------

	fn add_date_based<V: Into<Value>>(
		&mut self,
		kind: DateKind,
		column: &str,
		operator: &str,
		value: V,
		conjunction: Conjunction,
	) -> &mut Self {
		let (operator, value) = if self.invalid_operator(operator) {
			("=".to_string(), Value::from(operator))
		} else {
			(operator.to_lowercase(), value.into())
		};
		self.bindings.where_.push(value);
		self.wheres.push(WhereClause::DateBased {
			conjunction,
			kind,
			column: column.to_string(),
			operator,
		});
		self
	}

	/// Compare the date part of a column.
	pub fn where_date<V: Into<Value>>(&mut self, column: &str, operator: &str, value: V) -> &mut Self {
		self.add_date_based(DateKind::Date, column, operator, value, Conjunction::And)
	}

	/// `or`-joined date comparison.
	pub fn or_where_date<V: Into<Value>>(&mut self, column: &str, operator: &str, value: V) -> &mut Self {
		self.add_date_based(DateKind::Date, column, operator, value, Conjunction::Or)
	}

	/// Compare the time part of a column.
	pub fn where_time<V: Into<Value>>(&mut self, column: &str, operator: &str, value: V) -> &mut Self {
		self.add_date_based(DateKind::Time, column, operator, value, Conjunction::And)
	}

	/// `or`-joined time comparison.
	pub fn or_where_time<V: Into<Value>>(&mut self, column: &str, operator: &str, value: V) -> &mut Self {
		self.add_date_based(DateKind::Time, column, operator, value, Conjunction::Or)
	}

	/// Compare the day-of-month of a column.
	pub fn where_day<V: Into<Value>>(&mut self, column: &str, operator: &str, value: V) -> &mut Self {
		self.add_date_based(DateKind::Day, column, operator, value, Conjunction::And)
	}

	/// `or`-joined day comparison.
	pub fn or_where_day<V: Into<Value>>(&mut self, column: &str, operator: &str, value: V) -> &mut Self {
		self.add_date_based(DateKind::Day, column, operator, value, Conjunction::Or)
	}

	/// Compare the month of a column.
	pub fn where_month<V: Into<Value>>(&mut self, column: &str, operator: &str, value: V) -> &mut Self {
		self.add_date_based(DateKind::Month, column, operator, value, Conjunction::And)
	}

	/// `or`-joined month comparison.
	pub fn or_where_month<V: Into<Value>>(&mut self, column: &str, operator: &str, value: V) -> &mut Self {
		self.add_date_based(DateKind::Month, column, operator, value, Conjunction::Or)
	}

	/// Compare the year of a column.
	pub fn where_year<V: Into<Value>>(&mut self, column: &str, operator: &str, value: V) -> &mut Self {
		self.add_date_based(DateKind::Year, column, operator, value, Conjunction::And)
	}

	/// `or`-joined year comparison.
	pub fn or_where_year<V: Into<Value>>(&mut self, column: &str, operator: &str, value: V) -> &mut Self {
		self.add_date_based(DateKind::Year, column, operator, value, Conjunction::Or)
	}

	// ---------------------------------------------------------------------
	// Fulltext and JSON wheres
	// ---------------------------------------------------------------------

	/// Full-text search over one or more columns.
	pub fn where_fulltext(&mut self, columns: &[&str], value: &str) -> &mut Self {
		self.bindings.where_.push(Value::from(value));
		self.wheres.push(WhereClause::Fulltext {
			conjunction: Conjunction::And,
			columns: columns.iter().map(|c| (*c).to_string()).collect(),
		});
		self
	}

	/// `or`-joined full-text search.
	pub fn or_where_fulltext(&mut self, columns: &[&str], value: &str) -> &mut Self {
		self.bindings.where_.push(Value::from(value));
		self.wheres.push(WhereClause::Fulltext {
			conjunction: Conjunction::Or,
			columns: columns.iter().map(|c| (*c).to_string()).collect(),
		});
		self
	}

	/// JSON containment: the bound value is contained at the column path.
	pub fn where_json_contains<V: Into<Value>>(&mut self, column: &str, value: V) -> &mut Self {
		self.bindings.where_.push(value.into());
		self.wheres.push(WhereClause::JsonContains {
			conjunction: Conjunction::And,
			column: column.to_string(),
			not: false,
		});
		self
	}

	/// Negated JSON containment.
	pub fn where_json_doesnt_contain<V: Into<Value>>(&mut self, column: &str, value: V) -> &mut Self {
		self.bindings.where_.push(value.into());
		self.wheres.push(WhereClause::JsonContains {
			conjunction: Conjunction::And,
			column: column.to_string(),
			not: true,
		});
		self
	}

	/// JSON key existence at the column path.
	pub fn where_json_contains_key(&mut self, column: &str) -> &mut Self {
		self.wheres.push(WhereClause::JsonContainsKey {
			conjunction: Conjunction::And,
			column: column.to_string(),
			not: false,
		});
		self
	}

	/// Negated JSON key existence.
	pub fn where_json_doesnt_contain_key(&mut self, column: &str) -> &mut Self {
		self.wheres.push(WhereClause::JsonContainsKey {
			conjunction: Conjunction::And,
			column: column.to_string(),
			not: true,
		});
		self
	}

	/// Compare the length of the JSON array at the column path.
	pub fn where_json_length<V: Into<Value>>(
		&mut self,
		column: &str,
		operator: &str,
		value: V,
	) -> &mut Self {
		let (operator, value) = if self.invalid_operator(operator) {
			("=".to_string(), Value::from(operator))
		} else {
			(operator.to_lowercase(), value.into())
		};
		self.bindings.where_.push(value);
		self.wheres.push(WhereClause::JsonLength {
			conjunction: Conjunction::And,
			column: column.to_string(),
			operator,
		});
		self
	}

	// ---------------------------------------------------------------------
	// Groups and havings
	// ---------------------------------------------------------------------

	/// Append group-by keys.
	pub fn group_by(&mut self, columns: &[&str]) -> &mut Self {
		for column in columns {
			self.groups.push(Projection::Column((*column).to_string()));
		}
		self
	}

	/// Append a raw group-by fragment with its bindings.
	pub fn group_by_raw(&mut self, sql: &str, bindings: Vec<Value>) -> &mut Self {
		self.groups.push(Projection::Raw(Expr::new(sql)));
		self.bindings.group_by.extend(bindings);
		self
	}

	fn add_having<V: IntoOperand>(
		&mut self,
		column: &str,
		operator: &str,
		value: V,
		conjunction: Conjunction,
	) -> &mut Self {
		let (operator, value) = if self.invalid_operator(operator) {
			("=".to_string(), Operand::Value(Value::from(operator)))
		} else {
			(operator.to_lowercase(), value.into_operand())
		};
		if let Operand::Value(v) = &value {
			self.bindings.having.push(v.clone());
		}
		let bitwise = self
			.dialect
			.grammar()
			.bitwise_operators()
			.contains(&operator.as_str());
		let clause = if bitwise {
			HavingClause::Bitwise {
				conjunction,
				column: column.to_string(),
				operator,
				value,
			}
		} else {
			HavingClause::Basic {
				conjunction,
				column: column.to_string(),
				operator,
				value,
			}
		};
		self.havings.push(clause);
		self
	}

	/// Add an `and`-joined having.
	pub fn having<V: IntoOperand>(&mut self, column: &str, operator: &str, value: V) -> &mut Self {
		self.add_having(column, operator, value, Conjunction::And)
	}

	/// `or`-joined having.
	pub fn or_having<V: IntoOperand>(&mut self, column: &str, operator: &str, value: V) -> &mut Self {
		self.add_having(column, operator, value, Conjunction::Or)
	}

	/// A literal having predicate with its own bindings.
	pub fn having_raw(&mut self, sql: &str, bindings: Vec<Value>) -> &mut Self {
		self.bindings.having.extend(bindings);
		self.havings.push(HavingClause::Raw {
			conjunction: Conjunction::And,
			sql: sql.to_string(),
		});
		self
	}

	/// `or`-joined raw having.
	pub fn or_having_raw(&mut self, sql: &str, bindings: Vec<Value>) -> &mut Self {
		self.bindings.having.extend(bindings);
		self.havings.push(HavingClause::Raw {
			conjunction: Conjunction::Or,
			sql: sql.to_string(),
		});
		self
	}

	/// A raw fragment standing alone as a having-predicate, with no
	/// bindings.
	pub fn having_expr(&mut self, expr: Expr) -> &mut Self {
		self.havings.push(HavingClause::Expression {
			conjunction: Conjunction::And,
			expr,
		});
		self
	}

	/// `having column is null`.
	pub fn having_null(&mut self, column: &str) -> &mut Self {
		self.havings.push(HavingClause::Null {
			conjunction: Conjunction::And,
			column: column.to_string(),
			not: false,
		});
		self
	}

	/// `having column is not null`.
	pub fn having_not_null(&mut self, column: &str) -> &mut Self {
		self.havings.push(HavingClause::Null {
			conjunction: Conjunction::And,
			column: column.to_string(),
			not: true,
		});
		self
	}

	/// `having column between ? and ?`.
	pub fn having_between<V: Into<Value>>(&mut self, column: &str, low: V, high: V) -> &mut Self {
		self.bindings.having.push(low.into());
		self.bindings.having.push(high.into());
		self.havings.push(HavingClause::Between {
			conjunction: Conjunction::And,
			column: column.to_string(),
			not: false,
		});
		self
	}

	/// A parenthesized having group. Elided when empty.
	pub fn having_nested(&mut self, f: impl FnOnce(&mut Builder)) -> &mut Self {
		let mut sub = self.new_query();
		f(&mut sub);
		if !sub.havings.is_empty() {
			self.bindings.having.extend(sub.bindings.having.iter().cloned());
			self.havings.push(HavingClause::Nested {
				conjunction: Conjunction::And,
				query: Box::new(sub),
			});
		}
		self
	}

	// ---------------------------------------------------------------------
	// Orders, limit, offset
	// ---------------------------------------------------------------------

	fn add_order(&mut self, order: Order) -> &mut Self {
		match self.union_state {
			UnionState::Standalone => self.orders.push(order),
			UnionState::Unioned => self.union_orders.push(order),
		}
		self
	}

	/// Order ascending by a column. Routes to the union-side order list
	/// once a union branch exists.
	pub fn order_by(&mut self, column: &str) -> &mut Self {
		self.add_order(Order::Column {
			column: column.to_string(),
			direction: Direction::Asc,
		})
	}

	/// Order descending by a column.
	pub fn order_by_desc(&mut self, column: &str) -> &mut Self {
		self.add_order(Order::Column {
			column: column.to_string(),
			direction: Direction::Desc,
		})
	}

	/// Append a raw order fragment with its bindings.
	pub fn order_by_raw(&mut self, sql: &str, bindings: Vec<Value>) -> &mut Self {
		match self.union_state {
			UnionState::Standalone => self.bindings.order.extend(bindings),
			UnionState::Unioned => self.bindings.union_order.extend(bindings),
		}
		self.add_order(Order::Raw(Expr::new(sql)))
	}

	/// Newest first by the given column.
	pub fn latest(&mut self, column: &str) -> &mut Self {
		self.order_by_desc(column)
	}

	/// Oldest first by the given column.
	pub fn oldest(&mut self, column: &str) -> &mut Self {
		self.order_by(column)
	}

	/// Order randomly using the dialect's random function. The seed is
	/// only honored by dialects whose function accepts one.
	pub fn in_random_order(&mut self, seed: &str) -> &mut Self {
		let random = self.dialect.grammar().compile_random(seed);
		self.order_by_raw(&random, Vec::new())
	}

	/// Drop all ordering state, both normal and union-side, including
	/// order bindings.
	pub fn reorder(&mut self) -> &mut Self {
		self.orders.clear();
		self.union_orders.clear();
		self.bindings.clear(BindingKind::Order);
		self.bindings.clear(BindingKind::UnionOrder);
		self
	}

	/// Limit the result rows. Routes to the union-side limit once a union
	/// branch exists.
	pub fn limit(&mut self, limit: u64) -> &mut Self {
		match self.union_state {
			UnionState::Standalone => self.limit = Some(limit),
			UnionState::Unioned => self.union_limit = Some(limit),
		}
		self
	}

	/// Alias for [`limit`](Self::limit).
	pub fn take(&mut self, limit: u64) -> &mut Self {
		self.limit(limit)
	}

	/// Skip result rows. Routes to the union-side offset once a union
	/// branch exists.
	pub fn offset(&mut self, offset: u64) -> &mut Self {
		match self.union_state {
			UnionState::Standalone => self.offset = Some(offset),
			UnionState::Unioned => self.union_offset = Some(offset),
		}
		self
	}

	/// Alias for [`offset`](Self::offset).
	pub fn skip(&mut self, offset: u64) -> &mut Self {
		self.offset(offset)
	}

	/// Limit and offset for one page of results. Pages are 1-based.
	pub fn for_page(&mut self, page: u64, per_page: u64) -> &mut Self {
		self.offset(page.saturating_sub(1) * per_page).limit(per_page)
	}

	// ---------------------------------------------------------------------
	// Unions
	// ---------------------------------------------------------------------

	fn add_union(&mut self, query: Builder, all: bool) -> &mut Self {
		self.bindings.union.extend(query.get_bindings());
		self.unions.push(Union {
			query: Box::new(query),
			all,
		});
		self.union_state = UnionState::Unioned;
		self
	}

	/// Append a `union` branch. Subsequent orders/limit/offset apply to
	/// the combined result.
	pub fn union(&mut self, query: Builder) -> &mut Self {
		self.add_union(query, false)
	}

	/// Append a `union all` branch.
	pub fn union_all(&mut self, query: Builder) -> &mut Self {
		self.add_union(query, true)
	}

	// ---------------------------------------------------------------------
	// Locks and index hints
	// ---------------------------------------------------------------------

	/// Store a literal lock clause, rendered as-is by dialects that honor
	/// string locks.
	pub fn lock(&mut self, clause: &str) -> &mut Self {
		self.lock = Some(Lock::Raw(clause.to_string()));
		self
	}

	/// Request an exclusive row lock.
	pub fn lock_for_update(&mut self) -> &mut Self {
		self.lock = Some(Lock::Update);
		self
	}

	/// Request a shared row lock.
	pub fn shared_lock(&mut self) -> &mut Self {
		self.lock = Some(Lock::Shared);
		self
	}

	/// Suggest an index to the planner.
	pub fn use_index(&mut self, index: &str) -> &mut Self {
		self.index_hint = Some(IndexHint::new(IndexHintKind::Use, index));
		self
	}

	/// Force an index.
	pub fn force_index(&mut self, index: &str) -> &mut Self {
		self.index_hint = Some(IndexHint::new(IndexHintKind::Force, index));
		self
	}

	/// Ignore an index.
	pub fn ignore_index(&mut self, index: &str) -> &mut Self {
		self.index_hint = Some(IndexHint::new(IndexHintKind::Ignore, index));
		self
	}

	// ---------------------------------------------------------------------
	// Cloning
	// ---------------------------------------------------------------------

	/// Deep copy with the named parts reset, for building derivative
	/// queries (count probes, pagination) without mutating the original.
	#[must_use]
	pub fn clone_without(&self, parts: &[QueryPart]) -> Self {
		let mut clone = self.clone();
		for part in parts {
			match part {
				QueryPart::Aggregate => clone.aggregate = None,
				QueryPart::Columns => clone.columns.clear(),
				QueryPart::From => clone.from = None,
				QueryPart::IndexHint => clone.index_hint = None,
				QueryPart::Joins => clone.joins.clear(),
				QueryPart::Wheres => clone.wheres.clear(),
				QueryPart::Groups => clone.groups.clear(),
				QueryPart::Havings => clone.havings.clear(),
				QueryPart::Orders => clone.orders.clear(),
				QueryPart::Limit => clone.limit = None,
				QueryPart::Offset => clone.offset = None,
				QueryPart::Unions => {
					clone.unions.clear();
					clone.union_limit = None;
					clone.union_offset = None;
				}
				QueryPart::UnionOrders => clone.union_orders.clear(),
				QueryPart::Lock => clone.lock = None,
			}
		}
		clone
	}

	/// Deep copy with the named binding buckets emptied.
	#[must_use]
	pub fn clone_without_bindings(&self, buckets: &[BindingKind]) -> Self {
		let mut clone = self.clone();
		for bucket in buckets {
			clone.bindings.clear(*bucket);
		}
		clone
	}

	// ---------------------------------------------------------------------
	// Compilation
	// ---------------------------------------------------------------------

	/// Register a callback run exactly once, immediately before the first
	/// compilation.
	pub fn before_query(&mut self, callback: impl Fn(&mut Builder) + Send + Sync + 'static) -> &mut Self {
		self.before_query.push(Arc::new(callback));
		self
	}

	/// Run and clear the registered pre-compilation callbacks.
	pub fn apply_before_query_callbacks(&mut self) {
		let callbacks = std::mem::take(&mut self.before_query);
		for callback in &callbacks {
			callback(self);
		}
	}

	/// Compile the select statement.
	pub fn to_sql(&mut self) -> Result<String> {
		self.apply_before_query_callbacks();
		let sql = self.dialect.grammar().compile_select(self)?;
		tracing::debug!(
			dialect = self.dialect.grammar().name(),
			bindings = self.get_bindings().len(),
			sql = %sql,
			"compiled select statement"
		);
		Ok(sql)
	}

	/// The binding buckets flattened in clause order.
	#[must_use]
	pub fn get_bindings(&self) -> Values {
		self.bindings.flatten()
	}

	/// Compile the select statement together with its ordered bindings.
	pub fn build(&mut self) -> Result<(String, Values)> {
		let sql = self.to_sql()?;
		Ok((sql, self.get_bindings()))
	}

	/// Compile an insert of one or more rows.
	///
	/// Column order is taken from the first row; rows missing a column
	/// bind null for it. An empty row set compiles to
	/// `insert into t default values`.
	pub fn insert_sql(&mut self, rows: &[Vec<(&str, Value)>]) -> Result<(String, Values)> {
		self.apply_before_query_callbacks();
		let (columns, row_values) = normalize_rows(rows);
		let sql = self.dialect.grammar().compile_insert(self, &columns, &row_values)?;
		let bindings = Values(row_values.into_iter().flatten().collect());
		tracing::debug!(
			dialect = self.dialect.grammar().name(),
			bindings = bindings.len(),
			sql = %sql,
			"compiled insert statement"
		);
		Ok((sql, bindings))
	}

	/// Compile an insert that skips conflicting rows instead of failing.
	/// Unsupported on SQL Server.
	pub fn insert_or_ignore_sql(&mut self, rows: &[Vec<(&str, Value)>]) -> Result<(String, Values)> {
		self.apply_before_query_callbacks();
		let (columns, row_values) = normalize_rows(rows);
		let sql = self
			.dialect
			.grammar()
			.compile_insert_or_ignore(self, &columns, &row_values)?;
		let bindings = Values(row_values.into_iter().flatten().collect());
		Ok((sql, bindings))
	}

	/// Compile `insert into ... select ...` from another builder.
	pub fn insert_using_sql(
		&mut self,
		columns: &[&str],
		mut source: Builder,
	) -> Result<(String, Values)> {
		self.apply_before_query_callbacks();
		let select = source.to_sql()?;
		let columns: Vec<String> = columns.iter().map(|c| (*c).to_string()).collect();
		let sql = self.dialect.grammar().compile_insert_using(self, &columns, &select)?;
		Ok((sql, source.get_bindings()))
	}

	/// Compile an upsert: insert the rows, updating the listed columns on
	/// a uniqueness conflict over `unique_by`.
	pub fn upsert_sql(
		&mut self,
		rows: &[Vec<(&str, Value)>],
		unique_by: &[&str],
		update: &[UpsertUpdate],
	) -> Result<(String, Values)> {
		self.apply_before_query_callbacks();
		if rows.is_empty() {
			return Err(crate::error::Error::EmptyUpsertValues);
		}
		if unique_by.is_empty() {
			return Err(crate::error::Error::MissingUniqueBy);
		}
		let (columns, row_values) = normalize_rows(rows);
		let unique_by: Vec<String> = unique_by.iter().map(|c| (*c).to_string()).collect();
		let sql = self
			.dialect
			.grammar()
			.compile_upsert(self, &columns, &row_values, &unique_by, update)?;
		let mut bindings = Values(row_values.into_iter().flatten().collect());
		for assignment in update {
			if let UpsertUpdate::Assign(_, value) = assignment {
				bindings.push(value.clone());
			}
		}
		Ok((sql, bindings))
	}

	/// Compile an update of the accumulated query state.
	pub fn update_sql(&mut self, values: &[(&str, Value)]) -> Result<(String, Values)> {
		self.apply_before_query_callbacks();
		let values: Vec<(String, Value)> =
			values.iter().map(|(c, v)| ((*c).to_string(), v.clone())).collect();
		let sql = self.dialect.grammar().compile_update(self, &values)?;
		let set_values: Vec<Value> = values.into_iter().map(|(_, v)| v).collect();
		let bindings = self
			.dialect
			.grammar()
			.prepare_bindings_for_update(&self.bindings, &set_values);
		tracing::debug!(
			dialect = self.dialect.grammar().name(),
			bindings = bindings.len(),
			sql = %sql,
			"compiled update statement"
		);
		Ok((sql, bindings))
	}

	/// Compile a delete of the accumulated query state.
	pub fn delete_sql(&mut self) -> Result<(String, Values)> {
		self.apply_before_query_callbacks();
		let sql = self.dialect.grammar().compile_delete(self)?;
		let bindings = self.dialect.grammar().prepare_bindings_for_delete(&self.bindings);
		Ok((sql, bindings))
	}
}

impl fmt::Debug for Builder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Builder")
			.field("dialect", &self.dialect)
			.field("aggregate", &self.aggregate)
			.field("columns", &self.columns)
			.field("distinct", &self.distinct)
			.field("from", &self.from)
			.field("index_hint", &self.index_hint)
			.field("joins", &self.joins)
			.field("wheres", &self.wheres)
			.field("groups", &self.groups)
			.field("havings", &self.havings)
			.field("orders", &self.orders)
			.field("limit", &self.limit)
			.field("offset", &self.offset)
			.field("unions", &self.unions)
			.field("union_orders", &self.union_orders)
			.field("union_limit", &self.union_limit)
			.field("union_offset", &self.union_offset)
			.field("lock", &self.lock)
			.field("union_state", &self.union_state)
			.field("bindings", &self.bindings)
			.field("before_query", &self.before_query.len())
			.finish()
	}
}

/// Normalize keyed rows into a column list (first-row order) and per-row
/// value vectors aligned to it.
fn normalize_rows(rows: &[Vec<(&str, Value)>]) -> (Vec<String>, Vec<Vec<Value>>) {
	let Some(first) = rows.first() else {
		return (Vec::new(), Vec::new());
	};
	let columns: Vec<String> = first.iter().map(|(c, _)| (*c).to_string()).collect();
	let row_values = rows
		.iter()
		.map(|row| {
			columns
				.iter()
				.map(|column| {
					row.iter()
						.find(|(c, _)| *c == column.as_str())
						.map(|(_, v)| v.clone())
						.unwrap_or_else(Value::null)
				})
				.collect()
		})
		.collect();
	(columns, row_values)
}
