//! SQL compilation.
//!
//! [`Grammar`] carries the dialect-independent compilation algorithm as
//! default methods; each dialect overrides only the concerns its SQL
//! differs on (quoting, locking, pagination, JSON paths, upserts, ...).
//! Compilation only ever reads builder state: bindings are produced during
//! construction and merely flattened afterwards, so clause order and
//! bucket order agree by construction.

mod mysql;
mod postgres;
mod sqlite;
mod sqlserver;

#[cfg(test)]
mod tests;

pub use mysql::MySqlGrammar;
pub use postgres::PostgresGrammar;
pub use sqlite::SqliteGrammar;
pub use sqlserver::SqlServerGrammar;

use crate::builder::clause::{
	Aggregate, BindingKind, Bindings, HavingClause, Operand, Order, Projection, TableRef,
	WhereClause,
};
use crate::builder::join::JoinClause;
use crate::builder::{Builder, UpsertUpdate};
use crate::error::{Error, Result};
use crate::types::{DateKind, IndexHint, Lock};
use crate::value::{Value, Values};

/// Operators every grammar understands.
pub const BASE_OPERATORS: &[&str] = &[
	"=", "<", ">", "<=", ">=", "<>", "!=", "<=>",
	"like", "like binary", "not like", "ilike",
	"&", "|", "^", "<<", ">>", "&~", "is", "is not",
	"rlike", "not rlike", "regexp", "not regexp",
	"~", "~*", "!~", "!~*", "similar to", "not similar to", "not ilike", "~~*", "!~~*",
];

/// Bitwise operators recognized by the base grammar.
pub const BASE_BITWISE_OPERATORS: &[&str] = &["&", "|", "^", "<<", ">>", "&~"];

/// One independently compiled part of a select statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectComponent {
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
	Lock,
}

const BASE_SELECT_COMPONENTS: &[SelectComponent] = &[
	SelectComponent::Aggregate,
	SelectComponent::Columns,
	SelectComponent::From,
	SelectComponent::IndexHint,
	SelectComponent::Joins,
	SelectComponent::Wheres,
	SelectComponent::Groups,
	SelectComponent::Havings,
	SelectComponent::Orders,
	SelectComponent::Limit,
	SelectComponent::Offset,
	SelectComponent::Lock,
];

/// Remove a single `and ` / `or ` at the start of a compiled predicate
/// list. Anchored: a boolean keyword inside a raw fragment further along
/// is never touched.
pub(crate) fn strip_leading_boolean(sql: &str) -> String {
	if let Some(rest) = sql.strip_prefix("and ") {
		rest.to_string()
	} else if let Some(rest) = sql.strip_prefix("or ") {
		rest.to_string()
	} else {
		sql.to_string()
	}
}

/// Split a `col->a->b` selector into the column and its path segments.
pub(crate) fn json_field_and_path(column: &str) -> (String, Vec<String>) {
	let mut parts = column.split("->").map(str::trim);
	let field = parts.next().unwrap_or_default().to_string();
	(field, parts.map(ToString::to_string).collect())
}

/// Render path segments as a SQL/JSON path literal: `'$."a"."b"'`.
pub(crate) fn json_path(segments: &[String]) -> String {
	let path = segments
		.iter()
		.map(|segment| format!("\"{segment}\""))
		.collect::<Vec<_>>()
		.join(".");
	format!("'$.{path}'")
}

/// A dialect compiler.
///
/// The default method bodies are the base grammar; dialect structs
/// override the subset of methods their SQL differs on.
pub trait Grammar: Send + Sync {
	/// Display name, used in error messages.
	fn name(&self) -> &'static str;

	/// Operators this dialect accepts beyond [`BASE_OPERATORS`].
	fn operators(&self) -> &'static [&'static str] {
		&[]
	}

	/// Operators recorded as bitwise comparisons.
	fn bitwise_operators(&self) -> &'static [&'static str] {
		BASE_BITWISE_OPERATORS
	}

	// ---------------------------------------------------------------------
	// Identifier wrapping and parameterization
	// ---------------------------------------------------------------------

	/// Quote a single identifier segment, doubling embedded quote
	/// characters.
	fn quote_identifier(&self, segment: &str) -> String {
		format!("\"{}\"", segment.replace('"', "\"\""))
	}

	/// Quote one segment, leaving `*` bare.
	fn wrap_segment(&self, segment: &str) -> String {
		if segment == "*" {
			"*".to_string()
		} else {
			self.quote_identifier(segment)
		}
	}

	/// Quote a dotted identifier segment by segment.
	fn wrap_segments(&self, identifier: &str) -> String {
		identifier
			.split('.')
			.map(|segment| self.wrap_segment(segment))
			.collect::<Vec<_>>()
			.join(".")
	}

	/// Wrap a column reference: handles ` as ` aliases and `->` JSON
	/// selectors before falling back to dotted quoting.
	fn wrap(&self, column: &str) -> Result<String> {
		if let Some((lhs, rhs)) = split_alias(column) {
			return Ok(format!("{} as {}", self.wrap(lhs)?, self.wrap_segment(rhs)));
		}
		if column.contains("->") {
			return self.wrap_json_selector(column);
		}
		Ok(self.wrap_segments(column))
	}

	/// Wrap the from-target.
	fn wrap_table(&self, table: &TableRef) -> String {
		match table {
			TableRef::Table(name) => {
				if let Some((lhs, rhs)) = split_alias(name) {
					format!("{} as {}", self.wrap_segments(lhs), self.wrap_segment(rhs))
				} else {
					self.wrap_segments(name)
				}
			}
			TableRef::Raw(expr) => expr.as_str().to_string(),
		}
	}

	/// Wrap a projection; raw fragments render verbatim.
	fn wrap_projection(&self, projection: &Projection) -> Result<String> {
		match projection {
			Projection::Column(column) => self.wrap(column),
			Projection::Raw(expr) => Ok(expr.as_str().to_string()),
		}
	}

	/// Comma-join wrapped projections.
	fn columnize(&self, columns: &[Projection]) -> Result<String> {
		let parts = columns
			.iter()
			.map(|column| self.wrap_projection(column))
			.collect::<Result<Vec<_>>>()?;
		Ok(parts.join(", "))
	}

	/// Comma-join wrapped column names.
	fn columnize_names(&self, columns: &[String]) -> Result<String> {
		let parts = columns
			.iter()
			.map(|column| self.wrap(column))
			.collect::<Result<Vec<_>>>()?;
		Ok(parts.join(", "))
	}

	/// Placeholder for one operand; raw fragments render inline.
	fn parameter(&self, operand: &Operand) -> String {
		match operand {
			Operand::Value(_) => "?".to_string(),
			Operand::Expr(expr) => expr.as_str().to_string(),
		}
	}

	/// Comma-join placeholders for a list of operands.
	fn parameterize(&self, operands: &[Operand]) -> String {
		operands
			.iter()
			.map(|operand| self.parameter(operand))
			.collect::<Vec<_>>()
			.join(", ")
	}

	// ---------------------------------------------------------------------
	// Select compilation
	// ---------------------------------------------------------------------

	/// Ordered component walk for a select statement.
	fn select_components(&self) -> &'static [SelectComponent] {
		BASE_SELECT_COMPONENTS
	}

	/// Compile a full select statement.
	fn compile_select(&self, query: &Builder) -> Result<String> {
		if query.aggregate.is_some() && !query.unions.is_empty() {
			return self.compile_union_aggregate(query);
		}
		let mut sql = self.compile_components(query)?;
		if !query.unions.is_empty() {
			sql = format!("{}{}", self.wrap_union(&sql), self.compile_unions(query)?);
		}
		Ok(sql.trim().to_string())
	}

	/// Compile each present, non-empty component and space-join the
	/// results in declared order.
	fn compile_components(&self, query: &Builder) -> Result<String> {
		let mut parts: Vec<String> = Vec::new();
		for component in self.select_components() {
			let sql = match component {
				SelectComponent::Aggregate => match &query.aggregate {
					Some(aggregate) => self.compile_aggregate(query, aggregate)?,
					None => String::new(),
				},
				SelectComponent::Columns => self.compile_columns(query)?,
				SelectComponent::From => self.compile_from(query)?,
				SelectComponent::IndexHint => match &query.index_hint {
					Some(hint) => self.compile_index_hint(query, hint)?,
					None => String::new(),
				},
				SelectComponent::Joins => self.compile_joins(&query.joins)?,
				SelectComponent::Wheres => self.compile_wheres(query)?,
				SelectComponent::Groups => self.compile_groups(query)?,
				SelectComponent::Havings => self.compile_havings(query)?,
				SelectComponent::Orders => self.compile_orders(query, &query.orders)?,
				SelectComponent::Limit => self.compile_limit(query)?,
				SelectComponent::Offset => self.compile_offset(query)?,
				SelectComponent::Lock => match &query.lock {
					Some(lock) => self.compile_lock(query, lock)?,
					None => String::new(),
				},
			};
			if !sql.is_empty() {
				parts.push(sql);
			}
		}
		Ok(parts.join(" "))
	}

	/// `select function(columns) as aggregate`.
	fn compile_aggregate(&self, query: &Builder, aggregate: &Aggregate) -> Result<String> {
		let mut column = self.columnize(&aggregate.columns)?;
		if query.distinct && column != "*" {
			column = format!("distinct {column}");
		}
		Ok(format!("select {}({}) as aggregate", aggregate.function, column))
	}

	/// `select [distinct ]columns`; empty state selects `*`. Suppressed
	/// when an aggregate is present.
	fn compile_columns(&self, query: &Builder) -> Result<String> {
		if query.aggregate.is_some() {
			return Ok(String::new());
		}
		let select = if query.distinct {
			"select distinct "
		} else {
			"select "
		};
		let columns = if query.columns.is_empty() {
			"*".to_string()
		} else {
			self.columnize(&query.columns)?
		};
		Ok(format!("{select}{columns}"))
	}

	/// `from table`.
	fn compile_from(&self, query: &Builder) -> Result<String> {
		Ok(match &query.from {
			Some(table) => format!("from {}", self.wrap_table(table)),
			None => String::new(),
		})
	}

	/// The from-table, required for statement compilation.
	fn query_table(&self, query: &Builder) -> Result<String> {
		let from = query.from.as_ref().ok_or(Error::MissingFrom)?;
		Ok(self.wrap_table(from))
	}

	/// Index hints are a dialect extension.
	fn compile_index_hint(&self, _query: &Builder, _hint: &IndexHint) -> Result<String> {
		Err(Error::unsupported(self.name(), "index hints"))
	}

	/// Compile the join list. A join whose predicate tree contains
	/// further joins compiles to a parenthesized table expression.
	fn compile_joins(&self, joins: &[JoinClause]) -> Result<String> {
		let mut parts = Vec::new();
		for join in joins {
			let table = self.wrap_table(&join.table);
			let table = if join.query.joins.is_empty() {
				table
			} else {
				format!("({} {})", table, self.compile_joins(&join.query.joins)?)
			};
			let constraints = self.compile_where_constraints(&join.query)?;
			if constraints.is_empty() {
				parts.push(format!("{} join {}", join.join_type.as_str(), table));
			} else {
				parts.push(format!(
					"{} join {} on {}",
					join.join_type.as_str(),
					table,
					constraints
				));
			}
		}
		Ok(parts.join(" "))
	}

	/// `where ...` or the empty string.
	fn compile_wheres(&self, query: &Builder) -> Result<String> {
		if query.wheres.is_empty() {
			return Ok(String::new());
		}
		let constraints = self.compile_where_constraints(query)?;
		if constraints.is_empty() {
			Ok(String::new())
		} else {
			Ok(format!("where {constraints}"))
		}
	}

	/// The predicate list without its clause keyword, leading boolean
	/// stripped.
	fn compile_where_constraints(&self, query: &Builder) -> Result<String> {
		let mut parts = Vec::new();
		for clause in &query.wheres {
			parts.push(format!(
				"{} {}",
				clause.conjunction().as_str(),
				self.compile_where(clause)?
			));
		}
		Ok(strip_leading_boolean(&parts.join(" ")))
	}

	/// Compile one where-predicate.
	fn compile_where(&self, clause: &WhereClause) -> Result<String> {
		match clause {
			WhereClause::Basic {
				column,
				operator,
				value,
				..
			} => Ok(format!(
				"{} {} {}",
				self.wrap(column)?,
				operator,
				self.parameter(value)
			)),
			WhereClause::Bitwise {
				column,
				operator,
				value,
				..
			} => {
				let sql = format!(
					"{} {} {}",
					self.wrap(column)?,
					operator,
					self.parameter(value)
				);
				Ok(self.wrap_bitwise(sql))
			}
			WhereClause::Column {
				first,
				operator,
				second,
				..
			} => Ok(format!(
				"{} {} {}",
				self.wrap(first)?,
				operator,
				self.wrap(second)?
			)),
			WhereClause::In {
				column,
				values,
				not,
				..
			} => {
				if values.is_empty() {
					return Ok(if *not { "1 = 1" } else { "0 = 1" }.to_string());
				}
				let keyword = if *not { "not in" } else { "in" };
				Ok(format!(
					"{} {} ({})",
					self.wrap(column)?,
					keyword,
					self.parameterize(values)
				))
			}
			WhereClause::InSub {
				column, query, not, ..
			} => {
				let keyword = if *not { "not in" } else { "in" };
				Ok(format!(
					"{} {} ({})",
					self.wrap(column)?,
					keyword,
					self.compile_select(query)?
				))
			}
			WhereClause::InRaw {
				column,
				values,
				not,
				..
			} => {
				if values.is_empty() {
					return Ok(if *not { "1 = 1" } else { "0 = 1" }.to_string());
				}
				let keyword = if *not { "not in" } else { "in" };
				let list = values
					.iter()
					.map(ToString::to_string)
					.collect::<Vec<_>>()
					.join(", ");
				Ok(format!("{} {} ({})", self.wrap(column)?, keyword, list))
			}
			WhereClause::Null { column, not, .. } => {
				let keyword = if *not { "is not null" } else { "is null" };
				Ok(format!("{} {}", self.wrap(column)?, keyword))
			}
			WhereClause::Between {
				column,
				low,
				high,
				not,
				..
			} => {
				let keyword = if *not { "not between" } else { "between" };
				Ok(format!(
					"{} {} {} and {}",
					self.wrap(column)?,
					keyword,
					self.parameter(low),
					self.parameter(high)
				))
			}
			WhereClause::BetweenColumns {
				column,
				low,
				high,
				not,
				..
			} => {
				let keyword = if *not { "not between" } else { "between" };
				Ok(format!(
					"{} {} {} and {}",
					self.wrap(column)?,
					keyword,
					self.wrap(low)?,
					self.wrap(high)?
				))
			}
			WhereClause::Nested { query, .. } => {
				Ok(format!("({})", self.compile_where_constraints(query)?))
			}
			WhereClause::Sub {
				column,
				operator,
				query,
				..
			} => Ok(format!(
				"{} {} ({})",
				self.wrap(column)?,
				operator,
				self.compile_select(query)?
			)),
			WhereClause::Exists { query, not, .. } => {
				let keyword = if *not { "not exists" } else { "exists" };
				Ok(format!("{} ({})", keyword, self.compile_select(query)?))
			}
			WhereClause::RowValues {
				columns,
				operator,
				values,
				..
			} => {
				let placeholders = values.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
				Ok(format!(
					"({}) {} ({})",
					self.columnize_names(columns)?,
					operator,
					placeholders
				))
			}
			WhereClause::Raw { sql, .. } => Ok(sql.clone()),
			WhereClause::DateBased {
				kind,
				column,
				operator,
				..
			} => self.compile_date_based_where(*kind, column, operator),
			WhereClause::Fulltext { columns, .. } => self.compile_fulltext(columns),
			WhereClause::JsonContains { column, not, .. } => {
				let sql = self.compile_json_contains(column)?;
				Ok(if *not { format!("not {sql}") } else { sql })
			}
			WhereClause::JsonContainsKey { column, not, .. } => {
				let sql = self.compile_json_contains_key(column)?;
				Ok(if *not { format!("not {sql}") } else { sql })
			}
			WhereClause::JsonLength {
				column, operator, ..
			} => self.compile_json_length(column, operator),
			WhereClause::JsonBoolean {
				column,
				operator,
				value,
				..
			} => Ok(format!(
				"{} {} {}",
				self.wrap_json_boolean_selector(column)?,
				operator,
				self.wrap_json_boolean_value(*value)
			)),
			WhereClause::Expression { expr, .. } => Ok(expr.as_str().to_string()),
		}
	}

	/// Post-process a bitwise comparison; some dialects coerce it to a
	/// boolean.
	fn wrap_bitwise(&self, sql: String) -> String {
		sql
	}

	/// Date-part comparison: `part(column) operator ?`.
	fn compile_date_based_where(
		&self,
		kind: DateKind,
		column: &str,
		operator: &str,
	) -> Result<String> {
		Ok(format!(
			"{}({}) {} ?",
			kind.as_str(),
			self.wrap(column)?,
			operator
		))
	}

	/// Full-text search is a dialect extension.
	fn compile_fulltext(&self, _columns: &[String]) -> Result<String> {
		Err(Error::unsupported(self.name(), "fulltext search"))
	}

	/// JSON selectors are a dialect extension.
	fn wrap_json_selector(&self, _column: &str) -> Result<String> {
		Err(Error::unsupported(self.name(), "JSON operations"))
	}

	/// Selector used when a JSON path is compared against a boolean.
	fn wrap_json_boolean_selector(&self, column: &str) -> Result<String> {
		self.wrap_json_selector(column)
	}

	/// Inline rendering of a boolean literal in a JSON comparison.
	fn wrap_json_boolean_value(&self, value: bool) -> String {
		if value { "true" } else { "false" }.to_string()
	}

	/// JSON containment is a dialect extension.
	fn compile_json_contains(&self, _column: &str) -> Result<String> {
		Err(Error::unsupported(self.name(), "JSON containment"))
	}

	/// JSON key existence is a dialect extension.
	fn compile_json_contains_key(&self, _column: &str) -> Result<String> {
		Err(Error::unsupported(self.name(), "JSON containment"))
	}

	/// JSON length comparison is a dialect extension.
	fn compile_json_length(&self, _column: &str, _operator: &str) -> Result<String> {
		Err(Error::unsupported(self.name(), "JSON length operations"))
	}

	/// `group by keys`.
	fn compile_groups(&self, query: &Builder) -> Result<String> {
		if query.groups.is_empty() {
			return Ok(String::new());
		}
		Ok(format!("group by {}", self.columnize(&query.groups)?))
	}

	/// `having ...` or the empty string.
	fn compile_havings(&self, query: &Builder) -> Result<String> {
		if query.havings.is_empty() {
			return Ok(String::new());
		}
		let mut parts = Vec::new();
		for clause in &query.havings {
			parts.push(format!(
				"{} {}",
				clause.conjunction().as_str(),
				self.compile_having(clause)?
			));
		}
		Ok(format!("having {}", strip_leading_boolean(&parts.join(" "))))
	}

	/// Compile one having-predicate.
	fn compile_having(&self, clause: &HavingClause) -> Result<String> {
		match clause {
			HavingClause::Basic {
				column,
				operator,
				value,
				..
			} => Ok(format!(
				"{} {} {}",
				self.wrap(column)?,
				operator,
				self.parameter(value)
			)),
			HavingClause::Bitwise {
				column,
				operator,
				value,
				..
			} => {
				let sql = format!(
					"{} {} {}",
					self.wrap(column)?,
					operator,
					self.parameter(value)
				);
				Ok(self.wrap_bitwise(sql))
			}
			HavingClause::Nested { query, .. } => {
				let mut parts = Vec::new();
				for inner in &query.havings {
					parts.push(format!(
						"{} {}",
						inner.conjunction().as_str(),
						self.compile_having(inner)?
					));
				}
				Ok(format!("({})", strip_leading_boolean(&parts.join(" "))))
			}
			HavingClause::Null { column, not, .. } => {
				let keyword = if *not { "is not null" } else { "is null" };
				Ok(format!("{} {}", self.wrap(column)?, keyword))
			}
			HavingClause::Between { column, not, .. } => {
				let keyword = if *not { "not between" } else { "between" };
				Ok(format!("{} {} ? and ?", self.wrap(column)?, keyword))
			}
			HavingClause::Raw { sql, .. } => Ok(sql.clone()),
			HavingClause::Expression { expr, .. } => Ok(expr.as_str().to_string()),
		}
	}

	/// `order by ...` over the given order list, or the empty string.
	fn compile_orders(&self, _query: &Builder, orders: &[Order]) -> Result<String> {
		if orders.is_empty() {
			return Ok(String::new());
		}
		let parts = orders
			.iter()
			.map(|order| match order {
				Order::Column { column, direction } => {
					Ok(format!("{} {}", self.wrap(column)?, direction.as_str()))
				}
				Order::Raw(expr) => Ok(expr.as_str().to_string()),
			})
			.collect::<Result<Vec<_>>>()?;
		Ok(format!("order by {}", parts.join(", ")))
	}

	/// The dialect's random-ordering function.
	fn compile_random(&self, _seed: &str) -> String {
		"RANDOM()".to_string()
	}

	/// `limit n`.
	fn compile_limit(&self, query: &Builder) -> Result<String> {
		Ok(query.limit.map(|n| format!("limit {n}")).unwrap_or_default())
	}

	/// `offset n`.
	fn compile_offset(&self, query: &Builder) -> Result<String> {
		Ok(query.offset.map(|n| format!("offset {n}")).unwrap_or_default())
	}

	/// Base grammars honor only literal lock clauses.
	fn compile_lock(&self, _query: &Builder, lock: &Lock) -> Result<String> {
		Ok(match lock {
			Lock::Raw(clause) => clause.clone(),
			_ => String::new(),
		})
	}

	// ---------------------------------------------------------------------
	// Unions
	// ---------------------------------------------------------------------

	/// Parenthesize a union member.
	fn wrap_union(&self, sql: &str) -> String {
		format!("({sql})")
	}

	/// The union branches plus union-side order/limit/offset.
	fn compile_unions(&self, query: &Builder) -> Result<String> {
		let mut sql = String::new();
		for union in &query.unions {
			let keyword = if union.all { " union all " } else { " union " };
			let inner = self.compile_select(&union.query)?;
			sql.push_str(keyword);
			sql.push_str(&self.wrap_union(&inner));
		}
		if !query.union_orders.is_empty()
			|| query.union_limit.is_some()
			|| query.union_offset.is_some()
		{
			let mut tail = query.clone();
			tail.unions.clear();
			tail.orders = query.union_orders.clone();
			tail.limit = query.union_limit;
			tail.offset = query.union_offset;
			sql.push_str(&self.compile_union_tail(&tail)?);
		}
		Ok(sql)
	}

	/// Ordering and paging of the combined union result, compiled with the
	/// dialect's own order/limit/offset syntax in its component order. The
	/// view builder carries the union-side state in the plain order, limit
	/// and offset fields.
	fn compile_union_tail(&self, tail: &Builder) -> Result<String> {
		let mut sql = String::new();
		for component in self.select_components() {
			let part = match component {
				SelectComponent::Orders => self.compile_orders(tail, &tail.orders)?,
				SelectComponent::Limit => self.compile_limit(tail)?,
				SelectComponent::Offset => self.compile_offset(tail)?,
				_ => String::new(),
			};
			if !part.is_empty() {
				sql.push(' ');
				sql.push_str(&part);
			}
		}
		Ok(sql)
	}

	/// Wrap the whole unioned select as a subquery and aggregate over it.
	fn compile_union_aggregate(&self, query: &Builder) -> Result<String> {
		let mut inner = query.clone();
		let Some(aggregate) = inner.aggregate.take() else {
			return self.compile_components(query);
		};
		let sql = self.compile_select(&inner)?;
		Ok(format!(
			"{} from ({}) as {}",
			self.compile_aggregate(query, &aggregate)?,
			sql,
			self.wrap_segment("temp_table")
		))
	}

	// ---------------------------------------------------------------------
	// Insert / update / delete
	// ---------------------------------------------------------------------

	/// `insert into t (cols) values (?, ...), ...`; an empty column list
	/// compiles to `default values`.
	fn compile_insert(
		&self,
		query: &Builder,
		columns: &[String],
		rows: &[Vec<Value>],
	) -> Result<String> {
		let table = self.query_table(query)?;
		if columns.is_empty() {
			return Ok(format!("insert into {table} default values"));
		}
		let placeholders = rows
			.iter()
			.map(|row| {
				let row = row.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
				format!("({row})")
			})
			.collect::<Vec<_>>()
			.join(", ");
		Ok(format!(
			"insert into {} ({}) values {}",
			table,
			self.columnize_names(columns)?,
			placeholders
		))
	}

	/// Conflict-ignoring insert is a dialect extension.
	fn compile_insert_or_ignore(
		&self,
		_query: &Builder,
		_columns: &[String],
		_rows: &[Vec<Value>],
	) -> Result<String> {
		Err(Error::unsupported(self.name(), "insert or ignore"))
	}

	/// `insert into t (cols) select ...`.
	fn compile_insert_using(
		&self,
		query: &Builder,
		columns: &[String],
		select: &str,
	) -> Result<String> {
		let table = self.query_table(query)?;
		if columns.is_empty() {
			return Ok(format!("insert into {table} {select}"));
		}
		Ok(format!(
			"insert into {} ({}) {}",
			table,
			self.columnize_names(columns)?,
			select
		))
	}

	/// Upserts are a dialect extension.
	fn compile_upsert(
		&self,
		_query: &Builder,
		_columns: &[String],
		_rows: &[Vec<Value>],
		_unique_by: &[String],
		_update: &[UpsertUpdate],
	) -> Result<String> {
		Err(Error::unsupported(self.name(), "upserts"))
	}

	/// The `col = ?` assignment list of an update.
	fn compile_update_columns(
		&self,
		_query: &Builder,
		values: &[(String, Value)],
	) -> Result<String> {
		let parts = values
			.iter()
			.map(|(column, _)| Ok(format!("{} = ?", self.wrap(column)?)))
			.collect::<Result<Vec<_>>>()?;
		Ok(parts.join(", "))
	}

	/// Compile an update statement.
	fn compile_update(&self, query: &Builder, values: &[(String, Value)]) -> Result<String> {
		let table = self.query_table(query)?;
		let columns = self.compile_update_columns(query, values)?;
		let wheres = self.compile_wheres(query)?;
		let sql = if query.joins.is_empty() {
			self.compile_update_without_joins(query, &table, &columns, &wheres)?
		} else {
			self.compile_update_with_joins(query, &table, &columns, &wheres)?
		};
		Ok(sql.trim().to_string())
	}

	/// `update t set cols wheres`.
	fn compile_update_without_joins(
		&self,
		_query: &Builder,
		table: &str,
		columns: &str,
		wheres: &str,
	) -> Result<String> {
		Ok(format!("update {table} set {columns} {wheres}"))
	}

	/// `update t joins set cols wheres`.
	fn compile_update_with_joins(
		&self,
		query: &Builder,
		table: &str,
		columns: &str,
		wheres: &str,
	) -> Result<String> {
		let joins = self.compile_joins(&query.joins)?;
		Ok(format!("update {table} {joins} set {columns} {wheres}"))
	}

	/// Binding order for an update: join bucket, assignment values, then
	/// the remaining buckets except select and join.
	fn prepare_bindings_for_update(&self, bindings: &Bindings, values: &[Value]) -> Values {
		let mut out = Values::new();
		out.0.extend(bindings.join.iter().cloned());
		out.0.extend(values.iter().cloned());
		for kind in BindingKind::ALL {
			if matches!(kind, BindingKind::Select | BindingKind::Join) {
				continue;
			}
			out.0.extend(bindings.bucket(kind).iter().cloned());
		}
		out
	}

	/// Compile a delete statement.
	fn compile_delete(&self, query: &Builder) -> Result<String> {
		let table = self.query_table(query)?;
		let wheres = self.compile_wheres(query)?;
		let sql = if query.joins.is_empty() {
			self.compile_delete_without_joins(query, &table, &wheres)?
		} else {
			self.compile_delete_with_joins(query, &table, &wheres)?
		};
		Ok(sql.trim().to_string())
	}

	/// `delete from t wheres`.
	fn compile_delete_without_joins(
		&self,
		_query: &Builder,
		table: &str,
		wheres: &str,
	) -> Result<String> {
		Ok(format!("delete from {table} {wheres}"))
	}

	/// `delete alias from t joins wheres`; the alias is the aliased name
	/// when the table carries one.
	fn compile_delete_with_joins(
		&self,
		query: &Builder,
		table: &str,
		wheres: &str,
	) -> Result<String> {
		let alias = table.rsplit(" as ").next().unwrap_or(table);
		let joins = self.compile_joins(&query.joins)?;
		Ok(format!("delete {alias} from {table} {joins} {wheres}"))
	}

	/// Binding order for a delete: every bucket except select.
	fn prepare_bindings_for_delete(&self, bindings: &Bindings) -> Values {
		let mut out = Values::new();
		for kind in BindingKind::ALL {
			if kind == BindingKind::Select {
				continue;
			}
			out.0.extend(bindings.bucket(kind).iter().cloned());
		}
		out
	}
}

/// Split a `lhs as rhs` alias at the first ` as `, ASCII-case-insensitive.
/// Scanned over the raw bytes so multibyte identifier characters never
/// shift the split point; the keyword itself is ASCII, keeping both cut
/// points on char boundaries.
fn split_alias(identifier: &str) -> Option<(&str, &str)> {
	identifier
		.as_bytes()
		.windows(4)
		.position(|window| window.eq_ignore_ascii_case(b" as "))
		.map(|idx| (&identifier[..idx], &identifier[idx + 4..]))
}

/// The base grammar: double-quoted identifiers, no dialect extensions.
pub struct GenericGrammar;

impl Grammar for GenericGrammar {
	fn name(&self) -> &'static str {
		"generic"
	}
}
