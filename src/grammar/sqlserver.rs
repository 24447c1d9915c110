//! SQL Server grammar.

use crate::builder::clause::{BindingKind, Bindings, Order};
use crate::builder::{Builder, UpsertUpdate};
use crate::error::Result;
use crate::grammar::{json_field_and_path, json_path, Grammar, SelectComponent};
use crate::types::{DateKind, IndexHint, Lock};
use crate::value::{Value, Values};

const SELECT_COMPONENTS: &[SelectComponent] = &[
	SelectComponent::Aggregate,
	SelectComponent::Columns,
	SelectComponent::From,
	SelectComponent::IndexHint,
	SelectComponent::Joins,
	SelectComponent::Wheres,
	SelectComponent::Groups,
	SelectComponent::Havings,
	SelectComponent::Orders,
	SelectComponent::Offset,
	SelectComponent::Limit,
];

/// Bracket identifiers, `top` / `offset ... fetch next` pagination, table
/// hints for locking, `merge` upserts, `openjson` JSON operations.
pub struct SqlServerGrammar;

impl SqlServerGrammar {
	fn json_selector_parts(&self, column: &str) -> (String, Vec<String>) {
		let (field, segments) = json_field_and_path(column);
		(self.wrap_segments(&field), segments)
	}
}

impl Grammar for SqlServerGrammar {
	fn name(&self) -> &'static str {
		"sql server"
	}

	fn operators(&self) -> &'static [&'static str] {
		&["&=", "|=", "^=", "!<", "!>"]
	}

	fn bitwise_operators(&self) -> &'static [&'static str] {
		&["&", "&=", "|", "|=", "^", "^="]
	}

	fn quote_identifier(&self, segment: &str) -> String {
		format!("[{}]", segment.replace(']', "]]"))
	}

	fn wrap_bitwise(&self, sql: String) -> String {
		format!("({sql}) != 0")
	}

	fn select_components(&self) -> &'static [SelectComponent] {
		SELECT_COMPONENTS
	}

	/// Injects `top n` when a limit is present without an offset; limits
	/// paired with an offset compile through the fetch clause instead.
	fn compile_columns(&self, query: &Builder) -> Result<String> {
		if query.aggregate.is_some() {
			return Ok(String::new());
		}
		let select = if query.distinct {
			"select distinct "
		} else {
			"select "
		};
		let top = match (query.limit, query.offset) {
			(Some(limit), None) => format!("top {limit} "),
			_ => String::new(),
		};
		let columns = if query.columns.is_empty() {
			"*".to_string()
		} else {
			self.columnize(&query.columns)?
		};
		Ok(format!("{select}{top}{columns}"))
	}

	/// Row locks render as table hints on the from-table.
	fn compile_from(&self, query: &Builder) -> Result<String> {
		let from = match &query.from {
			Some(table) => format!("from {}", self.wrap_table(table)),
			None => return Ok(String::new()),
		};
		Ok(match &query.lock {
			Some(Lock::Update) => format!("{from} with(rowlock,updlock,holdlock)"),
			Some(Lock::Shared) => format!("{from} with(rowlock,holdlock)"),
			Some(Lock::Raw(clause)) => format!("{from} {clause}"),
			None => from,
		})
	}

	fn compile_index_hint(&self, _query: &Builder, hint: &IndexHint) -> Result<String> {
		Ok(format!("with (index({}))", hint.index))
	}

	/// The fetch clause requires an order by; synthesize a constant one
	/// when the query has none.
	fn compile_orders(&self, query: &Builder, orders: &[Order]) -> Result<String> {
		if orders.is_empty() {
			if query.offset.is_some() {
				return Ok("order by (SELECT 0)".to_string());
			}
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

	fn compile_offset(&self, query: &Builder) -> Result<String> {
		Ok(query
			.offset
			.map(|n| format!("offset {n} rows"))
			.unwrap_or_default())
	}

	fn compile_limit(&self, query: &Builder) -> Result<String> {
		Ok(match (query.limit, query.offset) {
			(Some(limit), Some(_)) => format!("fetch next {limit} rows only"),
			_ => String::new(),
		})
	}

	fn compile_lock(&self, _query: &Builder, _lock: &Lock) -> Result<String> {
		Ok(String::new())
	}

	fn compile_random(&self, _seed: &str) -> String {
		"NEWID()".to_string()
	}

	fn wrap_union(&self, sql: &str) -> String {
		format!("select * from ({sql}) as {}", self.wrap_segment("temp_table"))
	}

	/// The fetch clause requires an offset; a unioned limit without one
	/// pages from `offset 0 rows`.
	fn compile_union_tail(&self, tail: &Builder) -> Result<String> {
		let mut tail = tail.clone();
		if tail.limit.is_some() && tail.offset.is_none() {
			tail.offset = Some(0);
		}
		let mut sql = String::new();
		for part in [
			self.compile_orders(&tail, &tail.orders)?,
			self.compile_offset(&tail)?,
			self.compile_limit(&tail)?,
		] {
			if !part.is_empty() {
				sql.push(' ');
				sql.push_str(&part);
			}
		}
		Ok(sql)
	}

	fn compile_date_based_where(
		&self,
		kind: DateKind,
		column: &str,
		operator: &str,
	) -> Result<String> {
		let column = self.wrap(column)?;
		Ok(match kind {
			DateKind::Date => format!("cast({column} as date) {operator} ?"),
			DateKind::Time => format!("cast({column} as time) {operator} ?"),
			_ => format!("{}({column}) {operator} ?", kind.as_str()),
		})
	}

	fn wrap_json_selector(&self, column: &str) -> Result<String> {
		let (field, segments) = self.json_selector_parts(column);
		Ok(format!("json_value({field}, {})", json_path(&segments)))
	}

	fn wrap_json_boolean_value(&self, value: bool) -> String {
		if value { "'true'" } else { "'false'" }.to_string()
	}

	fn compile_json_contains(&self, column: &str) -> Result<String> {
		let (field, segments) = self.json_selector_parts(column);
		if segments.is_empty() {
			Ok(format!("? in (select [value] from openjson({field}))"))
		} else {
			Ok(format!(
				"? in (select [value] from openjson({field}, {}))",
				json_path(&segments)
			))
		}
	}

	fn compile_json_contains_key(&self, column: &str) -> Result<String> {
		let (field, mut segments) = self.json_selector_parts(column);
		let key = segments.pop().unwrap_or_default();
		if segments.is_empty() {
			Ok(format!("'{key}' in (select [key] from openjson({field}))"))
		} else {
			Ok(format!(
				"'{key}' in (select [key] from openjson({field}, {}))",
				json_path(&segments)
			))
		}
	}

	fn compile_json_length(&self, column: &str, operator: &str) -> Result<String> {
		let (field, segments) = self.json_selector_parts(column);
		if segments.is_empty() {
			Ok(format!(
				"(select count(*) from openjson({field})) {operator} ?"
			))
		} else {
			Ok(format!(
				"(select count(*) from openjson({field}, {})) {operator} ?",
				json_path(&segments)
			))
		}
	}

	fn compile_upsert(
		&self,
		query: &Builder,
		columns: &[String],
		rows: &[Vec<Value>],
		unique_by: &[String],
		update: &[UpsertUpdate],
	) -> Result<String> {
		let table = self.query_table(query)?;
		let source = self.wrap_segment("merge_source");
		let values = rows
			.iter()
			.map(|row| {
				let row = row.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
				format!("({row})")
			})
			.collect::<Vec<_>>()
			.join(", ");
		let column_list = self.columnize_names(columns)?;
		let conditions = unique_by
			.iter()
			.map(|column| {
				let wrapped = self.wrap(column)?;
				Ok(format!("{source}.{wrapped} = {table}.{wrapped}"))
			})
			.collect::<Result<Vec<_>>>()?
			.join(" and ");
		let assignments = update
			.iter()
			.map(|assignment| match assignment {
				UpsertUpdate::Column(column) => {
					let wrapped = self.wrap(column)?;
					Ok(format!("{wrapped} = {source}.{wrapped}"))
				}
				UpsertUpdate::Assign(column, _) => Ok(format!("{} = ?", self.wrap(column)?)),
			})
			.collect::<Result<Vec<_>>>()?
			.join(", ");
		Ok(format!(
			"merge {table} using (values {values}) {source} ({column_list}) on {conditions} \
			 when matched then update set {assignments} \
			 when not matched then insert ({column_list}) values ({column_list});"
		))
	}

	fn compile_update_with_joins(
		&self,
		query: &Builder,
		table: &str,
		columns: &str,
		wheres: &str,
	) -> Result<String> {
		let alias = table.rsplit(" as ").next().unwrap_or(table);
		let joins = self.compile_joins(&query.joins)?;
		Ok(format!(
			"update {alias} set {columns} from {table} {joins} {wheres}"
		))
	}

	fn prepare_bindings_for_update(&self, bindings: &Bindings, values: &[Value]) -> Values {
		// The assignment list precedes the from/join/where tail.
		let mut out = Values::new();
		out.0.extend(values.iter().cloned());
		for kind in BindingKind::ALL {
			if kind == BindingKind::Select {
				continue;
			}
			out.0.extend(bindings.bucket(kind).iter().cloned());
		}
		out
	}

	fn compile_delete_without_joins(
		&self,
		query: &Builder,
		table: &str,
		wheres: &str,
	) -> Result<String> {
		let top = query
			.limit
			.map(|n| format!("top ({n}) "))
			.unwrap_or_default();
		Ok(format!("delete {top}from {table} {wheres}"))
	}
}
