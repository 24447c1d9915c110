//! SQLite grammar.

use crate::builder::clause::{BindingKind, Bindings, Projection, TableRef};
use crate::builder::{Builder, UpsertUpdate};
use crate::error::{Error, Result};
use crate::grammar::{json_field_and_path, json_path, split_alias, Grammar};
use crate::types::{DateKind, IndexHint, IndexHintKind, Lock};
use crate::value::{Value, Values};

/// Double-quoted identifiers, `insert or ignore`, `on conflict` upserts,
/// strftime date parts, rowid-based update/delete rewrites. Row locks are
/// a no-op.
pub struct SqliteGrammar;

impl SqliteGrammar {
	fn json_selector_parts(&self, column: &str) -> (String, String) {
		let (field, segments) = json_field_and_path(column);
		(self.wrap_segments(&field), json_path(&segments))
	}

	/// Rewrite an update/delete against a `rowid in (subselect)` probe.
	fn row_pointer_select(&self, query: &Builder) -> Result<String> {
		let mut sub = query.clone();
		sub.aggregate = None;
		// An aliased from-table is addressed through its alias.
		let column = match &query.from {
			Some(TableRef::Table(name)) => {
				let target = split_alias(name).map_or(name.as_str(), |(_, alias)| alias);
				format!("{target}.rowid")
			}
			_ => "rowid".to_string(),
		};
		sub.columns = vec![Projection::Column(column)];
		self.compile_select(&sub)
	}
}

impl Grammar for SqliteGrammar {
	fn name(&self) -> &'static str {
		"sqlite"
	}

	// SQLite has no row locks; even literal lock clauses are dropped.
	fn compile_lock(&self, _query: &Builder, _lock: &Lock) -> Result<String> {
		Ok(String::new())
	}

	fn compile_index_hint(&self, _query: &Builder, hint: &IndexHint) -> Result<String> {
		Ok(match hint.kind {
			IndexHintKind::Force => format!("indexed by {}", hint.index),
			_ => String::new(),
		})
	}

	fn wrap_json_selector(&self, column: &str) -> Result<String> {
		let (field, path) = self.json_selector_parts(column);
		Ok(format!("json_extract({field}, {path})"))
	}

	fn compile_json_contains(&self, _column: &str) -> Result<String> {
		Err(Error::unsupported(self.name(), "JSON containment"))
	}

	fn compile_json_contains_key(&self, column: &str) -> Result<String> {
		let (field, path) = self.json_selector_parts(column);
		Ok(format!("json_type({field}, {path}) is not null"))
	}

	fn compile_json_length(&self, _column: &str, _operator: &str) -> Result<String> {
		Err(Error::unsupported(self.name(), "JSON length operations"))
	}

	fn compile_date_based_where(
		&self,
		kind: DateKind,
		column: &str,
		operator: &str,
	) -> Result<String> {
		let format = match kind {
			DateKind::Date => "%Y-%m-%d",
			DateKind::Time => "%H:%M:%S",
			DateKind::Day => "%d",
			DateKind::Month => "%m",
			DateKind::Year => "%Y",
		};
		Ok(format!(
			"strftime('{format}', {}) {operator} cast(? as text)",
			self.wrap(column)?
		))
	}

	fn wrap_union(&self, sql: &str) -> String {
		format!("select * from ({sql})")
	}

	fn compile_insert_or_ignore(
		&self,
		query: &Builder,
		columns: &[String],
		rows: &[Vec<Value>],
	) -> Result<String> {
		let sql = self.compile_insert(query, columns, rows)?;
		Ok(sql.replacen("insert", "insert or ignore", 1))
	}

	fn compile_upsert(
		&self,
		query: &Builder,
		columns: &[String],
		rows: &[Vec<Value>],
		unique_by: &[String],
		update: &[UpsertUpdate],
	) -> Result<String> {
		let insert = self.compile_insert(query, columns, rows)?;
		let assignments = update
			.iter()
			.map(|assignment| match assignment {
				UpsertUpdate::Column(column) => Ok(format!(
					"{} = {}",
					self.wrap(column)?,
					self.wrap(&format!("excluded.{column}"))?
				)),
				UpsertUpdate::Assign(column, _) => Ok(format!("{} = ?", self.wrap(column)?)),
			})
			.collect::<Result<Vec<_>>>()?;
		Ok(format!(
			"{insert} on conflict ({}) do update set {}",
			self.columnize_names(unique_by)?,
			assignments.join(", ")
		))
	}

	fn compile_update_without_joins(
		&self,
		query: &Builder,
		table: &str,
		columns: &str,
		wheres: &str,
	) -> Result<String> {
		if query.limit.is_none() {
			return Ok(format!("update {table} set {columns} {wheres}"));
		}
		Ok(format!(
			"update {table} set {columns} where {} in ({})",
			self.wrap_segment("rowid"),
			self.row_pointer_select(query)?
		))
	}

	fn compile_update_with_joins(
		&self,
		query: &Builder,
		table: &str,
		columns: &str,
		_wheres: &str,
	) -> Result<String> {
		Ok(format!(
			"update {table} set {columns} where {} in ({})",
			self.wrap_segment("rowid"),
			self.row_pointer_select(query)?
		))
	}

	fn prepare_bindings_for_update(&self, bindings: &Bindings, values: &[Value]) -> Values {
		// Assignment placeholders precede the rewritten subselect.
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
		if query.limit.is_none() {
			return Ok(format!("delete from {table} {wheres}"));
		}
		Ok(format!(
			"delete from {table} where {} in ({})",
			self.wrap_segment("rowid"),
			self.row_pointer_select(query)?
		))
	}

	fn compile_delete_with_joins(
		&self,
		query: &Builder,
		table: &str,
		_wheres: &str,
	) -> Result<String> {
		Ok(format!(
			"delete from {table} where {} in ({})",
			self.wrap_segment("rowid"),
			self.row_pointer_select(query)?
		))
	}
}
