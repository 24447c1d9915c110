//! PostgreSQL grammar.

use crate::builder::clause::{BindingKind, Bindings, Projection, TableRef};
use crate::builder::{Builder, UpsertUpdate};
use crate::error::Result;
use crate::grammar::{json_field_and_path, split_alias, Grammar};
use crate::types::{DateKind, Lock};
use crate::value::{Value, Values};

/// Double-quoted identifiers, `on conflict` upserts, `->`/`->>` JSON
/// selectors, `tsvector` fulltext, ctid-based update/delete rewrites.
pub struct PostgresGrammar;

impl PostgresGrammar {
	/// `field->'a'->'b'` with every segment kept as json.
	fn json_chain(&self, column: &str) -> Result<String> {
		let (field, segments) = json_field_and_path(column);
		let mut sql = self.wrap(&field)?;
		for segment in &segments {
			sql.push_str(&format!("->'{segment}'"));
		}
		Ok(sql)
	}

	/// Rewrite an update/delete against a `ctid in (subselect)` probe,
	/// carrying the query's joins, wheres, orders and limit into the
	/// subselect.
	fn row_pointer_select(&self, query: &Builder) -> Result<String> {
		let mut sub = query.clone();
		sub.aggregate = None;
		// An aliased from-table is addressed through its alias.
		let column = match &query.from {
			Some(TableRef::Table(name)) => {
				let target = split_alias(name).map_or(name.as_str(), |(_, alias)| alias);
				format!("{target}.ctid")
			}
			_ => "ctid".to_string(),
		};
		sub.columns = vec![Projection::Column(column)];
		self.compile_select(&sub)
	}
}

impl Grammar for PostgresGrammar {
	fn name(&self) -> &'static str {
		"postgres"
	}

	fn operators(&self) -> &'static [&'static str] {
		&[
			"#", "<->", "@>", "<@", "?|", "?&", "||", "-", "@?", "@@", "#-",
			"is distinct from", "is not distinct from",
		]
	}

	fn bitwise_operators(&self) -> &'static [&'static str] {
		&["~", "&", "|", "#", "<<", ">>", "<<=", ">>="]
	}

	fn wrap_bitwise(&self, sql: String) -> String {
		format!("({sql})::bool")
	}

	fn wrap_json_selector(&self, column: &str) -> Result<String> {
		let (field, segments) = json_field_and_path(column);
		let mut sql = self.wrap(&field)?;
		let last = segments.len().saturating_sub(1);
		for (index, segment) in segments.iter().enumerate() {
			if index == last {
				sql.push_str(&format!("->>'{segment}'"));
			} else {
				sql.push_str(&format!("->'{segment}'"));
			}
		}
		Ok(sql)
	}

	fn wrap_json_boolean_selector(&self, column: &str) -> Result<String> {
		Ok(format!("({})::boolean", self.json_chain(column)?))
	}

	fn compile_json_contains(&self, column: &str) -> Result<String> {
		Ok(format!("({})::jsonb @> ?", self.json_chain(column)?))
	}

	fn compile_json_contains_key(&self, column: &str) -> Result<String> {
		let (field, mut segments) = json_field_and_path(column);
		let key = segments.pop().unwrap_or_else(|| field.clone());
		let mut parent = self.wrap(&field)?;
		for segment in &segments {
			parent.push_str(&format!("->'{segment}'"));
		}
		Ok(format!(
			"coalesce(jsonb_exists(({parent})::jsonb, '{key}'), false)"
		))
	}

	fn compile_json_length(&self, column: &str, operator: &str) -> Result<String> {
		Ok(format!(
			"jsonb_array_length(({})::jsonb) {operator} ?",
			self.json_chain(column)?
		))
	}

	fn compile_date_based_where(
		&self,
		kind: DateKind,
		column: &str,
		operator: &str,
	) -> Result<String> {
		let column = self.wrap(column)?;
		Ok(match kind {
			DateKind::Date => format!("{column}::date {operator} ?"),
			DateKind::Time => format!("{column}::time {operator} ?"),
			_ => format!("extract({} from {column}) {operator} ?", kind.as_str()),
		})
	}

	fn compile_fulltext(&self, columns: &[String]) -> Result<String> {
		let vectors = columns
			.iter()
			.map(|column| Ok(format!("to_tsvector('english', {})", self.wrap(column)?)))
			.collect::<Result<Vec<_>>>()?;
		let vector = if vectors.len() == 1 {
			vectors.into_iter().next().unwrap_or_default()
		} else {
			format!("({})", vectors.join(" || "))
		};
		Ok(format!("{vector} @@ plainto_tsquery('english', ?)"))
	}

	fn compile_lock(&self, _query: &Builder, lock: &Lock) -> Result<String> {
		Ok(match lock {
			Lock::Update => "for update".to_string(),
			Lock::Shared => "for share".to_string(),
			Lock::Raw(clause) => clause.clone(),
		})
	}

	fn compile_insert_or_ignore(
		&self,
		query: &Builder,
		columns: &[String],
		rows: &[Vec<Value>],
	) -> Result<String> {
		let insert = self.compile_insert(query, columns, rows)?;
		Ok(format!("{insert} on conflict do nothing"))
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
			self.wrap_segment("ctid"),
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
			self.wrap_segment("ctid"),
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
			self.wrap_segment("ctid"),
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
			self.wrap_segment("ctid"),
			self.row_pointer_select(query)?
		))
	}
}
