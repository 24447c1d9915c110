//! MySQL grammar.

use crate::builder::{Builder, UpsertUpdate};
use crate::error::Result;
use crate::grammar::{json_field_and_path, json_path, Grammar};
use crate::types::{IndexHint, IndexHintKind, Lock};
use crate::value::Value;

/// Backtick identifiers, `insert ignore`, `on duplicate key update`,
/// `match ... against` fulltext.
pub struct MySqlGrammar;

impl MySqlGrammar {
	fn json_selector_parts(&self, column: &str) -> (String, String) {
		let (field, segments) = json_field_and_path(column);
		(self.wrap_segments(&field), json_path(&segments))
	}
}

impl Grammar for MySqlGrammar {
	fn name(&self) -> &'static str {
		"mysql"
	}

	fn operators(&self) -> &'static [&'static str] {
		&["sounds like"]
	}

	fn quote_identifier(&self, segment: &str) -> String {
		format!("`{}`", segment.replace('`', "``"))
	}

	fn wrap_json_selector(&self, column: &str) -> Result<String> {
		let (field, path) = self.json_selector_parts(column);
		Ok(format!("json_unquote(json_extract({field}, {path}))"))
	}

	fn wrap_json_boolean_selector(&self, column: &str) -> Result<String> {
		let (field, path) = self.json_selector_parts(column);
		Ok(format!("json_extract({field}, {path})"))
	}

	fn compile_json_contains(&self, column: &str) -> Result<String> {
		let (field, segments) = json_field_and_path(column);
		let field = self.wrap_segments(&field);
		if segments.is_empty() {
			Ok(format!("json_contains({field}, ?)"))
		} else {
			Ok(format!("json_contains({field}, ?, {})", json_path(&segments)))
		}
	}

	fn compile_json_contains_key(&self, column: &str) -> Result<String> {
		let (field, path) = self.json_selector_parts(column);
		Ok(format!("ifnull(json_contains_path({field}, 'one', {path}), 0)"))
	}

	fn compile_json_length(&self, column: &str, operator: &str) -> Result<String> {
		let (field, segments) = json_field_and_path(column);
		let field = self.wrap_segments(&field);
		if segments.is_empty() {
			Ok(format!("json_length({field}) {operator} ?"))
		} else {
			Ok(format!(
				"json_length({field}, {}) {operator} ?",
				json_path(&segments)
			))
		}
	}

	fn compile_fulltext(&self, columns: &[String]) -> Result<String> {
		let columns = self.columnize_names(columns)?;
		Ok(format!(
			"match ({columns}) against (? in natural language mode)"
		))
	}

	fn compile_index_hint(&self, _query: &Builder, hint: &IndexHint) -> Result<String> {
		let keyword = match hint.kind {
			IndexHintKind::Use => "use",
			IndexHintKind::Force => "force",
			IndexHintKind::Ignore => "ignore",
		};
		Ok(format!("{} index ({})", keyword, hint.index))
	}

	fn compile_lock(&self, _query: &Builder, lock: &Lock) -> Result<String> {
		Ok(match lock {
			Lock::Update => "for update".to_string(),
			Lock::Shared => "lock in share mode".to_string(),
			Lock::Raw(clause) => clause.clone(),
		})
	}

	fn compile_random(&self, seed: &str) -> String {
		format!("RAND({seed})")
	}

	fn compile_insert_or_ignore(
		&self,
		query: &Builder,
		columns: &[String],
		rows: &[Vec<Value>],
	) -> Result<String> {
		let sql = self.compile_insert(query, columns, rows)?;
		Ok(sql.replacen("insert", "insert ignore", 1))
	}

	fn compile_upsert(
		&self,
		query: &Builder,
		columns: &[String],
		rows: &[Vec<Value>],
		_unique_by: &[String],
		update: &[UpsertUpdate],
	) -> Result<String> {
		let insert = self.compile_insert(query, columns, rows)?;
		let assignments = update
			.iter()
			.map(|assignment| match assignment {
				UpsertUpdate::Column(column) => {
					let wrapped = self.wrap(column)?;
					Ok(format!("{wrapped} = values({wrapped})"))
				}
				UpsertUpdate::Assign(column, _) => Ok(format!("{} = ?", self.wrap(column)?)),
			})
			.collect::<Result<Vec<_>>>()?;
		Ok(format!(
			"{insert} on duplicate key update {}",
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
		let mut sql = format!("update {table} set {columns} {wheres}")
			.trim()
			.to_string();
		let orders = self.compile_orders(query, &query.orders)?;
		if !orders.is_empty() {
			sql.push(' ');
			sql.push_str(&orders);
		}
		if let Some(limit) = query.limit {
			sql.push_str(&format!(" limit {limit}"));
		}
		Ok(sql)
	}

	fn compile_delete_without_joins(
		&self,
		query: &Builder,
		table: &str,
		wheres: &str,
	) -> Result<String> {
		let mut sql = format!("delete from {table} {wheres}").trim().to_string();
		let orders = self.compile_orders(query, &query.orders)?;
		if !orders.is_empty() {
			sql.push(' ');
			sql.push_str(&orders);
		}
		if let Some(limit) = query.limit {
			sql.push_str(&format!(" limit {limit}"));
		}
		Ok(sql)
	}
}
