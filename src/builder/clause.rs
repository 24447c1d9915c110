//! Clause-level AST nodes accumulated by the [`Builder`].
//!
//! Predicates are closed sum types dispatched by exhaustive `match` in the
//! grammars; adding a predicate kind or a dialect is a compile-time-checked
//! change.

use crate::builder::Builder;
use crate::expr::Expr;
use crate::types::{Conjunction, DateKind, Direction};
use crate::value::{Value, Values};

/// A selected column: either an identifier reference (possibly dotted,
/// possibly aliased with ` as `) or a raw fragment rendered verbatim.
#[derive(Clone, Debug, PartialEq)]
pub enum Projection {
	/// Identifier reference, quoted by the grammar
	Column(String),
	/// Raw fragment, rendered as-is
	Raw(Expr),
}

/// The from-target of a query.
#[derive(Clone, Debug, PartialEq)]
pub enum TableRef {
	/// Table name, possibly aliased with ` as `
	Table(String),
	/// Raw fragment, e.g. a compiled subquery with alias
	Raw(Expr),
}

/// A value position in a predicate: a binding destined for a `?`
/// placeholder, or a raw fragment rendered inline.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
	/// Parameterized value
	Value(Value),
	/// Inline raw fragment, never parameterized
	Expr(Expr),
}

impl Operand {
	/// Returns `true` for a null binding value. Raw fragments are never
	/// null.
	#[must_use]
	pub fn is_null(&self) -> bool {
		match self {
			Self::Value(v) => v.is_null(),
			Self::Expr(_) => false,
		}
	}
}

/// Conversion into an [`Operand`].
///
/// Implemented explicitly per type rather than blanket-over-`Into<Value>`
/// so that [`Expr`] can opt out of parameterization.
pub trait IntoOperand {
	/// Perform the conversion.
	fn into_operand(self) -> Operand;
}

impl IntoOperand for Operand {
	fn into_operand(self) -> Operand {
		self
	}
}

impl IntoOperand for Value {
	fn into_operand(self) -> Operand {
		Operand::Value(self)
	}
}

impl IntoOperand for Expr {
	fn into_operand(self) -> Operand {
		Operand::Expr(self)
	}
}

macro_rules! impl_into_operand {
	($($type:ty),+ $(,)?) => {
		$(
			impl IntoOperand for $type {
				fn into_operand(self) -> Operand {
					Operand::Value(Value::from(self))
				}
			}

			impl IntoOperand for Option<$type> {
				fn into_operand(self) -> Operand {
					match self {
						Some(v) => Operand::Value(Value::from(v)),
						None => Operand::Value(Value::null()),
					}
				}
			}
		)+
	};
}

impl_into_operand!(
	bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, &str, String, serde_json::Value,
);

/// Conversion into a [`Projection`].
pub trait IntoProjection {
	/// Perform the conversion.
	fn into_projection(self) -> Projection;
}

impl IntoProjection for Projection {
	fn into_projection(self) -> Projection {
		self
	}
}

impl IntoProjection for &str {
	fn into_projection(self) -> Projection {
		Projection::Column(self.to_string())
	}
}

impl IntoProjection for String {
	fn into_projection(self) -> Projection {
		Projection::Column(self)
	}
}

impl IntoProjection for Expr {
	fn into_projection(self) -> Projection {
		Projection::Raw(self)
	}
}

/// Conversion into a [`TableRef`].
pub trait IntoTableRef {
	/// Perform the conversion.
	fn into_table_ref(self) -> TableRef;
}

impl IntoTableRef for TableRef {
	fn into_table_ref(self) -> TableRef {
		self
	}
}

impl IntoTableRef for &str {
	fn into_table_ref(self) -> TableRef {
		TableRef::Table(self.to_string())
	}
}

impl IntoTableRef for String {
	fn into_table_ref(self) -> TableRef {
		TableRef::Table(self)
	}
}

impl IntoTableRef for Expr {
	fn into_table_ref(self) -> TableRef {
		TableRef::Raw(self)
	}
}

/// One where-predicate.
///
/// Every variant carries its [`Conjunction`]; negated forms carry a `not`
/// flag compiled into the clause keyword rather than the connector.
#[derive(Clone, Debug)]
pub enum WhereClause {
	/// `column operator value`
	Basic {
		conjunction: Conjunction,
		column: String,
		operator: String,
		value: Operand,
	},
	/// A basic comparison using a bitwise operator; some dialects coerce
	/// the result to a boolean
	Bitwise {
		conjunction: Conjunction,
		column: String,
		operator: String,
		value: Operand,
	},
	/// Compare two columns
	Column {
		conjunction: Conjunction,
		first: String,
		operator: String,
		second: String,
	},
	/// `column [not] in (?, ...)`; an empty list compiles to a tautology
	In {
		conjunction: Conjunction,
		column: String,
		values: Vec<Operand>,
		not: bool,
	},
	/// `column [not] in (subselect)`
	InSub {
		conjunction: Conjunction,
		column: String,
		query: Box<Builder>,
		not: bool,
	},
	/// `column [not] in (1, 2, 3)` with inline integers, unparameterized
	InRaw {
		conjunction: Conjunction,
		column: String,
		values: Vec<i64>,
		not: bool,
	},
	/// `column is [not] null`
	Null {
		conjunction: Conjunction,
		column: String,
		not: bool,
	},
	/// `column [not] between ? and ?`
	Between {
		conjunction: Conjunction,
		column: String,
		low: Operand,
		high: Operand,
		not: bool,
	},
	/// `column [not] between col1 and col2`
	BetweenColumns {
		conjunction: Conjunction,
		column: String,
		low: String,
		high: String,
		not: bool,
	},
	/// A parenthesized predicate group
	Nested {
		conjunction: Conjunction,
		query: Box<Builder>,
	},
	/// `column operator (subselect)`
	Sub {
		conjunction: Conjunction,
		column: String,
		operator: String,
		query: Box<Builder>,
	},
	/// `[not] exists (subselect)`
	Exists {
		conjunction: Conjunction,
		query: Box<Builder>,
		not: bool,
	},
	/// `(col1, col2) operator (?, ?)`
	RowValues {
		conjunction: Conjunction,
		columns: Vec<String>,
		operator: String,
		values: Vec<Value>,
	},
	/// Literal predicate SQL
	Raw {
		conjunction: Conjunction,
		sql: String,
	},
	/// Date-part comparison, compiled per dialect
	DateBased {
		conjunction: Conjunction,
		kind: DateKind,
		column: String,
		operator: String,
	},
	/// Full-text search over one or more columns
	Fulltext {
		conjunction: Conjunction,
		columns: Vec<String>,
	},
	/// JSON containment: the bound value is contained in the column
	JsonContains {
		conjunction: Conjunction,
		column: String,
		not: bool,
	},
	/// JSON key existence at a path
	JsonContainsKey {
		conjunction: Conjunction,
		column: String,
		not: bool,
	},
	/// JSON array length comparison
	JsonLength {
		conjunction: Conjunction,
		column: String,
		operator: String,
	},
	/// A JSON path compared against an inline boolean literal
	JsonBoolean {
		conjunction: Conjunction,
		column: String,
		operator: String,
		value: bool,
	},
	/// A raw fragment standing alone as a predicate
	Expression {
		conjunction: Conjunction,
		expr: Expr,
	},
}

impl WhereClause {
	/// The connector joining this predicate to the previous one.
	#[must_use]
	pub fn conjunction(&self) -> Conjunction {
		match self {
			Self::Basic { conjunction, .. }
			| Self::Bitwise { conjunction, .. }
			| Self::Column { conjunction, .. }
			| Self::In { conjunction, .. }
			| Self::InSub { conjunction, .. }
			| Self::InRaw { conjunction, .. }
			| Self::Null { conjunction, .. }
			| Self::Between { conjunction, .. }
			| Self::BetweenColumns { conjunction, .. }
			| Self::Nested { conjunction, .. }
			| Self::Sub { conjunction, .. }
			| Self::Exists { conjunction, .. }
			| Self::RowValues { conjunction, .. }
			| Self::Raw { conjunction, .. }
			| Self::DateBased { conjunction, .. }
			| Self::Fulltext { conjunction, .. }
			| Self::JsonContains { conjunction, .. }
			| Self::JsonContainsKey { conjunction, .. }
			| Self::JsonLength { conjunction, .. }
			| Self::JsonBoolean { conjunction, .. }
			| Self::Expression { conjunction, .. } => *conjunction,
		}
	}
}

/// One having-predicate; a narrower analogue of [`WhereClause`].
#[derive(Clone, Debug)]
pub enum HavingClause {
	/// `column operator value`
	Basic {
		conjunction: Conjunction,
		column: String,
		operator: String,
		value: Operand,
	},
	/// Bitwise comparison, boolean-coerced on some dialects
	Bitwise {
		conjunction: Conjunction,
		column: String,
		operator: String,
		value: Operand,
	},
	/// A parenthesized predicate group
	Nested {
		conjunction: Conjunction,
		query: Box<Builder>,
	},
	/// `column is [not] null`
	Null {
		conjunction: Conjunction,
		column: String,
		not: bool,
	},
	/// `column [not] between ? and ?`
	Between {
		conjunction: Conjunction,
		column: String,
		not: bool,
	},
	/// Literal predicate SQL
	Raw {
		conjunction: Conjunction,
		sql: String,
	},
	/// A raw fragment standing alone as a predicate
	Expression {
		conjunction: Conjunction,
		expr: Expr,
	},
}

impl HavingClause {
	/// The connector joining this predicate to the previous one.
	#[must_use]
	pub fn conjunction(&self) -> Conjunction {
		match self {
			Self::Basic { conjunction, .. }
			| Self::Bitwise { conjunction, .. }
			| Self::Nested { conjunction, .. }
			| Self::Null { conjunction, .. }
			| Self::Between { conjunction, .. }
			| Self::Raw { conjunction, .. }
			| Self::Expression { conjunction, .. } => *conjunction,
		}
	}
}

/// One order-by entry.
#[derive(Clone, Debug, PartialEq)]
pub enum Order {
	/// `column asc|desc`
	Column {
		column: String,
		direction: Direction,
	},
	/// Raw order expression
	Raw(Expr),
}

/// One union branch.
#[derive(Clone, Debug)]
pub struct Union {
	/// The unioned query
	pub query: Box<Builder>,
	/// `union all` instead of `union`
	pub all: bool,
}

/// An aggregate projection; mutually exclusive with the column list.
#[derive(Clone, Debug)]
pub struct Aggregate {
	/// Function name (`count`, `max`, ...)
	pub function: String,
	/// Columns the function applies to
	pub columns: Vec<Projection>,
}

/// Names one of the binding buckets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingKind {
	Select,
	From,
	Join,
	Where,
	GroupBy,
	Having,
	Order,
	Union,
	UnionOrder,
}

impl BindingKind {
	/// All buckets in flattening order.
	pub const ALL: [BindingKind; 9] = [
		Self::Select,
		Self::From,
		Self::Join,
		Self::Where,
		Self::GroupBy,
		Self::Having,
		Self::Order,
		Self::Union,
		Self::UnionOrder,
	];
}

/// The per-clause binding buckets.
///
/// Buckets are append-only during construction; flattened in the fixed
/// order of [`BindingKind::ALL`] they yield exactly the sequence of `?`
/// placeholders the compiled SQL contains.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bindings {
	pub select: Vec<Value>,
	pub from: Vec<Value>,
	pub join: Vec<Value>,
	pub where_: Vec<Value>,
	pub group_by: Vec<Value>,
	pub having: Vec<Value>,
	pub order: Vec<Value>,
	pub union: Vec<Value>,
	pub union_order: Vec<Value>,
}

impl Bindings {
	/// Mutable access to one bucket.
	pub fn bucket_mut(&mut self, kind: BindingKind) -> &mut Vec<Value> {
		match kind {
			BindingKind::Select => &mut self.select,
			BindingKind::From => &mut self.from,
			BindingKind::Join => &mut self.join,
			BindingKind::Where => &mut self.where_,
			BindingKind::GroupBy => &mut self.group_by,
			BindingKind::Having => &mut self.having,
			BindingKind::Order => &mut self.order,
			BindingKind::Union => &mut self.union,
			BindingKind::UnionOrder => &mut self.union_order,
		}
	}

	/// Read access to one bucket.
	#[must_use]
	pub fn bucket(&self, kind: BindingKind) -> &[Value] {
		match kind {
			BindingKind::Select => &self.select,
			BindingKind::From => &self.from,
			BindingKind::Join => &self.join,
			BindingKind::Where => &self.where_,
			BindingKind::GroupBy => &self.group_by,
			BindingKind::Having => &self.having,
			BindingKind::Order => &self.order,
			BindingKind::Union => &self.union,
			BindingKind::UnionOrder => &self.union_order,
		}
	}

	/// Flatten all buckets in clause order.
	#[must_use]
	pub fn flatten(&self) -> Values {
		let mut values = Values::new();
		for kind in BindingKind::ALL {
			values.0.extend(self.bucket(kind).iter().cloned());
		}
		values
	}

	/// Empty one bucket.
	pub fn clear(&mut self, kind: BindingKind) {
		self.bucket_mut(kind).clear();
	}
}
