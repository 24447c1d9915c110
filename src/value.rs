//! Binding value types.
//!
//! A [`Value`] is a parameter destined for a positional `?` placeholder in
//! the compiled SQL; [`Values`] is the ordered collection handed to the
//! external execution layer alongside the SQL text.

/// A single binding value.
///
/// All variants use `Option<T>` to represent nullable values; a `None` is
/// bound as SQL `NULL`. Heap-backed variants are boxed to keep the enum
/// small.
///
/// # Example
///
/// ```rust
/// use quarry::Value;
///
/// let int_val = Value::Int(Some(42));
/// let null_int = Value::Int(None);
/// assert!(null_int.is_null());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
	/// Boolean value
	Bool(Option<bool>),
	/// 8-bit signed integer
	TinyInt(Option<i8>),
	/// 16-bit signed integer
	SmallInt(Option<i16>),
	/// 32-bit signed integer
	Int(Option<i32>),
	/// 64-bit signed integer
	BigInt(Option<i64>),
	/// 8-bit unsigned integer
	TinyUnsigned(Option<u8>),
	/// 16-bit unsigned integer
	SmallUnsigned(Option<u16>),
	/// 32-bit unsigned integer
	Unsigned(Option<u32>),
	/// 64-bit unsigned integer
	BigUnsigned(Option<u64>),
	/// 32-bit floating point
	Float(Option<f32>),
	/// 64-bit floating point
	Double(Option<f64>),
	/// String value (boxed)
	String(Option<Box<String>>),
	/// Binary data (boxed)
	Bytes(Option<Box<Vec<u8>>>),
	/// JSON value (boxed)
	Json(Option<Box<serde_json::Value>>),
}

impl Value {
	/// A typeless SQL `NULL`.
	#[must_use]
	pub fn null() -> Self {
		Self::String(None)
	}

	/// Returns `true` if this value is null.
	#[must_use]
	pub fn is_null(&self) -> bool {
		match self {
			Self::Bool(v) => v.is_none(),
			Self::TinyInt(v) => v.is_none(),
			Self::SmallInt(v) => v.is_none(),
			Self::Int(v) => v.is_none(),
			Self::BigInt(v) => v.is_none(),
			Self::TinyUnsigned(v) => v.is_none(),
			Self::SmallUnsigned(v) => v.is_none(),
			Self::Unsigned(v) => v.is_none(),
			Self::BigUnsigned(v) => v.is_none(),
			Self::Float(v) => v.is_none(),
			Self::Double(v) => v.is_none(),
			Self::String(v) => v.is_none(),
			Self::Bytes(v) => v.is_none(),
			Self::Json(v) => v.is_none(),
		}
	}

	/// Render this value as a SQL literal suitable for inlining.
	///
	/// Used for debug output only; compiled statements always bind through
	/// `?` placeholders. Single quotes in strings are doubled.
	#[must_use]
	pub fn to_sql_literal(&self) -> String {
		match self {
			Self::Bool(Some(true)) => "TRUE".to_string(),
			Self::Bool(Some(false)) => "FALSE".to_string(),
			Self::TinyInt(Some(v)) => v.to_string(),
			Self::SmallInt(Some(v)) => v.to_string(),
			Self::Int(Some(v)) => v.to_string(),
			Self::BigInt(Some(v)) => v.to_string(),
			Self::TinyUnsigned(Some(v)) => v.to_string(),
			Self::SmallUnsigned(Some(v)) => v.to_string(),
			Self::Unsigned(Some(v)) => v.to_string(),
			Self::BigUnsigned(Some(v)) => v.to_string(),
			Self::Float(Some(v)) => v.to_string(),
			Self::Double(Some(v)) => v.to_string(),
			Self::String(Some(v)) => format!("'{}'", v.replace('\'', "''")),
			Self::Bytes(Some(v)) => {
				let hex: String = v.iter().map(|b| format!("{:02X}", b)).collect();
				format!("X'{}'", hex)
			}
			Self::Json(Some(v)) => {
				let json = serde_json::to_string(v.as_ref()).unwrap_or_default();
				format!("'{}'", json.replace('\'', "''"))
			}
			_ => "NULL".to_string(),
		}
	}
}

impl Default for Value {
	fn default() -> Self {
		Self::null()
	}
}

macro_rules! impl_value_from {
	($type:ty, $variant:ident) => {
		impl From<$type> for Value {
			fn from(v: $type) -> Self {
				Self::$variant(Some(v))
			}
		}

		impl From<Option<$type>> for Value {
			fn from(v: Option<$type>) -> Self {
				Self::$variant(v)
			}
		}
	};
}

impl_value_from!(bool, Bool);
impl_value_from!(i8, TinyInt);
impl_value_from!(i16, SmallInt);
impl_value_from!(i32, Int);
impl_value_from!(i64, BigInt);
impl_value_from!(u8, TinyUnsigned);
impl_value_from!(u16, SmallUnsigned);
impl_value_from!(u32, Unsigned);
impl_value_from!(u64, BigUnsigned);
impl_value_from!(f32, Float);
impl_value_from!(f64, Double);

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Self::String(Some(Box::new(v.to_string())))
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Self::String(Some(Box::new(v)))
	}
}

impl From<Vec<u8>> for Value {
	fn from(v: Vec<u8>) -> Self {
		Self::Bytes(Some(Box::new(v)))
	}
}

impl From<serde_json::Value> for Value {
	fn from(v: serde_json::Value) -> Self {
		Self::Json(Some(Box::new(v)))
	}
}

/// Ordered collection of binding values.
///
/// Returned by [`Builder::get_bindings`](crate::Builder::get_bindings) in the
/// exact order the `?` placeholders appear in the compiled SQL.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Values(pub Vec<Value>);

impl Values {
	/// Create an empty collection.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a value.
	pub fn push(&mut self, value: Value) {
		self.0.push(value);
	}

	/// Append all values from another collection.
	pub fn extend(&mut self, other: Values) {
		self.0.extend(other.0);
	}

	/// Iterate over the values in binding order.
	pub fn iter(&self) -> std::slice::Iter<'_, Value> {
		self.0.iter()
	}

	/// Number of values.
	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` if no values have been collected.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<Value>> for Values {
	fn from(values: Vec<Value>) -> Self {
		Self(values)
	}
}

impl IntoIterator for Values {
	type Item = Value;
	type IntoIter = std::vec::IntoIter<Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<'a> IntoIterator for &'a Values {
	type Item = &'a Value;
	type IntoIter = std::slice::Iter<'a, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_value_is_null() {
		assert!(Value::Int(None).is_null());
		assert!(Value::null().is_null());
		assert!(!Value::Int(Some(42)).is_null());
		assert!(!Value::from("x").is_null());
	}

	#[rstest]
	#[case(Value::from(42i32), "42")]
	#[case(Value::from(true), "TRUE")]
	#[case(Value::from(false), "FALSE")]
	#[case(Value::from("hello"), "'hello'")]
	#[case(Value::from("it's"), "'it''s'")]
	#[case(Value::Int(None), "NULL")]
	fn test_to_sql_literal(#[case] value: Value, #[case] expected: &str) {
		assert_eq!(value.to_sql_literal(), expected);
	}

	#[rstest]
	fn test_from_option() {
		assert_eq!(Value::from(Some(7i64)), Value::BigInt(Some(7)));
		assert!(Value::from(None::<i64>).is_null());
	}

	#[rstest]
	fn test_values_collects_in_order() {
		let mut values = Values::new();
		values.push(Value::from(1));
		values.push(Value::from("two"));
		assert_eq!(values.len(), 2);
		assert_eq!(values.iter().next(), Some(&Value::Int(Some(1))));
	}
}
