use rstest::rstest;

use super::*;
use crate::builder::Builder;
use crate::expr::Expr;
use crate::types::{Dialect, IndexHintKind};

fn placeholder_count(sql: &str) -> usize {
	sql.matches('?').count()
}

// -------------------------------------------------------------------------
// Wrapping and helpers
// -------------------------------------------------------------------------

#[rstest]
#[case("name", r#""name""#)]
#[case("users.name", r#""users"."name""#)]
#[case("users.*", r#""users".*"#)]
#[case("name as full_name", r#""name" as "full_name""#)]
#[case(r#"some"table"#, r#""some""table""#)]
fn test_generic_wrap(#[case] column: &str, #[case] expected: &str) {
	assert_eq!(GenericGrammar.wrap(column).unwrap(), expected);
}

#[rstest]
fn test_alias_split_is_case_insensitive() {
	assert_eq!(
		GenericGrammar.wrap("name AS full_name").unwrap(),
		r#""name" as "full_name""#
	);
}

#[rstest]
fn test_alias_split_survives_multibyte_identifiers() {
	assert_eq!(GenericGrammar.wrap("İab as x").unwrap(), r#""İab" as "x""#);
	assert_eq!(GenericGrammar.wrap("Straße").unwrap(), r#""Straße""#);
}

#[rstest]
fn test_quote_doubling_per_dialect() {
	assert_eq!(MySqlGrammar.quote_identifier("some`table"), "`some``table`");
	assert_eq!(SqlServerGrammar.quote_identifier("some]table"), "[some]]table]");
}

#[rstest]
#[case("and \"id\" = ?", "\"id\" = ?")]
#[case("or \"id\" = ?", "\"id\" = ?")]
#[case("and not (\"id\" = ?)", "not (\"id\" = ?)")]
#[case("\"a\" = ? and \"b\" = ?", "\"a\" = ? and \"b\" = ?")]
fn test_strip_leading_boolean(#[case] input: &str, #[case] expected: &str) {
	assert_eq!(strip_leading_boolean(input), expected);
}

#[rstest]
fn test_json_path_rendering() {
	let (field, segments) = json_field_and_path("options -> languages -> en");
	assert_eq!(field, "options");
	assert_eq!(json_path(&segments), r#"'$."languages"."en"'"#);
}

// -------------------------------------------------------------------------
// Selects
// -------------------------------------------------------------------------

#[rstest]
fn test_select_all() {
	let mut query = Builder::generic();
	query.from("users");
	assert_eq!(query.to_sql().unwrap(), r#"select * from "users""#);
}

#[rstest]
fn test_basic_where() {
	let mut query = Builder::generic();
	query.from("users").where_("id", "=", 1);
	assert_eq!(query.to_sql().unwrap(), r#"select * from "users" where "id" = ?"#);
	assert_eq!(query.get_bindings().len(), 1);
}

#[rstest]
fn test_where_in() {
	let mut query = Builder::generic();
	query.from("users").where_in("id", [1, 2, 3]);
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "users" where "id" in (?, ?, ?)"#
	);
	assert_eq!(query.get_bindings().len(), 3);
}

#[rstest]
fn test_mysql_select() {
	let mut query = Builder::mysql();
	query.from("users").where_("id", "=", 1);
	assert_eq!(query.to_sql().unwrap(), "select * from `users` where `id` = ?");
}

#[rstest]
fn test_sqlserver_dotted_column() {
	let mut query = Builder::sql_server();
	query.from("users").where_("users.id", "=", 1);
	assert_eq!(
		query.to_sql().unwrap(),
		"select * from [users] where [users].[id] = ?"
	);
}

#[rstest]
fn test_table_alias() {
	let mut query = Builder::generic();
	query.from("users as u").select(["u.name as display_name"]);
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select "u"."name" as "display_name" from "users" as "u""#
	);
}

#[rstest]
fn test_distinct() {
	let mut query = Builder::generic();
	query.from("users").select(["name"]).distinct();
	assert_eq!(query.to_sql().unwrap(), r#"select distinct "name" from "users""#);
}

#[rstest]
fn test_raw_select_column() {
	let mut query = Builder::generic();
	query.from("users").select([Expr::new("count(*) as total")]);
	assert_eq!(query.to_sql().unwrap(), r#"select count(*) as total from "users""#);
}

#[rstest]
fn test_aggregate() {
	let mut query = Builder::generic();
	query.from("users").aggregate("count", &["*"]);
	assert_eq!(query.to_sql().unwrap(), r#"select count(*) as aggregate from "users""#);
}

#[rstest]
fn test_distinct_aggregate() {
	let mut query = Builder::generic();
	query.from("users").distinct().aggregate("count", &["email"]);
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select count(distinct "email") as aggregate from "users""#
	);
}

#[rstest]
fn test_limit_and_offset() {
	let mut query = Builder::generic();
	query.from("users").limit(10).offset(5);
	assert_eq!(query.to_sql().unwrap(), r#"select * from "users" limit 10 offset 5"#);
}

#[rstest]
fn test_orders() {
	let mut query = Builder::generic();
	query.from("users").order_by("name").order_by_desc("age");
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "users" order by "name" asc, "age" desc"#
	);
}

#[rstest]
fn test_groups_and_raw_having() {
	let mut query = Builder::generic();
	query
		.from("orders")
		.group_by(&["department"])
		.having_raw("sum(price) > ?", vec![Value::from(2500)]);
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "orders" group by "department" having sum(price) > ?"#
	);
}

#[rstest]
fn test_having_with_binding() {
	let mut query = Builder::generic();
	query.from("orders").group_by(&["city"]).having("total", ">", 100);
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "orders" group by "city" having "total" > ?"#
	);
	assert_eq!(query.bindings.having, vec![Value::from(100)]);
}

#[rstest]
fn test_missing_from_errors_on_insert() {
	let mut query = Builder::generic();
	let result = query.insert_sql(&[vec![("email", Value::from("foo"))]]);
	assert_eq!(result.unwrap_err(), Error::MissingFrom);
}

// -------------------------------------------------------------------------
// Where variants
// -------------------------------------------------------------------------

#[rstest]
fn test_or_where() {
	let mut query = Builder::generic();
	query.from("users").where_("votes", ">", 100).or_where_eq("name", "John");
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "users" where "votes" > ? or "name" = ?"#
	);
}

#[rstest]
fn test_where_not_group() {
	let mut query = Builder::generic();
	query.from("users").where_not(|q| {
		q.where_("id", "=", 1);
	});
	assert_eq!(query.to_sql().unwrap(), r#"select * from "users" where not ("id" = ?)"#);
}

#[rstest]
fn test_nested_where_group() {
	let mut query = Builder::generic();
	query.from("users").where_("email", "=", "foo").or_where_nested(|q| {
		q.where_("name", "=", "bar").where_("age", "=", 25);
	});
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "users" where "email" = ? or ("name" = ? and "age" = ?)"#
	);
	assert_eq!(query.get_bindings().len(), 3);
}

#[rstest]
fn test_empty_where_in_is_always_false() {
	let mut query = Builder::generic();
	query.from("users").where_in("id", Vec::<i32>::new());
	assert_eq!(query.to_sql().unwrap(), r#"select * from "users" where 0 = 1"#);
	assert!(query.get_bindings().is_empty());
}

#[rstest]
fn test_empty_where_not_in_is_always_true() {
	let mut query = Builder::generic();
	query.from("users").where_not_in("id", Vec::<i32>::new());
	assert_eq!(query.to_sql().unwrap(), r#"select * from "users" where 1 = 1"#);
}

#[rstest]
fn test_integer_in_raw_inlines_values() {
	let mut query = Builder::generic();
	query.from("users").where_integer_in_raw("id", &[1, 2, 3]);
	assert_eq!(query.to_sql().unwrap(), r#"select * from "users" where "id" in (1, 2, 3)"#);
	assert!(query.get_bindings().is_empty());
}

#[rstest]
fn test_empty_integer_not_in_raw() {
	let mut query = Builder::generic();
	query.from("users").where_integer_not_in_raw("id", &[]);
	assert_eq!(query.to_sql().unwrap(), r#"select * from "users" where 1 = 1"#);
}

#[rstest]
fn test_null_wheres() {
	let mut query = Builder::generic();
	query.from("users").where_null("deleted_at").or_where_not_null("verified_at");
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "users" where "deleted_at" is null or "verified_at" is not null"#
	);
}

#[rstest]
fn test_between() {
	let mut query = Builder::generic();
	query.from("users").where_between("votes", 1, 100);
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "users" where "votes" between ? and ?"#
	);
	assert_eq!(query.get_bindings().len(), 2);
}

#[rstest]
fn test_not_between_columns() {
	let mut query = Builder::generic();
	query.from("users").where_not_between_columns("votes", "min_votes", "max_votes");
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "users" where "votes" not between "min_votes" and "max_votes""#
	);
}

#[rstest]
fn test_row_values() {
	let mut query = Builder::generic();
	query.from("orders").where_row_values(
		&["last_update", "order_id"],
		"<",
		vec![Value::from(1), Value::from(2)],
	);
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "orders" where ("last_update", "order_id") < (?, ?)"#
	);
}

#[rstest]
fn test_where_exists() {
	let mut query = Builder::generic();
	query.from("users").where_exists(|q| {
		q.from("orders").where_column_eq("orders.user_id", "users.id");
	});
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "users" where exists (select * from "orders" where "orders"."user_id" = "users"."id")"#
	);
}

#[rstest]
fn test_where_sub() {
	let mut query = Builder::generic();
	query.from("products").where_sub("price", "=", |q| {
		q.from("orders").aggregate("max", &["price"]);
	});
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "products" where "price" = (select max("price") as aggregate from "orders")"#
	);
}

#[rstest]
fn test_where_in_sub() {
	let mut query = Builder::generic();
	query.from("users").where_in_sub("id", |q| {
		q.from("orders").select(["user_id"]);
	});
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "users" where "id" in (select "user_id" from "orders")"#
	);
}

#[rstest]
fn test_raw_where_strips_only_the_leading_boolean() {
	let mut query = Builder::generic();
	query
		.from("users")
		.or_where_raw("id = ? or email = 'x' and active = 1", vec![Value::from(1)]);
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "users" where id = ? or email = 'x' and active = 1"#
	);
}

#[rstest]
fn test_expression_predicates() {
	let mut query = Builder::generic();
	query
		.from("orders")
		.where_expr(Expr::new("price > discounted_price"))
		.group_by(&["department"])
		.having_expr(Expr::new("sum(price) > 100"));
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "orders" where price > discounted_price group by "department" having sum(price) > 100"#
	);
	assert!(query.get_bindings().is_empty());
}

#[rstest]
#[case(Builder::generic(), r#"select * from "users" where "flags" & ?"#)]
#[case(Builder::postgres(), r#"select * from "users" where ("flags" & ?)::bool"#)]
#[case(Builder::sql_server(), "select * from [users] where ([flags] & ?) != 0")]
fn test_bitwise_where(#[case] mut query: Builder, #[case] expected: &str) {
	query.from("users").where_("flags", "&", 1);
	assert_eq!(query.to_sql().unwrap(), expected);
}

// -------------------------------------------------------------------------
// Date-based wheres
// -------------------------------------------------------------------------

#[rstest]
#[case(Builder::generic(), r#"select * from "users" where date("created_at") = ?"#)]
#[case(Builder::mysql(), "select * from `users` where date(`created_at`) = ?")]
#[case(Builder::postgres(), r#"select * from "users" where "created_at"::date = ?"#)]
#[case(
	Builder::sqlite(),
	r#"select * from "users" where strftime('%Y-%m-%d', "created_at") = cast(? as text)"#
)]
#[case(Builder::sql_server(), "select * from [users] where cast([created_at] as date) = ?")]
fn test_where_date(#[case] mut query: Builder, #[case] expected: &str) {
	query.from("users").where_date("created_at", "=", "2024-06-01");
	assert_eq!(query.to_sql().unwrap(), expected);
	assert_eq!(query.get_bindings().len(), 1);
}

#[rstest]
#[case(Builder::generic(), r#"select * from "users" where year("created_at") = ?"#)]
#[case(
	Builder::postgres(),
	r#"select * from "users" where extract(year from "created_at") = ?"#
)]
#[case(
	Builder::sqlite(),
	r#"select * from "users" where strftime('%Y', "created_at") = cast(? as text)"#
)]
#[case(Builder::sql_server(), "select * from [users] where year([created_at]) = ?")]
fn test_where_year(#[case] mut query: Builder, #[case] expected: &str) {
	query.from("users").where_year("created_at", "=", 2024);
	assert_eq!(query.to_sql().unwrap(), expected);
}

// -------------------------------------------------------------------------
// Fulltext
// -------------------------------------------------------------------------

#[rstest]
fn test_mysql_fulltext() {
	let mut query = Builder::mysql();
	query.from("articles").where_fulltext(&["body"], "database");
	assert_eq!(
		query.to_sql().unwrap(),
		"select * from `articles` where match (`body`) against (? in natural language mode)"
	);
}

#[rstest]
fn test_postgres_fulltext_single_column() {
	let mut query = Builder::postgres();
	query.from("articles").where_fulltext(&["body"], "database");
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "articles" where to_tsvector('english', "body") @@ plainto_tsquery('english', ?)"#
	);
}

#[rstest]
fn test_postgres_fulltext_multiple_columns() {
	let mut query = Builder::postgres();
	query.from("articles").where_fulltext(&["title", "body"], "database");
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "articles" where (to_tsvector('english', "title") || to_tsvector('english', "body")) @@ plainto_tsquery('english', ?)"#
	);
}

#[rstest]
fn test_fulltext_unsupported_on_base_grammar() {
	let mut query = Builder::generic();
	query.from("articles").where_fulltext(&["body"], "database");
	assert!(matches!(
		query.to_sql(),
		Err(Error::UnsupportedFeature { .. })
	));
}

// -------------------------------------------------------------------------
// JSON
// -------------------------------------------------------------------------

#[rstest]
#[case(Builder::mysql(), "select * from `items` where json_unquote(json_extract(`meta`, '$.\"price\"')) > ?")]
#[case(Builder::postgres(), r#"select * from "items" where "meta"->>'price' > ?"#)]
#[case(Builder::sqlite(), r#"select * from "items" where json_extract("meta", '$."price"') > ?"#)]
#[case(Builder::sql_server(), "select * from [items] where json_value([meta], '$.\"price\"') > ?")]
fn test_json_selector_where(#[case] mut query: Builder, #[case] expected: &str) {
	query.from("items").where_("meta->price", ">", 3);
	assert_eq!(query.to_sql().unwrap(), expected);
}

#[rstest]
fn test_postgres_deep_json_selector_unwraps_last_segment() {
	let mut query = Builder::postgres();
	query.from("items").where_("meta->price->usd", ">", 3);
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "items" where "meta"->'price'->>'usd' > ?"#
	);
}

#[rstest]
fn test_json_selector_unsupported_on_base_grammar() {
	let mut query = Builder::generic();
	query.from("items").where_("meta->price", ">", 3);
	assert!(matches!(
		query.to_sql(),
		Err(Error::UnsupportedFeature { .. })
	));
}

#[rstest]
#[case(Builder::mysql(), "select * from `items` where json_extract(`options`, '$.\"enabled\"') = true")]
#[case(Builder::postgres(), r#"select * from "items" where ("options"->'enabled')::boolean = true"#)]
#[case(Builder::sqlite(), r#"select * from "items" where json_extract("options", '$."enabled"') = true"#)]
#[case(Builder::sql_server(), "select * from [items] where json_value([options], '$.\"enabled\"') = 'true'")]
fn test_json_boolean_where(#[case] mut query: Builder, #[case] expected: &str) {
	query.from("items").where_("options->enabled", "=", true);
	assert_eq!(query.to_sql().unwrap(), expected);
	assert!(query.get_bindings().is_empty());
}

#[rstest]
fn test_mysql_json_contains() {
	let mut query = Builder::mysql();
	query
		.from("users")
		.where_json_contains("options->languages", serde_json::json!("en"));
	assert_eq!(
		query.to_sql().unwrap(),
		"select * from `users` where json_contains(`options`, ?, '$.\"languages\"')"
	);
	assert_eq!(query.get_bindings().len(), 1);
}

#[rstest]
fn test_postgres_json_contains() {
	let mut query = Builder::postgres();
	query
		.from("users")
		.where_json_doesnt_contain("options", serde_json::json!("en"));
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "users" where not ("options")::jsonb @> ?"#
	);
}

#[rstest]
fn test_sqlite_json_contains_unsupported() {
	let mut query = Builder::sqlite();
	query.from("users").where_json_contains("options", serde_json::json!("en"));
	assert!(matches!(
		query.to_sql(),
		Err(Error::UnsupportedFeature { .. })
	));
}

#[rstest]
#[case(Builder::mysql(), "select * from `users` where ifnull(json_contains_path(`options`, 'one', '$.\"languages\"'), 0)")]
#[case(Builder::postgres(), r#"select * from "users" where coalesce(jsonb_exists(("options")::jsonb, 'languages'), false)"#)]
#[case(Builder::sqlite(), r#"select * from "users" where json_type("options", '$."languages"') is not null"#)]
#[case(Builder::sql_server(), "select * from [users] where 'languages' in (select [key] from openjson([options]))")]
fn test_json_contains_key(#[case] mut query: Builder, #[case] expected: &str) {
	query.from("users").where_json_contains_key("options->languages");
	assert_eq!(query.to_sql().unwrap(), expected);
}

#[rstest]
#[case(Builder::mysql(), "select * from `users` where json_length(`options`, '$.\"languages\"') > ?")]
#[case(Builder::postgres(), r#"select * from "users" where jsonb_array_length(("options"->'languages')::jsonb) > ?"#)]
#[case(Builder::sql_server(), "select * from [users] where (select count(*) from openjson([options], '$.\"languages\"')) > ?")]
fn test_json_length(#[case] mut query: Builder, #[case] expected: &str) {
	query.from("users").where_json_length("options->languages", ">", 2);
	assert_eq!(query.to_sql().unwrap(), expected);
	assert_eq!(query.get_bindings().len(), 1);
}

// -------------------------------------------------------------------------
// Joins
// -------------------------------------------------------------------------

#[rstest]
fn test_inner_join() {
	let mut query = Builder::generic();
	query.from("users").join("contacts", "users.id", "=", "contacts.user_id");
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "users" inner join "contacts" on "users"."id" = "contacts"."user_id""#
	);
}

#[rstest]
fn test_join_with_or_condition() {
	let mut query = Builder::generic();
	query.from("users").join_on("contacts", |join| {
		join.on("users.id", "=", "contacts.id")
			.or_on("users.name", "=", "contacts.name");
	});
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "users" inner join "contacts" on "users"."id" = "contacts"."id" or "users"."name" = "contacts"."name""#
	);
}

#[rstest]
fn test_left_join() {
	let mut query = Builder::generic();
	query.from("users").left_join("posts", "users.id", "=", "posts.user_id");
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "users" left join "posts" on "users"."id" = "posts"."user_id""#
	);
}

#[rstest]
fn test_cross_join() {
	let mut query = Builder::generic();
	query.from("sizes").cross_join("colors");
	assert_eq!(query.to_sql().unwrap(), r#"select * from "sizes" cross join "colors""#);
}

#[rstest]
fn test_nested_join_parenthesizes_table_expression() {
	let mut query = Builder::generic();
	query.from("users").join_on("contacts", |join| {
		join.on("users.id", "=", "contacts.user_id")
			.join("addresses", "contacts.id", "=", "addresses.contact_id");
	});
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "users" inner join ("contacts" inner join "addresses" on "contacts"."id" = "addresses"."contact_id") on "users"."id" = "contacts"."user_id""#
	);
}

#[rstest]
fn test_join_value_constraint_binds_in_join_bucket() {
	let mut query = Builder::generic();
	query
		.from("users")
		.join_where("contacts", "contacts.kind", "=", "primary")
		.where_("id", "=", 1);
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "users" inner join "contacts" on "contacts"."kind" = ? where "id" = ?"#
	);
	assert_eq!(
		query.get_bindings(),
		Values(vec![Value::from("primary"), Value::from(1)])
	);
}

// -------------------------------------------------------------------------
// Subqueries
// -------------------------------------------------------------------------

#[rstest]
fn test_select_sub() {
	let mut query = Builder::generic();
	query.from("posts");
	query
		.select_sub(
			|q| {
				q.from("comments")
					.select(["id"])
					.where_column_eq("comments.post_id", "posts.id");
			},
			"latest",
		)
		.unwrap();
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select (select "id" from "comments" where "comments"."post_id" = "posts"."id") as "latest" from "posts""#
	);
}

#[rstest]
fn test_from_sub() {
	let mut query = Builder::generic();
	query
		.from_sub(
			|q| {
				q.from("users").where_("id", "=", 1);
			},
			"u",
		)
		.unwrap();
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from (select * from "users" where "id" = ?) as "u""#
	);
	assert_eq!(query.bindings.from, vec![Value::from(1)]);
}

#[rstest]
fn test_join_sub() {
	let mut query = Builder::generic();
	query.from("users");
	query
		.join_sub(
			|q| {
				q.from("contacts");
			},
			"sub",
			"users.id",
			"=",
			"sub.user_id",
		)
		.unwrap();
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from "users" inner join (select * from "contacts") as "sub" on "users"."id" = "sub"."user_id""#
	);
}

// -------------------------------------------------------------------------
// Unions
// -------------------------------------------------------------------------

#[rstest]
fn test_union() {
	let mut query = Builder::generic();
	query.from("users").where_("id", "=", 1);
	let mut other = Builder::generic();
	other.from("users").where_("id", "=", 2);
	query.union(other);
	assert_eq!(
		query.to_sql().unwrap(),
		r#"(select * from "users" where "id" = ?) union (select * from "users" where "id" = ?)"#
	);
	assert_eq!(query.get_bindings(), Values(vec![Value::from(1), Value::from(2)]));
}

#[rstest]
fn test_union_all() {
	let mut query = Builder::generic();
	query.from("users");
	let mut other = Builder::generic();
	other.from("posts");
	query.union_all(other);
	assert_eq!(
		query.to_sql().unwrap(),
		r#"(select * from "users") union all (select * from "posts")"#
	);
}

#[rstest]
fn test_union_with_trailing_order_and_limit() {
	let mut query = Builder::generic();
	query.from("users");
	let mut other = Builder::generic();
	other.from("posts");
	query.union(other);
	query.order_by("name").limit(10);
	assert_eq!(
		query.to_sql().unwrap(),
		r#"(select * from "users") union (select * from "posts") order by "name" asc limit 10"#
	);
}

#[rstest]
fn test_sqlite_union_wraps_members_as_subselects() {
	let mut query = Builder::sqlite();
	query.from("users");
	let mut other = Builder::sqlite();
	other.from("posts");
	query.union(other);
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select * from (select * from "users") union select * from (select * from "posts")"#
	);
}

#[rstest]
fn test_sqlserver_union_wraps_members_as_subselects() {
	let mut query = Builder::sql_server();
	query.from("users");
	let mut other = Builder::sql_server();
	other.from("posts");
	query.union(other);
	assert_eq!(
		query.to_sql().unwrap(),
		"select * from (select * from [users]) as [temp_table] union select * from (select * from [posts]) as [temp_table]"
	);
}

#[rstest]
fn test_sqlserver_union_pages_with_offset_fetch() {
	let mut query = Builder::sql_server();
	query.from("users");
	let mut other = Builder::sql_server();
	other.from("posts");
	query.union(other);
	query.skip(5).take(10);
	assert_eq!(
		query.to_sql().unwrap(),
		"select * from (select * from [users]) as [temp_table] union select * from (select * from [posts]) as [temp_table] order by (SELECT 0) offset 5 rows fetch next 10 rows only"
	);
}

#[rstest]
fn test_sqlserver_union_limit_without_offset_pages_from_zero() {
	let mut query = Builder::sql_server();
	query.from("users");
	let mut other = Builder::sql_server();
	other.from("posts");
	query.union(other);
	query.take(10);
	assert_eq!(
		query.to_sql().unwrap(),
		"select * from (select * from [users]) as [temp_table] union select * from (select * from [posts]) as [temp_table] order by (SELECT 0) offset 0 rows fetch next 10 rows only"
	);
}

#[rstest]
fn test_union_aggregate_wraps_the_whole_union() {
	let mut query = Builder::generic();
	query.from("users");
	let mut other = Builder::generic();
	other.from("posts");
	query.union(other);
	query.aggregate("count", &["*"]);
	assert_eq!(
		query.to_sql().unwrap(),
		r#"select count(*) as aggregate from ((select * from "users") union (select * from "posts")) as "temp_table""#
	);
}

// -------------------------------------------------------------------------
// Locks, hints, random ordering
// -------------------------------------------------------------------------

#[rstest]
#[case(Builder::mysql(), "select * from `users` where `id` = ? for update")]
#[case(Builder::postgres(), r#"select * from "users" where "id" = ? for update"#)]
#[case(Builder::sqlite(), r#"select * from "users" where "id" = ?"#)]
fn test_lock_for_update(#[case] mut query: Builder, #[case] expected: &str) {
	query.from("users").where_("id", "=", 1).lock_for_update();
	assert_eq!(query.to_sql().unwrap(), expected);
}

#[rstest]
#[case(Builder::mysql(), "select * from `users` lock in share mode")]
#[case(Builder::postgres(), r#"select * from "users" for share"#)]
fn test_shared_lock(#[case] mut query: Builder, #[case] expected: &str) {
	query.from("users").shared_lock();
	assert_eq!(query.to_sql().unwrap(), expected);
}

#[rstest]
fn test_sqlserver_lock_renders_as_table_hint() {
	let mut query = Builder::sql_server();
	query.from("users").where_("id", "=", 1).lock_for_update();
	assert_eq!(
		query.to_sql().unwrap(),
		"select * from [users] with(rowlock,updlock,holdlock) where [id] = ?"
	);
}

#[rstest]
#[case(IndexHintKind::Use, "select * from `users` use index (idx_email)")]
#[case(IndexHintKind::Force, "select * from `users` force index (idx_email)")]
#[case(IndexHintKind::Ignore, "select * from `users` ignore index (idx_email)")]
fn test_mysql_index_hints(#[case] kind: IndexHintKind, #[case] expected: &str) {
	let mut query = Builder::mysql();
	query.from("users");
	match kind {
		IndexHintKind::Use => query.use_index("idx_email"),
		IndexHintKind::Force => query.force_index("idx_email"),
		IndexHintKind::Ignore => query.ignore_index("idx_email"),
	};
	assert_eq!(query.to_sql().unwrap(), expected);
}

#[rstest]
fn test_sqlite_honors_only_forced_indexes() {
	let mut query = Builder::sqlite();
	query.from("users").force_index("idx_email");
	assert_eq!(query.to_sql().unwrap(), r#"select * from "users" indexed by idx_email"#);

	let mut query = Builder::sqlite();
	query.from("users").use_index("idx_email");
	assert_eq!(query.to_sql().unwrap(), r#"select * from "users""#);
}

#[rstest]
fn test_postgres_index_hints_unsupported() {
	let mut query = Builder::postgres();
	query.from("users").force_index("idx_email");
	assert!(matches!(
		query.to_sql(),
		Err(Error::UnsupportedFeature { .. })
	));
}

#[rstest]
fn test_sqlserver_index_hint() {
	let mut query = Builder::sql_server();
	query.from("users").force_index("idx_email");
	assert_eq!(query.to_sql().unwrap(), "select * from [users] with (index(idx_email))");
}

#[rstest]
#[case(Builder::generic(), r#"select * from "users" order by RANDOM()"#)]
#[case(Builder::mysql(), "select * from `users` order by RAND(100)")]
#[case(Builder::sql_server(), "select * from [users] order by NEWID()")]
fn test_in_random_order(#[case] mut query: Builder, #[case] expected: &str) {
	query.from("users").in_random_order("100");
	assert_eq!(query.to_sql().unwrap(), expected);
}

// -------------------------------------------------------------------------
// SQL Server pagination
// -------------------------------------------------------------------------

#[rstest]
fn test_sqlserver_top() {
	let mut query = Builder::sql_server();
	query.from("users").take(10);
	assert_eq!(query.to_sql().unwrap(), "select top 10 * from [users]");
}

#[rstest]
fn test_sqlserver_offset_fetch_synthesizes_order() {
	let mut query = Builder::sql_server();
	query.from("users").skip(10).take(10);
	assert_eq!(
		query.to_sql().unwrap(),
		"select * from [users] order by (SELECT 0) offset 10 rows fetch next 10 rows only"
	);
}

#[rstest]
fn test_sqlserver_offset_fetch_with_explicit_order() {
	let mut query = Builder::sql_server();
	query.from("users").order_by("name").skip(5).take(10);
	assert_eq!(
		query.to_sql().unwrap(),
		"select * from [users] order by [name] asc offset 5 rows fetch next 10 rows only"
	);
}

#[rstest]
fn test_sqlserver_offset_without_limit() {
	let mut query = Builder::sql_server();
	query.from("users").skip(10);
	assert_eq!(
		query.to_sql().unwrap(),
		"select * from [users] order by (SELECT 0) offset 10 rows"
	);
}

// -------------------------------------------------------------------------
// Inserts
// -------------------------------------------------------------------------

#[rstest]
fn test_insert_single_row() {
	let mut query = Builder::generic();
	query.from("users");
	let (sql, bindings) = query
		.insert_sql(&[vec![("email", Value::from("foo")), ("name", Value::from("bar"))]])
		.unwrap();
	assert_eq!(sql, r#"insert into "users" ("email", "name") values (?, ?)"#);
	assert_eq!(bindings.len(), 2);
}

#[rstest]
fn test_insert_multiple_rows_aligns_missing_columns_to_null() {
	let mut query = Builder::generic();
	query.from("users");
	let (sql, bindings) = query
		.insert_sql(&[
			vec![("email", Value::from("foo")), ("name", Value::from("bar"))],
			vec![("email", Value::from("baz"))],
		])
		.unwrap();
	assert_eq!(
		sql,
		r#"insert into "users" ("email", "name") values (?, ?), (?, ?)"#
	);
	assert_eq!(bindings.len(), 4);
	assert!(bindings.iter().last().unwrap().is_null());
}

#[rstest]
fn test_insert_empty_rows_compiles_default_values() {
	let mut query = Builder::generic();
	query.from("users");
	let (sql, bindings) = query.insert_sql(&[]).unwrap();
	assert_eq!(sql, r#"insert into "users" default values"#);
	assert!(bindings.is_empty());
}

#[rstest]
#[case(Builder::mysql(), "insert ignore into `users` (`email`) values (?)")]
#[case(Builder::postgres(), r#"insert into "users" ("email") values (?) on conflict do nothing"#)]
#[case(Builder::sqlite(), r#"insert or ignore into "users" ("email") values (?)"#)]
fn test_insert_or_ignore(#[case] mut query: Builder, #[case] expected: &str) {
	query.from("users");
	let (sql, _) = query
		.insert_or_ignore_sql(&[vec![("email", Value::from("foo"))]])
		.unwrap();
	assert_eq!(sql, expected);
}

#[rstest]
fn test_insert_or_ignore_unsupported_on_sqlserver() {
	let mut query = Builder::sql_server();
	query.from("users");
	let result = query.insert_or_ignore_sql(&[vec![("email", Value::from("foo"))]]);
	assert!(matches!(result, Err(Error::UnsupportedFeature { .. })));
}

#[rstest]
fn test_insert_using() {
	let mut query = Builder::generic();
	query.from("archive");
	let mut source = Builder::generic();
	source.from("users").select(["id", "email"]).where_("active", "=", true);
	let (sql, bindings) = query.insert_using_sql(&["id", "email"], source).unwrap();
	assert_eq!(
		sql,
		r#"insert into "archive" ("id", "email") select "id", "email" from "users" where "active" = ?"#
	);
	assert_eq!(bindings.len(), 1);
}

// -------------------------------------------------------------------------
// Upserts
// -------------------------------------------------------------------------

fn upsert_rows() -> Vec<Vec<(&'static str, Value)>> {
	vec![vec![("email", Value::from("foo")), ("name", Value::from("bar"))]]
}

#[rstest]
fn test_mysql_upsert() {
	let mut query = Builder::mysql();
	query.from("users");
	let (sql, bindings) = query
		.upsert_sql(
			&upsert_rows(),
			&["email"],
			&[UpsertUpdate::Column("name".to_string())],
		)
		.unwrap();
	assert_eq!(
		sql,
		"insert into `users` (`email`, `name`) values (?, ?) on duplicate key update `name` = values(`name`)"
	);
	assert_eq!(bindings.len(), 2);
}

#[rstest]
fn test_mysql_upsert_with_explicit_assignment() {
	let mut query = Builder::mysql();
	query.from("users");
	let (sql, bindings) = query
		.upsert_sql(
			&upsert_rows(),
			&["email"],
			&[
				UpsertUpdate::Column("name".to_string()),
				UpsertUpdate::Assign("votes".to_string(), Value::from(0)),
			],
		)
		.unwrap();
	assert_eq!(
		sql,
		"insert into `users` (`email`, `name`) values (?, ?) on duplicate key update `name` = values(`name`), `votes` = ?"
	);
	assert_eq!(bindings.len(), 3);
}

#[rstest]
#[case(
	Builder::postgres(),
	r#"insert into "users" ("email", "name") values (?, ?) on conflict ("email") do update set "name" = "excluded"."name""#
)]
#[case(
	Builder::sqlite(),
	r#"insert into "users" ("email", "name") values (?, ?) on conflict ("email") do update set "name" = "excluded"."name""#
)]
fn test_conflict_clause_upsert(#[case] mut query: Builder, #[case] expected: &str) {
	query.from("users");
	let (sql, _) = query
		.upsert_sql(
			&upsert_rows(),
			&["email"],
			&[UpsertUpdate::Column("name".to_string())],
		)
		.unwrap();
	assert_eq!(sql, expected);
}

#[rstest]
fn test_sqlserver_merge_upsert() {
	let mut query = Builder::sql_server();
	query.from("users");
	let (sql, _) = query
		.upsert_sql(
			&upsert_rows(),
			&["email"],
			&[UpsertUpdate::Column("name".to_string())],
		)
		.unwrap();
	assert_eq!(
		sql,
		"merge [users] using (values (?, ?)) [merge_source] ([email], [name]) on [merge_source].[email] = [users].[email] when matched then update set [name] = [merge_source].[name] when not matched then insert ([email], [name]) values ([email], [name]);"
	);
}

#[rstest]
fn test_upsert_unsupported_on_base_grammar() {
	let mut query = Builder::generic();
	query.from("users");
	let result = query.upsert_sql(
		&upsert_rows(),
		&["email"],
		&[UpsertUpdate::Column("name".to_string())],
	);
	assert!(matches!(result, Err(Error::UnsupportedFeature { .. })));
}

#[rstest]
fn test_upsert_requires_rows() {
	let mut query = Builder::mysql();
	query.from("users");
	let result = query.upsert_sql(&[], &["email"], &[]);
	assert_eq!(result.unwrap_err(), Error::EmptyUpsertValues);
}

#[rstest]
fn test_upsert_requires_unique_by() {
	let mut query = Builder::mysql();
	query.from("users");
	let result = query.upsert_sql(&upsert_rows(), &[], &[]);
	assert_eq!(result.unwrap_err(), Error::MissingUniqueBy);
}

// -------------------------------------------------------------------------
// Updates
// -------------------------------------------------------------------------

#[rstest]
fn test_update() {
	let mut query = Builder::generic();
	query.from("users").where_("id", "=", 1);
	let (sql, bindings) = query.update_sql(&[("email", Value::from("foo"))]).unwrap();
	assert_eq!(sql, r#"update "users" set "email" = ? where "id" = ?"#);
	assert_eq!(bindings, Values(vec![Value::from("foo"), Value::from(1)]));
}

#[rstest]
fn test_update_with_joins_binds_join_bucket_first() {
	let mut query = Builder::generic();
	query
		.from("users")
		.join_where("contacts", "contacts.kind", "=", "primary")
		.where_("id", "=", 1);
	let (sql, bindings) = query.update_sql(&[("email", Value::from("foo"))]).unwrap();
	assert_eq!(
		sql,
		r#"update "users" inner join "contacts" on "contacts"."kind" = ? set "email" = ? where "id" = ?"#
	);
	assert_eq!(
		bindings,
		Values(vec![Value::from("primary"), Value::from("foo"), Value::from(1)])
	);
}

#[rstest]
fn test_mysql_update_carries_orders_and_limit() {
	let mut query = Builder::mysql();
	query.from("users").where_("id", ">", 1).order_by("id").limit(5);
	let (sql, _) = query.update_sql(&[("email", Value::from("foo"))]).unwrap();
	assert_eq!(
		sql,
		"update `users` set `email` = ? where `id` > ? order by `id` asc limit 5"
	);
}

#[rstest]
fn test_postgres_limited_update_rewrites_through_ctid() {
	let mut query = Builder::postgres();
	query.from("users").where_("id", "=", 1).limit(5);
	let (sql, bindings) = query.update_sql(&[("email", Value::from("foo"))]).unwrap();
	assert_eq!(
		sql,
		r#"update "users" set "email" = ? where "ctid" in (select "users"."ctid" from "users" where "id" = ? limit 5)"#
	);
	assert_eq!(bindings, Values(vec![Value::from("foo"), Value::from(1)]));
}

#[rstest]
fn test_postgres_row_pointer_rewrite_addresses_the_alias() {
	let mut query = Builder::postgres();
	query.from("users as u").where_("id", "=", 1).limit(5);
	let (sql, _) = query.update_sql(&[("email", Value::from("foo"))]).unwrap();
	assert_eq!(
		sql,
		r#"update "users" as "u" set "email" = ? where "ctid" in (select "u"."ctid" from "users" as "u" where "id" = ? limit 5)"#
	);
}

#[rstest]
fn test_sqlite_limited_update_rewrites_through_rowid() {
	let mut query = Builder::sqlite();
	query.from("users").where_("id", "=", 1).limit(5);
	let (sql, _) = query.update_sql(&[("email", Value::from("foo"))]).unwrap();
	assert_eq!(
		sql,
		r#"update "users" set "email" = ? where "rowid" in (select "users"."rowid" from "users" where "id" = ? limit 5)"#
	);
}

#[rstest]
fn test_sqlserver_update_with_joins() {
	let mut query = Builder::sql_server();
	query
		.from("users")
		.join("contacts", "users.id", "=", "contacts.user_id")
		.where_("users.id", "=", 1);
	let (sql, bindings) = query.update_sql(&[("email", Value::from("foo"))]).unwrap();
	assert_eq!(
		sql,
		"update [users] set [email] = ? from [users] inner join [contacts] on [users].[id] = [contacts].[user_id] where [users].[id] = ?"
	);
	assert_eq!(bindings, Values(vec![Value::from("foo"), Value::from(1)]));
}

// -------------------------------------------------------------------------
// Deletes
// -------------------------------------------------------------------------

#[rstest]
fn test_delete() {
	let mut query = Builder::generic();
	query.from("users").where_("id", "=", 1);
	let (sql, bindings) = query.delete_sql().unwrap();
	assert_eq!(sql, r#"delete from "users" where "id" = ?"#);
	assert_eq!(bindings.len(), 1);
}

#[rstest]
fn test_mysql_delete_carries_limit() {
	let mut query = Builder::mysql();
	query.from("users").where_("id", ">", 1).limit(5);
	let (sql, _) = query.delete_sql().unwrap();
	assert_eq!(sql, "delete from `users` where `id` > ? limit 5");
}

#[rstest]
fn test_sqlserver_limited_delete_uses_top() {
	let mut query = Builder::sql_server();
	query.from("users").where_("id", "=", 1).limit(5);
	let (sql, _) = query.delete_sql().unwrap();
	assert_eq!(sql, "delete top (5) from [users] where [id] = ?");
}

#[rstest]
fn test_postgres_limited_delete_rewrites_through_ctid() {
	let mut query = Builder::postgres();
	query.from("users").where_("id", "=", 1).limit(5);
	let (sql, _) = query.delete_sql().unwrap();
	assert_eq!(
		sql,
		r#"delete from "users" where "ctid" in (select "users"."ctid" from "users" where "id" = ? limit 5)"#
	);
}

#[rstest]
fn test_sqlite_delete_with_joins_rewrites_through_rowid() {
	let mut query = Builder::sqlite();
	query
		.from("users")
		.join("contacts", "users.id", "=", "contacts.user_id")
		.where_("users.id", "=", 1);
	let (sql, _) = query.delete_sql().unwrap();
	assert_eq!(
		sql,
		r#"delete from "users" where "rowid" in (select "users"."rowid" from "users" inner join "contacts" on "users"."id" = "contacts"."user_id" where "users"."id" = ?)"#
	);
}

#[rstest]
fn test_sqlite_row_pointer_rewrite_addresses_the_alias() {
	let mut query = Builder::sqlite();
	query.from("users as u").where_("id", "=", 1).limit(5);
	let (sql, _) = query.delete_sql().unwrap();
	assert_eq!(
		sql,
		r#"delete from "users" as "u" where "rowid" in (select "u"."rowid" from "users" as "u" where "id" = ? limit 5)"#
	);
}

#[rstest]
fn test_delete_with_joins_names_the_target_alias() {
	let mut query = Builder::generic();
	query
		.from("users as u")
		.join("contacts", "u.id", "=", "contacts.user_id")
		.where_("u.id", "=", 1);
	let (sql, _) = query.delete_sql().unwrap();
	assert_eq!(
		sql,
		r#"delete "u" from "users" as "u" inner join "contacts" on "u"."id" = "contacts"."user_id" where "u"."id" = ?"#
	);
}

// -------------------------------------------------------------------------
// Binding parity
// -------------------------------------------------------------------------

#[rstest]
#[case(Dialect::Generic)]
#[case(Dialect::MySql)]
#[case(Dialect::Postgres)]
#[case(Dialect::Sqlite)]
#[case(Dialect::SqlServer)]
fn test_placeholders_match_binding_count(#[case] dialect: Dialect) {
	let mut query = Builder::new(dialect);
	query
		.select_raw("price * ? as discounted", vec![Value::from(2)])
		.from("users")
		.join_where("contacts", "contacts.kind", "=", "primary")
		.where_("id", "=", 1)
		.where_in("role", ["admin", "editor"])
		.where_between("age", 18, 65)
		.group_by_raw("city, ?", vec![Value::from(1)])
		.having_raw("count(*) > ?", vec![Value::from(3)])
		.order_by_raw("length(name) + ?", vec![Value::from(4)]);
	let (sql, bindings) = query.build().unwrap();
	assert_eq!(placeholder_count(&sql), bindings.len());
}
