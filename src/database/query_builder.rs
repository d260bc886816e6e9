use sqlx::{postgres::PgArguments, FromRow, Postgres};

use crate::database::partial_update::SqlValue;

type QueryAs<'q, O> = sqlx::query::QueryAs<'q, Postgres, O, PgArguments>;

// There is no untyped NULL parameter; int8 assignment-casts to every
// nullable column in the schema (integer, numeric, text).
pub fn bind_param_query_as<'q, O>(q: QueryAs<'q, O>, v: &'q SqlValue) -> QueryAs<'q, O>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        SqlValue::Null => q.bind(None::<i64>),
        SqlValue::Bool(b) => q.bind(*b),
        SqlValue::Int(i) => q.bind(*i),
        SqlValue::Float(f) => q.bind(*f),
        SqlValue::Text(s) => q.bind(s.as_str()),
    }
}

/// Binds every value in order.
pub fn bind_all_as<'q, O>(mut q: QueryAs<'q, O>, values: &'q [SqlValue]) -> QueryAs<'q, O>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    for v in values {
        q = bind_param_query_as(q, v);
    }
    q
}
