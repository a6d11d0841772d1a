use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};

use super::types::{SqlResult, SqlValue};

/// Build a `query_as` for the generated statement with every parameter bound in order
pub fn query_as<'q, O>(sql: &'q SqlResult) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    sql.log();
    sql.params
        .iter()
        .cloned()
        .fold(sqlx::query_as::<_, O>(&sql.query), |q, v| bind_param_query_as(q, v))
}

fn bind_param_query_as<'q, O>(
    q: QueryAs<'q, Postgres, O, PgArguments>,
    v: SqlValue,
) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        SqlValue::Text(s) => q.bind(s),
        SqlValue::Int(i) => q.bind(i),
        SqlValue::Decimal(d) => q.bind(d),
        SqlValue::Bool(b) => q.bind(b),
    }
}
