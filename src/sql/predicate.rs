use std::fmt::Write;

use super::types::{SqlResult, SqlValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Gt,
    Gte,
    Lt,
    Lte,
    ILike,
}

impl Op {
    pub fn to_sql(self) -> &'static str {
        match self {
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::ILike => "ILIKE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Bound as the next positional parameter
    Param(SqlValue),
    /// Written into the SQL text as-is; only ever a compile-time constant
    Literal(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: &'static str,
    pub op: Op,
    pub operand: Operand,
}

impl Predicate {
    pub fn param(column: &'static str, op: Op, value: impl Into<SqlValue>) -> Self {
        Self { column, op, operand: Operand::Param(value.into()) }
    }

    pub fn literal(column: &'static str, op: Op, literal: &'static str) -> Self {
        Self { column, op, operand: Operand::Literal(literal) }
    }

    /// Case-insensitive substring match on `column`
    pub fn contains(column: &'static str, fragment: &str) -> Self {
        Self::param(column, Op::ILike, format!("%{}%", escape_like(fragment)))
    }
}

/// Escape LIKE metacharacters so the fragment matches literally
pub fn escape_like(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Ordered predicate accumulator for a single-table SELECT.
///
/// Predicates are rendered in push order; the first is introduced with
/// `WHERE`, every later one with `AND`.
#[derive(Debug, Clone, Default)]
pub struct WhereClause {
    predicates: Vec<Predicate>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, predicate: Predicate) -> &mut Self {
        self.predicates.push(predicate);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn build(self, base_query: &str, order_by: &str) -> SqlResult {
        let mut query = base_query.to_string();
        let mut params = Vec::new();
        let mut keyword = "WHERE";

        for predicate in self.predicates {
            let operand = match predicate.operand {
                Operand::Param(value) => {
                    params.push(value);
                    format!("${}", params.len())
                }
                Operand::Literal(literal) => literal.to_string(),
            };
            // Writing to a String cannot fail
            let _ = write!(
                query,
                " {} \"{}\" {} {}",
                keyword,
                predicate.column,
                predicate.op.to_sql(),
                operand
            );
            keyword = "AND";
        }

        let _ = write!(query, " ORDER BY {}", order_by);
        SqlResult { query, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "SELECT id FROM things";

    #[test]
    fn no_predicates_only_orders() {
        let sql = WhereClause::new().build(BASE, "name");
        assert_eq!(sql.query, "SELECT id FROM things ORDER BY name");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn first_predicate_uses_where_rest_use_and() {
        let mut clause = WhereClause::new();
        clause
            .push(Predicate::param("size", Op::Gte, 1))
            .push(Predicate::param("size", Op::Lte, 9))
            .push(Predicate::contains("name", "net"));
        let sql = clause.build(BASE, "name");
        assert_eq!(
            sql.query,
            r#"SELECT id FROM things WHERE "size" >= $1 AND "size" <= $2 AND "name" ILIKE $3 ORDER BY name"#
        );
        assert_eq!(
            sql.params,
            vec![SqlValue::from(1), SqlValue::from(9), SqlValue::from("%net%")]
        );
    }

    #[test]
    fn literal_operand_takes_no_placeholder() {
        let mut clause = WhereClause::new();
        clause
            .push(Predicate::literal("equity", Op::Gt, "0"))
            .push(Predicate::param("salary", Op::Gte, 5));
        let sql = clause.build(BASE, "title");
        assert_eq!(
            sql.query,
            r#"SELECT id FROM things WHERE "equity" > 0 AND "salary" >= $1 ORDER BY title"#
        );
        assert_eq!(sql.params, vec![SqlValue::from(5)]);
    }

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(
            Predicate::contains("name", "a_b").operand,
            Operand::Param(SqlValue::from("%a\\_b%"))
        );
    }
}
