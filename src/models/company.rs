use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool};

use super::error::{unique_violation, ModelError};
use super::patch::{parse_patch, PatchField};
use super::validate;
use crate::sql::{bind, sql_for_partial_update, Column, Op, Predicate, SqlResult, SqlValue, WhereClause};

const COMPANY_COLUMNS: &str = "handle, name, description, num_employees, logo_url";

const NAME_CONSTRAINT: &str = "companies_name_key";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// A job as listed under its company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyJob {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<CompanyJob>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl NewCompany {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate::check_handle(&self.handle).map_err(|e| ModelError::invalid_field("handle", e))?;
        validate::check_non_empty(&self.name).map_err(|e| ModelError::invalid_field("name", e))?;
        if let Some(n) = self.num_employees {
            validate::check_non_negative(n).map_err(|e| ModelError::invalid_field("numEmployees", e))?;
        }
        if let Some(url) = &self.logo_url {
            validate::check_url(url).map_err(|e| ModelError::invalid_field("logoUrl", e))?;
        }
        Ok(())
    }
}

/// Search filters for [`Company::find_all`]; every filter is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyFilter {
    pub min_employees: Option<i32>,
    pub max_employees: Option<i32>,
    pub name: Option<String>,
}

impl CompanyFilter {
    pub fn to_sql(&self) -> Result<SqlResult, ModelError> {
        if let (Some(min), Some(max)) = (self.min_employees, self.max_employees) {
            if min > max {
                return Err(ModelError::bad_request(
                    "minEmployees cannot be greater than maxEmployees",
                ));
            }
        }

        let mut clause = WhereClause::new();
        if let Some(min) = self.min_employees {
            validate::check_non_negative(min).map_err(|e| ModelError::invalid_field("minEmployees", e))?;
            clause.push(Predicate::param("num_employees", Op::Gte, min));
        }
        if let Some(max) = self.max_employees {
            validate::check_non_negative(max).map_err(|e| ModelError::invalid_field("maxEmployees", e))?;
            clause.push(Predicate::param("num_employees", Op::Lte, max));
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            clause.push(Predicate::contains("name", name));
        }

        Ok(clause.build(&format!("SELECT {} FROM companies", COMPANY_COLUMNS), "name"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyField {
    Name,
    Description,
    NumEmployees,
    LogoUrl,
}

impl Column for CompanyField {
    fn column(self) -> &'static str {
        match self {
            CompanyField::Name => "name",
            CompanyField::Description => "description",
            CompanyField::NumEmployees => "num_employees",
            CompanyField::LogoUrl => "logo_url",
        }
    }
}

impl PatchField for CompanyField {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "name" => Some(CompanyField::Name),
            "description" => Some(CompanyField::Description),
            "numEmployees" => Some(CompanyField::NumEmployees),
            "logoUrl" => Some(CompanyField::LogoUrl),
            _ => None,
        }
    }

    fn parse_value(self, value: &Value) -> Result<SqlValue, String> {
        match self {
            CompanyField::Name => {
                let v = validate::text(value, false)?;
                if let SqlValue::Text(Some(s)) = &v {
                    validate::check_non_empty(s)?;
                }
                Ok(v)
            }
            CompanyField::Description => validate::text(value, false),
            CompanyField::NumEmployees => {
                let v = validate::integer(value, true)?;
                if let SqlValue::Int(Some(n)) = v {
                    validate::check_non_negative(n)?;
                }
                Ok(v)
            }
            CompanyField::LogoUrl => {
                let v = validate::text(value, true)?;
                if let SqlValue::Text(Some(s)) = &v {
                    validate::check_url(s)?;
                }
                Ok(v)
            }
        }
    }
}

/// One row of the company/jobs outer join
#[derive(Debug, Clone, FromRow)]
pub(crate) struct CompanyJobRow {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
    pub id: Option<i32>,
    pub title: Option<String>,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

impl CompanyDetail {
    /// Fold joined rows into one company with its jobs. `None` when there are no rows.
    pub(crate) fn from_rows(rows: Vec<CompanyJobRow>) -> Option<Self> {
        let first = rows.first()?;
        let company = Company {
            handle: first.handle.clone(),
            name: first.name.clone(),
            description: first.description.clone(),
            num_employees: first.num_employees,
            logo_url: first.logo_url.clone(),
        };

        let jobs = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id?;
                Some(CompanyJob {
                    id,
                    title: row.title.unwrap_or_default(),
                    salary: row.salary,
                    equity: row.equity,
                })
            })
            .collect();

        Some(CompanyDetail { company, jobs })
    }
}

fn duplicate_error(constraint: &str, handle: &str) -> ModelError {
    if constraint == NAME_CONSTRAINT {
        ModelError::bad_request("Duplicate company name")
    } else {
        ModelError::bad_request(format!("Duplicate company: {}", handle))
    }
}

impl Company {
    /// Insert a new company.
    ///
    /// The existence check and the insert are separate statements; a
    /// concurrent insert of the same handle surfaces as the same duplicate
    /// error through the primary-key violation.
    pub async fn create(pool: &PgPool, data: NewCompany) -> Result<Company, ModelError> {
        let existing = sqlx::query_scalar::<_, String>("SELECT handle FROM companies WHERE handle = $1")
            .bind(&data.handle)
            .fetch_optional(pool)
            .await?;

        if existing.is_some() {
            return Err(ModelError::bad_request(format!("Duplicate company: {}", data.handle)));
        }

        let query = format!(
            "INSERT INTO companies ({cols}) VALUES ($1, $2, $3, $4, $5) RETURNING {cols}",
            cols = COMPANY_COLUMNS
        );
        let company = sqlx::query_as::<_, Company>(&query)
            .bind(&data.handle)
            .bind(&data.name)
            .bind(&data.description)
            .bind(data.num_employees)
            .bind(&data.logo_url)
            .fetch_one(pool)
            .await
            .map_err(|e| match unique_violation(&e) {
                Some(constraint) => duplicate_error(&constraint, &data.handle),
                None => e.into(),
            })?;

        tracing::info!("Created company {}", company.handle);
        Ok(company)
    }

    /// All companies matching `filter`, ordered by name
    pub async fn find_all(pool: &PgPool, filter: &CompanyFilter) -> Result<Vec<Company>, ModelError> {
        let sql = filter.to_sql()?;
        let companies = bind::query_as::<Company>(&sql).fetch_all(pool).await?;
        Ok(companies)
    }

    /// A single company with its jobs
    pub async fn get(pool: &PgPool, handle: &str) -> Result<CompanyDetail, ModelError> {
        let rows = sqlx::query_as::<_, CompanyJobRow>(
            "SELECT c.handle, c.name, c.description, c.num_employees, c.logo_url,
                    j.id, j.title, j.salary, j.equity
             FROM companies AS c
             LEFT JOIN jobs AS j ON c.handle = j.company_handle
             WHERE c.handle = $1
             ORDER BY j.id",
        )
        .bind(handle)
        .fetch_all(pool)
        .await?;

        CompanyDetail::from_rows(rows).ok_or_else(|| ModelError::not_found(format!("No company: {}", handle)))
    }

    /// UPDATE statement for a partial update of `handle`
    pub fn update_sql(handle: &str, payload: &Map<String, Value>) -> Result<SqlResult, ModelError> {
        let fields = parse_patch::<CompanyField>(payload, &[])?;
        let set = sql_for_partial_update(fields)?;
        let query = format!(
            "UPDATE companies SET {} WHERE handle = {} RETURNING {}",
            set.set_cols,
            set.next_placeholder(),
            COMPANY_COLUMNS
        );
        let mut params = set.values;
        params.push(SqlValue::from(handle));
        Ok(SqlResult::new(query, params))
    }

    /// Change only the supplied fields of a company
    pub async fn update(pool: &PgPool, handle: &str, payload: &Map<String, Value>) -> Result<Company, ModelError> {
        let sql = Self::update_sql(handle, payload)?;
        let company = bind::query_as::<Company>(&sql)
            .fetch_optional(pool)
            .await
            .map_err(|e| match unique_violation(&e) {
                Some(constraint) => duplicate_error(&constraint, handle),
                None => e.into(),
            })?;

        company.ok_or_else(|| ModelError::not_found(format!("No company: {}", handle)))
    }

    pub async fn remove(pool: &PgPool, handle: &str) -> Result<(), ModelError> {
        let deleted = sqlx::query_scalar::<_, String>("DELETE FROM companies WHERE handle = $1 RETURNING handle")
            .bind(handle)
            .fetch_optional(pool)
            .await?;

        match deleted {
            Some(handle) => {
                tracing::info!("Removed company {}", handle);
                Ok(())
            }
            None => Err(ModelError::not_found(format!("No company: {}", handle))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    const SELECT: &str = "SELECT handle, name, description, num_employees, logo_url FROM companies";

    fn row(id: Option<i32>, title: Option<&str>) -> CompanyJobRow {
        CompanyJobRow {
            handle: "c1".to_string(),
            name: "C1".to_string(),
            description: "Desc1".to_string(),
            num_employees: Some(1),
            logo_url: Some("http://c1.img".to_string()),
            id,
            title: title.map(str::to_string),
            salary: id.map(|i| i * 100),
            equity: id.map(|_| Decimal::from_str("0.1").unwrap()),
        }
    }

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn filter_without_fields_orders_by_name() {
        let sql = CompanyFilter::default().to_sql().unwrap();
        assert_eq!(sql.query, format!("{} ORDER BY name", SELECT));
        assert!(sql.params.is_empty());
    }

    #[test]
    fn filter_appends_in_declared_order() {
        let filter = CompanyFilter {
            name: Some("Net".to_string()),
            min_employees: Some(2),
            max_employees: Some(3),
        };
        let sql = filter.to_sql().unwrap();
        assert_eq!(
            sql.query,
            format!(
                r#"{} WHERE "num_employees" >= $1 AND "num_employees" <= $2 AND "name" ILIKE $3 ORDER BY name"#,
                SELECT
            )
        );
        assert_eq!(sql.params, vec![SqlValue::from(2), SqlValue::from(3), SqlValue::from("%Net%")]);
    }

    #[test]
    fn filter_max_alone_takes_where() {
        let filter = CompanyFilter { max_employees: Some(2), ..Default::default() };
        let sql = filter.to_sql().unwrap();
        assert_eq!(sql.query, format!(r#"{} WHERE "num_employees" <= $1 ORDER BY name"#, SELECT));
    }

    #[test]
    fn filter_min_over_max_is_bad_request() {
        let filter = CompanyFilter {
            min_employees: Some(3),
            max_employees: Some(2),
            name: None,
        };
        assert!(matches!(filter.to_sql(), Err(ModelError::BadRequest(_))));
    }

    #[test]
    fn filter_empty_name_is_ignored() {
        let filter = CompanyFilter { name: Some(String::new()), ..Default::default() };
        assert!(filter.to_sql().unwrap().params.is_empty());
    }

    #[test]
    fn filter_rejects_unknown_keys() {
        let parsed: Result<CompanyFilter, _> = serde_json::from_value(json!({ "nope": 1 }));
        assert!(parsed.is_err());
    }

    #[test]
    fn update_sql_translates_columns() {
        let payload = obj(json!({ "numEmployees": 10, "logoUrl": null, "name": "New" }));
        let sql = Company::update_sql("c1", &payload).unwrap();
        assert_eq!(
            sql.query,
            r#"UPDATE companies SET "num_employees"=$1, "logo_url"=$2, "name"=$3 WHERE handle = $4 RETURNING handle, name, description, num_employees, logo_url"#
        );
        assert_eq!(
            sql.params,
            vec![
                SqlValue::from(10),
                SqlValue::Text(None),
                SqlValue::from("New"),
                SqlValue::from("c1"),
            ]
        );
    }

    #[test]
    fn update_sql_rejects_empty_and_unknown() {
        assert!(matches!(
            Company::update_sql("c1", &Map::new()),
            Err(ModelError::BadRequest(ref m)) if m == "No data"
        ));
        match Company::update_sql("c1", &obj(json!({ "handle": "c9", "numEmployees": "ten" }))) {
            Err(ModelError::Validation { field_errors, .. }) => {
                assert!(field_errors.contains_key("handle"));
                assert!(field_errors.contains_key("numEmployees"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn detail_from_rows_collects_jobs() {
        let detail = CompanyDetail::from_rows(vec![row(Some(1), Some("J1")), row(Some(2), Some("J2"))]).unwrap();
        assert_eq!(detail.company.handle, "c1");
        assert_eq!(detail.jobs.len(), 2);
        assert_eq!(detail.jobs[0].title, "J1");
        assert_eq!(detail.jobs[1].salary, Some(200));
    }

    #[test]
    fn detail_without_jobs_has_empty_list() {
        let detail = CompanyDetail::from_rows(vec![row(None, None)]).unwrap();
        assert!(detail.jobs.is_empty());
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["jobs"], json!([]));
        assert_eq!(value["numEmployees"], json!(1));
    }

    #[test]
    fn detail_from_no_rows_is_none() {
        assert!(CompanyDetail::from_rows(vec![]).is_none());
    }

    #[test]
    fn new_company_validation() {
        let good: NewCompany = serde_json::from_value(json!({
            "handle": "new",
            "name": "New",
            "description": "New Description",
            "numEmployees": 1,
            "logoUrl": "http://new.img"
        }))
        .unwrap();
        assert!(good.validate().is_ok());

        let bad = NewCompany { handle: "Not Valid".to_string(), ..good.clone() };
        assert!(matches!(bad.validate(), Err(ModelError::Validation { .. })));

        let bad = NewCompany { num_employees: Some(-1), ..good };
        assert!(bad.validate().is_err());

        let unknown: Result<NewCompany, _> = serde_json::from_value(json!({
            "handle": "new", "name": "New", "description": "d", "extra": true
        }));
        assert!(unknown.is_err());
    }
}
