use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool};

use super::error::{is_foreign_key_violation, ModelError};
use super::patch::{parse_patch, PatchField};
use super::validate;
use crate::sql::{bind, sql_for_partial_update, Column, Op, Predicate, SqlResult, SqlValue, WhereClause};

const JOB_COLUMNS: &str = "id, title, salary, equity, company_handle";

/// Keys naming the owning company; never updatable
const IMMUTABLE_KEYS: &[&str] = &["companyHandle", "company_handle"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    #[serde(alias = "company_handle")]
    pub company_handle: String,
}

impl NewJob {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate::check_non_empty(&self.title).map_err(|e| ModelError::invalid_field("title", e))?;
        if let Some(salary) = self.salary {
            validate::check_non_negative(salary).map_err(|e| ModelError::invalid_field("salary", e))?;
        }
        if let Some(equity) = &self.equity {
            validate::check_equity(equity).map_err(|e| ModelError::invalid_field("equity", e))?;
        }
        validate::check_handle(&self.company_handle)
            .map_err(|e| ModelError::invalid_field("companyHandle", e))?;
        Ok(())
    }
}

/// Search filters for [`Job::find_all`].
///
/// `hasEquity=false` is the same as leaving it out: it never restricts to
/// jobs without equity.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilter {
    pub min_salary: Option<i32>,
    pub title: Option<String>,
    pub has_equity: Option<bool>,
}

impl JobFilter {
    pub fn to_sql(&self) -> Result<SqlResult, ModelError> {
        let mut clause = WhereClause::new();
        if let Some(min) = self.min_salary {
            validate::check_non_negative(min).map_err(|e| ModelError::invalid_field("minSalary", e))?;
            clause.push(Predicate::param("salary", Op::Gte, min));
        }
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            clause.push(Predicate::contains("title", title));
        }
        if self.has_equity == Some(true) {
            clause.push(Predicate::literal("equity", Op::Gt, "0"));
        }

        Ok(clause.build(&format!("SELECT {} FROM jobs", JOB_COLUMNS), "title"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobField {
    Title,
    Salary,
    Equity,
}

impl Column for JobField {
    fn column(self) -> &'static str {
        match self {
            JobField::Title => "title",
            JobField::Salary => "salary",
            JobField::Equity => "equity",
        }
    }
}

impl PatchField for JobField {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "title" => Some(JobField::Title),
            "salary" => Some(JobField::Salary),
            "equity" => Some(JobField::Equity),
            _ => None,
        }
    }

    fn parse_value(self, value: &Value) -> Result<SqlValue, String> {
        match self {
            JobField::Title => {
                let v = validate::text(value, false)?;
                if let SqlValue::Text(Some(s)) = &v {
                    validate::check_non_empty(s)?;
                }
                Ok(v)
            }
            JobField::Salary => {
                let v = validate::integer(value, true)?;
                if let SqlValue::Int(Some(n)) = v {
                    validate::check_non_negative(n)?;
                }
                Ok(v)
            }
            JobField::Equity => {
                let v = validate::decimal(value, true)?;
                if let SqlValue::Decimal(Some(d)) = &v {
                    validate::check_equity(d)?;
                }
                Ok(v)
            }
        }
    }
}

impl Job {
    pub async fn create(pool: &PgPool, data: NewJob) -> Result<Job, ModelError> {
        let query = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) VALUES ($1, $2, $3, $4) RETURNING {}",
            JOB_COLUMNS
        );
        let job = sqlx::query_as::<_, Job>(&query)
            .bind(&data.title)
            .bind(data.salary)
            .bind(data.equity)
            .bind(&data.company_handle)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    ModelError::bad_request(format!("No company: {}", data.company_handle))
                } else {
                    e.into()
                }
            })?;

        tracing::info!("Created job {} for {}", job.id, job.company_handle);
        Ok(job)
    }

    /// All jobs matching `filter`, ordered by title
    pub async fn find_all(pool: &PgPool, filter: &JobFilter) -> Result<Vec<Job>, ModelError> {
        let sql = filter.to_sql()?;
        let jobs = bind::query_as::<Job>(&sql).fetch_all(pool).await?;
        Ok(jobs)
    }

    pub async fn get(pool: &PgPool, id: i32) -> Result<Job, ModelError> {
        let query = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);
        let job = sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        job.ok_or_else(|| ModelError::not_found(format!("No job: {}", id)))
    }

    /// UPDATE statement for a partial update of job `id`.
    ///
    /// Any attempt to move the job to another company is dropped before
    /// the SET clause is built.
    pub fn update_sql(id: i32, payload: &Map<String, Value>) -> Result<SqlResult, ModelError> {
        let fields = parse_patch::<JobField>(payload, IMMUTABLE_KEYS)?;
        let set = sql_for_partial_update(fields)?;
        let query = format!(
            "UPDATE jobs SET {} WHERE id = {} RETURNING {}",
            set.set_cols,
            set.next_placeholder(),
            JOB_COLUMNS
        );
        let mut params = set.values;
        params.push(SqlValue::from(id));
        Ok(SqlResult::new(query, params))
    }

    pub async fn update(pool: &PgPool, id: i32, payload: &Map<String, Value>) -> Result<Job, ModelError> {
        let sql = Self::update_sql(id, payload)?;
        let job = bind::query_as::<Job>(&sql).fetch_optional(pool).await?;
        job.ok_or_else(|| ModelError::not_found(format!("No job: {}", id)))
    }

    pub async fn remove(pool: &PgPool, id: i32) -> Result<(), ModelError> {
        let deleted = sqlx::query_scalar::<_, i32>("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match deleted {
            Some(id) => {
                tracing::info!("Removed job {}", id);
                Ok(())
            }
            None => Err(ModelError::not_found(format!("No job: {}", id))),
        }
    }
}
