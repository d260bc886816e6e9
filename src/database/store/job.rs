use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Job, NewJob};
use crate::database::partial_update::{self, ChangeSet, FieldNameMap};
use crate::database::query_builder::bind_all_as;
use crate::filter::JobFilter;

const JOB_COLUMNS: &str = "id, title, salary, equity::text AS equity, company_handle";

/// Job fields share their column names.
pub const JOB_FIELDS: FieldNameMap = FieldNameMap::EMPTY;

pub struct JobStore {
    pool: PgPool,
}

impl JobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a job. The same title at the same company is a duplicate.
    pub async fn create(&self, data: &NewJob) -> Result<Job, DatabaseError> {
        let duplicate: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM jobs WHERE title = $1 AND company_handle = $2")
                .bind(&data.title)
                .bind(&data.company_handle)
                .fetch_optional(&self.pool)
                .await?;
        if duplicate.is_some() {
            return Err(DatabaseError::bad_request(format!(
                "Duplicate job: {} at {}",
                data.title, data.company_handle
            )));
        }

        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            JOB_COLUMNS
        );
        let result = sqlx::query_as::<_, Job>(&sql)
            .bind(&data.title)
            .bind(data.salary)
            .bind(data.equity)
            .bind(&data.company_handle)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(job) => {
                tracing::info!("Created job {} ({})", job.id, job.title);
                Ok(job)
            }
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23503") => Err(
                DatabaseError::not_found(format!("No company: {}", data.company_handle)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_all(&self, filter: &JobFilter) -> Result<Vec<Job>, DatabaseError> {
        let w = filter.to_where();
        let sql = format!("SELECT {} FROM jobs{} ORDER BY title", JOB_COLUMNS, w.clause);
        let rows = bind_all_as(sqlx::query_as::<_, Job>(&sql), &w.params)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<Job, DatabaseError> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);
        sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found(format!("No job: {}", id)))
    }

    pub async fn update(&self, id: i32, changes: &ChangeSet) -> Result<Job, DatabaseError> {
        let fragment = partial_update::build(changes, &JOB_FIELDS)?;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {}",
            fragment.set_clause,
            fragment.next_placeholder(),
            JOB_COLUMNS
        );

        bind_all_as(sqlx::query_as::<_, Job>(&sql), &fragment.values)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found(format!("No job: {}", id)))
    }

    pub async fn remove(&self, id: i32) -> Result<(), DatabaseError> {
        let deleted: Option<(i32,)> = sqlx::query_as("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match deleted {
            Some(_) => {
                tracing::info!("Deleted job {}", id);
                Ok(())
            }
            None => Err(DatabaseError::not_found(format!("No job: {}", id))),
        }
    }
}
