use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Company, NewCompany};
use crate::database::partial_update::{self, ChangeSet, FieldNameMap, SqlValue};
use crate::database::query_builder::bind_all_as;
use crate::filter::CompanyFilter;

const COMPANY_COLUMNS: &str = "handle, name, description, num_employees, logo_url";

pub const COMPANY_FIELDS: FieldNameMap =
    FieldNameMap::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")]);

pub struct CompanyStore {
    pool: PgPool,
}

impl CompanyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a company. A taken handle is a bad request.
    pub async fn create(&self, data: &NewCompany) -> Result<Company, DatabaseError> {
        let duplicate: Option<(String,)> =
            sqlx::query_as("SELECT handle FROM companies WHERE handle = $1")
                .bind(&data.handle)
                .fetch_optional(&self.pool)
                .await?;
        if duplicate.is_some() {
            return Err(DatabaseError::bad_request(format!("Duplicate company: {}", data.handle)));
        }

        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            COMPANY_COLUMNS
        );
        let result = sqlx::query_as::<_, Company>(&sql)
            .bind(&data.handle)
            .bind(&data.name)
            .bind(&data.description)
            .bind(data.num_employees)
            .bind(&data.logo_url)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(company) => {
                tracing::info!("Created company {}", company.handle);
                Ok(company)
            }
            // names are unique too
            Err(e) => {
                let err = DatabaseError::from(e);
                if err.is_unique_violation() {
                    Err(DatabaseError::bad_request(format!("Duplicate company: {}", data.name)))
                } else {
                    Err(err)
                }
            }
        }
    }

    pub async fn find_all(&self, filter: &CompanyFilter) -> Result<Vec<Company>, DatabaseError> {
        let w = filter.to_where();
        let sql = format!("SELECT {} FROM companies{} ORDER BY name", COMPANY_COLUMNS, w.clause);
        let rows = bind_all_as(sqlx::query_as::<_, Company>(&sql), &w.params)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, handle: &str) -> Result<Company, DatabaseError> {
        let sql = format!("SELECT {} FROM companies WHERE handle = $1", COMPANY_COLUMNS);
        sqlx::query_as::<_, Company>(&sql)
            .bind(handle)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found(format!("No company: {}", handle)))
    }

    /// Partial update; only the fields present in `changes` are written.
    pub async fn update(&self, handle: &str, changes: &ChangeSet) -> Result<Company, DatabaseError> {
        let fragment = partial_update::build(changes, &COMPANY_FIELDS)?;
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {}",
            fragment.set_clause,
            fragment.next_placeholder(),
            COMPANY_COLUMNS
        );

        let result = bind_all_as(sqlx::query_as::<_, Company>(&sql), &fragment.values)
            .bind(handle)
            .fetch_optional(&self.pool)
            .await;

        match result {
            Ok(Some(company)) => Ok(company),
            Ok(None) => Err(DatabaseError::not_found(format!("No company: {}", handle))),
            // a rename onto another company's name
            Err(e) => {
                let err = DatabaseError::from(e);
                if err.is_unique_violation() {
                    let name = match changes.get("name") {
                        Some(SqlValue::Text(name)) => name.as_str(),
                        _ => handle,
                    };
                    Err(DatabaseError::bad_request(format!("Duplicate company: {}", name)))
                } else {
                    Err(err)
                }
            }
        }
    }

    pub async fn remove(&self, handle: &str) -> Result<(), DatabaseError> {
        let deleted: Option<(String,)> =
            sqlx::query_as("DELETE FROM companies WHERE handle = $1 RETURNING handle")
                .bind(handle)
                .fetch_optional(&self.pool)
                .await?;
        match deleted {
            Some(_) => {
                tracing::info!("Deleted company {}", handle);
                Ok(())
            }
            None => Err(DatabaseError::not_found(format!("No company: {}", handle))),
        }
    }
}
