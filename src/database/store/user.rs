use sqlx::{FromRow, PgPool};

use crate::auth::password::{hash_password, verify_password};
use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, User, UserDetail};
use crate::database::partial_update::{self, ChangeSet, FieldNameMap, SqlValue};
use crate::database::query_builder::bind_all_as;

const USER_COLUMNS: &str = "username, first_name, last_name, email, is_admin";

pub const USER_FIELDS: FieldNameMap = FieldNameMap::new(&[
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("isAdmin", "is_admin"),
]);

// Users joined with their applications; `jobs` is empty rather than NULL
const USER_DETAIL_SELECT: &str = r#"
    SELECT u.username, u.first_name, u.last_name, u.email, u.is_admin,
           COALESCE(array_agg(a.job_id ORDER BY a.job_id) FILTER (WHERE a.job_id IS NOT NULL), '{}') AS jobs
    FROM users u
    LEFT JOIN applications a ON a.username = u.username
"#;

#[derive(FromRow)]
struct UserWithPassword {
    #[sqlx(flatten)]
    user: User,
    password: String,
}

pub struct UserStore {
    pool: PgPool,
    work_factor: u32,
}

impl UserStore {
    pub fn new(pool: PgPool, work_factor: u32) -> Self {
        Self { pool, work_factor }
    }

    /// Checks credentials. Unknown user and wrong password fail the same way.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DatabaseError> {
        let sql = format!("SELECT {}, password FROM users WHERE username = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserWithPassword>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = row {
            if verify_password(password, &row.password)? {
                return Ok(row.user);
            }
        }

        tracing::warn!("Failed login for '{}'", username);
        Err(DatabaseError::Unauthorized("Invalid username/password".to_string()))
    }

    pub async fn register(&self, data: &NewUser) -> Result<User, DatabaseError> {
        let duplicate: Option<(String,)> =
            sqlx::query_as("SELECT username FROM users WHERE username = $1")
                .bind(&data.username)
                .fetch_optional(&self.pool)
                .await?;
        if duplicate.is_some() {
            return Err(DatabaseError::bad_request(format!("Duplicate username: {}", data.username)));
        }

        let hashed = hash_password(&data.password, self.work_factor)?;
        let sql = format!(
            "INSERT INTO users (username, password, first_name, last_name, email, is_admin) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&data.username)
            .bind(&hashed)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.email)
            .bind(data.is_admin)
            .fetch_one(&self.pool)
            .await;

        match user {
            Ok(user) => {
                tracing::info!("Registered user {} (admin: {})", user.username, user.is_admin);
                Ok(user)
            }
            // lost a race with a concurrent registration
            Err(e) => {
                let err = DatabaseError::from(e);
                if err.is_unique_violation() {
                    Err(DatabaseError::bad_request(format!("Duplicate username: {}", data.username)))
                } else {
                    Err(err)
                }
            }
        }
    }

    pub async fn find_all(&self) -> Result<Vec<UserDetail>, DatabaseError> {
        let sql = format!("{} GROUP BY u.username ORDER BY u.username", USER_DETAIL_SELECT);
        let rows = sqlx::query_as::<_, UserDetail>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn get(&self, username: &str) -> Result<UserDetail, DatabaseError> {
        let sql = format!("{} WHERE u.username = $1 GROUP BY u.username", USER_DETAIL_SELECT);
        sqlx::query_as::<_, UserDetail>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found(format!("No user: {}", username)))
    }

    /// Partial update. A new password is hashed in place, keeping its position.
    pub async fn update(&self, username: &str, changes: &ChangeSet) -> Result<User, DatabaseError> {
        let mut changes = changes.clone();
        if let Some(SqlValue::Text(password)) = changes.get("password") {
            let hashed = hash_password(password, self.work_factor)?;
            changes.set("password", hashed);
        }

        let fragment = partial_update::build(&changes, &USER_FIELDS)?;
        let sql = format!(
            "UPDATE users SET {} WHERE username = ${} RETURNING {}",
            fragment.set_clause,
            fragment.next_placeholder(),
            USER_COLUMNS
        );

        bind_all_as(sqlx::query_as::<_, User>(&sql), &fragment.values)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found(format!("No user: {}", username)))
    }

    pub async fn remove(&self, username: &str) -> Result<(), DatabaseError> {
        let deleted: Option<(String,)> =
            sqlx::query_as("DELETE FROM users WHERE username = $1 RETURNING username")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        match deleted {
            Some(_) => {
                tracing::info!("Deleted user {}", username);
                Ok(())
            }
            None => Err(DatabaseError::not_found(format!("No user: {}", username))),
        }
    }

    pub async fn apply_for_job(&self, username: &str, job_id: i32) -> Result<(), DatabaseError> {
        let job: Option<(i32,)> = sqlx::query_as("SELECT id FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;
        if job.is_none() {
            return Err(DatabaseError::not_found(format!("No job: {}", job_id)));
        }

        let user: Option<(String,)> = sqlx::query_as("SELECT username FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        if user.is_none() {
            return Err(DatabaseError::not_found(format!("No username: {}", username)));
        }

        let result = sqlx::query("INSERT INTO applications (job_id, username) VALUES ($1, $2)")
            .bind(job_id)
            .bind(username)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                tracing::info!("{} applied to job {}", username, job_id);
                Ok(())
            }
            Err(e) => {
                let err = DatabaseError::from(e);
                if err.is_unique_violation() {
                    Err(DatabaseError::bad_request("Already applied"))
                } else {
                    Err(err)
                }
            }
        }
    }
}
