//! User record model and repository
//!
//! The repository is the only thing that talks SQL. It reports three
//! outcomes distinctly: a missing row (`None` from the optional fetches),
//! a uniqueness conflict (left in the `sqlx::Error` for the service to
//! classify), and any other storage failure.

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Columns returned for every record-shaped query
const RECORD_COLUMNS: &str =
    "id, name, email, password, description, specialty, profile_photo, likes, reviews, stars";

/// One persisted user profile record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub description: Option<String>,
    pub specialty: Option<String>,
    #[serde(rename = "profilePhoto")]
    pub profile_photo: Option<String>,
    pub likes: i64,
    pub reviews: i64,
    pub stars: f64,
}

/// Full field set for insert and full-replace update
///
/// Numeric slots are already coerced; text slots are `None` when absent
/// (stored as NULL).
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub description: Option<String>,
    pub specialty: Option<String>,
    pub profile_photo: Option<String>,
    pub likes: i64,
    pub reviews: i64,
    pub stars: f64,
}

/// One typed column value for a partial update
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Int(i64),
    Real(f64),
}

/// Repository over the users table
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch one record by id; `None` when it does not exist
    pub async fn get(&self, id: i64) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {} FROM users WHERE id = ?",
            RECORD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Every record, in id order
    pub async fn list(&self) -> Result<Vec<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {} FROM users ORDER BY id",
            RECORD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
    }

    /// Insert one record, returning it with its assigned id
    pub async fn insert(&self, user: &NewUser) -> Result<UserRecord, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users \
             (name, email, password, description, specialty, profile_photo, likes, reviews, stars) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {}",
            RECORD_COLUMNS
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.description)
        .bind(&user.specialty)
        .bind(&user.profile_photo)
        .bind(user.likes)
        .bind(user.reviews)
        .bind(user.stars)
        .fetch_one(&self.pool)
        .await
    }

    /// Insert a batch inside one transaction, returning the count created
    ///
    /// All-or-nothing: any failed insert rolls back the whole batch.
    pub async fn insert_many(&self, users: &[NewUser]) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut count = 0u64;

        for user in users {
            sqlx::query(
                "INSERT INTO users \
                 (name, email, password, description, specialty, profile_photo, likes, reviews, stars) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password)
            .bind(&user.description)
            .bind(&user.specialty)
            .bind(&user.profile_photo)
            .bind(user.likes)
            .bind(user.reviews)
            .bind(user.stars)
            .execute(&mut *tx)
            .await?;
            count += 1;
        }

        tx.commit().await?;
        Ok(count)
    }

    /// Overwrite every field slot of one record; `None` when it does not exist
    pub async fn update_full(
        &self,
        id: i64,
        user: &NewUser,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(&format!(
            "UPDATE users SET \
             name = ?, email = ?, password = ?, description = ?, specialty = ?, \
             profile_photo = ?, likes = ?, reviews = ?, stars = ? \
             WHERE id = ? \
             RETURNING {}",
            RECORD_COLUMNS
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.description)
        .bind(&user.specialty)
        .bind(&user.profile_photo)
        .bind(user.likes)
        .bind(user.reviews)
        .bind(user.stars)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Write only the given column values; `None` when the row does not exist
    ///
    /// Column names come from the service's fixed whitelist, never from
    /// client input. An empty change set degrades to a plain fetch.
    pub async fn update_partial(
        &self,
        id: i64,
        changes: &[(&'static str, FieldValue)],
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        if changes.is_empty() {
            return self.get(id).await;
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE users SET ");
        let mut assignments = qb.separated(", ");
        for (column, value) in changes {
            assignments.push(format!("{} = ", column));
            match value {
                FieldValue::Null => assignments.push_bind_unseparated(Option::<String>::None),
                FieldValue::Text(s) => assignments.push_bind_unseparated(s.clone()),
                FieldValue::Int(i) => assignments.push_bind_unseparated(*i),
                FieldValue::Real(f) => assignments.push_bind_unseparated(*f),
            };
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {}", RECORD_COLUMNS));

        qb.build_query_as::<UserRecord>()
            .fetch_optional(&self.pool)
            .await
    }

    /// Delete one record, returning its snapshot; `None` when absent
    pub async fn delete(&self, id: i64) -> Result<Option<UserRecord>, sqlx::Error> {
        sqlx::query_as::<_, UserRecord>(&format!(
            "DELETE FROM users WHERE id = ? RETURNING {}",
            RECORD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}
