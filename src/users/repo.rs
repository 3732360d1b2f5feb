use anyhow::Context;
use axum::async_trait;
use sqlx::PgPool;

use crate::users::{dto::UserInput, repo_types::User};
use crate::validation::UniqueLookup;

const EMAIL_CONSTRAINT: &str = "user_crud_email_unique";

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The storage-level unique constraint on `email` rejected the write.
    #[error("email already exists")]
    DuplicateEmail,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for WriteError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() && db.constraint() == Some(EMAIL_CONSTRAINT) {
                return WriteError::DuplicateEmail;
            }
        }
        WriteError::Other(anyhow::Error::new(e).context("write user_crud"))
    }
}

/// Storage for user records.
#[async_trait]
pub trait UserRepository: UniqueLookup {
    async fn find(&self, id: i64) -> anyhow::Result<Option<User>>;

    /// Every record, in id order.
    async fn all(&self) -> anyhow::Result<Vec<User>>;

    async fn create(&self, input: &UserInput) -> Result<User, WriteError>;

    /// Overwrites all writable fields. `None` if the row is gone.
    async fn update(&self, id: i64, input: &UserInput) -> Result<Option<User>, WriteError>;

    /// `false` if the row is gone.
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UniqueLookup for PgUserRepository {
    async fn value_exists(
        &self,
        column: &str,
        value: &str,
        ignore_id: Option<i64>,
    ) -> anyhow::Result<bool> {
        let sql = match column {
            "email" => {
                r#"
                SELECT EXISTS (
                    SELECT 1 FROM user_crud
                    WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2)
                )
                "#
            }
            other => anyhow::bail!("no unique lookup for column {other}"),
        };
        let exists = sqlx::query_scalar::<_, bool>(sql)
            .bind(value)
            .bind(ignore_id)
            .fetch_one(&self.db)
            .await
            .with_context(|| format!("unique lookup on {column}"))?;
        Ok(exists)
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find(&self, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, address, gender, phone, created_at, updated_at
            FROM user_crud
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user")?;
        Ok(user)
    }

    async fn all(&self) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, address, gender, phone, created_at, updated_at
            FROM user_crud
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list users")?;
        Ok(users)
    }

    async fn create(&self, input: &UserInput) -> Result<User, WriteError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO user_crud (name, email, address, gender, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, address, gender, phone, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.address)
        .bind(input.gender.as_str())
        .bind(&input.phone)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn update(&self, id: i64, input: &UserInput) -> Result<Option<User>, WriteError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE user_crud
            SET name = $2, email = $3, address = $4, gender = $5, phone = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, address, gender, phone, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.address)
        .bind(input.gender.as_str())
        .bind(&input.phone)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM user_crud WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected() > 0)
    }
}
