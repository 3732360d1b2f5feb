use std::sync::Mutex;

use axum::async_trait;
use time::OffsetDateTime;

use crate::users::{
    dto::UserInput,
    repo::{UserRepository, WriteError},
    repo_types::User,
};
use crate::validation::UniqueLookup;

/// Process-local stand-in for `user_crud`, with the same unique constraint on
/// `email`.
#[derive(Default)]
pub struct MemoryUserRepository {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    rows: Vec<User>,
    last_id: i64,
}

impl MemoryUserRepository {
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Inner {
    fn email_taken(&self, email: &str, ignore_id: Option<i64>) -> bool {
        self.rows
            .iter()
            .any(|u| u.email == email && Some(u.id) != ignore_id)
    }
}

#[async_trait]
impl UniqueLookup for MemoryUserRepository {
    async fn value_exists(
        &self,
        column: &str,
        value: &str,
        ignore_id: Option<i64>,
    ) -> anyhow::Result<bool> {
        match column {
            "email" => Ok(self.lock().email_taken(value, ignore_id)),
            other => anyhow::bail!("no unique lookup for column {other}"),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find(&self, id: i64) -> anyhow::Result<Option<User>> {
        Ok(self.lock().rows.iter().find(|u| u.id == id).cloned())
    }

    async fn all(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.lock().rows.clone())
    }

    async fn create(&self, input: &UserInput) -> Result<User, WriteError> {
        let mut inner = self.lock();
        if inner.email_taken(&input.email, None) {
            return Err(WriteError::DuplicateEmail);
        }
        inner.last_id += 1;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: inner.last_id,
            name: input.name.clone(),
            email: input.email.clone(),
            address: input.address.clone(),
            gender: input.gender.to_string(),
            phone: input.phone.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.rows.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: i64, input: &UserInput) -> Result<Option<User>, WriteError> {
        let mut inner = self.lock();
        if inner.email_taken(&input.email, Some(id)) {
            return Err(WriteError::DuplicateEmail);
        }
        let Some(user) = inner.rows.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.name = input.name.clone();
        user.email = input.email.clone();
        user.address = input.address.clone();
        user.gender = input.gender.to_string();
        user.phone = input.phone.clone();
        user.updated_at = OffsetDateTime::now_utc();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut inner = self.lock();
        let before = inner.rows.len();
        inner.rows.retain(|u| u.id != id);
        Ok(inner.rows.len() != before)
    }
}
