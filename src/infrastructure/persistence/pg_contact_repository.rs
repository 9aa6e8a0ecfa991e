//! PostgreSQL implementation of contact repository.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Contact, ContactPatch, NewContact};
use crate::domain::repositories::ContactRepository;
use crate::error::AppError;

const CONTACT_COLUMNS: &str = "id, user_id, first_name, last_name, email, phone_number, birthday, \
                               additional_data, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ContactRow {
    id: i64,
    user_id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
    birthday: NaiveDate,
    additional_data: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ContactRow> for Contact {
    fn from(r: ContactRow) -> Self {
        Contact {
            id: r.id,
            user_id: r.user_id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            phone_number: r.phone_number,
            birthday: r.birthday,
            additional_data: r.additional_data,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Escapes `LIKE` metacharacters so user input is matched literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// PostgreSQL repository for contacts.
///
/// Every statement filters on `user_id`, so ownership is enforced by the
/// queries themselves.
pub struct PgContactRepository {
    pool: Arc<PgPool>,
}

impl PgContactRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn create(&self, new_contact: NewContact) -> Result<Contact, AppError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            r#"
            INSERT INTO contacts
                (user_id, first_name, last_name, email, phone_number, birthday, additional_data)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(new_contact.user_id)
        .bind(&new_contact.first_name)
        .bind(&new_contact.last_name)
        .bind(&new_contact.email)
        .bind(&new_contact.phone_number)
        .bind(new_contact.birthday)
        .bind(&new_contact.additional_data)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, user_id: i64, id: i64) -> Result<Option<Contact>, AppError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE user_id = $1 AND id = $2"
        ))
        .bind(user_id)
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Contact::from))
    }

    async fn find_by_email(
        &self,
        user_id: i64,
        email: &str,
    ) -> Result<Option<Contact>, AppError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE user_id = $1 AND lower(email) = lower($2)"
        ))
        .bind(user_id)
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Contact::from))
    }

    async fn list(&self, user_id: i64, skip: i64, limit: i64) -> Result<Vec<Contact>, AppError> {
        let rows = sqlx::query_as::<_, ContactRow>(&format!(
            r#"
            SELECT {CONTACT_COLUMNS}
            FROM contacts
            WHERE user_id = $1
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn upcoming_birthdays(
        &self,
        user_id: i64,
        today: NaiveDate,
        days: u32,
    ) -> Result<Vec<Contact>, AppError> {
        // Adding whole years clamps 29 February to 28 February in common years.
        let rows = sqlx::query_as::<_, ContactRow>(&format!(
            r#"
            WITH upcoming AS (
                SELECT c.*,
                       CASE WHEN a.this_year >= $2 THEN a.this_year ELSE a.next_year END
                           - $2 AS days_until
                FROM contacts c
                CROSS JOIN LATERAL (
                    SELECT
                        (c.birthday + make_interval(
                            years => $3 - EXTRACT(YEAR FROM c.birthday)::int))::date AS this_year,
                        (c.birthday + make_interval(
                            years => $3 + 1 - EXTRACT(YEAR FROM c.birthday)::int))::date AS next_year
                ) a
                WHERE c.user_id = $1
            )
            SELECT {CONTACT_COLUMNS}
            FROM upcoming
            WHERE days_until <= $4
            ORDER BY days_until, id
            "#
        ))
        .bind(user_id)
        .bind(today)
        .bind(today.year())
        .bind(i64::from(days))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn search(&self, user_id: i64, query: &str) -> Result<Vec<Contact>, AppError> {
        let pattern = format!("%{}%", escape_like(query));

        let rows = sqlx::query_as::<_, ContactRow>(&format!(
            r#"
            SELECT {CONTACT_COLUMNS}
            FROM contacts
            WHERE user_id = $1
              AND (first_name ILIKE $2 ESCAPE '\'
                   OR last_name ILIKE $2 ESCAPE '\'
                   OR email ILIKE $2 ESCAPE '\')
            ORDER BY id
            "#
        ))
        .bind(user_id)
        .bind(pattern)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn update(
        &self,
        user_id: i64,
        id: i64,
        patch: ContactPatch,
    ) -> Result<Option<Contact>, AppError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            r#"
            UPDATE contacts
            SET first_name      = COALESCE($3, first_name),
                last_name       = COALESCE($4, last_name),
                email           = COALESCE($5, email),
                phone_number    = COALESCE($6, phone_number),
                birthday        = COALESCE($7, birthday),
                additional_data = COALESCE($8, additional_data),
                updated_at      = NOW()
            WHERE user_id = $1 AND id = $2
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(id)
        .bind(patch.first_name)
        .bind(patch.last_name)
        .bind(patch.email)
        .bind(patch.phone_number)
        .bind(patch.birthday)
        .bind(patch.additional_data)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Contact::from))
    }

    async fn delete(&self, user_id: i64, id: i64) -> Result<Option<Contact>, AppError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            "DELETE FROM contacts WHERE user_id = $1 AND id = $2 RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(user_id)
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Contact::from))
    }

    async fn count(&self, user_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
