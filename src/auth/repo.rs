use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::auth::password;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    /// Find a user by (normalized) email.
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password. The UNIQUE constraint on
    /// email makes the duplicate check atomic; callers distinguish that
    /// case with [`is_unique_violation`].
    pub async fn create(
        db: &SqlitePool,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES (?, ?, ?)
            RETURNING id, name, email, password_hash
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Returns false when no user with that id exists.
    pub async fn update_name(db: &SqlitePool, id: i64, new_name: &str) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE users SET name = ? WHERE id = ?")
            .bind(new_name)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Login check: the returned `None` covers both unknown email and wrong
/// password, so callers cannot tell them apart.
pub async fn authenticate(
    db: &SqlitePool,
    email: &str,
    password: &str,
) -> anyhow::Result<Option<User>> {
    let Some(user) = User::find_by_email(db, email).await? else {
        return Ok(None);
    };
    if password::verify_password(password, &user.password_hash)? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}
