use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::models::{Role, UpdateUserInput, User};

/// Field values for a new account. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub employee_id: Option<i64>,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User> {
        let now = Utc::now().naive_utc();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO
                users (
                    username,
                    password_hash,
                    name,
                    email,
                    role,
                    is_active,
                    employee_id,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, 1, ?, ?, ?)
            RETURNING
                id,
                username,
                password_hash,
                name,
                email,
                role,
                is_active,
                employee_id,
                created_at,
                updated_at
        "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role)
        .bind(user.employee_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT
                id,
                username,
                password_hash,
                name,
                email,
                role,
                is_active,
                employee_id,
                created_at,
                updated_at
            FROM
                users
            WHERE
                username = ?
        "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT
                id,
                username,
                password_hash,
                name,
                email,
                role,
                is_active,
                employee_id,
                created_at,
                updated_at
            FROM
                users
            WHERE
                id = ?
        "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT
                id,
                username,
                password_hash,
                name,
                email,
                role,
                is_active,
                employee_id,
                created_at,
                updated_at
            FROM
                users
            ORDER BY
                id
        "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Applies the fields present in `input`; absent fields keep their value.
    /// An `employee_id` of `0` clears the link.
    pub async fn update_user(&self, id: i64, input: &UpdateUserInput) -> Result<Option<User>> {
        let now = Utc::now().naive_utc();
        let unlink = input.employee_id == Some(0);
        let link = input.employee_id.filter(|id| *id > 0);

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE
                users
            SET
                name = COALESCE(?, name),
                email = COALESCE(?, email),
                role = COALESCE(?, role),
                is_active = COALESCE(?, is_active),
                employee_id = CASE WHEN ? THEN NULL ELSE COALESCE(?, employee_id) END,
                updated_at = ?
            WHERE
                id = ?
            RETURNING
                id,
                username,
                password_hash,
                name,
                email,
                role,
                is_active,
                employee_id,
                created_at,
                updated_at
        "#,
        )
        .bind(input.name.as_deref())
        .bind(input.email.as_deref())
        .bind(input.role)
        .bind(input.is_active)
        .bind(unlink)
        .bind(link)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn set_password(&self, id: i64, password_hash: &str) -> Result<()> {
        let now = Utc::now().naive_utc();
        sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn set_active(&self, id: i64, is_active: bool) -> Result<Option<User>> {
        let input = UpdateUserInput {
            is_active: Some(is_active),
            ..UpdateUserInput::default()
        };
        self.update_user(id, &input).await
    }

    pub async fn delete_user(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
