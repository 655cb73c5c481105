use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::models::{Position, PositionInput};

#[derive(Clone)]
pub struct PositionRepository {
    pool: SqlitePool,
}

impl PositionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &PositionInput) -> Result<Position> {
        let now = Utc::now().naive_utc();
        let position = sqlx::query_as::<_, Position>(
            r#"
            INSERT INTO
                positions (
                    name,
                    base_pay,
                    position_allowance,
                    overtime_rate,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                name,
                base_pay,
                position_allowance,
                overtime_rate,
                created_at,
                updated_at
        "#,
        )
        .bind(input.name.trim())
        .bind(&input.base_pay)
        .bind(&input.position_allowance)
        .bind(&input.overtime_rate)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(position)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Position>> {
        let position = sqlx::query_as::<_, Position>(
            r#"
            SELECT
                id,
                name,
                base_pay,
                position_allowance,
                overtime_rate,
                created_at,
                updated_at
            FROM
                positions
            WHERE
                id = ?
        "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(position)
    }

    pub async fn list(&self) -> Result<Vec<Position>> {
        let positions = sqlx::query_as::<_, Position>(
            r#"
            SELECT
                id,
                name,
                base_pay,
                position_allowance,
                overtime_rate,
                created_at,
                updated_at
            FROM
                positions
            ORDER BY
                name,
                id
        "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(positions)
    }

    pub async fn update(&self, id: i64, input: &PositionInput) -> Result<Option<Position>> {
        let now = Utc::now().naive_utc();
        let position = sqlx::query_as::<_, Position>(
            r#"
            UPDATE
                positions
            SET
                name = ?,
                base_pay = ?,
                position_allowance = ?,
                overtime_rate = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING
                id,
                name,
                base_pay,
                position_allowance,
                overtime_rate,
                created_at,
                updated_at
        "#,
        )
        .bind(input.name.trim())
        .bind(&input.base_pay)
        .bind(&input.position_allowance)
        .bind(&input.overtime_rate)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(position)
    }

    /// Deletes the position. Employees referencing it become unassigned.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM positions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
