use anyhow::{Result, anyhow};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::models::{EmployeeDetail, EmployeeInput, EmployeeStatus};

const EMPLOYEE_DETAIL_SELECT: &str = r#"
    SELECT
        e.id,
        e.nik,
        e.name,
        e.email,
        e.phone,
        e.address,
        e.position_id,
        e.join_date,
        e.status,
        e.created_at,
        e.updated_at,
        p.name AS position_name,
        p.base_pay,
        p.position_allowance,
        p.overtime_rate
    FROM
        employees e
        LEFT JOIN positions p ON p.id = e.position_id
"#;

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &EmployeeInput) -> Result<EmployeeDetail> {
        let now = Utc::now().naive_utc();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO
                employees (
                    nik,
                    name,
                    email,
                    phone,
                    address,
                    position_id,
                    join_date,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id
        "#,
        )
        .bind(input.nik.trim())
        .bind(input.name.trim())
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(input.position())
        .bind(input.join_date)
        .bind(input.status.unwrap_or_default())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| anyhow!("Employee {} vanished after insert", id))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<EmployeeDetail>> {
        let sql = format!("{} WHERE e.id = ?", EMPLOYEE_DETAIL_SELECT);
        let employee = sqlx::query_as::<_, EmployeeDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(employee)
    }

    pub async fn exists(&self, id: i64) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// Newest first, optionally restricted to one status.
    pub async fn list(&self, status: Option<EmployeeStatus>) -> Result<Vec<EmployeeDetail>> {
        let employees = match status {
            Some(status) => {
                let sql = format!(
                    "{} WHERE e.status = ? ORDER BY e.created_at DESC, e.id DESC",
                    EMPLOYEE_DETAIL_SELECT
                );
                sqlx::query_as::<_, EmployeeDetail>(&sql)
                    .bind(status)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "{} ORDER BY e.created_at DESC, e.id DESC",
                    EMPLOYEE_DETAIL_SELECT
                );
                sqlx::query_as::<_, EmployeeDetail>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(employees)
    }

    /// Active employees ordered by name, as consumed by batch salary generation.
    pub async fn list_active(&self) -> Result<Vec<EmployeeDetail>> {
        let sql = format!(
            "{} WHERE e.status = ? ORDER BY e.name, e.id",
            EMPLOYEE_DETAIL_SELECT
        );
        let employees = sqlx::query_as::<_, EmployeeDetail>(&sql)
            .bind(EmployeeStatus::Active)
            .fetch_all(&self.pool)
            .await?;

        Ok(employees)
    }

    /// Substring match on NIK, name or email.
    pub async fn search(&self, term: &str) -> Result<Vec<EmployeeDetail>> {
        let pattern = format!("%{}%", escape_like(term.trim()));
        let sql = format!(
            r#"{}
            WHERE
                e.nik LIKE ? ESCAPE '\'
                OR e.name LIKE ? ESCAPE '\'
                OR e.email LIKE ? ESCAPE '\'
            ORDER BY
                e.name,
                e.id
            "#,
            EMPLOYEE_DETAIL_SELECT
        );
        let employees = sqlx::query_as::<_, EmployeeDetail>(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await?;

        Ok(employees)
    }

    pub async fn update(&self, id: i64, input: &EmployeeInput) -> Result<Option<EmployeeDetail>> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query(
            r#"
            UPDATE
                employees
            SET
                nik = ?,
                name = ?,
                email = ?,
                phone = ?,
                address = ?,
                position_id = ?,
                join_date = ?,
                status = COALESCE(?, status),
                updated_at = ?
            WHERE
                id = ?
        "#,
        )
        .bind(input.nik.trim())
        .bind(input.name.trim())
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(input.position())
        .bind(input.join_date)
        .bind(input.status)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_by_id(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Escapes LIKE wildcards so the term matches literally under `ESCAPE '\'`.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
