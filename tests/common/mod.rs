#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::env;
use tempfile::TempDir;

use payroll::database::init_database;
use payroll::database::models::*;
use payroll::database::types::Numeric;
use payroll::{AppState, Config};

// Test database wrapper
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let database_url = format!("sqlite:{}/test.db", temp_dir.path().display());
        let pool = init_database(&database_url).await?;

        Ok(TestDb {
            pool,
            _temp_dir: temp_dir,
        })
    }
}

/// Database, configuration and the application state wired as in `main`.
pub struct TestContext {
    pub db: TestDb,
    pub config: Config,
    pub state: AppState,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        let db = TestDb::new().await?;
        let config = Config::test_config();
        let state = AppState::new(db.pool.clone(), config.clone());

        Ok(TestContext { db, config, state })
    }

    /// Creates an active account and returns it with a signed token.
    pub async fn create_user(&self, username: &str, role: Role) -> (User, String) {
        self.create_linked_user(username, role, None).await
    }

    pub async fn create_linked_user(
        &self,
        username: &str,
        role: Role,
        employee_id: Option<i64>,
    ) -> (User, String) {
        let user = self
            .state
            .auth_service
            .create_user(CreateUserInput {
                username: username.to_string(),
                password: "password123".to_string(),
                name: format!("{} user", username),
                email: format!("{}@example.com", username),
                role: Some(role),
                employee_id,
            })
            .await
            .expect("Failed to create test user");
        let token = self
            .state
            .auth_service
            .generate_token(&user)
            .expect("Failed to sign test token");

        (user, token)
    }

    pub async fn create_position(
        &self,
        name: &str,
        base_pay: i64,
        allowance: i64,
        overtime_rate: i64,
    ) -> Position {
        self.state
            .position_repository
            .create(&PositionInput {
                name: name.to_string(),
                base_pay: Numeric::from(base_pay),
                position_allowance: Numeric::from(allowance),
                overtime_rate: Numeric::from(overtime_rate),
            })
            .await
            .expect("Failed to create test position")
    }

    pub async fn create_employee(
        &self,
        nik: &str,
        name: &str,
        position_id: Option<i64>,
    ) -> EmployeeDetail {
        self.create_employee_with_status(nik, name, position_id, EmployeeStatus::Active)
            .await
    }

    pub async fn create_employee_with_status(
        &self,
        nik: &str,
        name: &str,
        position_id: Option<i64>,
        status: EmployeeStatus,
    ) -> EmployeeDetail {
        self.state
            .employee_repository
            .create(&EmployeeInput {
                nik: nik.to_string(),
                name: name.to_string(),
                email: String::new(),
                phone: String::new(),
                address: String::new(),
                position_id,
                join_date: NaiveDate::from_ymd_opt(2023, 1, 2),
                status: Some(status),
            })
            .await
            .expect("Failed to create test employee")
    }

    pub async fn record_overtime(
        &self,
        employee_id: i64,
        date: NaiveDate,
        hours: i64,
    ) -> OvertimeDetail {
        self.state
            .overtime_service
            .create(OvertimeInput {
                employee_id,
                date,
                start_time: "17:00".to_string(),
                end_time: "19:00".to_string(),
                total_hours: Numeric::from(hours),
                note: String::new(),
            })
            .await
            .expect("Failed to record test overtime")
    }

    pub async fn count_rows(&self, table: &str) -> i64 {
        let query = format!("SELECT COUNT(*) FROM {}", table);
        sqlx::query_scalar::<_, i64>(&query)
            .fetch_one(&self.db.pool)
            .await
            .expect("Failed to count records")
    }
}

/// Builds the full service for a context, with the same middleware as `main`.
#[allow(unused_macros)]
macro_rules! test_app {
    ($ctx:expr) => {{
        let state = $ctx.state.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(payroll::middleware::RequestId)
                .configure(move |cfg| state.configure(cfg)),
        )
        .await
    }};
}
#[allow(unused_imports)]
pub(crate) use test_app;

pub fn auth_header(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub fn setup_test_env() {
    unsafe {
        env::set_var("RUST_LOG", "debug");
    }
    let _ = env_logger::builder().is_test(true).try_init();
}
