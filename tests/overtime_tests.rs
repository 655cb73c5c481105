use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use serial_test::serial;

use payroll::database::models::{ApprovalDecision, ApprovalInput, OvertimeStatus, Role};
use payroll::database::types::{Numeric, Period};

mod common;

use common::{TestContext, auth_header, date, test_app};

#[actix_web::test]
#[serial]
async fn test_overtime_snapshots_position_rate() {
    common::setup_test_env();
    let ctx = TestContext::new().await.unwrap();
    let (_, hr_token) = ctx.create_user("hr", Role::Hr).await;
    let position = ctx.create_position("Clerk", 2000000, 0, 25000).await;
    let employee = ctx.create_employee("1001", "Ahmad Fauzi", Some(position.id)).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/overtime")
        .insert_header(auth_header(&hr_token))
        .set_json(json!({
            "employee_id": employee.employee.id,
            "date": "2024-06-10",
            "start_time": "17:00",
            "end_time": "20:30",
            "total_hours": 3.5
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["hourly_rate"], "25000.00");
    assert_eq!(created["total_amount"], "87500.00");
    assert_eq!(created["status"], "pending");
    assert_eq!(created["position_name"], "Clerk");

    // Later rate changes leave recorded entries alone.
    ctx.state
        .position_repository
        .update(
            position.id,
            &payroll::database::models::PositionInput {
                name: "Clerk".to_string(),
                base_pay: Numeric::from(2000000i64),
                position_allowance: Numeric::zero(),
                overtime_rate: Numeric::from(40000i64),
            },
        )
        .await
        .unwrap();

    let id = created["id"].as_i64().unwrap();
    let req = test::TestRequest::put()
        .uri(&format!("/api/overtime/{}", id))
        .insert_header(auth_header(&hr_token))
        .set_json(json!({"date": "2024-06-10", "total_hours": 2}))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["hourly_rate"], "25000.00");
    assert_eq!(updated["total_amount"], "50000.00");
}

#[actix_web::test]
#[serial]
async fn test_overtime_validation() {
    let ctx = TestContext::new().await.unwrap();
    let (_, hr_token) = ctx.create_user("hr", Role::Hr).await;
    let employee = ctx.create_employee("1001", "Ahmad Fauzi", None).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/overtime")
        .insert_header(auth_header(&hr_token))
        .set_json(json!({"employee_id": employee.employee.id, "date": "2024-06-10", "total_hours": 0}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/overtime")
        .insert_header(auth_header(&hr_token))
        .set_json(json!({"employee_id": 4242, "date": "2024-06-10", "total_hours": 2}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Without a position the rate snapshot is zero.
    let req = test::TestRequest::post()
        .uri("/api/overtime")
        .insert_header(auth_header(&hr_token))
        .set_json(json!({"employee_id": employee.employee.id, "date": "2024-06-10", "total_hours": 2}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(created["hourly_rate"], "0.00");
    assert_eq!(created["total_amount"], "0.00");
}

#[actix_web::test]
#[serial]
async fn test_approval_decisions() {
    let ctx = TestContext::new().await.unwrap();
    let (_, hr_token) = ctx.create_user("hr", Role::Hr).await;
    let (_, finance_token) = ctx.create_user("finance", Role::Finance).await;
    let position = ctx.create_position("Clerk", 2000000, 0, 10).await;
    let employee = ctx.create_employee("1001", "Ahmad Fauzi", Some(position.id)).await;
    let supervisor = ctx.create_employee("1002", "Budi Santoso", Some(position.id)).await;
    let entry = ctx
        .record_overtime(employee.employee.id, date(2024, 6, 10), 2)
        .await;
    let app = test_app!(ctx);
    let uri = format!("/api/overtime/{}/approve", entry.overtime.id);

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(auth_header(&hr_token))
        .set_json(json!({"status": "pending"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(auth_header(&finance_token))
        .set_json(json!({"status": "approved"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(auth_header(&hr_token))
        .set_json(json!({"status": "approved", "approver_id": 777}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(auth_header(&hr_token))
        .set_json(json!({"status": "approved", "approver_id": supervisor.employee.id}))
        .to_request();
    let approved: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["approved_by"], supervisor.employee.id);

    // Re-deciding overwrites the previous decision; approver 0 clears it.
    let rejected = ctx
        .state
        .overtime_service
        .approve(
            entry.overtime.id,
            ApprovalInput {
                status: ApprovalDecision::Rejected,
                approver_id: Some(0),
            },
        )
        .await
        .unwrap();
    assert_eq!(rejected.overtime.status, OvertimeStatus::Rejected);
    assert_eq!(rejected.overtime.approved_by, None);
}

#[actix_web::test]
#[serial]
async fn test_approved_total_counts_only_approved_entries_in_period() {
    let ctx = TestContext::new().await.unwrap();
    let position = ctx.create_position("Clerk", 2000000, 0, 10).await;
    let employee = ctx.create_employee("1001", "Ahmad Fauzi", Some(position.id)).await;
    let id = employee.employee.id;

    let approved = ctx.record_overtime(id, date(2024, 6, 10), 2).await;
    ctx.record_overtime(id, date(2024, 6, 11), 5).await;
    let next_month = ctx.record_overtime(id, date(2024, 7, 1), 3).await;

    for entry in [&approved, &next_month] {
        ctx.state
            .overtime_service
            .approve(
                entry.overtime.id,
                ApprovalInput {
                    status: ApprovalDecision::Approved,
                    approver_id: None,
                },
            )
            .await
            .unwrap();
    }

    let june = Period::new(6, 2024, ctx.config.period_bounds()).unwrap();
    let total = ctx
        .state
        .payroll_service
        .approved_overtime_total(id, june)
        .await
        .unwrap();
    assert_eq!(total, Numeric::from(20i64));
}

#[actix_web::test]
#[serial]
async fn test_listing_by_period_and_employee() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx.create_user("staff", Role::Employee).await;
    let first = ctx.create_employee("1001", "Ahmad Fauzi", None).await;
    let second = ctx.create_employee("1002", "Budi Santoso", None).await;
    ctx.record_overtime(first.employee.id, date(2024, 6, 10), 2).await;
    ctx.record_overtime(second.employee.id, date(2024, 6, 12), 1).await;
    ctx.record_overtime(first.employee.id, date(2024, 7, 2), 1).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/overtime/period?month=6&year=2024")
        .insert_header(auth_header(&token))
        .to_request();
    let june: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(june.len(), 2);

    let req = test::TestRequest::get()
        .uri(&format!("/api/overtime/employee/{}", first.employee.id))
        .insert_header(auth_header(&token))
        .to_request();
    let history: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(history.len(), 2);

    let req = test::TestRequest::get()
        .uri("/api/overtime")
        .insert_header(auth_header(&token))
        .to_request();
    let all: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.len(), 3);
    assert_eq!(all[0]["date"], "2024-07-02");
}

#[actix_web::test]
#[serial]
async fn test_rate_backfill() {
    let ctx = TestContext::new().await.unwrap();
    let (_, hr_token) = ctx.create_user("hr", Role::Hr).await;
    let position = ctx.create_position("Clerk", 2000000, 0, 0).await;
    let rated = ctx.create_employee("1001", "Ahmad Fauzi", Some(position.id)).await;
    let unassigned = ctx.create_employee("1002", "Budi Santoso", None).await;
    let entry = ctx.record_overtime(rated.employee.id, date(2024, 6, 10), 3).await;
    ctx.record_overtime(unassigned.employee.id, date(2024, 6, 10), 1).await;

    ctx.state
        .position_repository
        .update(
            position.id,
            &payroll::database::models::PositionInput {
                name: "Clerk".to_string(),
                base_pay: Numeric::from(2000000i64),
                position_allowance: Numeric::zero(),
                overtime_rate: Numeric::from(15000i64),
            },
        )
        .await
        .unwrap();
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/overtime/recalculate-rates")
        .insert_header(auth_header(&hr_token))
        .to_request();
    let result: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(result["updated"], 1);
    assert_eq!(result["total"], 2);

    let refreshed = ctx
        .state
        .overtime_repository
        .find_by_id(entry.overtime.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.overtime.hourly_rate, Numeric::from(15000i64));
    assert_eq!(refreshed.overtime.total_amount, Numeric::from(45000i64));
}
