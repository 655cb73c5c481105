use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use serial_test::serial;

use payroll::database::models::{AttendanceRecap, Role};

mod common;

use common::{TestContext, auth_header, test_app};

#[actix_web::test]
#[serial]
async fn test_attendance_recording_and_duplicates() {
    common::setup_test_env();
    let ctx = TestContext::new().await.unwrap();
    let (_, hr_token) = ctx.create_user("hr", Role::Hr).await;
    let employee = ctx.create_employee("1001", "Ahmad Fauzi", None).await;
    let app = test_app!(ctx);

    let entry = json!({
        "employee_id": employee.employee.id,
        "date": "2024-06-03",
        "time_in": "08:00",
        "time_out": "16:00"
    });

    let req = test::TestRequest::post()
        .uri("/api/attendance")
        .insert_header(auth_header(&hr_token))
        .set_json(&entry)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["status"], "present");
    assert_eq!(created["employee_name"], "Ahmad Fauzi");
    assert_eq!(created["position_name"], "-");

    let req = test::TestRequest::post()
        .uri("/api/attendance")
        .insert_header(auth_header(&hr_token))
        .set_json(&entry)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/attendance")
        .insert_header(auth_header(&hr_token))
        .set_json(json!({"employee_id": 9999, "date": "2024-06-03"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/attendance")
        .insert_header(auth_header(&hr_token))
        .set_json(json!({"employee_id": employee.employee.id, "date": "2024-06-04", "status": "holiday"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(ctx.count_rows("attendance").await, 1);
}

#[actix_web::test]
#[serial]
async fn test_attendance_listing_update_and_delete() {
    let ctx = TestContext::new().await.unwrap();
    let (_, hr_token) = ctx.create_user("hr", Role::Hr).await;
    let employee = ctx.create_employee("1001", "Ahmad Fauzi", None).await;
    let app = test_app!(ctx);

    let mut ids = Vec::new();
    for day in ["2024-06-03", "2024-06-04", "2024-07-01"] {
        let req = test::TestRequest::post()
            .uri("/api/attendance")
            .insert_header(auth_header(&hr_token))
            .set_json(json!({"employee_id": employee.employee.id, "date": day}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(created["id"].as_i64().unwrap());
    }

    let req = test::TestRequest::get()
        .uri("/api/attendance?start_date=2024-06-01&end_date=2024-06-30")
        .insert_header(auth_header(&hr_token))
        .to_request();
    let june: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(june.len(), 2);
    assert_eq!(june[0]["date"], "2024-06-04");

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/attendance/employee/{}?start_date=2024-01-01&end_date=2024-12-31",
            employee.employee.id
        ))
        .insert_header(auth_header(&hr_token))
        .to_request();
    let year: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(year.len(), 3);

    let req = test::TestRequest::get()
        .uri("/api/attendance?start_date=2024-06-30&end_date=2024-06-01")
        .insert_header(auth_header(&hr_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri(&format!("/api/attendance/{}", ids[0]))
        .insert_header(auth_header(&hr_token))
        .set_json(json!({"status": "sick", "note": "flu"}))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["status"], "sick");
    assert_eq!(updated["note"], "flu");
    assert_eq!(updated["date"], "2024-06-03");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/attendance/{}", ids[2]))
        .insert_header(auth_header(&hr_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/attendance/{}", ids[2]))
        .insert_header(auth_header(&hr_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
#[serial]
async fn test_monthly_recap_counts_every_status() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx.create_user("staff", Role::Employee).await;
    let (_, hr_token) = ctx.create_user("hr", Role::Hr).await;
    let employee = ctx.create_employee("1001", "Ahmad Fauzi", None).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/attendance/recap/{}?month=6&year=2024",
            employee.employee.id
        ))
        .insert_header(auth_header(&token))
        .to_request();
    let empty: AttendanceRecap = test::call_and_read_body_json(&app, req).await;
    assert_eq!(empty, AttendanceRecap::default());

    for (day, status) in [
        ("2024-06-03", "present"),
        ("2024-06-04", "present"),
        ("2024-06-05", "sick"),
        ("2024-06-06", "leave"),
        ("2024-07-01", "absent"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/attendance")
            .insert_header(auth_header(&hr_token))
            .set_json(json!({"employee_id": employee.employee.id, "date": day, "status": status}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/attendance/recap/{}?month=6&year=2024",
            employee.employee.id
        ))
        .insert_header(auth_header(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body,
        json!({"present": 2, "leave": 1, "sick": 1, "absent": 0})
    );

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/attendance/recap/{}?month=13&year=2024",
            employee.employee.id
        ))
        .insert_header(auth_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
#[serial]
async fn test_attendance_writes_require_hr() {
    let ctx = TestContext::new().await.unwrap();
    let (_, finance_token) = ctx.create_user("finance", Role::Finance).await;
    let employee = ctx.create_employee("1001", "Ahmad Fauzi", None).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/attendance")
        .insert_header(auth_header(&finance_token))
        .set_json(json!({"employee_id": employee.employee.id, "date": "2024-06-03"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
