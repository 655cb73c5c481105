use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use serial_test::serial;

use payroll::Config;
use payroll::database::models::{AuthResponse, ChangePasswordInput, LoginInput, Role};

mod common;

use common::{TestContext, auth_header, test_app};

#[actix_web::test]
#[serial]
async fn test_login_returns_token_and_user() {
    common::setup_test_env();
    let ctx = TestContext::new().await.unwrap();
    ctx.create_user("finance", Role::Finance).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"username": "finance", "password": "password123"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["username"], "finance");
    assert_eq!(body["user"]["role"], "finance");
    assert!(body["user"].get("password_hash").is_none());
}

#[actix_web::test]
#[serial]
async fn test_login_rejects_bad_credentials() {
    common::setup_test_env();
    let ctx = TestContext::new().await.unwrap();
    ctx.create_user("hr", Role::Hr).await;
    let app = test_app!(ctx);

    for (username, password) in [("hr", "wrong"), ("nobody", "password123")] {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"username": username, "password": password}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid username or password");
    }
}

#[actix_web::test]
#[serial]
async fn test_inactive_account_cannot_login() {
    let ctx = TestContext::new().await.unwrap();
    let (user, _) = ctx.create_user("former", Role::Employee).await;
    ctx.state
        .user_repository
        .set_active(user.id, false)
        .await
        .unwrap();

    let result = ctx
        .state
        .auth_service
        .login(LoginInput {
            username: "former".to_string(),
            password: "password123".to_string(),
        })
        .await;
    assert!(result.is_err());
}

#[actix_web::test]
#[serial]
async fn test_protected_routes_require_token() {
    let ctx = TestContext::new().await.unwrap();
    let app = test_app!(ctx);

    let req = test::TestRequest::get().uri("/api/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/employees")
        .insert_header(auth_header("not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
#[serial]
async fn test_token_signed_with_another_secret_is_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let (user, _) = ctx.create_user("hr", Role::Hr).await;

    let mut other = Config::test_config();
    other.jwt_secret = "some-other-secret-that-is-long-enough".to_string();
    let other_service = payroll::AuthService::new(ctx.state.user_repository.get_ref().clone(), other);
    let forged = other_service.generate_token(&user).unwrap();

    let app = test_app!(ctx);
    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(auth_header(&forged))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
#[serial]
async fn test_me_returns_current_user() {
    let ctx = TestContext::new().await.unwrap();
    let (user, token) = ctx.create_user("finance", Role::Finance).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(auth_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], user.id);
    assert_eq!(body["username"], "finance");
    assert_eq!(body["is_active"], true);
}

#[actix_web::test]
#[serial]
async fn test_change_password() {
    let ctx = TestContext::new().await.unwrap();
    let (_, token) = ctx.create_user("staff", Role::Employee).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::put()
        .uri("/api/auth/change-password")
        .insert_header(auth_header(&token))
        .set_json(json!({"old_password": "wrong", "new_password": "secret456"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::put()
        .uri("/api/auth/change-password")
        .insert_header(auth_header(&token))
        .set_json(json!({"old_password": "password123", "new_password": "secret456"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let login = ctx
        .state
        .auth_service
        .login(LoginInput {
            username: "staff".to_string(),
            password: "secret456".to_string(),
        })
        .await;
    assert!(login.is_ok());
}

#[actix_web::test]
#[serial]
async fn test_change_password_service_rejects_empty_password() {
    let ctx = TestContext::new().await.unwrap();
    let (user, _) = ctx.create_user("staff", Role::Employee).await;

    let result = ctx
        .state
        .auth_service
        .change_password(
            user.id,
            ChangePasswordInput {
                old_password: "password123".to_string(),
                new_password: String::new(),
            },
        )
        .await;
    assert!(result.is_err());
}

#[actix_web::test]
#[serial]
async fn test_admin_manages_users() {
    let ctx = TestContext::new().await.unwrap();
    let (_, admin_token) = ctx.create_user("root", Role::Admin).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/users")
        .insert_header(auth_header(&admin_token))
        .set_json(json!({"username": "clerk", "password": "password123", "name": "Clerk"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["role"], "employee");
    assert!(created.get("password_hash").is_none());
    let clerk_id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/auth/users")
        .insert_header(auth_header(&admin_token))
        .set_json(json!({"username": "clerk", "password": "x", "name": "Clerk Two"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::put()
        .uri(&format!("/api/auth/users/{}", clerk_id))
        .insert_header(auth_header(&admin_token))
        .set_json(json!({"role": "finance", "name": "Finance Clerk"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["role"], "finance");
    assert_eq!(updated["name"], "Finance Clerk");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/auth/users/{}/toggle", clerk_id))
        .insert_header(auth_header(&admin_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let toggled: Value = test::read_body_json(resp).await;
    assert_eq!(toggled["is_active"], false);

    let req = test::TestRequest::get()
        .uri("/api/auth/users")
        .insert_header(auth_header(&admin_token))
        .to_request();
    let users: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/auth/users/{}", clerk_id))
        .insert_header(auth_header(&admin_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ctx.count_rows("users").await, 1);
}

#[actix_web::test]
#[serial]
async fn test_user_management_requires_admin() {
    let ctx = TestContext::new().await.unwrap();
    let (_, hr_token) = ctx.create_user("hr", Role::Hr).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/auth/users")
        .insert_header(auth_header(&hr_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
async fn test_self_actions_are_forbidden() {
    let ctx = TestContext::new().await.unwrap();
    let (admin, admin_token) = ctx.create_user("root", Role::Admin).await;
    let app = test_app!(ctx);

    let requests = [
        test::TestRequest::delete().uri(&format!("/api/auth/users/{}", admin.id)),
        test::TestRequest::patch().uri(&format!("/api/auth/users/{}/toggle", admin.id)),
        test::TestRequest::put()
            .uri(&format!("/api/auth/users/{}", admin.id))
            .set_json(json!({"is_active": false})),
    ];

    for req in requests {
        let req = req.insert_header(auth_header(&admin_token)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    let still_there = ctx
        .state
        .user_repository
        .find_by_id(admin.id)
        .await
        .unwrap()
        .unwrap();
    assert!(still_there.is_active);
}

#[actix_web::test]
#[serial]
async fn test_deactivated_account_token_is_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let (_, admin_token) = ctx.create_user("admin", Role::Admin).await;
    let (second, second_token) = ctx.create_user("admin2", Role::Admin).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/auth/users/{}/toggle", second.id))
        .insert_header(auth_header(&admin_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/positions")
        .insert_header(auth_header(&second_token))
        .set_json(json!({"name": "Treasurer", "base_pay": 3000000}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/auth/users")
        .insert_header(auth_header(&second_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.count_rows("positions").await, 0);
}

#[actix_web::test]
#[serial]
async fn test_demoted_account_loses_role_immediately() {
    let ctx = TestContext::new().await.unwrap();
    let (_, admin_token) = ctx.create_user("admin", Role::Admin).await;
    let (hr, hr_token) = ctx.create_user("hr", Role::Hr).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::put()
        .uri(&format!("/api/auth/users/{}", hr.id))
        .insert_header(auth_header(&admin_token))
        .set_json(json!({"role": "employee"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/positions")
        .insert_header(auth_header(&hr_token))
        .set_json(json!({"name": "Treasurer", "base_pay": 3000000}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
async fn test_seed_admin_only_when_configured() {
    let ctx = TestContext::new().await.unwrap();
    assert!(ctx.state.auth_service.seed_admin().await.unwrap().is_none());

    let mut config = Config::test_config();
    config.default_admin_password = Some("bootstrap".to_string());
    let service = payroll::AuthService::new(ctx.state.user_repository.get_ref().clone(), config);

    let admin = service.seed_admin().await.unwrap().unwrap();
    assert_eq!(admin.username, "admin");
    assert_eq!(admin.role, Role::Admin);
    assert!(service.seed_admin().await.unwrap().is_none());

    let response: AuthResponse = service
        .login(LoginInput {
            username: "admin".to_string(),
            password: "bootstrap".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(response.user.role, Role::Admin);
}
