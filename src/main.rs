use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger};
use anyhow::Result;

use payroll::database::init_database;
use payroll::middleware::RequestId;
use payroll::{AppState, Config};

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    println!("🚀 Starting payroll API server...");

    let config = Config::from_env()?;
    println!(
        "📋 Configuration loaded (environment: {})",
        config.environment
    );

    let pool = init_database(&config.database_url).await?;
    println!("✅ Database initialized");

    let state = AppState::new(pool, config.clone());

    match state.auth_service.seed_admin().await {
        Ok(Some(admin)) => log::info!("Seeded default administrator '{}'", admin.username),
        Ok(None) => {}
        Err(e) => log::error!("Failed to seed default administrator: {}", e),
    }
    if config.is_production() && config.default_admin_password.is_some() {
        log::warn!("DEFAULT_ADMIN_PASSWORD is set in production; unset it after first start");
    }

    let server_address = config.server_address();
    let allowed_origin = config.client_base_url.clone();
    println!("🌐 Server starting on http://{}", server_address);

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(
                Cors::default()
                    .allowed_origin(&allowed_origin)
                    .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .expose_headers(vec!["Content-Disposition", "X-Correlation-ID"])
                    .max_age(3600),
            )
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(health)
            .configure(|cfg| state.configure(cfg))
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
