use actix_web::web;

use crate::handlers::auth;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(auth::login))
            .route("/me", web::get().to(auth::me))
            .route("/change-password", web::put().to(auth::change_password))
            .route("/users", web::get().to(auth::list_users))
            .route("/users", web::post().to(auth::create_user))
            .route("/users/{id}", web::put().to(auth::update_user))
            .route("/users/{id}", web::delete().to(auth::delete_user))
            .route("/users/{id}/toggle", web::patch().to(auth::toggle_user)),
    );
}
