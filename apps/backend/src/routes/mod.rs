use actix_web::web;

use crate::middleware::JwtExtract;

pub mod admin;
pub mod ai;
pub mod auth;
pub mod games;
pub mod health;
pub mod invitations;
pub mod liveness;
pub mod play;
pub mod profile;

/// Register every route. Shared by `main.rs` and the integration tests.
///
/// `/api/auth` is public and must be registered before the `/api` scope,
/// which requires a bearer token on everything it serves.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.configure(health::configure_routes);

    // Auth routes: /api/auth/**
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));

    cfg.service(
        web::scope("/api")
            .wrap(JwtExtract)
            .configure(profile::configure_routes)
            .configure(games::configure_routes)
            .configure(play::configure_routes)
            .configure(liveness::configure_routes)
            .configure(invitations::configure_routes)
            .service(web::scope("/ai").configure(ai::configure_routes))
            .service(web::scope("/admin").configure(admin::configure_routes)),
    );
}
