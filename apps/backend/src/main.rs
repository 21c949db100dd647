use actix_web::{web, App, HttpServer};
use taleforge::bin_support::config_app::Config;
use taleforge::infra::state::build_state;
use taleforge::middleware::{cors_middleware, RequestTrace, StructuredLogger, TraceSpan};
use taleforge::routes;
use taleforge::state::security_config::SecurityConfig;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: env_file in docker-compose
    // - Local dev: source an env file (set -a; . ./.env; set +a)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    println!(
        "🚀 Starting Taleforge Backend on http://{}:{}",
        config.host, config.port
    );

    let ai_enabled = config.ai.api_key.is_some();
    let app_state = match build_state()
        .with_db(config.db_kind)
        .with_security(SecurityConfig::new(config.jwt_secret.as_bytes()))
        .with_ai_config(config.ai.clone())
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    println!("✅ Database connected");
    if !ai_enabled {
        println!("⚠️  AI_API_KEY not set; narration and media endpoints will answer 503");
    }

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
