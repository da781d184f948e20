use actix_cors::Cors;
use actix_web::{middleware, App, HttpServer};
use codejudge::api::{configure_routes, AppState};
use codejudge::backends::ExecutionBackend;
use codejudge::{banner, config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Print the startup banner
    banner::print_banner();

    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  Warning: Could not load .env file: {}", e);
        eprintln!("   Falling back to the process environment");
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = match config::AppConfig::from_env() {
        Ok(app_config) => app_config,
        Err(e) => {
            log::error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    let state = AppState::new(app_config);
    let (host, port) = (state.config.server.host.clone(), state.config.server.port);

    log::info!("Execution backend: {}", state.executor.backend_name());
    if let Err(e) = state.executor.ensure_configured() {
        log::warn!("{} - runs will be rejected until a key is configured", e);
    }

    println!("🚀 Starting server...");
    println!("📡 API available at http://{}:{}/api/v1", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(actix_web::web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
