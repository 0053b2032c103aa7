use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use omniscope_api::config::ApiConfig;
use omniscope_api::{handlers, helpers, Database};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

#[get("/health")]
async fn health(db: web::Data<Arc<Database>>) -> impl Responder {
    match db.ping() {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "status": "unhealthy",
                "database": "disconnected"
            }))
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,

    /// Config file to use instead of the platform default
    #[arg(long)]
    config: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = args.log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("omniscope-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = match ApiConfig::load(args.config) {
        Ok((config, path)) => {
            tracing::info!("Loaded config from {:?}", path);
            config
        }
        Err(e) => {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            ApiConfig::default()
        }
    };

    let (db, db_path) = helpers::database::initialize_database(config.database_path())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    tracing::info!("Database initialized at: {:?}", db_path);

    let (host, port) = config.server_address();
    tracing::info!("Server will listen on {}:{}", host, port);

    let allowed_origins = config
        .cors
        .as_ref()
        .map(|cors| cors.allowed_origins.clone())
        .unwrap_or_default();

    let server = HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(db.clone()))
            .service(health)
            .route("/api/contacts", web::get().to(handlers::contacts::list_contacts))
            .route("/api/contacts", web::post().to(handlers::contacts::create_contact))
            .route("/api/contacts/duplicates", web::post().to(handlers::contacts::check_contact_duplicates))
            .route("/api/contacts/{id}", web::get().to(handlers::contacts::get_contact))
            .route("/api/contacts/{id}", web::put().to(handlers::contacts::update_contact))
            .route("/api/contacts/{id}/approve", web::post().to(handlers::contacts::approve_contact))
            .route("/api/contacts/{id}/duplicates", web::get().to(handlers::contacts::list_contact_duplicates))
            .route("/api/contacts/{id}/merge", web::post().to(handlers::contacts::merge_contacts))
            .route("/api/companies", web::get().to(handlers::companies::list_companies))
            .route("/api/companies", web::post().to(handlers::companies::create_company))
            .route("/api/companies/{id}", web::get().to(handlers::companies::get_company))
            .route("/api/companies/{id}", web::put().to(handlers::companies::update_company))
            .route("/api/companies/{id}/duplicates", web::get().to(handlers::companies::list_company_duplicates))
            .route("/api/tasks", web::get().to(handlers::tasks::list_tasks))
            .route("/api/tasks", web::post().to(handlers::tasks::create_task))
            .route("/api/tasks/{id}", web::put().to(handlers::tasks::update_task))
            .route("/api/meetings", web::get().to(handlers::meetings::list_meetings))
            .route("/api/meetings", web::post().to(handlers::meetings::create_meeting))
            .route("/api/meetings/{id}", web::get().to(handlers::meetings::get_meeting))
            .route("/api/calendar/events", web::get().to(handlers::calendar::list_calendar_events))
            .route("/api/calendar/import", web::post().to(handlers::calendar::import_calendar))
    })
    .bind((host.as_str(), port))?
    .run();

    let handle = server.handle();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }

        tracing::info!("Ctrl+C received, shutting down...");
        handle.stop(true).await;
    });

    server.await
}
