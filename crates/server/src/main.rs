//! Agora server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use agora_api::{middleware::AppState, router as api_router};
use agora_common::{Config, LocalStorage};
use agora_core::{
    CommentService, DirectoryService, EmailService, EnrollmentService, EventService, NewsService,
    ReactionService, TeamService, UploadService, UserService,
};
use agora_db::repositories::{
    CommentRepository, ContentRegistry, DirectoryRepository, EnrollmentRepository,
    EventRepository, NewsRepository, ReactionRepository, TeamMemberRepository, UploadRepository,
    UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agora=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting agora server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = agora_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    agora_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let event_repo = EventRepository::new(Arc::clone(&db));
    let news_repo = NewsRepository::new(Arc::clone(&db));
    let directory_repo = DirectoryRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let reaction_repo = ReactionRepository::new(Arc::clone(&db));
    let team_repo = TeamMemberRepository::new(Arc::clone(&db));
    let enrollment_repo = EnrollmentRepository::new(Arc::clone(&db));
    let upload_repo = UploadRepository::new(Arc::clone(&db));
    let registry = ContentRegistry::new(Arc::clone(&db));

    // Initialize email (optional; the platform degrades gracefully without it)
    let email_service = match &config.email {
        Some(email_config) => match EmailService::new(email_config) {
            Ok(service) => Some(service),
            Err(e) => {
                warn!(error = %e, "Email disabled: SMTP configuration rejected");
                None
            }
        },
        None => None,
    };

    // Initialize file storage
    let storage = Arc::new(LocalStorage::new(
        PathBuf::from(&config.storage.base_path),
        config.storage.base_url.clone(),
    ));

    // Initialize services
    let user_service = UserService::new(user_repo.clone());
    let event_service = EventService::new(event_repo.clone(), reaction_repo.clone());
    let news_service = NewsService::new(news_repo.clone(), reaction_repo.clone());
    let directory_service = DirectoryService::new(directory_repo.clone(), reaction_repo.clone());
    let comment_service =
        CommentService::new(comment_repo.clone(), user_repo.clone(), registry.clone());
    let reaction_service =
        ReactionService::new(reaction_repo.clone(), comment_repo.clone(), registry.clone());
    let team_service = TeamService::new(team_repo);
    let enrollment_service = EnrollmentService::new(enrollment_repo, email_service);
    let upload_service =
        UploadService::new(upload_repo, storage, config.storage.max_upload_size);

    // Create app state
    let state = AppState {
        user_service,
        event_service: event_service.clone(),
        news_service,
        directory_service,
        comment_service,
        reaction_service,
        team_service,
        enrollment_service,
        upload_service,
    };

    // Periodic event status sweep
    let sweep_interval = Duration::from_secs(config.server.event_sweep_interval_secs.max(60));
    let sweep_service = event_service;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        // The first tick fires immediately; reconcile once at startup
        loop {
            interval.tick().await;
            match sweep_service.update_active_status().await {
                Ok(outcome) => {
                    if outcome.deactivated > 0 || outcome.activated > 0 {
                        info!(
                            deactivated = outcome.deactivated,
                            activated = outcome.activated,
                            "Event status sweep applied changes"
                        );
                    }
                }
                Err(e) => warn!(error = %e, "Event status sweep failed"),
            }
        }
    });

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            agora_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
