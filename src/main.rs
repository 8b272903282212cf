use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use portfolio_admin::config::Config;
use portfolio_admin::{db, routes, setup};

/// JSON logs when `APP_ENV=production`, human-readable otherwise.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("portfolio_admin=info,tower_http=info,sqlx=warn"));

    let production = std::env::var("APP_ENV").as_deref() == Ok("production");
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if production {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    info!("🚀 Portfolio admin server starting...");

    let config = Config::from_env();
    info!(
        database = %config.database_url,
        uploads = %config.upload_dir.display(),
        session_ttl_hours = config.session_ttl_hours,
        "📝 Configuration loaded"
    );

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to open database");
    db::migrate(&pool)
        .await
        .expect("Failed to apply migrations");
    db::health_check(&pool)
        .await
        .expect("Database health check failed");
    info!("✅ Database ready");

    setup::seed_admin(&pool, &config)
        .await
        .expect("Failed to seed administrator");

    let state = setup::build_state(&config, pool)
        .await
        .expect("Failed to build application state");

    let cors = if config.is_dev {
        info!("🔓 CORS: permissive (dev mode)");
        CorsLayer::permissive()
    } else {
        info!("🔒 CORS: same-origin only");
        CorsLayer::new()
    };

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app = routes::app(state)
        .route("/metrics", get(move || async move { metric_handle.render() }))
        .layer(TraceLayer::new_for_http())
        .layer(prometheus_layer)
        .layer(cors);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");
    info!("🎧 Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    info!("Server stopped");
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
