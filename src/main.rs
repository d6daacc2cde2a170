use hotel_reservation::adapter::driven::{
    InMemoryStore, MySqlReservationRepository, MySqlRoomRepository, SystemClock,
};
use hotel_reservation::adapter::driver::rest_api::{create_router, AppState};
use hotel_reservation::adapter::{AppConfig, DatabaseConfig, DatabaseMigration, StorageBackend};
use hotel_reservation::domain::port::{Clock, ReservationRepository, RoomRepository};

use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{info, Level};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .envファイルから環境変数を読み込む
    dotenvy::dotenv().ok();
    init_logger()?;

    let config = AppConfig::from_env()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let (room_repository, reservation_repository) = match config.storage {
        StorageBackend::MySql => {
            let db_config = DatabaseConfig::from_env()?;
            info!(host = %db_config.host, port = db_config.port, "connecting to database");

            // 接続プールを作成
            let pool = MySqlPoolOptions::new()
                .max_connections(db_config.max_connections)
                .connect(&db_config.connection_string())
                .await?;

            DatabaseMigration::new(pool.clone()).run().await?;

            let room_repository: Arc<dyn RoomRepository> =
                Arc::new(MySqlRoomRepository::new(pool.clone()));
            let reservation_repository: Arc<dyn ReservationRepository> =
                Arc::new(MySqlReservationRepository::new(pool));
            (room_repository, reservation_repository)
        }
        StorageBackend::Memory => {
            info!("using in-memory storage seeded with sample rooms");
            let store = InMemoryStore::seeded(clock.now());
            let room_repository: Arc<dyn RoomRepository> = Arc::new(store.clone());
            let reservation_repository: Arc<dyn ReservationRepository> = Arc::new(store);
            (room_repository, reservation_repository)
        }
    };

    let app_state = AppState::new(room_repository, reservation_repository, clock);

    // REST APIルーターを作成
    let app = create_router()
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(LatencyUnit::Millis),
                        ),
                )
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state);

    // サーバーを起動
    let addr = config.bind_address()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "hotel reservation API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// ログ出力を初期化（RUST_LOG 未設定時は info）
fn init_logger() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let subscriber = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(subscriber)
        .with(env_filter)
        .try_init()?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
