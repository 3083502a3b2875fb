use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use kindquest_api::cache::{Cache, CacheConfig, MemoryCache, RedisCache};
use kindquest_api::config::ServerConfig;
use kindquest_api::router::build_app_router;
use kindquest_api::state::AppState;
use kindquest_cloud::{ChatClient, ChatConfig, S3Storage, StorageConfig};
use kindquest_db::DbPool;
use kindquest_events::{QueueConfig, QueueForwarder, QueuePublisher};

/// `LOG_FORMAT=json` switches to one JSON object per line.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("kindquest_api=debug,kindquest_events=info,tower_http=info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

async fn open_database(config: &ServerConfig) -> DbPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = kindquest_db::create_pool(&url, config.db_max_connections)
        .await
        .expect("Could not connect to Postgres");

    kindquest_db::run_migrations(&pool)
        .await
        .expect("Migrations failed");
    tracing::info!(max_connections = config.db_max_connections, "Database ready");
    pool
}

fn open_cache(config: &CacheConfig) -> Arc<dyn Cache> {
    let Some(url) = config.redis_url() else {
        tracing::info!(ttl_secs = config.ttl_secs, "No CACHE_HOST, caching lists in memory");
        return Arc::new(MemoryCache::new());
    };
    let redis = RedisCache::open(&url).expect("CACHE_* settings do not form a valid Redis URL");
    tracing::info!(ttl_secs = config.ttl_secs, "Caching lists in Redis");
    Arc::new(redis)
}

/// Starts the broker forwarder; it stops when `cancel` fires.
fn start_queue(cancel: CancellationToken) -> (QueuePublisher, JoinHandle<()>) {
    let config = QueueConfig::from_env();
    let (publisher, receiver) = QueuePublisher::new(config.buffer_size);
    tracing::info!(
        broker = config.amqp_url.is_some(),
        buffer_size = config.buffer_size,
        "Starting queue forwarder"
    );
    let handle = tokio::spawn(QueueForwarder::run(config.amqp_url, receiver, cancel));
    (publisher, handle)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    let pool = open_database(&config).await;
    let cache = open_cache(&config.cache);

    let storage_config = StorageConfig::from_env();
    let storage = S3Storage::connect(&storage_config).await;
    let chat = ChatClient::new(&ChatConfig::from_env()).expect("Invalid chat service settings");

    let stop_queue = CancellationToken::new();
    let (queue, forwarder) = start_queue(stop_queue.clone());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        cache,
        storage: Arc::new(storage),
        chat: Arc::new(chat),
        queue,
    };
    let app = build_app_router(state, &config);

    let ip = config.host.parse().expect("HOST must be an IP address");
    let addr = SocketAddr::new(ip, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Could not bind listener");
    tracing::info!(%addr, bucket = %storage_config.bucket, "KindQuest API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    stop_queue.cancel();
    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(grace, forwarder).await.is_err() {
        tracing::warn!(grace_secs = config.shutdown_timeout_secs, "Queue forwarder did not drain in time");
    }
    tracing::info!("Shutdown complete");
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("Could not install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => tracing::info!("Ctrl-C received"),
            _ = term.recv() => tracing::info!("SIGTERM received"),
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Ctrl-C received");
    }
}
