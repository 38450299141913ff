use anyhow::Result;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tollgate::application::commands::flow::FlowSettings;
use tollgate::application::ports::{
    flow_store::FlowStore, refresh_replay::RefreshReplayStore, time::Clock,
    token_info::TokenInfoStore, upstream::UpstreamAuthorizer,
};
use tollgate::application::services::ApplicationServices;
use tollgate::config::AppConfig;
use tollgate::infrastructure::security::state_codec::StateCodec;
use tollgate::infrastructure::stores::{InMemoryStore, RedisStore};
use tollgate::infrastructure::time::SystemClock;
use tollgate::infrastructure::upstream::{HttpUpstreamAuthorizer, UpstreamOAuthConfig};
use tollgate::presentation::http::{routes::build_router, state::HttpState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let (flow_store, refresh_store, token_store) = build_stores(&config)?;

    let upstream_config = UpstreamOAuthConfig {
        client_id: config.upstream_client_id().map(str::to_string),
        client_secret: config.upstream_client_secret().map(str::to_string),
        token_url: config.upstream_token_url().to_string(),
        redirect_uri: config.callback_uri(),
    };
    let upstream: Arc<dyn UpstreamAuthorizer> = Arc::new(HttpUpstreamAuthorizer::new(
        upstream_config,
        config.upstream_timeout(),
    )?);

    let codec = Arc::new(StateCodec::new(config.state_secret().as_bytes().to_vec()));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let settings = FlowSettings {
        upstream_authorize_url: config.upstream_authorize_url().to_string(),
        upstream_client_id: config.upstream_client_id().map(str::to_string),
        callback_uri: config.callback_uri(),
        upstream_scope: config.upstream_scope().map(str::to_string),
        flow_ttl_seconds: config.flow_ttl().as_secs(),
        refresh_marker_ttl_seconds: config.refresh_marker_ttl().as_secs(),
        default_token_ttl_seconds: config.default_token_ttl().as_secs(),
    };

    let services = Arc::new(ApplicationServices::new(
        flow_store,
        refresh_store,
        token_store,
        upstream,
        codec,
        clock,
        settings,
    ));

    let state = HttpState {
        services,
        public_base_url: config.public_base_url().map(str::to_string),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    // ConnectInfo feeds the rate limiter's IP extractor when no forwarding
    // headers are present.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

type Stores = (
    Arc<dyn FlowStore>,
    Arc<dyn RefreshReplayStore>,
    Arc<dyn TokenInfoStore>,
);

fn build_stores(config: &AppConfig) -> Result<Stores> {
    match config.redis_url() {
        Some(url) => {
            let store = Arc::new(RedisStore::from_url(url)?);
            tracing::info!("using Redis flow stores");
            Ok((store.clone(), store.clone(), store))
        }
        None => {
            let store = Arc::new(InMemoryStore::new());
            tracing::warn!(
                "REDIS_URL not set; falling back to in-process stores (single instance only)"
            );
            Ok((store.clone(), store.clone(), store))
        }
    }
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
