use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;

use gridsolve_config::{load_config, GridsolveConfig, ObservabilityConfig};
use gridsolve_core::{GridDocument, GridStore, ResolveError, Resolver, SolverGateway};
use gridsolve_solvers::build_gateway;
use gridsolve_stores::{InMemoryGridStore, RedisGridStore};

#[derive(Debug, Parser)]
#[command(name = "gridsolve-server")]
struct Args {
    #[arg(long, default_value = "config/gridsolve.yaml")]
    config: PathBuf,
    /// Override the listen address from the config file
    #[arg(long)]
    listen: Option<SocketAddr>,
}

type AppResolver = Resolver<Arc<dyn SolverGateway>, Arc<dyn GridStore>>;

#[derive(Clone)]
struct AppState {
    resolver: Arc<AppResolver>,
}

/// Inbound request: `message` is the equation; the remaining client
/// metadata is accepted but not interpreted by the core.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridDataRequest {
    message: String,
    #[serde(default)]
    #[allow(dead_code)]
    grid_size: Option<i64>,
    #[serde(default)]
    #[allow(dead_code)]
    grid_type: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    time_stamp: Option<String>,
}

#[derive(Debug, Serialize)]
struct GridDataResponse {
    status: &'static str,
    data: GridDocument,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_config(&args.config)
        .with_context(|| format!("load config from {}", args.config.display()))?;

    init_tracing(&config.observability)?;

    let store = build_store(&config).await?;
    let gateway =
        build_gateway(&config.solver).context("build solver gateway from config")?;
    let resolver = Arc::new(Resolver::new(gateway, store));

    let state = AppState { resolver };

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/grid-data", post(grid_data))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listen: SocketAddr = match args.listen {
        Some(addr) => addr,
        None => config
            .server
            .listen
            .parse()
            .with_context(|| format!("parse listen address '{}'", config.server.listen))?,
    };

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .context("bind server listener failed")?;
    info!(%listen, "gridsolve-server listening");
    axum::serve(listener, app)
        .await
        .context("server terminated with error")
}

fn init_tracing(observability: &ObservabilityConfig) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(observability.log_level.as_str())
        .with_target(false)
        .compact();

    match &observability.log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("open log file '{}'", path))?;
            builder.with_ansi(false).with_writer(Arc::new(file)).init();
        }
        None => builder.init(),
    }
    Ok(())
}

async fn build_store(config: &GridsolveConfig) -> anyhow::Result<Arc<dyn GridStore>> {
    let spec = &config.stores.grid;
    match spec.backend.as_str() {
        "in_memory" => {
            info!("using in-memory grid store");
            Ok(Arc::new(InMemoryGridStore::new()))
        }
        "redis" => {
            let url = spec
                .connection_url
                .as_deref()
                .context("stores.grid.connection_url is required for the redis backend")?;
            let store = RedisGridStore::new(url, spec.key_prefix.clone())
                .context("open redis grid store")?;
            store
                .ping()
                .await
                .context("redis grid store unreachable at startup")?;
            info!(key_prefix = %spec.key_prefix, "using redis grid store");
            Ok(Arc::new(store))
        }
        other => anyhow::bail!("unknown store backend '{}'", other),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status":"ok"}))
}

async fn grid_data(
    State(state): State<AppState>,
    Json(payload): Json<GridDataRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorBody>)> {
    if payload.message.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                code: "invalid_argument".to_string(),
                message: "message must not be empty".to_string(),
            }),
        ));
    }

    let data = state
        .resolver
        .resolve(&payload.message)
        .await
        .map_err(map_resolve_error)?;

    Ok(Json(GridDataResponse {
        status: "success",
        data,
    }))
}

/// Every failed resolution yields a well-formed error envelope; an empty
/// sentinel grid is a success response, never an error.
fn map_resolve_error(err: ResolveError) -> (StatusCode, Json<ErrorBody>) {
    let (status, code) = match &err {
        ResolveError::Store(_) => (StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable"),
        ResolveError::Gateway(_) => (StatusCode::BAD_GATEWAY, "solver_unavailable"),
        ResolveError::Normalize(_) => (StatusCode::BAD_GATEWAY, "solver_invalid_output"),
    };
    (
        status,
        Json(ErrorBody {
            code: code.to_string(),
            message: err.to_string(),
        }),
    )
}
