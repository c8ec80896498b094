use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use scribe_ai::config::AppConfig;
use scribe_ai::error::AppError;
use scribe_ai::telemetry;
use scribe_ai::workflows::assessment::{
    assessment_router, default_rubric, ApplicantService, AssessmentPipeline, HttpAnalysisClient,
    ProfileStore, StoreError, WriterId, WriterProfile,
};
use scribe_ai::workflows::assessment::rubric::{self, RubricCriterion};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Writer Assessment Orchestrator",
    about = "Run the writing-applicant assessment service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the built-in default rubric as JSON
    Rubric,
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Rubric => print_default_rubric(),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let analysis_client = Arc::new(HttpAnalysisClient::new(&config.analysis));
    let pipeline = AssessmentPipeline::new(
        analysis_client.clone(),
        analysis_client,
        config.analysis.call_timeout,
    );
    let store = Arc::new(InMemoryProfileStore::default());
    let service = Arc::new(ApplicantService::new(store, pipeline));

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(assessment_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "writer assessment orchestrator ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn print_default_rubric() -> Result<(), AppError> {
    let rubric = default_rubric();
    let rendered = serde_json::to_string_pretty(&rubric)
        .expect("default rubric serializes");
    println!("{rendered}");
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Single-process store backing the default deployment. Profiles are replaced
/// whole-record; the rubric falls back to the built-in default until one is
/// configured.
#[derive(Default)]
struct InMemoryProfileStore {
    profiles: Mutex<HashMap<WriterId, WriterProfile>>,
    rubric: Mutex<Option<Vec<RubricCriterion>>>,
}

impl ProfileStore for InMemoryProfileStore {
    fn get(&self, id: &WriterId) -> Result<Option<WriterProfile>, StoreError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn get_all(&self) -> Result<Vec<WriterProfile>, StoreError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn put(&self, profile: WriterProfile) -> Result<(), StoreError> {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        guard.insert(profile.id.clone(), profile);
        Ok(())
    }

    fn get_rubric(&self) -> Result<Vec<RubricCriterion>, StoreError> {
        let guard = self.rubric.lock().expect("rubric mutex poisoned");
        Ok(guard.clone().unwrap_or_else(default_rubric))
    }

    fn put_rubric(&self, rubric: Vec<RubricCriterion>) -> Result<(), StoreError> {
        rubric::validate(&rubric)?;
        let mut guard = self.rubric.lock().expect("rubric mutex poisoned");
        *guard = Some(rubric);
        Ok(())
    }
}
