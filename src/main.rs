//! Identity-card Extractor - OCR field extraction server for scanned ID cards.

mod classifier;
mod config;
mod error;
mod recognizer;
mod upload;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use classifier::Classification;
use config::ClassifierRules;
use error::ApiError;
use recognizer::{
    remote::RemoteRecognizer, sidecar::SidecarRecognizer, Recognizer, RecognizerInput,
    RecognizerKind,
};

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    rules: Arc<ClassifierRules>,
    engines: Arc<HashMap<RecognizerKind, Arc<dyn Recognizer>>>,
    upload_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "idcard_extractor=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load classifier rules
    let rules = ClassifierRules::from_env()?;
    info!(
        "Classifier rules active: {} filter phrases, id_digits={}, date_digits={}",
        rules.filter_phrases.len(),
        rules.id_digits,
        rules.date_digits
    );

    // Register recognition engines
    let client = reqwest::Client::new();
    let mut engines: HashMap<RecognizerKind, Arc<dyn Recognizer>> = HashMap::new();
    engines.insert(
        RecognizerKind::Sidecar,
        Arc::new(SidecarRecognizer::new(client.clone())),
    );
    match RemoteRecognizer::from_env(client) {
        Ok(remote) => {
            engines.insert(RecognizerKind::Remote, Arc::new(remote));
            info!("Remote OCR engine registered");
        }
        Err(e) => info!("Remote OCR engine not configured: {}", e),
    }

    let upload_dir = std::env::var("UPLOAD_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./uploads"));
    std::fs::create_dir_all(&upload_dir)?;

    // Build application state
    let state = AppState {
        rules: Arc::new(rules),
        engines: Arc::new(engines),
        upload_dir,
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/config", get(get_rules))
        .route("/ocr", post(ocr))
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024)) // 16MB
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Run server
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Server listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Expose the active classifier rules.
async fn get_rules(State(state): State<AppState>) -> Json<ClassifierRules> {
    Json((*state.rules).clone())
}

#[derive(serde::Deserialize)]
struct OcrQuery {
    engine: Option<String>,
}

/// Upload a card scan, run recognition, and classify the result lines.
async fn ocr(
    State(state): State<AppState>,
    Query(query): Query<OcrQuery>,
    mut multipart: Multipart,
) -> Result<Json<Classification>, ApiError> {
    // Pick the engine
    let engine_name = query.engine.as_deref().unwrap_or("sidecar");
    let kind = RecognizerKind::from_str(engine_name)
        .ok_or_else(|| ApiError::UnknownEngine(engine_name.to_string()))?;
    let engine = state
        .engines
        .get(&kind)
        .cloned()
        .ok_or_else(|| ApiError::UnknownEngine(engine_name.to_string()))?;

    // Read the uploaded file
    let mut filename = String::new();
    let mut file_data = Vec::new();
    let mut saw_file_part = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadMultipart(e.to_string()))?
    {
        if field.name() == Some("file") {
            saw_file_part = true;
            filename = field.file_name().unwrap_or_default().to_string();
            file_data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadMultipart(e.to_string()))?
                .to_vec();
            break;
        }
    }

    if !saw_file_part {
        return Err(ApiError::MissingFile);
    }
    if filename.is_empty() || file_data.is_empty() {
        return Err(ApiError::EmptyFilename);
    }
    if !upload::allowed_file(&filename) {
        return Err(ApiError::UnsupportedType);
    }

    let request_id = Uuid::new_v4().simple().to_string();
    info!(
        "[{}] Received scan: {} ({} bytes) engine={}",
        request_id,
        filename,
        file_data.len(),
        engine.name()
    );

    // Reject payloads that are not decodable images before calling the engine
    image::load_from_memory(&file_data)
        .map_err(|e| ApiError::BadImage(e.to_string()))?;

    let stored = upload::store_upload(&state.upload_dir, &filename, &file_data)
        .map_err(ApiError::Storage)?;
    info!("[{}] Stored at {:?}", request_id, stored);

    // Run recognition
    let input = RecognizerInput {
        filename,
        data: file_data,
    };
    let lines = engine.recognize(&input).await.map_err(|e| {
        error!("[{}] Recognition failed: {}", request_id, e);
        ApiError::Recognition(e)
    })?;
    info!("[{}] Engine returned {} lines", request_id, lines.len());

    // Classify
    let result = classifier::classify(lines.iter().map(|l| l.text.as_str()), &state.rules);
    info!(
        "[{}] Classified: {} numeric, {} string fields",
        request_id,
        result.lines_with_numbers.len(),
        result.lines_with_strings.len()
    );

    Ok(Json(result))
}
