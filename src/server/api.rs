use crate::agent::{AgentError, PetAgent};
use crate::cli::Args;
use crate::models::api::{ErrorResponse, RoastRequest, RoastResponse, TranscriptionResponse};
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
    Json,
    body::Bytes,
    extract::{
        DefaultBodyLimit,
        Multipart,
        State,
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    response::{Html, IntoResponse, Response},
    http::StatusCode,
};
use thiserror::Error as ThisError;
use tower_http::cors::{Any, CorsLayer};
use log::{info, warn, error};

/// Longest accepted `/roast` input, counted in characters.
pub const MAX_INPUT_CHARS: usize = 500;

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<PetAgent>,
}

#[derive(Debug, ThisError)]
pub enum ApiError {
    #[error("Request must be JSON")]
    NotJson,
    #[error("Invalid JSON body")]
    InvalidJson,
    #[error("No text provided")]
    NoText,
    #[error("Input text too long")]
    TextTooLong,
    #[error("Failed to get response from bot")]
    ChatFailed,
    #[error("No audio file part in the request")]
    NoAudioPart,
    #[error("No selected audio file")]
    NoSelectedFile,
    #[error("Invalid upload: {1}")]
    BadUpload(StatusCode, String),
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("Transcription service is currently unavailable.")]
    TranscriptionUnavailable,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotJson => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::InvalidJson | ApiError::NoText => StatusCode::BAD_REQUEST,
            ApiError::TextTooLong => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ChatFailed | ApiError::TranscriptionFailed(_) =>
                StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NoAudioPart | ApiError::NoSelectedFile => StatusCode::BAD_REQUEST,
            ApiError::BadUpload(status, _) => *status,
            ApiError::TranscriptionUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => ApiError::NotJson,
            other => {
                warn!("Rejected /roast body: {}", other.body_text());
                ApiError::InvalidJson
            }
        }
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::ChatFailed(_) => ApiError::ChatFailed,
            AgentError::TranscriberUnavailable => ApiError::TranscriptionUnavailable,
            AgentError::Transcription(reason) => ApiError::TranscriptionFailed(reason),
        }
    }
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/roast", post(roast_handler))
        .route(
            "/transcribe",
            post(transcribe_handler).layer(DefaultBodyLimit::max(max_upload_bytes))
        )
        .layer(cors)
        .with_state(state)
}

/// Serves the API until the listener fails. Uses TLS when it is enabled in `args`.
pub async fn start_http_server(
    addr: &str,
    agent: Arc<PetAgent>,
    args: &Args,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = addr.parse::<SocketAddr>()?;
    let app = router(AppState { agent }, args.max_upload_bytes);

    match (args.enable_tls, &args.tls_cert_path, &args.tls_key_path) {
        (true, Some(cert_path), Some(key_path)) => {
            info!(
                "TLS enabled. Loading certificate from '{}' and key from '{}'",
                cert_path,
                key_path
            );
            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                cert_path,
                key_path
            ).await?;

            info!("HTTPS server listening on: https://{}", addr);
            axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await?;
        }
        (true, _, _) => {
            error!("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.");
            return Err("Missing TLS certificate or key path".into());
        }
        (false, _, _) => {
            let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e|
                format!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e)
            )?;
            info!("HTTP server listening on: http://{}", addr);
            axum::serve(listener, app.into_make_service()).await?;
        }
    }

    Ok(())
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn roast_handler(
    State(state): State<AppState>,
    payload: Result<Json<RoastRequest>, JsonRejection>,
) -> Result<Json<RoastResponse>, ApiError> {
    let Json(req) = payload?;

    let text = req.text.filter(|t| !t.is_empty()).ok_or(ApiError::NoText)?;
    if text.chars().count() > MAX_INPUT_CHARS {
        return Err(ApiError::TextTooLong);
    }

    let resp = state.agent.roast(&text).await?;
    Ok(Json(resp))
}

async fn transcribe_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscriptionResponse>, ApiError> {
    if !state.agent.transcription_available() {
        error!("Transcription attempt failed: Whisper model not loaded.");
        return Err(ApiError::TranscriptionUnavailable);
    }

    let mut multipart = multipart.map_err(|rejection| {
        warn!("Rejected /transcribe body: {}", rejection.body_text());
        ApiError::NoAudioPart
    })?;
    let (file_name, bytes) = read_audio_field(&mut multipart).await?;

    let transcription = state.agent.transcribe_upload(&file_name, &bytes).await?;
    Ok(Json(TranscriptionResponse { transcription: transcription.text }))
}

/// First `audio` file part of the form. Text fields named `audio` do not count.
async fn read_audio_field(multipart: &mut Multipart) -> Result<(String, Bytes), ApiError> {
    let upload_error = |e: MultipartError| {
        ApiError::BadUpload(e.status(), e.body_text())
    };

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some("audio") {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        if file_name.is_empty() {
            return Err(ApiError::NoSelectedFile);
        }
        let bytes = field.bytes().await.map_err(upload_error)?;
        return Ok((file_name, bytes));
    }

    Err(ApiError::NoAudioPart)
}
