//! HTTP surface: report generation, catalogue listing and report deletion.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::audit::AuditRecord;
use crate::error::ReportError;
use crate::locale::Locale;
use crate::report::ReportService;

/// Form field selecting the report locale.
pub const LANGUAGE_FIELD: &str = "language";

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Server startup failures.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listen address is not a socket address.
    #[error("invalid listen address `{address}`: {source}")]
    InvalidListenAddr {
        /// Address as configured.
        address: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },
    /// The listener could not be bound.
    #[error("failed to bind to {address}: {source}")]
    Bind {
        /// Address that was tried.
        address: String,
        /// Bind failure.
        #[source]
        source: std::io::Error,
    },
    /// The server loop failed.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Request-level failure rendered as `{"error": kind, "message": ...}`.
#[derive(Debug)]
pub struct ApiError(ReportError);

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        Self(err)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

fn status_for(err: &ReportError) -> StatusCode {
    match err {
        ReportError::MissingField { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ReportError::UnknownLocale(_) | ReportError::InvalidFilename(_) => StatusCode::BAD_REQUEST,
        ReportError::Advisor(_) => StatusCode::BAD_GATEWAY,
        ReportError::Io { .. } | ReportError::Document(_) | ReportError::Catalogue(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            error!(kind = self.0.kind(), error = %self.0, "request failed");
        } else {
            warn!(kind = self.0.kind(), error = %self.0, "request rejected");
        }
        let body = ErrorBody {
            error: self.0.kind(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
struct HealthzResponse {
    status: &'static str,
}

/// Body of `POST /delete_file`.
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    /// File name previously returned as the attachment name.
    pub filename: String,
}

#[derive(Debug, Serialize)]
struct DeleteResponse {
    deleted: bool,
}

/// Build the router over a shared report service.
pub fn build_router(service: ReportService) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/catalogue/{locale}", get(catalogue))
        .route("/generate_report", post(generate_report))
        .route("/delete_file", post(delete_file))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Bind `bind` and serve until Ctrl+C.
///
/// # Errors
///
/// Returns [`ServerError`] if the address is invalid, cannot be bound, or
/// the server loop fails.
pub async fn serve(service: ReportService, bind: &str) -> Result<(), ServerError> {
    let addr: SocketAddr = bind
        .trim()
        .parse()
        .map_err(|source| ServerError::InvalidListenAddr {
            address: bind.to_owned(),
            source,
        })?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            address: addr.to_string(),
            source,
        })?;
    info!(%addr, output_dir = %service.output_dir().display(), "manzili server listening");

    axum::serve(listener, build_router(service))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await
        .map_err(ServerError::Serve)
}

async fn healthz() -> impl IntoResponse {
    Json(HealthzResponse { status: "ok" })
}

async fn catalogue(
    State(service): State<ReportService>,
    Path(locale): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let locale = Locale::parse(&locale)?;
    let keys = service
        .catalogues()
        .get(locale)
        .keys()
        .map(str::to_owned)
        .collect();
    Ok(Json(keys))
}

async fn generate_report(
    State(service): State<ReportService>,
    Form(mut fields): Form<BTreeMap<String, String>>,
) -> Result<Response, ApiError> {
    let language = fields
        .remove(LANGUAGE_FIELD)
        .ok_or_else(|| ReportError::missing(LANGUAGE_FIELD))?;
    let locale = Locale::parse(&language)?;
    let record = AuditRecord::from_map(fields);

    let report = service.generate(locale, &record).await?;
    let file_name = report.file_name();

    let mut response = report.bytes.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(DOCX_CONTENT_TYPE),
    );
    if let Ok(value) = HeaderValue::from_str(&content_disposition(&file_name)) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(response)
}

async fn delete_file(
    State(service): State<ReportService>,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = service.delete(&request.filename).await?;
    Ok(Json(DeleteResponse { deleted }))
}

/// `attachment` disposition with an ASCII fallback name and the exact
/// UTF-8 name as an RFC 5987 `filename*` parameter.
pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let mut encoded = String::with_capacity(file_name.len());
    for byte in file_name.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}
