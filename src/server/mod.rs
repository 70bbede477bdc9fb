mod form;
mod page;
mod uploads;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use std::path::Path;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::report::{ReportOutcome, ReportParameters, generate_report};
use crate::utils::secure_file_name;

pub use form::{BRANDS_FIELD, MODELS_FIELD, ReportForm};
pub use uploads::UploadGuard;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Any failure while serving a request. Rendered as a 500 with the error
/// chain as plain-text body.
pub struct AppError(anyhow::Error);

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = format!("{:#}", self.0);
        log::error!("Report generation failed: {}", message);
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}

pub fn router(config: ServerConfig) -> Router {
    let body_limit = config.max_upload_bytes();

    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(Arc::new(config))
}

pub async fn serve(config: ServerConfig) -> Result<()> {
    config.ensure_dirs()?;

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    log::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(config))
        .await
        .context("Server error")?;

    Ok(())
}

/// Builds the report from stored uploads. The guard is owned by the blocking
/// worker, so the uploads outlive a cancelled request until the worker is done
/// reading them.
fn run_report(
    uploads: UploadGuard,
    params: &ReportParameters,
    models_path: &Path,
    brands_path: &Path,
    output_dir: &Path,
) -> Result<ReportOutcome> {
    let outcome = generate_report(params, models_path, brands_path, output_dir);
    drop(uploads);
    outcome
}

async fn index() -> Html<&'static str> {
    Html(page::INDEX_PAGE)
}

async fn generate(
    State(config): State<Arc<ServerConfig>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    // Removes whatever was stored once it is dropped
    let mut uploads = UploadGuard::new();

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.upload_dir.display()))?;

    let form = ReportForm::read(multipart, &config.upload_dir, &mut uploads).await?;
    let params = form.parameters()?;
    let models_path = form.file(MODELS_FIELD)?.to_path_buf();
    let brands_path = form.file(BRANDS_FIELD)?.to_path_buf();

    log::info!(
        "Generating report for {} {}-{} (segments: {}, segmentation: {})",
        params.country,
        params.year,
        params.month,
        params.segments,
        params.segmentation
    );

    let output_dir = config.output_dir.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        run_report(uploads, &params, &models_path, &brands_path, &output_dir)
    })
    .await
    .context("Report worker panicked")??;

    // The generated file stays in the output directory after delivery
    let bytes = tokio::fs::read(&outcome.output_path)
        .await
        .with_context(|| format!("Failed to read {}", outcome.output_path.display()))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        secure_file_name(&outcome.file_name)
    );

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
