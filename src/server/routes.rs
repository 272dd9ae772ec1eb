//! Request handlers

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::{views, AppError, AppState};
use crate::color::NitriteMode;
use crate::constants::upload::CAPTURE_NAME;
use crate::image_loader::content_type_for;
use crate::{analyze_bytes, AnalysisError, Result};

/// Fields collected from the upload form
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<(String, Bytes)>,
    camera_image: Option<String>,
    mode: Option<String>,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let config = &state.config;
    Html(views::index_page(
        config.server.language,
        config.analysis.nitrite.default_mode,
    ))
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> std::result::Result<Html<String>, AppError> {
    let language = state.config.server.language;
    handle_upload(state, multipart)
        .await
        .map_err(|e| e.with_language(language))
}

async fn handle_upload(
    state: AppState,
    multipart: Multipart,
) -> std::result::Result<Html<String>, AppError> {
    let form = read_form(multipart).await?;

    let mode = match form.mode.as_deref().map(str::trim) {
        Some(mode) if !mode.is_empty() => mode.parse::<NitriteMode>()?,
        _ => state.config.analysis.nitrite.default_mode,
    };

    let (name, bytes) = select_image(form)?;

    // Decode and analyze before anything touches the upload directory
    let config = state.config.clone();
    let analysis_bytes = bytes.clone();
    let analysis = tokio::task::spawn_blocking(move || {
        analyze_bytes(&analysis_bytes, &config.analysis, mode)
    })
    .await
    .map_err(|e| {
        tracing::error!("analysis task failed: {}", e);
        AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "analysis failed")
    })??;

    let stored = state.store.save(&name, &bytes).await?;

    tracing::info!(
        file = %stored.name,
        label = analysis.color.label.key(),
        nitrite = analysis.nitrite.mg_per_ml,
        mode = %mode,
        "analyzed upload"
    );

    Ok(Html(views::result_page(
        &stored,
        &analysis,
        state.config.server.language,
    )))
}

async fn read_form(mut multipart: Multipart) -> std::result::Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                // Browsers send an empty part when no file was chosen
                if !(file_name.is_empty() && bytes.is_empty()) {
                    form.file = Some((file_name, bytes));
                }
            }
            "camera_image" => {
                let text = field.text().await?;
                if !text.trim().is_empty() {
                    form.camera_image = Some(text);
                }
            }
            "mode" => form.mode = Some(field.text().await?),
            _ => {}
        }
    }

    Ok(form)
}

/// Pick the uploaded file, falling back to the camera capture
fn select_image(form: UploadForm) -> Result<(String, Bytes)> {
    if let Some((name, bytes)) = form.file {
        if name.trim().is_empty() {
            return Err(AnalysisError::EmptyFilename);
        }
        return Ok((name, bytes));
    }

    if let Some(data_url) = form.camera_image {
        let bytes = decode_data_url(&data_url)?;
        return Ok((CAPTURE_NAME.to_string(), Bytes::from(bytes)));
    }

    Err(AnalysisError::NoFileProvided)
}

/// Decode a `data:<mime>;base64,<payload>` URL
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let malformed = || AnalysisError::DecodeError {
        message: "camera capture is not a base64 data URL".to_string(),
        source: None,
    };

    let (header, payload) = data_url.trim().split_once(',').ok_or_else(malformed)?;
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(malformed());
    }

    let payload: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(payload)
        .map_err(|e| AnalysisError::decode("invalid base64 in camera capture", e))
}

pub async fn uploaded_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> std::result::Result<Response, AppError> {
    let bytes = state.store.read(&filename).await?;
    let content_type = content_type_for(std::path::Path::new(&filename));
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}
