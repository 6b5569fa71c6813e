use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::convert::{self, Mode};

use super::error::ApiError;
use super::state::AppState;
use super::upload::{ConvertForm, SavedUploads};

pub const OUTPUT_FILE_NAME: &str = "output.json";

const INDEX_HTML: &str = include_str!("index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn convert(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = ConvertForm::from_multipart(multipart).await?;

    let Some(csv_file) = form.csv_file else {
        return Ok(Redirect::to("/").into_response());
    };
    let mode: Mode = form
        .action
        .as_deref()
        .ok_or_else(|| ApiError::InvalidRequest("missing 'action' field".to_string()))?
        .parse()?;

    let upload_dir = state.config.upload_dir.clone();
    let output_path = state.config.result_dir.join(OUTPUT_FILE_NAME);
    let has_header = form.skip_headers;
    let json_file = form.json_input_file;

    // Uploads live only inside the blocking task, which outlives a dropped request.
    let task_output_path = output_path.clone();
    tokio::task::spawn_blocking(move || {
        let uploads = SavedUploads::save(&upload_dir, &csv_file, json_file.as_ref())?;
        convert::convert(
            &uploads.csv_path,
            &task_output_path,
            has_header,
            uploads.json_path.as_deref(),
            mode,
        )
    })
    .await
    .map_err(|e| ApiError::Internal(format!("conversion task failed: {e}")))??;

    let body = tokio::fs::read(&output_path).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"output.json\"",
            ),
        ],
        body,
    )
        .into_response())
}
