//! HTTP front-end: browse stored chart documents and trigger new runs.

use crate::error::ChartError;
use crate::model::parse_chart_date;
use crate::render;
use crate::ChartService;
use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

/// Date format used by the HTML form's date input.
const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ChartService>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/res", get(result_page))
        .route("/action", post(run_chart))
        .with_state(state)
}

#[derive(Deserialize)]
struct ResultQuery {
    #[serde(rename = "fileName")]
    file_name: String,
}

#[derive(Deserialize)]
struct RunForm {
    #[serde(rename = "curData")]
    date: String,
    #[serde(default)]
    country: String,
}

/// GET /: lists stored documents and shows the run form.
async fn index(State(state): State<AppState>) -> Response {
    match state.service.list_documents().await {
        Ok(documents) => Html(render::render_index(&documents)).into_response(),
        Err(err) => internal_error(err),
    }
}

/// GET /res?fileName=<name>: replays one stored document.
async fn result_page(State(state): State<AppState>, Query(query): Query<ResultQuery>) -> Response {
    match state.service.read_document(&query.file_name).await {
        Ok(Some(html)) => Html(html).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "no such chart document").into_response(),
        Err(err) => internal_error(err),
    }
}

/// POST /action: validates the form, runs the pipeline once, redirects home.
async fn run_chart(State(state): State<AppState>, Form(form): Form<RunForm>) -> Response {
    let date = match parse_chart_date(&form.date, FORM_DATE_FORMAT) {
        Ok(date) => date,
        Err(err) => return (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()).into_response(),
    };

    info!(%date, country = %form.country, "chart run requested");
    match state.service.run_and_store(date, &form.country).await {
        Ok(name) => {
            info!(%name, "chart run complete");
            Redirect::to("/").into_response()
        }
        Err(err @ ChartError::UnknownRegion(_)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()).into_response()
        }
        Err(err) => internal_error(err),
    }
}

fn internal_error(err: ChartError) -> Response {
    error!(error = %err, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
}
