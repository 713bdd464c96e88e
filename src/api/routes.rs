//! HTTP route handlers for Axum.

use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use crate::{
    analysis::{self, AnalysisReport},
    api::types::{ErrorDto, SummaryDto},
    config::Settings,
    data,
};

use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorDto>)>;

pub async fn predictions(State(state): State<AppState>) -> ApiResult<AnalysisReport> {
    fresh_report(state.settings).await.map(Json)
}

pub async fn summary(State(state): State<AppState>) -> ApiResult<SummaryDto> {
    fresh_report(state.settings)
        .await
        .map(|report| Json(SummaryDto::from(report)))
}

/// Run a full analysis off the async executor.
async fn fresh_report(settings: Settings) -> Result<AnalysisReport, (StatusCode, Json<ErrorDto>)> {
    let joined = tokio::task::spawn_blocking(move || {
        let source = data::open_source(&settings.locations_source);
        let report = analysis::run(source.as_ref(), &settings.analysis)?;
        Ok::<_, anyhow::Error>(report)
    })
    .await;

    match joined {
        Ok(Ok(report)) => Ok(report),
        Ok(Err(err)) => {
            warn!(error = %err, "analysis request failed");
            Err(internal(err.to_string()))
        }
        Err(err) => Err(internal(format!("analysis task aborted: {err}"))),
    }
}

fn internal(message: String) -> (StatusCode, Json<ErrorDto>) {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorDto::new(message)))
}
