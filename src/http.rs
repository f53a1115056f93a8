//! Read-only HTTP surface.
//!
//! `GET /{weekday}` and `GET /today` answer from the store; `GET /live`
//! passes the upstream payload through. Failures collapse to a generic
//! 500 body, the error detail only goes to the server log.

use crate::query::{self, Sample};
use crate::store::Store;
use crate::time;
use crate::upstream::SensorClient;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;

const GENERIC_ERROR: &str = "An internal server error occurred.";

/// Body returned for any failed request.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

type ErrorResponse = (StatusCode, Json<ErrorBody>);

fn internal_error() -> ErrorResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: GENERIC_ERROR,
        }),
    )
}

#[derive(Clone)]
struct AppState {
    store: Arc<Store>,
    client: SensorClient,
    lookback_weeks: u32,
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/live", get(live))
        .route("/:day", get(day))
        .with_state(state)
}

/// Serves the read API until ctrl-c.
///
/// # Errors
///
/// Returns error if the listener cannot be bound or the server fails.
pub async fn serve(
    port: u16,
    lookback_weeks: u32,
    store: Arc<Store>,
    client: SensorClient,
) -> crate::Result<()> {
    let state = AppState {
        store,
        client,
        lookback_weeks,
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    log::info!("listening at http://{addr}");

    axum::Server::bind(&addr)
        .serve(router(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|error| std::io::Error::new(std::io::ErrorKind::Other, error))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        log::error!("cannot listen for shutdown signal: {error}");
    }
}

async fn day(
    State(state): State<AppState>,
    Path(day): Path<String>,
) -> Result<Json<Vec<Sample>>, ErrorResponse> {
    match query::day_query(&state.store, &day, state.lookback_weeks, &time::now()) {
        Ok(samples) => Ok(Json(samples)),
        Err(error) => {
            log::error!("query for {day:?} failed: {error}");
            Err(internal_error())
        }
    }
}

async fn live(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ErrorResponse> {
    match state.client.fetch_raw().await {
        Ok(payload) => Ok(Json(payload)),
        Err(error) => {
            log::error!("live read failed: {error}");
            Err(internal_error())
        }
    }
}
