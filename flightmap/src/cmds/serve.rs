//! This is the module handling the `serve` sub-command.
//!
//! Every page load is a render cycle.  Requests are serialised through the pipeline mutex and run
//! on the blocking pool as the feed client is a blocking one.
//!
//! Routes:
//!
//! - `GET /`: the page, `?force=true` bypassing the cache
//! - `GET /api/flights`: the current view as JSON, same parameter
//! - `GET /health`
//!

use std::fmt::Display;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use eyre::Result;
use serde::Deserialize;
use tokio::task::JoinError;
use tracing::{error, info, trace};

use flightmap_sources::{Clock, Fetchable};

use crate::{MapConfig, Page, Pipeline, Status, View};

/// Shared by all requests.
///
#[derive(Debug)]
pub struct AppState<F: Fetchable, C: Clock> {
    pipeline: Mutex<Pipeline<F, C>>,
    map: MapConfig,
}

impl<F: Fetchable, C: Clock> AppState<F, C> {
    pub fn new(pipeline: Pipeline<F, C>, map: MapConfig) -> Self {
        AppState {
            pipeline: Mutex::new(pipeline),
            map,
        }
    }
}

/// Query parameters of the cycle endpoints
///
#[derive(Debug, Default, Deserialize)]
pub struct CycleParams {
    #[serde(default)]
    pub force: bool,
}

/// Start the server and never come back unless something breaks.
///
#[tracing::instrument(skip(pipeline, map))]
pub fn serve_flights<F, C>(pipeline: Pipeline<F, C>, map: MapConfig, listen: &str) -> Result<()>
where
    F: Fetchable + Send + 'static,
    C: Clock + 'static,
{
    trace!("serve_flights");

    let addr: SocketAddr = listen
        .parse()
        .map_err(|_| Status::BadListen(listen.to_string()))?;

    // Keep one reference here: the feed client must be dropped outside of the runtime.
    //
    let state = Arc::new(AppState::new(pipeline, map));

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let res = rt.block_on(run_server(addr, Arc::clone(&state)));
    drop(rt);
    res
}

async fn run_server<F, C>(addr: SocketAddr, state: Arc<AppState<F, C>>) -> Result<()>
where
    F: Fetchable + Send + 'static,
    C: Clock + 'static,
{
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}/", listener.local_addr()?);

    axum::serve(listener, app)
        .await
        .map_err(|e| Status::ServerStopped(e.to_string()))?;
    Ok(())
}

pub fn router<F, C>(state: Arc<AppState<F, C>>) -> Router
where
    F: Fetchable + Send + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route("/", get(index::<F, C>))
        .route("/api/flights", get(flights::<F, C>))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Run a cycle on the blocking pool, one at a time.
///
async fn cycle<F, C>(state: Arc<AppState<F, C>>, force: bool) -> Result<View, JoinError>
where
    F: Fetchable + Send + 'static,
    C: Clock + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut pipeline = state
            .pipeline
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        pipeline.run(force)
    })
    .await
}

async fn index<F, C>(
    State(state): State<Arc<AppState<F, C>>>,
    Query(params): Query<CycleParams>,
) -> Response
where
    F: Fetchable + Send + 'static,
    C: Clock + 'static,
{
    let view = match cycle(Arc::clone(&state), params.force).await {
        Ok(view) => view,
        Err(e) => return internal(e),
    };
    match Page::new(&state.map, &view).render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => internal(e),
    }
}

async fn flights<F, C>(
    State(state): State<Arc<AppState<F, C>>>,
    Query(params): Query<CycleParams>,
) -> Response
where
    F: Fetchable + Send + 'static,
    C: Clock + 'static,
{
    match cycle(state, params.force).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => internal(e),
    }
}

async fn health_check() -> &'static str {
    "OK"
}

fn internal(e: impl Display) -> Response {
    error!("{}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use axum::body::to_bytes;

    use flightmap_formats::{StateList, StateVector, Transformer};
    use flightmap_sources::{FeedFetcher, FetchError, ManualClock};

    use super::*;

    #[derive(Debug, Default)]
    struct Fake {
        calls: AtomicUsize,
        fail: AtomicBool,
    }

    impl Fetchable for Fake {
        fn name(&self) -> String {
            "fake".to_string()
        }

        fn fetch(&self) -> Result<StateList, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(FetchError::Timeout(Duration::from_secs(10)));
            }
            Ok(StateList {
                time: Some(1700000000),
                states: vec![StateVector {
                    icao24: "abc123".to_string(),
                    callsign: Some("EL123".to_string()),
                    longitude: Some(34.8),
                    latitude: Some(32.0),
                    true_track: Some(90.),
                    on_ground: Some(false),
                    ..Default::default()
                }],
            })
        }
    }

    fn setup(fail: bool) -> Arc<AppState<Fake, ManualClock>> {
        let site = Fake::default();
        site.fail.store(fail, Ordering::SeqCst);
        let fetcher = FeedFetcher::with_clock(site, Duration::from_secs(15), ManualClock::default());
        let pipeline = Pipeline::new(fetcher, Transformer::new());
        Arc::new(AppState::new(pipeline, MapConfig::default()))
    }

    fn calls(state: &AppState<Fake, ManualClock>) -> usize {
        let pipeline = state.pipeline.lock().unwrap();
        pipeline.fetcher().site().calls.load(Ordering::SeqCst)
    }

    async fn body(r: Response) -> String {
        let bytes = to_bytes(r.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index() {
        let state = setup(false);

        let r = index(State(Arc::clone(&state)), Query(CycleParams::default())).await;
        assert_eq!(StatusCode::OK, r.status());
        let html = body(r).await;
        assert!(html.contains("Active flights tracked: 1"));

        // Reload within the TTL
        let r = index(State(Arc::clone(&state)), Query(CycleParams::default())).await;
        assert_eq!(StatusCode::OK, r.status());
        assert_eq!(1, calls(&state));

        let r = index(State(Arc::clone(&state)), Query(CycleParams { force: true })).await;
        assert_eq!(StatusCode::OK, r.status());
        assert_eq!(2, calls(&state));
    }

    #[tokio::test]
    async fn test_index_failure() {
        let state = setup(true);

        let r = index(State(Arc::clone(&state)), Query(CycleParams::default())).await;
        assert_eq!(StatusCode::OK, r.status());
        let html = body(r).await;
        assert!(html.contains("API Error:"));
        assert!(!html.contains("Active flights tracked"));
    }

    #[tokio::test]
    async fn test_api_flights() {
        let state = setup(false);

        let r = flights(State(Arc::clone(&state)), Query(CycleParams::default())).await;
        assert_eq!(StatusCode::OK, r.status());

        let v: serde_json::Value = serde_json::from_str(&body(r).await).unwrap();
        assert_eq!("network", v["origin"]);
        assert_eq!(1, v["count"]);
        assert_eq!("abc123", v["flights"][0]["icao24"]);
        assert_eq!(90.0, v["flights"][0]["angle"]);
    }

    #[tokio::test]
    async fn test_health() {
        assert_eq!("OK", health_check().await);
    }

    #[test]
    fn test_router_builds() {
        let _ = router(setup(false));
    }

    #[test]
    fn test_serve_bad_listen() {
        let state = setup(false);
        let state = Arc::into_inner(state).unwrap();
        let pipeline = state.pipeline.into_inner().unwrap();

        assert!(serve_flights(pipeline, state.map, "nowhere").is_err());
    }
}
