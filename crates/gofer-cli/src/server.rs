//! HTTP surface of the gateway
//!
//! Loopback-only axum router. Every request first passes through the
//! activity middleware so the idle monitor sees it, then reaches one of:
//! - `/` navigation (rendered listing, raw text, or raw bytes)
//! - `/focus` hand-off from a secondary instance
//! - `/heartbeat` liveness ping, `/heartmon` keep-alive page
//! - `/ph/<host>:<port>` CSO/ph sub-client
//! - `/search` index-search sub-client

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{any, get},
    Form, Router,
};
use gofer_core::{
    gateway, ph, render,
    search::{self, require_query},
    ActivityTracker, GatewayConfig, GatewayError, Launcher, NavigationContext, NavigationRequest,
    PhClient, SearchClient, Transport, TransportError,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// State shared across handlers
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<GatewayConfig>,
    pub transport: Transport,
    pub activity: ActivityTracker,
    pub launcher: Arc<dyn Launcher>,
}

impl GatewayState {
    pub fn new(config: GatewayConfig, activity: ActivityTracker, launcher: Arc<dyn Launcher>) -> Self {
        Self {
            transport: Transport::from_config(&config),
            config: Arc::new(config),
            activity,
            launcher,
        }
    }
}

/// Build the router for a primary instance
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(navigate_handler))
        .route("/focus", get(focus_handler))
        .route("/heartbeat", get(heartbeat_handler))
        .route("/heartmon", get(heartmon_handler))
        .route("/ph", any(missing_ph_route))
        .route("/ph/", any(missing_ph_route))
        .route("/ph/:target", get(ph_greeting_handler).post(ph_query_handler))
        .route("/search", get(search_page_handler).post(search_query_handler))
        .layer(middleware::from_fn_with_state(state.clone(), track_activity))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Error wrapper mapping the gateway taxonomy onto HTTP statuses
#[derive(Debug)]
pub struct HttpError(GatewayError);

impl From<GatewayError> for HttpError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl From<TransportError> for HttpError {
    fn from(err: TransportError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            GatewayError::Validation(_) | GatewayError::Route(_) => StatusCode::BAD_REQUEST,
            GatewayError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::Transport(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Forwarding(_) | GatewayError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if !self.0.is_client_error() {
            warn!("Request failed: {}", self.0);
        }
        (status, self.0.to_string()).into_response()
    }
}

type HandlerResult<T> = Result<T, HttpError>;

async fn track_activity(State(state): State<GatewayState>, request: Request, next: Next) -> Response {
    state.activity.touch().await;
    next.run(request).await
}

/// `return` query parameter shared by the sub-client pages
#[derive(Debug, Default, Deserialize)]
struct ReturnParams {
    #[serde(rename = "return")]
    return_to: Option<String>,
}

impl ReturnParams {
    fn target(&self) -> &str {
        self.return_to
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or("/")
    }
}

#[derive(Debug, Default, Deserialize)]
struct QueryForm {
    query: Option<String>,
}

/// A missing or unreadable form body counts as an empty query
fn submitted_query(form: Result<Form<QueryForm>, FormRejection>) -> Option<String> {
    match form {
        Ok(Form(form)) => form.query,
        Err(rejection) => {
            debug!("Ignoring query form: {}", rejection);
            None
        }
    }
}

async fn navigate_handler(
    State(state): State<GatewayState>,
    Query(request): Query<NavigationRequest>,
) -> HandlerResult<Response> {
    let context = request.resolve(&state.config)?;
    let reply = gateway::navigate(&state.transport, &context).await;
    let content_type = reply.content_type();
    Ok(([(header::CONTENT_TYPE, content_type)], reply.into_body()).into_response())
}

#[derive(Debug, Deserialize)]
struct FocusParams {
    uri: Option<String>,
}

async fn focus_handler(
    State(state): State<GatewayState>,
    Query(params): Query<FocusParams>,
) -> HandlerResult<String> {
    let uri = params
        .uri
        .filter(|uri| !uri.is_empty())
        .ok_or_else(|| GatewayError::validation("Missing 'uri' parameter."))?;

    let context = NavigationContext::from_gopher_uri(&uri, &state.config.default_port)?;
    let local_url = context.local_url(&state.config.local_base_url());

    info!("Refocusing session on {}", local_url);
    state.launcher.launch(&local_url);

    Ok(format!("Redirecting session to: {local_url}"))
}

async fn heartbeat_handler() -> StatusCode {
    StatusCode::OK
}

async fn heartmon_handler() -> Html<String> {
    Html(render::render_heartmon_page())
}

async fn missing_ph_route() -> HttpError {
    GatewayError::route("expected /ph/<host>:<port>").into()
}

async fn ph_greeting_handler(
    State(state): State<GatewayState>,
    Path(target): Path<String>,
    Query(params): Query<ReturnParams>,
) -> HandlerResult<Html<String>> {
    let (host, port) = ph::parse_route(&target, &state.config.default_ph_port)?;
    let greeting = PhClient::new(state.transport).greet(&host, &port).await?;
    Ok(Html(render::render_lookup_page(
        &host,
        &port,
        &greeting,
        params.target(),
    )))
}

async fn ph_query_handler(
    State(state): State<GatewayState>,
    Path(target): Path<String>,
    Query(params): Query<ReturnParams>,
    form: Result<Form<QueryForm>, FormRejection>,
) -> HandlerResult<Html<String>> {
    let (host, port) = ph::parse_route(&target, &state.config.default_ph_port)?;
    let query = require_query(submitted_query(form).as_deref())?;
    let reply = PhClient::new(state.transport)
        .query(&host, &port, &query)
        .await?;
    Ok(Html(render::render_lookup_page(
        &host,
        &port,
        &reply,
        params.target(),
    )))
}

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    host: Option<String>,
    port: Option<String>,
    selector: Option<String>,
    #[serde(flatten)]
    ret: ReturnParams,
}

impl SearchParams {
    fn target(&self) -> Result<(&str, &str, &str), GatewayError> {
        match (
            self.host.as_deref().filter(|h| !h.is_empty()),
            self.port.as_deref().filter(|p| !p.is_empty()),
            self.selector.as_deref(),
        ) {
            (Some(host), Some(port), Some(selector)) => Ok((host, port, selector)),
            _ => Err(GatewayError::validation("Missing host, port, or selector")),
        }
    }
}

async fn search_page_handler(Query(params): Query<SearchParams>) -> HandlerResult<Html<String>> {
    let (host, port, _) = params.target()?;
    Ok(Html(render::render_search_page(
        host,
        port,
        "",
        params.ret.target(),
    )))
}

async fn search_query_handler(
    State(state): State<GatewayState>,
    Query(params): Query<SearchParams>,
    form: Result<Form<QueryForm>, FormRejection>,
) -> HandlerResult<Html<String>> {
    let (host, port, selector) = params.target()?;
    let query = require_query(submitted_query(form).as_deref())?;

    let raw = SearchClient::new(state.transport)
        .search(host, port, selector, &query)
        .await?;
    let results = search::render_results(&raw, host, port, selector);

    Ok(Html(render::render_search_page(
        host,
        port,
        &results,
        params.ret.target(),
    )))
}
