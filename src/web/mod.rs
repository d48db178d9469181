//! Server-rendered web UI.
//!
//! Browser sessions are tracked with a `tasklist_session` cookie carrying a
//! random UUID. Only signed-in sessions are registered: each one maps to a
//! [`Session`] behind its own lock, is dropped on sign-out, and is swept once
//! idle for [`SESSION_IDLE_TTL`]. Sessions are lost when the server restarts
//! while tasks stay on disk.

mod handlers;
pub mod render;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use std::time::{Duration, Instant};

use axum::{
    Router,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tasklist_lib::{Session, TaskStore};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::ServerConfig;
use render::Flash;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "tasklist_session";

/// Signed-in sessions unused for this long are dropped.
pub const SESSION_IDLE_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Session state plus a pending banner for the next page.
pub struct WebSession {
    pub session: Session,
    pub flash: Option<Flash>,
    last_seen: Instant,
}

impl WebSession {
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            flash: None,
            last_seen: Instant::now(),
        }
    }
}

type SharedSession = Arc<Mutex<WebSession>>;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn TaskStore>,
    sessions: Arc<Mutex<HashMap<String, SharedSession>>>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn store(&self) -> Arc<dyn TaskStore> {
        Arc::clone(&self.store)
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<String, SharedSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of registered (signed-in) sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.registry().len()
    }

    fn lookup(&self, headers: &HeaderMap) -> Option<SharedSession> {
        let id = session_id_from_headers(headers)?;
        self.registry().get(&id).cloned()
    }

    /// Whether the request carries a registered session.
    #[must_use]
    pub fn has_session(&self, headers: &HeaderMap) -> bool {
        self.lookup(headers).is_some()
    }

    /// Register a signed-in session under a fresh id and return the id.
    pub fn insert(&self, session: Session) -> String {
        self.sweep_idle(SESSION_IDLE_TTL);
        let id = Uuid::new_v4().to_string();
        debug!(session = %id, "new browser session");
        self.registry()
            .insert(id.clone(), Arc::new(Mutex::new(WebSession::new(session))));
        id
    }

    /// Drop the request's session, if registered.
    pub fn remove(&self, headers: &HeaderMap) -> bool {
        session_id_from_headers(headers)
            .and_then(|id| self.registry().remove(&id))
            .is_some()
    }

    /// Drop sessions idle for at least `ttl`. Sessions busy with a request are kept.
    pub fn sweep_idle(&self, ttl: Duration) {
        let mut sessions = self.registry();
        let before = sessions.len();
        sessions.retain(|_, shared| match shared.try_lock() {
            Ok(web) => web.last_seen.elapsed() < ttl,
            Err(TryLockError::WouldBlock) => true,
            Err(TryLockError::Poisoned(_)) => false,
        });
        let dropped = before - sessions.len();
        if dropped > 0 {
            debug!(dropped, "expired idle sessions");
        }
    }

    /// Run `f` against the caller's signed-in session on a blocking thread.
    ///
    /// Requests without a registered session are sent to the login page.
    pub async fn with_session<F>(&self, headers: &HeaderMap, f: F) -> Response
    where
        F: FnOnce(&mut WebSession) -> Response + Send + 'static,
    {
        let Some(shared) = self.lookup(headers) else {
            return Redirect::to("/login").into_response();
        };
        blocking(move || {
            let mut web = shared.lock().unwrap_or_else(PoisonError::into_inner);
            web.last_seen = Instant::now();
            f(&mut web)
        })
        .await
        .unwrap_or_else(|resp| resp)
    }
}

/// Run store work off the async worker threads.
///
/// A panicked task becomes a 500 response.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!(error = %e, "request task failed");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}

fn session_cookie(id: &str) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

fn expired_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

/// Attach a `Set-Cookie` header.
pub(crate) fn with_cookie(mut response: Response, cookie: &str) -> Response {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(e) => warn!(error = %e, "could not build session cookie"),
    }
    response
}

/// Extract the session id from the request's `Cookie` headers.
#[must_use]
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Build the axum router with shared state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/login", get(handlers::login_page).post(handlers::login_submit))
        .route("/logout", post(handlers::logout))
        .route("/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route("/tasks/new", get(handlers::new_task_page))
        .route("/tasks/{id}/complete", post(handlers::complete_task))
        .route("/tasks/{id}/undo", post(handlers::undo_task))
        .route("/tasks/{id}/delete", post(handlers::delete_task))
        .route("/stats", get(handlers::stats_page))
        .route("/health", get(handlers::health))
        .layer(axum::extract::DefaultBodyLimit::max(64 * 1024))
        .with_state(state)
}

/// Bind and serve the web UI until the process is stopped.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn serve(config: &ServerConfig, store: Arc<dyn TaskStore>) -> anyhow::Result<()> {
    let app = build_router(AppState::new(store));
    let addr = config.bind_addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {addr}: {e}"))?;
    info!("listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
