//! Route handlers for the web UI.
//!
//! Each handler resolves the browser session from its cookie, runs at most one
//! task operation, and renders a view or redirects.

use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tasklist_lib::{
    ListFilters, Priority, Session, SortKey, TaskError, TaskService, query::parse_priority_filter,
};
use tracing::{debug, info, warn};

use super::render::{self, Flash};
use super::{AppState, blocking, expired_cookie, session_cookie, with_cookie};
use crate::format::StatsOutput;

/// Sign-in form body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Add Task form body.
#[derive(Debug, Deserialize)]
pub struct NewTaskForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Option<String>,
}

/// Row action body; `return_to` restores the list filters.
#[derive(Debug, Default, Deserialize)]
pub struct ActionForm {
    #[serde(default)]
    pub return_to: Option<String>,
}

/// View Tasks query string.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub show_completed: Option<bool>,
    pub priority: Option<String>,
    pub sort: Option<String>,
}

impl ListQuery {
    /// Build list filters, falling back to defaults for unknown values.
    #[must_use]
    pub fn filters(&self) -> ListFilters {
        let defaults = ListFilters::default();
        let priority = self
            .priority
            .as_deref()
            .map_or(Ok(None), parse_priority_filter)
            .unwrap_or_else(|e| {
                debug!(error = %e, "ignoring priority filter");
                None
            });
        let sort = self
            .sort
            .as_deref()
            .map_or(Ok(defaults.sort), str::parse::<SortKey>)
            .unwrap_or_else(|e| {
                debug!(error = %e, "ignoring sort key");
                defaults.sort
            });
        ListFilters {
            include_completed: self.show_completed.unwrap_or(defaults.include_completed),
            priority,
            sort,
        }
    }
}

const LIST_PATH: &str = "/tasks";

/// Only redirect back into the task list, never off-site.
fn safe_return(return_to: Option<&str>) -> &str {
    match return_to {
        Some(path) if path == LIST_PATH || path.starts_with("/tasks?") => path,
        _ => LIST_PATH,
    }
}

fn to_login() -> Response {
    Redirect::to("/login").into_response()
}

/// `GET /`: send the browser to the list or the login page.
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if state.has_session(&headers) {
        Redirect::to(LIST_PATH).into_response()
    } else {
        to_login()
    }
}

/// `GET /login`
pub async fn login_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if state.has_session(&headers) {
        Redirect::to(LIST_PATH).into_response()
    } else {
        Html(render::login_view(None, "", "")).into_response()
    }
}

/// `POST /login`: validate the form and register a session bound to the
/// derived identity. Failed attempts register nothing.
pub async fn login_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    let store = state.store();
    let (name, email) = (form.name.clone(), form.email.clone());
    let signed_in = match blocking(move || {
        let mut session = Session::new();
        session.sign_in(&name, &email, store)?;
        Ok::<_, TaskError>(session)
    })
    .await
    {
        Ok(result) => result,
        Err(resp) => return resp,
    };

    match signed_in {
        Ok(session) => {
            state.remove(&headers);
            let id = state.insert(session);
            with_cookie(Redirect::to(LIST_PATH).into_response(), &session_cookie(&id))
        }
        Err(e) => {
            let message = match e {
                TaskError::Validation { reason, .. } => reason,
                other => other.to_string(),
            };
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(render::login_view(Some(&message), &form.name, &form.email)),
            )
                .into_response()
        }
    }
}

/// `POST /logout`
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if state.remove(&headers) {
        info!("signed out");
    }
    with_cookie(to_login(), &expired_cookie())
}

/// `GET /tasks/new`: Add Task view.
pub async fn new_task_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    state
        .with_session(&headers, |web| {
            let flash = web.flash.take();
            let Some(user) = web.session.user() else {
                return to_login();
            };
            Html(render::add_task_view(
                user,
                flash.as_ref(),
                None,
                "",
                "",
                Priority::default(),
            ))
            .into_response()
        })
        .await
}

/// `POST /tasks`: add a task for the signed-in identity.
pub async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<NewTaskForm>,
) -> Response {
    state
        .with_session(&headers, move |web| {
            let Some(user) = web.session.user().cloned() else {
                return to_login();
            };

            let priority = match form.priority.as_deref().map(str::parse::<Priority>) {
                None => Priority::default(),
                Some(Ok(p)) => p,
                Some(Err(e)) => {
                    return (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        Html(render::add_task_view(
                            &user,
                            None,
                            Some(&e.to_string()),
                            &form.title,
                            &form.description,
                            Priority::default(),
                        )),
                    )
                        .into_response();
                }
            };

            let outcome = match web.session.service_mut() {
                Ok(service) => service.add_task(&form.title, &form.description, priority),
                Err(_) => return to_login(),
            };

            match outcome {
                Ok(true) => {
                    web.flash = Some(Flash::Success(format!(
                        "✅ Task '{}' added successfully!",
                        form.title.trim()
                    )));
                    Redirect::to("/tasks/new").into_response()
                }
                Ok(false) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Html(render::add_task_view(
                        &user,
                        None,
                        Some("Please enter a task title!"),
                        &form.title,
                        &form.description,
                        priority,
                    )),
                )
                    .into_response(),
                Err(e) => {
                    warn!(error = %e, "task added but not saved");
                    web.flash = Some(Flash::Warning(e.to_string()));
                    Redirect::to("/tasks/new").into_response()
                }
            }
        })
        .await
}

/// `GET /tasks`: View Tasks with filter and sort.
pub async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Response {
    state
        .with_session(&headers, move |web| {
            let flash = web.flash.take();
            let (Some(user), Ok(service)) = (web.session.user(), web.session.service()) else {
                return to_login();
            };
            let filters = query.filters();
            let tasks = filters.apply(service.list_tasks(filters.include_completed));
            Html(render::task_list_view(user, flash.as_ref(), &tasks, &filters)).into_response()
        })
        .await
}

/// Run a row action against the session's service and go back to the list.
async fn row_action(
    state: &AppState,
    headers: &HeaderMap,
    form: ActionForm,
    action: impl FnOnce(&mut TaskService) -> tasklist_lib::Result<bool> + Send + 'static,
) -> Response {
    state
        .with_session(headers, move |web| {
            let Ok(service) = web.session.service_mut() else {
                return to_login();
            };
            match action(service) {
                Ok(true) => {}
                Ok(false) => debug!("row action on unknown task ignored"),
                Err(e) => {
                    warn!(error = %e, "task change not saved");
                    web.flash = Some(Flash::Warning(e.to_string()));
                }
            }
            Redirect::to(safe_return(form.return_to.as_deref())).into_response()
        })
        .await
}

/// `POST /tasks/{id}/complete`
pub async fn complete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Form(form): Form<ActionForm>,
) -> Response {
    row_action(&state, &headers, form, move |svc| svc.mark_complete(id)).await
}

/// `POST /tasks/{id}/undo`
pub async fn undo_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Form(form): Form<ActionForm>,
) -> Response {
    row_action(&state, &headers, form, move |svc| svc.mark_incomplete(id)).await
}

/// `POST /tasks/{id}/delete`
pub async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Form(form): Form<ActionForm>,
) -> Response {
    row_action(&state, &headers, form, move |svc| svc.delete_task(id)).await
}

/// `GET /stats`: Task Statistics view.
pub async fn stats_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    state
        .with_session(&headers, |web| {
            let flash = web.flash.take();
            let (Some(user), Ok(service)) = (web.session.user(), web.session.service()) else {
                return to_login();
            };
            let stats = StatsOutput::new(service.stats(), service.priority_breakdown());
            Html(render::stats_view(user, flash.as_ref(), &stats)).into_response()
        })
        .await
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "status": "ok", "sessions": state.session_count() }))
}
