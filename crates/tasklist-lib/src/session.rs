//! Per-browser-session state: who is signed in and their task service.
//!
//! Sign-in takes a free-form name and email with no credential check. The
//! email only selects which partition of the shared store is used.

use std::sync::Arc;

use tracing::info;

use crate::error::{Result, TaskError};
use crate::model::{Identity, UserInfo};
use crate::service::TaskService;
use crate::store::TaskStore;
use crate::util::avatar_url;

/// Check the login form fields and build the user they describe.
///
/// # Errors
///
/// Returns `Validation` if either field is blank after trimming.
pub fn validate_sign_in(name: &str, email: &str) -> Result<UserInfo> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() {
        return Err(TaskError::validation(
            "sign_in",
            "Please enter both name and email!",
        ));
    }
    Ok(UserInfo {
        identity: Identity::from_email(email),
        name: name.to_string(),
        email: email.to_string(),
        avatar_url: avatar_url(name),
    })
}

/// Application state for one session.
///
/// Unauthenticated until [`Session::sign_in`] succeeds; [`Session::sign_out`]
/// returns it to that state and drops the task service.
#[derive(Default)]
pub struct Session {
    user: Option<UserInfo>,
    service: Option<TaskService>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub const fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    /// Sign in and bind a freshly loaded task service to the derived identity.
    ///
    /// On failure the session is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the name or email is blank.
    pub fn sign_in(
        &mut self,
        name: &str,
        email: &str,
        store: Arc<dyn TaskStore>,
    ) -> Result<&UserInfo> {
        let user = validate_sign_in(name, email)?;
        info!(identity = %user.identity, "signed in");
        self.service = Some(TaskService::new(store, user.identity.clone()));
        Ok(self.user.insert(user))
    }

    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            info!(identity = %user.identity, "signed out");
        }
        self.service = None;
    }

    /// The signed-in task service.
    ///
    /// # Errors
    ///
    /// Returns `NotSignedIn` when unauthenticated.
    pub fn service(&self) -> Result<&TaskService> {
        self.service.as_ref().ok_or(TaskError::NotSignedIn)
    }

    /// Mutable access to the signed-in task service.
    ///
    /// # Errors
    ///
    /// Returns `NotSignedIn` when unauthenticated.
    pub fn service_mut(&mut self) -> Result<&mut TaskService> {
        self.service.as_mut().ok_or(TaskError::NotSignedIn)
    }
}
