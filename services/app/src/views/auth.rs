//! services/app/src/views/auth.rs
//!
//! Login and registration forms.

use crate::client::{SessionContext, SessionError};
use crate::views::Busy;
use dashboard_core::guard::Route;
use dashboard_core::validation::{RegistrationForm, ValidationError};

/// Why a form submission did not navigate anywhere.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// Caught before any request was sent.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

//=========================================================================================
// LoginView
//=========================================================================================

pub struct LoginView {
    context: SessionContext,
    pub username: String,
    pub password: String,
    error: Option<String>,
    submitting: bool,
}

impl LoginView {
    pub fn new(context: SessionContext) -> Self {
        Self {
            context,
            username: String::new(),
            password: String::new(),
            error: None,
            submitting: false,
        }
    }

    /// The message to show above the form, if the last attempt failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Signs in and returns where to go next.
    pub async fn submit(&mut self) -> Result<Route, ViewError> {
        self.error = None;
        let busy = Busy::hold(&mut self.submitting);
        let result = self.context.login(&self.username, &self.password).await;
        drop(busy);

        match result {
            Ok(()) => Ok(Route::Dashboard),
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }
}

//=========================================================================================
// RegisterView
//=========================================================================================

pub struct RegisterView {
    context: SessionContext,
    pub form: RegistrationForm,
    error: Option<String>,
    submitting: bool,
}

impl RegisterView {
    pub fn new(context: SessionContext) -> Self {
        Self {
            context,
            form: RegistrationForm::default(),
            error: None,
            submitting: false,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Registering..."
        } else {
            "Register"
        }
    }

    /// Creates the account and sends the user to the login page.
    /// A password mismatch is reported without contacting the server.
    pub async fn submit(&mut self) -> Result<Route, ViewError> {
        self.error = None;
        if let Err(invalid) = self.form.validate() {
            self.error = Some(invalid.to_string());
            return Err(invalid.into());
        }

        let busy = Busy::hold(&mut self.submitting);
        let result = self.context.register(&self.form).await;
        drop(busy);

        match result {
            Ok(_) => Ok(Route::Login),
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }
}
