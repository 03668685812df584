//! services/app/src/views/country.rs
//!
//! Country preference selector shown above the dashboard.

use crate::client::SessionContext;
use crate::views::{Busy, ViewError};
use dashboard_core::domain::Country;

pub struct CountrySelector {
    context: SessionContext,
    error: Option<String>,
    loading: bool,
}

impl CountrySelector {
    pub fn new(context: SessionContext) -> Self {
        Self {
            context,
            error: None,
            loading: false,
        }
    }

    /// The currently selected country, taken from the session.
    pub fn value(&self) -> Option<Country> {
        self.context.session().country()
    }

    /// `(code, display name)` for every option, in display order.
    pub fn options(&self) -> Vec<(&'static str, &'static str)> {
        Country::ALL.iter().map(|c| (c.code(), c.name())).collect()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The selector is disabled while an update is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub async fn select(&mut self, country: Country) -> Result<(), ViewError> {
        self.error = None;
        let busy = Busy::hold(&mut self.loading);
        let result = self.context.update_country(country).await;
        drop(busy);

        result.map_err(|e| {
            self.error = Some(e.to_string());
            e.into()
        })
    }
}
