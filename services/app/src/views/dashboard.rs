//! services/app/src/views/dashboard.rs
//!
//! The item dashboard: lists the collection and, for users allowed to,
//! creates, renames and deletes items.
//!
//! The list held here is only a snapshot. It is thrown away and fetched
//! again after every successful mutation and whenever the session's country
//! changes; it is never patched locally.

use crate::client::protocol::{item_path, ItemList, ItemRequest, ITEMS_PATH};
use crate::client::{RequestClient, SessionContext};
use crate::views::Busy;
use dashboard_core::capability::{allows, can_mutate, Capability};
use dashboard_core::domain::{Country, Item, Session, User};
use dashboard_core::ports::{Method, PortError, Prompt};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this item?";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DashboardError {
    #[error("Failed to fetch data")]
    Fetch(#[source] PortError),
    #[error("Failed to save data")]
    Save(#[source] PortError),
    #[error("Failed to delete data")]
    Delete(#[source] PortError),
    #[error("Your role does not allow this action")]
    Forbidden(Capability),
    #[error("Item name is required")]
    EmptyName,
    #[error("No item with id '{0}'")]
    UnknownItem(String),
}

//=========================================================================================
// Editing State
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum EditorState {
    Idle,
    Editing(Item),
}

//=========================================================================================
// Render Model
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ItemRow {
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub created_at: String,
    /// Edit and Delete buttons.
    pub actions: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemForm {
    pub name: String,
    pub submit_label: &'static str,
    pub show_cancel: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub loading: bool,
    pub columns: Vec<&'static str>,
    pub rows: Vec<ItemRow>,
    /// `None` when the user may not change the collection.
    pub form: Option<ItemForm>,
    pub error: Option<String>,
}

//=========================================================================================
// Dashboard
//=========================================================================================

pub struct Dashboard {
    client: RequestClient,
    session: watch::Receiver<Session>,
    prompt: Arc<dyn Prompt>,
    items: Vec<Item>,
    loading: bool,
    saving: bool,
    editor: EditorState,
    draft: String,
    error: Option<String>,
    seen_country: Option<Country>,
}

impl Dashboard {
    pub fn new(context: &SessionContext, prompt: Arc<dyn Prompt>) -> Self {
        let session = context.subscribe();
        let seen_country = session.borrow().country();
        Self {
            client: context.client().clone(),
            session,
            prompt,
            items: Vec::new(),
            loading: true,
            saving: false,
            editor: EditorState::Idle,
            draft: String::new(),
            error: None,
            seen_country,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, name: impl Into<String>) {
        self.draft = name.into();
    }

    fn user(&self) -> Option<User> {
        self.session.borrow().user().cloned()
    }

    fn require(&self, capability: Capability) -> Result<(), DashboardError> {
        if allows(self.user().as_ref(), capability) {
            Ok(())
        } else {
            Err(DashboardError::Forbidden(capability))
        }
    }

    /// Replaces the snapshot with the server's current list.
    pub async fn fetch(&mut self) -> Result<(), DashboardError> {
        let result = self.client.get::<ItemList>(ITEMS_PATH).await;
        self.loading = false;
        match result {
            Ok(list) => {
                self.items = list.data;
                Ok(())
            }
            Err(e) => Err(self.report(DashboardError::Fetch(e))),
        }
    }

    /// Refetches if the session's country changed since the last look.
    /// Returns whether a refetch happened.
    pub async fn sync_with_session(&mut self) -> Result<bool, DashboardError> {
        if !self.session.has_changed().unwrap_or(false) {
            return Ok(false);
        }
        let country = self.session.borrow_and_update().country();
        if country == self.seen_country {
            return Ok(false);
        }
        info!(
            from = ?self.seen_country,
            to = ?country,
            "country changed; refetching items"
        );
        self.seen_country = country;
        self.fetch().await.map(|_| true)
    }

    /// Idle -> Editing: loads the item's name into the form.
    pub fn begin_edit(&mut self, item: &Item) -> Result<(), DashboardError> {
        self.require(Capability::UpdateItem)?;
        self.draft = item.name.clone();
        self.editor = EditorState::Editing(item.clone());
        self.error = None;
        Ok(())
    }

    pub fn begin_edit_by_id(&mut self, id: &str) -> Result<(), DashboardError> {
        let item = self
            .items
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| DashboardError::UnknownItem(id.to_string()))?;
        self.begin_edit(&item)
    }

    /// Editing -> Idle, dropping whatever was typed.
    pub fn cancel_edit(&mut self) {
        self.editor = EditorState::Idle;
        self.draft.clear();
        self.error = None;
    }

    /// Creates a new item, or renames the one being edited.
    ///
    /// On success the form resets to idle and the list is refetched. On
    /// failure the editor keeps its state and the error is surfaced. A
    /// failed refetch is alerted by `fetch` and does not undo the success.
    pub async fn submit(&mut self) -> Result<(), DashboardError> {
        let capability = match self.editor {
            EditorState::Editing(_) => Capability::UpdateItem,
            EditorState::Idle => Capability::CreateItem,
        };
        self.require(capability)?;
        let name = self.draft.trim().to_string();
        if name.is_empty() {
            return Err(DashboardError::EmptyName);
        }

        let busy = Busy::hold(&mut self.saving);
        let body = ItemRequest { name: &name };
        let result = match &self.editor {
            EditorState::Editing(item) => {
                self.client
                    .send_json(Method::Put, &item_path(&item.id), &body)
                    .await
            }
            EditorState::Idle => self.client.send_json(Method::Post, ITEMS_PATH, &body).await,
        };
        drop(busy);

        if let Err(e) = result {
            return Err(self.report(DashboardError::Save(e)));
        }
        self.draft.clear();
        self.editor = EditorState::Idle;
        self.error = None;
        let _ = self.fetch().await;
        Ok(())
    }

    /// Deletes an item after the user confirms. Returns `Ok(false)` when the
    /// user declined, in which case nothing was sent.
    pub async fn delete(&mut self, id: &str) -> Result<bool, DashboardError> {
        self.require(Capability::DeleteItem)?;
        if !self.prompt.confirm(DELETE_CONFIRMATION) {
            return Ok(false);
        }

        let busy = Busy::hold(&mut self.saving);
        let result = self.client.delete(&item_path(id)).await;
        drop(busy);

        if let Err(e) = result {
            return Err(self.report(DashboardError::Delete(e)));
        }
        let _ = self.fetch().await;
        Ok(true)
    }

    /// Logs the failure, shows the blocking alert and keeps the message for
    /// rendering.
    fn report(&mut self, err: DashboardError) -> DashboardError {
        match &err {
            DashboardError::Fetch(cause)
            | DashboardError::Save(cause)
            | DashboardError::Delete(cause) => {
                error!(error = %cause, "{}", err);
            }
            _ => {}
        }
        let message = err.to_string();
        self.prompt.alert(&message);
        self.error = Some(message);
        err
    }

    pub fn view(&self) -> DashboardView {
        let user = self.user();
        let mutable = can_mutate(user.as_ref());
        let actions = allows(user.as_ref(), Capability::UpdateItem)
            || allows(user.as_ref(), Capability::DeleteItem);

        let mut columns = vec!["Name", "Created By", "Created At"];
        if actions {
            columns.push("Actions");
        }

        let rows = self
            .items
            .iter()
            .map(|item| ItemRow {
                id: item.id.clone(),
                name: item.name.clone(),
                created_by: item
                    .created_by
                    .as_ref()
                    .map(|c| c.username.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
                created_at: item.created_at.format("%Y-%m-%d").to_string(),
                actions,
            })
            .collect();

        let form = mutable.then(|| {
            let editing = matches!(self.editor, EditorState::Editing(_));
            ItemForm {
                name: self.draft.clone(),
                submit_label: if editing { "Update Item" } else { "Add Item" },
                show_cancel: editing,
                disabled: self.saving,
            }
        });

        DashboardView {
            loading: self.loading,
            columns,
            rows,
            form,
            error: self.error.clone(),
        }
    }
}
