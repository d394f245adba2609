//! Catalog state, published at `catalog/state`.

use std::fmt;

use crate::form::FormState;
use crate::model::Llama;

/// Where the catalog is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// A list fetch is in flight.
    Loading,
    /// List shown, form closed.
    Ready,
    /// Form open, pre-filled from the selected record.
    Editing,
    /// Form open, blank.
    Creating,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Loading => "loading",
            Phase::Ready => "ready",
            Phase::Editing => "editing",
            Phase::Creating => "creating",
        })
    }
}

/// Everything a catalog view renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    pub phase: Phase,
    /// Last list returned by the backend, in backend order.
    pub llamas: Vec<Llama>,
    pub form: FormState,
    /// Record bound to the form while editing.
    pub selected: Option<Llama>,
    /// A save is in flight.
    pub busy: bool,
    /// Reason for the most recent failed request, cleared by the next success.
    pub error: Option<String>,
}

impl CatalogState {
    pub const PATH: &'static str = "catalog/state";

    /// State before the first list has resolved.
    pub fn initial() -> Self {
        Self {
            phase: Phase::Loading,
            llamas: Vec::new(),
            form: FormState::empty(),
            selected: None,
            busy: false,
            error: None,
        }
    }

    pub fn is_form_open(&self) -> bool {
        matches!(self.phase, Phase::Editing | Phase::Creating)
    }

    /// "No llamas yet": nothing loaded and nothing loading.
    pub fn is_empty_view(&self) -> bool {
        self.phase != Phase::Loading && self.llamas.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Llama> {
        self.llamas.iter().find(|l| l.id.as_deref() == Some(id))
    }

    pub fn favorites(&self) -> impl Iterator<Item = &Llama> {
        self.llamas.iter().filter(|l| l.is_favorite)
    }

    /// Form heading, when the form is open.
    pub fn form_title(&self) -> Option<&'static str> {
        match self.phase {
            Phase::Creating => Some("Add New Llama"),
            Phase::Editing => Some("Edit Llama"),
            _ => None,
        }
    }

    /// Submit button label, when the form is open.
    pub fn submit_label(&self) -> Option<&'static str> {
        match self.phase {
            Phase::Creating => Some("Add Llama"),
            Phase::Editing => Some("Update Llama"),
            _ => None,
        }
    }
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::initial()
    }
}
