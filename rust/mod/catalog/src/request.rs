//! Catalog requests.
//!
//! Every user action and every backend outcome enters the reducer as an
//! [`Event`]. Each carries a stable path used in logs.

use llama_client::Envelope;

use crate::form::FormField;
use crate::model::Llama;
use crate::reload::Mutation;

#[derive(Debug, Clone)]
pub enum Event {
    /// Initial load.
    Mount,
    /// A list fetch resolved, successfully or not.
    Loaded(Envelope<Vec<Llama>>),
    /// Open a blank form.
    Add,
    /// Open the form on an existing record.
    Edit { id: String },
    /// Raw input into one form field.
    UpdateField { field: FormField, value: String },
    Submit,
    ToggleFavorite { id: String },
    /// Close the form, discarding edits.
    Cancel,
    /// Backend has no delete; handled locally.
    Delete { id: String },
    /// A save finished. `Err` carries the failure reason.
    Settled { mutation: Mutation, result: Result<(), String> },
    /// Full reload after a mutation.
    Reload,
}

impl Event {
    pub fn path(&self) -> &'static str {
        match self {
            Event::Mount => "catalog/mount",
            Event::Loaded(_) => "catalog/loaded",
            Event::Add => "catalog/add",
            Event::Edit { .. } => "catalog/edit",
            Event::UpdateField { .. } => "form/update-field",
            Event::Submit => "form/submit",
            Event::ToggleFavorite { .. } => "catalog/toggle-favorite",
            Event::Cancel => "form/cancel",
            Event::Delete { .. } => "catalog/delete",
            Event::Settled { .. } => "catalog/settled",
            Event::Reload => "catalog/reload",
        }
    }
}
