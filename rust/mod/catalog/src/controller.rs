//! The catalog controller: runs reducer effects against a gateway.

use std::collections::VecDeque;
use std::sync::Arc;

use llama_client::EntityGateway;
use tracing::{debug, error, info, warn};

use crate::error::CatalogError;
use crate::form::FormField;
use crate::machine::{self, Effect, Save};
use crate::model::Llama;
use crate::reload::{FullReload, ReloadPolicy};
use crate::request::Event;
use crate::state::CatalogState;
use crate::store::{CatalogStore, SubscriptionId};

/// Owns the catalog state and drives it through [`machine::transition`].
///
/// Each operation applies one event, runs the resulting effects in order,
/// and feeds their outcomes back as further events until nothing is left.
/// Every state the reducer produces is published to the [`CatalogStore`].
///
/// Backend failures never leave the catalog stuck: the state always
/// settles in `Ready`. The mutating operations still return the failure
/// so callers can report it.
pub struct CatalogController<G, P = FullReload> {
    gateway: G,
    reload: P,
    state: CatalogState,
    store: Arc<CatalogStore>,
}

impl<G: EntityGateway<Llama>> CatalogController<G, FullReload> {
    pub fn new(gateway: G) -> Self {
        Self::with_policy(gateway, FullReload)
    }
}

impl<G: EntityGateway<Llama>, P: ReloadPolicy> CatalogController<G, P> {
    pub fn with_policy(gateway: G, reload: P) -> Self {
        let state = CatalogState::initial();
        Self {
            gateway,
            reload,
            store: Arc::new(CatalogStore::new(state.clone())),
            state,
        }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    /// Shared store for observers that outlive a borrow of the controller.
    pub fn store(&self) -> Arc<CatalogStore> {
        Arc::clone(&self.store)
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&CatalogState) + Send + Sync + 'static,
    {
        self.store.subscribe(handler)
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    // ====================================================================
    // Operations
    // ====================================================================

    /// Load the list. A failed fetch leaves an empty list, not an error.
    pub async fn mount(&mut self) -> Result<(), CatalogError> {
        self.drive(Event::Mount).await.map(|_| ())
    }

    pub fn add(&mut self) -> Result<(), CatalogError> {
        self.apply_local(Event::Add)
    }

    pub fn edit(&mut self, id: &str) -> Result<(), CatalogError> {
        self.apply_local(Event::Edit { id: id.to_string() })
    }

    pub fn update_field(&mut self, field: FormField, value: &str) -> Result<(), CatalogError> {
        self.apply_local(Event::UpdateField {
            field,
            value: value.to_string(),
        })
    }

    /// Save the form. Validation failures are returned before any request.
    pub async fn submit(&mut self) -> Result<Llama, CatalogError> {
        let record = self.drive(Event::Submit).await?;
        self.saved(record, "form/submit")
    }

    pub async fn toggle_favorite(&mut self, id: &str) -> Result<Llama, CatalogError> {
        let record = self.drive(Event::ToggleFavorite { id: id.to_string() }).await?;
        self.saved(record, "catalog/toggle-favorite")
    }

    pub fn cancel(&mut self) -> Result<(), CatalogError> {
        self.apply_local(Event::Cancel)
    }

    /// The backend has no delete: this logs and reloads.
    pub async fn delete(&mut self, id: &str) -> Result<(), CatalogError> {
        info!(id, "delete requested; backend has no delete, record kept");
        self.drive(Event::Delete { id: id.to_string() }).await.map(|_| ())
    }

    // ====================================================================
    // Effect loop
    // ====================================================================

    fn apply(&mut self, event: Event) -> Result<Vec<Effect>, CatalogError> {
        let path = event.path();
        let (next, effects) = machine::transition(&self.state, event)
            .inspect_err(|e| debug!(request = path, error = %e, "refused"))?;
        debug!(request = path, phase = %next.phase, effects = effects.len(), "applied");
        self.state = next;
        self.store.set(self.state.clone());
        Ok(effects)
    }

    fn apply_local(&mut self, event: Event) -> Result<(), CatalogError> {
        let effects = self.apply(event)?;
        debug_assert!(effects.is_empty(), "local events produce no effects");
        Ok(())
    }

    /// Apply `event` and run effects until none remain.
    ///
    /// Returns the record from a successful save, if one happened.
    async fn drive(&mut self, event: Event) -> Result<Option<Llama>, CatalogError> {
        let mut pending: VecDeque<Effect> = self.apply(event)?.into();
        let mut saved = None;
        let mut failure = None;

        while let Some(effect) = pending.pop_front() {
            let follow_up = match effect {
                Effect::FetchList => {
                    let listed = self.gateway.list().await;
                    if !listed.success {
                        warn!(
                            error = listed.error.as_deref().unwrap_or("unknown"),
                            "Error loading llamas"
                        );
                    }
                    Event::Loaded(listed)
                }
                Effect::Save(save) => {
                    let mutation = save.mutation();
                    let result = match &save {
                        Save::Create(record) => self.gateway.create(record).await,
                        Save::Update { id, record, .. } => self.gateway.update(id, record).await,
                    };
                    match result {
                        Ok(record) => {
                            info!(?mutation, id = record.id.as_deref().unwrap_or(""), "saved");
                            saved = Some(record);
                            Event::Settled { mutation, result: Ok(()) }
                        }
                        Err(e) => {
                            error!(?mutation, error = %e, "Error saving llama");
                            let reason = e.to_string();
                            failure = Some(e);
                            Event::Settled { mutation, result: Err(reason) }
                        }
                    }
                }
                Effect::Reload(mutation) => {
                    if !self.reload.should_reload(mutation) {
                        debug!(?mutation, "reload skipped by policy");
                        continue;
                    }
                    Event::Reload
                }
            };
            pending.extend(self.apply(follow_up)?);
        }

        match failure {
            Some(e) => Err(e.into()),
            None => Ok(saved),
        }
    }

    /// A request that should have saved but produced no write.
    fn saved(&self, record: Option<Llama>, request: &'static str) -> Result<Llama, CatalogError> {
        record.ok_or(CatalogError::InvalidTransition {
            phase: self.state.phase,
            request,
        })
    }
}
