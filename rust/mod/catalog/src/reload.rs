//! When to refetch the list after a mutation.

use std::sync::Arc;

/// A change the catalog asked the backend (or itself) to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    ToggleFavorite,
    /// Local only; never reaches the backend.
    Delete,
}

/// Decides whether a settled mutation triggers a list reload.
///
/// Consulted once per successful mutation.
pub trait ReloadPolicy: Send + Sync {
    fn should_reload(&self, mutation: Mutation) -> bool;
}

/// Reload the full list after every mutation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullReload;

impl ReloadPolicy for FullReload {
    fn should_reload(&self, _mutation: Mutation) -> bool {
        true
    }
}

impl<P: ReloadPolicy + ?Sized> ReloadPolicy for Arc<P> {
    fn should_reload(&self, mutation: Mutation) -> bool {
        (**self).should_reload(mutation)
    }
}
