//! Llama catalog: state synchronization behind a list-and-form UI.
//!
//! The controller owns a [`CatalogState`] and moves it through a pure
//! reducer ([`machine::transition`]). The reducer never performs I/O; it
//! returns [`Effect`]s which the controller runs against an
//! [`EntityGateway`](llama_client::EntityGateway) before feeding the
//! outcome back in as the next event.
//!
//! ```text
//! Loading ──Loaded──▶ Ready ──Add──▶ Creating ─┐
//!    ▲                  │  ──Edit─▶ Editing  ──┤ Submit / Cancel
//!    └────Reload────────┴──────────────────────┘
//! ```
//!
//! Every successful mutation is followed by a full reload of the list,
//! subject to the injected [`ReloadPolicy`].

pub mod controller;
pub mod error;
pub mod form;
pub mod machine;
pub mod model;
pub mod reload;
pub mod request;
pub mod state;
pub mod store;

#[cfg(test)]
mod testing;

pub use controller::CatalogController;
pub use error::{CatalogError, ValidationError};
pub use form::{FormField, FormState};
pub use machine::{transition, Effect, Save};
pub use model::{Breed, Llama, Temperament, AGE_RANGE, WEIGHT_RANGE};
pub use reload::{FullReload, Mutation, ReloadPolicy};
pub use request::Event;
pub use state::{CatalogState, Phase};
pub use store::{CatalogStore, SubscriptionId};
