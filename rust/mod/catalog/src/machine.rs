//! The catalog reducer.
//!
//! `transition` is pure: it reads the current state and an event, and
//! returns the next state plus the effects the controller must run. An
//! `Err` means the event was refused and the state is unchanged.

use crate::error::CatalogError;
use crate::form::FormState;
use crate::model::Llama;
use crate::reload::Mutation;
use crate::request::Event;
use crate::state::{CatalogState, Phase};

/// A write the controller sends to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Save {
    Create(Llama),
    Update {
        id: String,
        record: Llama,
        mutation: Mutation,
    },
}

impl Save {
    pub fn mutation(&self) -> Mutation {
        match self {
            Save::Create(_) => Mutation::Create,
            Save::Update { mutation, .. } => *mutation,
        }
    }
}

/// Work requested by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch the whole list; resolves as `Event::Loaded`.
    FetchList,
    /// Send a write; resolves as `Event::Settled`.
    Save(Save),
    /// Ask the reload policy, then `Event::Reload` if it agrees.
    Reload(Mutation),
}

pub fn transition(
    state: &CatalogState,
    event: Event,
) -> Result<(CatalogState, Vec<Effect>), CatalogError> {
    let mut next = state.clone();
    let path = event.path();

    let effects = match event {
        Event::Mount | Event::Reload => {
            if state.is_form_open() {
                return Err(refused(state, path));
            }
            next.phase = Phase::Loading;
            vec![Effect::FetchList]
        }

        Event::Loaded(envelope) => {
            if state.phase != Phase::Loading {
                return Err(refused(state, path));
            }
            next.phase = Phase::Ready;
            if envelope.success {
                next.llamas = envelope.data.unwrap_or_default();
                next.error = None;
            } else {
                next.llamas = Vec::new();
                next.error = Some(envelope.error.unwrap_or_else(|| "list failed".into()));
            }
            vec![]
        }

        Event::Add => {
            require(state, Phase::Ready, path)?;
            next.phase = Phase::Creating;
            next.form = FormState::empty();
            next.selected = None;
            vec![]
        }

        Event::Edit { id } => {
            require(state, Phase::Ready, path)?;
            let llama = state.find(&id).ok_or(CatalogError::NotFound(id))?;
            next.phase = Phase::Editing;
            next.form = FormState::from_llama(llama);
            next.selected = Some(llama.clone());
            vec![]
        }

        Event::UpdateField { field, value } => {
            if !state.is_form_open() || state.busy {
                return Err(refused(state, path));
            }
            next.form.set(field, &value)?;
            vec![]
        }

        Event::Submit => {
            if !state.is_form_open() || state.busy {
                return Err(refused(state, path));
            }
            let save = match &state.selected {
                Some(selected) if state.phase == Phase::Editing => {
                    let id = selected
                        .id
                        .clone()
                        .ok_or_else(|| CatalogError::NotFound(selected.name.clone()))?;
                    Save::Update {
                        record: state.form.to_llama(Some(id.clone()))?,
                        id,
                        mutation: Mutation::Update,
                    }
                }
                _ => Save::Create(state.form.to_llama(None)?),
            };
            next.busy = true;
            vec![Effect::Save(save)]
        }

        Event::ToggleFavorite { id } => {
            require(state, Phase::Ready, path)?;
            if state.busy {
                return Err(refused(state, path));
            }
            let llama = state.find(&id).ok_or_else(|| CatalogError::NotFound(id.clone()))?;
            next.busy = true;
            vec![Effect::Save(Save::Update {
                record: llama.toggled_favorite(),
                id,
                mutation: Mutation::ToggleFavorite,
            })]
        }

        Event::Cancel => {
            if state.busy {
                return Err(refused(state, path));
            }
            if state.is_form_open() {
                close_form(&mut next);
            }
            vec![]
        }

        Event::Delete { .. } => {
            require(state, Phase::Ready, path)?;
            vec![Effect::Reload(Mutation::Delete)]
        }

        Event::Settled { mutation, result } => {
            next.busy = false;
            close_form(&mut next);
            match result {
                Ok(()) => {
                    next.error = None;
                    vec![Effect::Reload(mutation)]
                }
                Err(reason) => {
                    next.error = Some(reason);
                    vec![]
                }
            }
        }
    };

    Ok((next, effects))
}

fn close_form(state: &mut CatalogState) {
    state.phase = Phase::Ready;
    state.form = FormState::empty();
    state.selected = None;
}

fn require(state: &CatalogState, phase: Phase, request: &'static str) -> Result<(), CatalogError> {
    if state.phase == phase {
        Ok(())
    } else {
        Err(refused(state, request))
    }
}

fn refused(state: &CatalogState, request: &'static str) -> CatalogError {
    CatalogError::InvalidTransition {
        phase: state.phase,
        request,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::form::FormField;
    use crate::model::Breed;
    use llama_client::Envelope;

    fn llama(id: &str, name: &str) -> Llama {
        let mut l = Llama::new(name, Breed::Classic, "white");
        l.id = Some(id.to_string());
        l
    }

    fn ready(llamas: Vec<Llama>) -> CatalogState {
        let (state, _) = transition(&CatalogState::initial(), Event::Loaded(Envelope::ok(llamas))).unwrap();
        state
    }

    fn step(state: &CatalogState, event: Event) -> (CatalogState, Vec<Effect>) {
        transition(state, event).unwrap()
    }

    fn field(f: FormField, v: &str) -> Event {
        Event::UpdateField { field: f, value: v.to_string() }
    }

    // ========================================================================
    // Loading
    // ========================================================================

    #[test]
    fn mount_fetches_list() {
        let (state, effects) = step(&CatalogState::initial(), Event::Mount);
        assert_eq!(state.phase, Phase::Loading);
        assert_eq!(effects, vec![Effect::FetchList]);
    }

    #[test]
    fn loaded_replaces_list() {
        let state = ready(vec![llama("a", "Dolly")]);
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.llamas.len(), 1);

        let (loading, _) = step(&state, Event::Reload);
        let (state, effects) = step(&loading, Event::Loaded(Envelope::ok(vec![llama("b", "Kuzco")])));
        assert!(effects.is_empty());
        assert_eq!(state.llamas, vec![llama("b", "Kuzco")]);
    }

    #[test]
    fn failed_load_empties_list() {
        let (loading, _) = step(&ready(vec![llama("a", "Dolly")]), Event::Reload);
        let (state, _) = step(&loading, Event::Loaded(Envelope::failure("HTTP 500: boom")));
        assert_eq!(state.phase, Phase::Ready);
        assert!(state.llamas.is_empty());
        assert_eq!(state.error.as_deref(), Some("HTTP 500: boom"));
        assert!(state.is_empty_view());
    }

    #[test]
    fn loaded_outside_loading_is_refused() {
        let state = ready(vec![]);
        let err = transition(&state, Event::Loaded(Envelope::ok(vec![]))).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidTransition { phase: Phase::Ready, .. }));
    }

    // ========================================================================
    // Form lifecycle
    // ========================================================================

    #[test]
    fn add_opens_blank_form() {
        let mut state = ready(vec![]);
        state.form.name = "leftover".into();
        let (state, effects) = step(&state, Event::Add);
        assert_eq!(state.phase, Phase::Creating);
        assert_eq!(state.form, FormState::empty());
        assert!(effects.is_empty());
    }

    #[test]
    fn add_while_loading_is_refused() {
        let err = transition(&CatalogState::initial(), Event::Add).unwrap_err();
        assert_eq!(err.to_string(), "cannot catalog/add while loading");
    }

    #[test]
    fn edit_prefills_from_selected() {
        let mut dolly = llama("a", "Dolly");
        dolly.age = Some(4);
        let (state, _) = step(&ready(vec![dolly.clone()]), Event::Edit { id: "a".into() });
        assert_eq!(state.phase, Phase::Editing);
        assert_eq!(state.selected, Some(dolly.clone()));
        assert_eq!(state.form, FormState::from_llama(&dolly));
    }

    #[test]
    fn edit_unknown_id_is_not_found() {
        let err = transition(&ready(vec![]), Event::Edit { id: "zz".into() }).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(id) if id == "zz"));
    }

    #[test]
    fn cancel_discards_edits_without_effects() {
        let before = ready(vec![llama("a", "Dolly")]);
        let (state, _) = step(&before, Event::Edit { id: "a".into() });
        let (state, _) = step(&state, field(FormField::Name, "Changed"));
        let (state, effects) = step(&state, Event::Cancel);
        assert!(effects.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn field_update_outside_form_is_refused() {
        assert!(transition(&ready(vec![]), field(FormField::Name, "x")).is_err());
    }

    // ========================================================================
    // Submit
    // ========================================================================

    #[test]
    fn submit_without_required_fields_has_no_effects() {
        let (state, _) = step(&ready(vec![]), Event::Add);
        let (state, _) = step(&state, field(FormField::Name, "Dolly"));
        let err = transition(&state, Event::Submit).unwrap_err();
        match err {
            CatalogError::Validation(ValidationError::MissingFields(fields)) => {
                assert_eq!(fields, vec![FormField::Breed, FormField::Color]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn submit_while_creating_saves_new_record() {
        let (state, _) = step(&ready(vec![]), Event::Add);
        let (state, _) = step(&state, field(FormField::Name, "Dolly"));
        let (state, _) = step(&state, field(FormField::Breed, "suri"));
        let (state, _) = step(&state, field(FormField::Color, "white"));
        let (state, effects) = step(&state, Event::Submit);

        assert!(state.busy);
        assert_eq!(state.phase, Phase::Creating);
        assert_eq!(
            effects,
            vec![Effect::Save(Save::Create(Llama::new("Dolly", Breed::Suri, "white")))]
        );
    }

    #[test]
    fn submit_while_editing_resends_full_record() {
        let mut dolly = llama("a", "Dolly");
        dolly.fun_fact = Some("Hums".into());
        let (state, _) = step(&ready(vec![dolly.clone()]), Event::Edit { id: "a".into() });
        let (state, _) = step(&state, field(FormField::Color, "grey"));
        let (_, effects) = step(&state, Event::Submit);

        let mut expected = dolly;
        expected.color = "grey".into();
        assert_eq!(
            effects,
            vec![Effect::Save(Save::Update {
                id: "a".into(),
                record: expected,
                mutation: Mutation::Update,
            })]
        );
    }

    #[test]
    fn double_submit_is_refused() {
        let (state, _) = step(&ready(vec![llama("a", "Dolly")]), Event::Edit { id: "a".into() });
        let (state, _) = step(&state, Event::Submit);
        assert!(transition(&state, Event::Submit).is_err());
    }

    // ========================================================================
    // Settle / favorite / delete
    // ========================================================================

    #[test]
    fn successful_settle_closes_form_and_requests_reload() {
        let (state, _) = step(&ready(vec![llama("a", "Dolly")]), Event::Edit { id: "a".into() });
        let (state, _) = step(&state, Event::Submit);
        let (state, effects) = step(
            &state,
            Event::Settled { mutation: Mutation::Update, result: Ok(()) },
        );
        assert_eq!(state.phase, Phase::Ready);
        assert!(!state.busy);
        assert!(state.selected.is_none());
        assert_eq!(effects, vec![Effect::Reload(Mutation::Update)]);
    }

    #[test]
    fn failed_settle_keeps_list_and_skips_reload() {
        let before = ready(vec![llama("a", "Dolly")]);
        let (state, _) = step(&before, Event::Edit { id: "a".into() });
        let (state, _) = step(&state, Event::Submit);
        let (state, effects) = step(
            &state,
            Event::Settled { mutation: Mutation::Update, result: Err("HTTP 404".into()) },
        );
        assert!(effects.is_empty());
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.llamas, before.llamas);
        assert_eq!(state.error.as_deref(), Some("HTTP 404"));
    }

    #[test]
    fn toggle_favorite_inverts_flag_on_full_record() {
        let (_, effects) = step(&ready(vec![llama("a", "Dolly")]), Event::ToggleFavorite { id: "a".into() });
        let mut expected = llama("a", "Dolly");
        expected.is_favorite = true;
        assert_eq!(
            effects,
            vec![Effect::Save(Save::Update {
                id: "a".into(),
                record: expected,
                mutation: Mutation::ToggleFavorite,
            })]
        );
    }

    #[test]
    fn delete_only_reloads() {
        let before = ready(vec![llama("a", "Dolly")]);
        let (state, effects) = step(&before, Event::Delete { id: "a".into() });
        assert_eq!(state, before);
        assert_eq!(effects, vec![Effect::Reload(Mutation::Delete)]);
    }
}
