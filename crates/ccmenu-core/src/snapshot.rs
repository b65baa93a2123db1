use std::collections::BTreeMap;

use crate::{Component, ComponentState};

static ABSENT: ComponentState = ComponentState::Absent;

/// Point-in-time read of every tracked component. Built fresh per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    states: BTreeMap<Component, ComponentState>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, component: Component, state: ComponentState) -> Self {
        self.set(component, state);
        self
    }

    pub fn set(&mut self, component: Component, state: ComponentState) {
        self.states.insert(component, state);
    }

    /// Components that were never probed read as absent.
    pub fn state(&self, component: Component) -> &ComponentState {
        self.states.get(&component).unwrap_or(&ABSENT)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Component, &ComponentState)> + '_ {
        Component::ALL
            .into_iter()
            .map(move |component| (component, self.state(component)))
    }

    pub fn context_menu_state(&self) -> ComponentState {
        let parts = Component::ALL
            .into_iter()
            .filter(|component| component.is_context_menu_part())
            .map(|component| self.state(component))
            .collect::<Vec<_>>();

        if parts.iter().all(|state| state.is_installed()) {
            return ComponentState::Installed(None);
        }
        if parts.iter().all(|state| state.is_absent()) {
            return ComponentState::Absent;
        }
        if parts
            .iter()
            .any(|state| matches!(state, ComponentState::Stale))
        {
            return ComponentState::Stale;
        }
        ComponentState::PartiallyInstalled
    }
}
