use std::fmt;

use crate::{Component, ComponentState, ExternalComponent, MenuKey, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetState {
    FullInstall,
    ContextOnly,
    Uninstall,
    StatusOnly,
}

impl TargetState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullInstall => "install",
            Self::ContextOnly => "context-only",
            Self::Uninstall => "uninstall",
            Self::StatusOnly => "status",
        }
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single step that is safe to repeat on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CreateRegistryKey(MenuKey),
    DeleteRegistryKey(MenuKey),
    WriteLauncherArtifact,
    DeleteLauncherArtifact,
    InvokeExternalInstaller(ExternalComponent),
}

impl Action {
    pub fn component(self) -> Component {
        match self {
            Self::CreateRegistryKey(key) | Self::DeleteRegistryKey(key) => key.component(),
            Self::WriteLauncherArtifact | Self::DeleteLauncherArtifact => {
                Component::LauncherArtifact
            }
            Self::InvokeExternalInstaller(component) => component.component(),
        }
    }

    /// Removal steps expect the component to read absent afterwards.
    pub fn removes(self) -> bool {
        matches!(
            self,
            Self::DeleteRegistryKey(_) | Self::DeleteLauncherArtifact
        )
    }

    pub fn requires_elevation(self) -> bool {
        !matches!(self, Self::InvokeExternalInstaller(_))
    }

    pub fn is_satisfied_by(self, snapshot: &Snapshot) -> bool {
        let state = snapshot.state(self.component());
        if self.removes() {
            matches!(state, ComponentState::Absent)
        } else {
            state.is_installed()
        }
    }

    pub fn token(self) -> String {
        match self {
            Self::CreateRegistryKey(key) => format!("create_registry_key:{}", key.as_str()),
            Self::DeleteRegistryKey(key) => format!("delete_registry_key:{}", key.as_str()),
            Self::WriteLauncherArtifact => "write_launcher_artifact".to_string(),
            Self::DeleteLauncherArtifact => "delete_launcher_artifact".to_string(),
            Self::InvokeExternalInstaller(component) => {
                format!("invoke_external_installer:{}", component.as_str())
            }
        }
    }

    pub fn describe(self) -> String {
        match self {
            Self::CreateRegistryKey(key) => format!("register {} context-menu key", key.as_str()),
            Self::DeleteRegistryKey(key) => format!("remove {} context-menu key", key.as_str()),
            Self::WriteLauncherArtifact => "write launcher script".to_string(),
            Self::DeleteLauncherArtifact => "remove launcher script".to_string(),
            Self::InvokeExternalInstaller(component) => format!("install {component}"),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    target: TargetState,
    actions: Vec<Action>,
}

impl Plan {
    pub fn new(target: TargetState, actions: Vec<Action>) -> Self {
        Self { target, actions }
    }

    pub fn target(&self) -> TargetState {
        self.target
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn contains(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    /// Actions that would still change something on a host in `snapshot`.
    pub fn pending(&self, snapshot: &Snapshot) -> Vec<Action> {
        self.actions
            .iter()
            .copied()
            .filter(|action| !action.is_satisfied_by(snapshot))
            .collect()
    }

    pub fn requires_elevation(&self) -> bool {
        self.actions
            .iter()
            .any(|action| action.requires_elevation())
    }
}
