use crate::{Action, ExternalComponent, MenuKey, Plan, Snapshot, TargetState};

pub fn plan(snapshot: &Snapshot, target: TargetState) -> Plan {
    let mut actions = Vec::new();

    match target {
        TargetState::StatusOnly => {}
        TargetState::Uninstall => {
            actions.extend(MenuKey::ALL.map(Action::DeleteRegistryKey));
            actions.push(Action::DeleteLauncherArtifact);
        }
        TargetState::ContextOnly => push_context_actions(snapshot, &mut actions),
        TargetState::FullInstall => {
            for component in ExternalComponent::INSTALL_ORDER {
                if !snapshot.state(component.component()).is_installed() {
                    actions.push(Action::InvokeExternalInstaller(component));
                }
            }
            push_context_actions(snapshot, &mut actions);
        }
    }

    Plan::new(target, actions)
}

// The launcher write comes first: the key commands reference its path.
fn push_context_actions(snapshot: &Snapshot, actions: &mut Vec<Action>) {
    if !Action::WriteLauncherArtifact.is_satisfied_by(snapshot) {
        actions.push(Action::WriteLauncherArtifact);
    }
    for key in MenuKey::ALL {
        let action = Action::CreateRegistryKey(key);
        if !action.is_satisfied_by(snapshot) {
            actions.push(action);
        }
    }
}
