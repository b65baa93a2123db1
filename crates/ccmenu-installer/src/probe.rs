use ccmenu_core::{Component, ComponentState, Config, MenuKey, Snapshot};

use crate::registry::{expected_menu_entry, MenuKeyEntry};
use crate::Host;

/// Reads every component. Detection failures degrade to `Absent`.
pub fn snapshot(host: &Host<'_>) -> Snapshot {
    Component::ALL
        .into_iter()
        .fold(Snapshot::new(), |snapshot, component| {
            snapshot.with_state(component, probe_component(host, component))
        })
}

pub fn probe_component(host: &Host<'_>, component: Component) -> ComponentState {
    if component == Component::LauncherArtifact {
        return host.launcher().state();
    }
    if let Some(key) = component.as_menu_key() {
        return probe_menu_key(host, key);
    }

    match host.tools.query_version(component) {
        Ok(version) => ComponentState::Installed(version),
        Err(_) => ComponentState::Absent,
    }
}

fn probe_menu_key(host: &Host<'_>, key: MenuKey) -> ComponentState {
    let entry = match host.registry.read_menu_key(key) {
        Ok(entry) => entry,
        Err(_) => return ComponentState::Absent,
    };
    classify_menu_entry(
        host.config,
        key,
        entry.as_ref(),
        host.launcher().matches_current_template(),
    )
}

pub(crate) fn classify_menu_entry(
    config: &Config,
    key: MenuKey,
    entry: Option<&MenuKeyEntry>,
    launcher_current: bool,
) -> ComponentState {
    let Some(entry) = entry else {
        return ComponentState::Absent;
    };
    let Some(command) = entry.command.as_deref() else {
        return ComponentState::PartiallyInstalled;
    };

    let expected = expected_menu_entry(config, key);
    if Some(command) != expected.command.as_deref()
        || entry.label != expected.label
        || entry.icon != expected.icon
    {
        return ComponentState::Stale;
    }
    if !launcher_current {
        return ComponentState::Stale;
    }
    ComponentState::Installed(None)
}
